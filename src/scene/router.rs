use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};

use crate::error::SceneNotFoundWarning;
use crate::events::{Event, EventKind, OUTPUT_CHANNEL, PortId};
use crate::grid::{FIRST_CTRL, SIDE};

use super::{Scene, SceneId, SceneRegistry};

/// Which controller events change the active scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchMode {
    /// Pressing `control` steps to the next registered scene.
    Cycle { control: u8 },
    /// Top-row key in column c selects scene c + 1.
    TopRow,
}

impl Default for SwitchMode {
    fn default() -> Self {
        SwitchMode::Cycle {
            control: FIRST_CTRL + 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    Next,
    Select(SceneId),
    /// A release or partial press on a switch key.
    Ignore,
}

impl SwitchMode {
    /// `None` when the event is not a scene-switch event at all.
    pub fn action(&self, event: &Event) -> Option<SwitchAction> {
        if event.port != PortId::PadIn || event.kind != EventKind::Control {
            return None;
        }
        let pressed = event.value == 127;
        match *self {
            SwitchMode::Cycle { control } if event.number == control => {
                Some(if pressed { SwitchAction::Next } else { SwitchAction::Ignore })
            }
            SwitchMode::Cycle { .. } => None,
            SwitchMode::TopRow => {
                let column = event.number.checked_sub(FIRST_CTRL).filter(|c| *c < SIDE)?;
                Some(if pressed {
                    SwitchAction::Select(column + 1)
                } else {
                    SwitchAction::Ignore
                })
            }
        }
    }
}

#[derive(Debug)]
pub struct ActiveScene {
    pub id: SceneId,
    pub scene: Arc<Scene>,
}

/// Runs events through whichever scene is active.
///
/// The active scene is one atomically swapped handle: an event takes a
/// snapshot of it before dispatch and finishes under that snapshot even if
/// a switch lands meanwhile.
pub struct SceneRouter {
    registry: SceneRegistry,
    active: ArcSwapOption<ActiveScene>,
    switch: SwitchMode,
}

impl SceneRouter {
    /// Starts with no scene selected; pad events are dropped until one is.
    pub fn new(registry: SceneRegistry, switch: SwitchMode) -> Self {
        Self {
            registry,
            active: ArcSwapOption::empty(),
            switch,
        }
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn switch_mode(&self) -> SwitchMode {
        self.switch
    }

    pub fn active(&self) -> Option<Arc<ActiveScene>> {
        self.active.load_full()
    }

    pub fn active_id(&self) -> Option<SceneId> {
        self.active.load_full().map(|a| a.id)
    }

    pub fn select(&self, id: SceneId) -> Result<Arc<ActiveScene>, SceneNotFoundWarning> {
        let scene = self
            .registry
            .get(id)
            .ok_or(SceneNotFoundWarning { id })?;
        let next = Arc::new(ActiveScene {
            id,
            scene: scene.clone(),
        });
        self.active.store(Some(next.clone()));
        tracing::info!(scene = id, name = %next.scene.name, "scene selected");
        Ok(next)
    }

    /// Steps to the next scene in id order. `None` if nothing is registered.
    pub fn next_scene(&self) -> Option<Arc<ActiveScene>> {
        let mut chosen = None;
        self.active.rcu(|current| {
            let after = current.as_ref().map(|a| a.id);
            chosen = self.registry.next_after(after).map(|(id, scene)| {
                Arc::new(ActiveScene {
                    id,
                    scene: scene.clone(),
                })
            });
            chosen.clone().or_else(|| current.clone())
        });
        if let Some(active) = &chosen {
            tracing::info!(scene = active.id, name = %active.scene.name, "scene selected");
        }
        chosen
    }

    /// Translates one event. Switch events are consumed; everything else
    /// runs through the active scene and comes out normalized to the output
    /// channel. Events left on an input port are unrouted and dropped.
    pub fn process(&self, event: Event) -> Vec<Event> {
        if let Some(action) = self.switch.action(&event) {
            self.apply_switch(action);
            return Vec::new();
        }

        let Some(active) = self.active.load_full() else {
            tracing::trace!(?event, "no scene selected, dropping");
            return Vec::new();
        };

        active
            .scene
            .process(event)
            .into_iter()
            .filter(|ev| {
                let routed = ev.port.is_output();
                if !routed {
                    tracing::trace!(event = ?ev, "unrouted event dropped");
                }
                routed
            })
            .map(|ev| ev.on_channel(OUTPUT_CHANNEL))
            .collect()
    }

    fn apply_switch(&self, action: SwitchAction) {
        match action {
            SwitchAction::Next => {
                if self.next_scene().is_none() {
                    tracing::warn!("scene switch requested but no scenes are registered");
                }
            }
            SwitchAction::Select(id) => {
                if let Err(warning) = self.select(id) {
                    tracing::warn!(%warning, current = ?self.active_id(), "keeping current scene");
                }
            }
            SwitchAction::Ignore => {}
        }
    }
}
