use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::events::{Event, PortId};
use crate::pipeline::PipelineNode;

pub type SceneId = u8;

/// A complete, read-only routing graph for both directions.
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    /// Handles events arriving on the controller port.
    pub pad_to_host: PipelineNode,
    /// Handles events arriving on host ports.
    pub host_to_pad: PipelineNode,
}

impl Scene {
    pub fn new(
        name: impl Into<String>,
        pad_to_host: PipelineNode,
        host_to_pad: PipelineNode,
    ) -> Self {
        Self {
            name: name.into(),
            pad_to_host,
            host_to_pad,
        }
    }

    pub fn process(&self, event: Event) -> Vec<Event> {
        match event.port {
            PortId::PadIn => self.pad_to_host.run(event),
            PortId::HostBeatIn | PortId::HostCandyIn => self.host_to_pad.run(event),
            PortId::PadOut | PortId::HostControlOut => Vec::new(),
        }
    }
}

/// Immutable scene id → scene map, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    scenes: BTreeMap<SceneId, Arc<Scene>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: SceneId, scene: Scene) -> Self {
        self.scenes.insert(id, Arc::new(scene));
        self
    }

    pub fn get(&self, id: SceneId) -> Option<&Arc<Scene>> {
        self.scenes.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.scenes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SceneId, &Arc<Scene>)> {
        self.scenes.iter().map(|(id, scene)| (*id, scene))
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Scene following `current` in id order, wrapping around. With no
    /// current scene this is the lowest id.
    pub fn next_after(&self, current: Option<SceneId>) -> Option<(SceneId, &Arc<Scene>)> {
        let after = current.and_then(|id| {
            self.scenes
                .range((Bound::Excluded(id), Bound::Unbounded))
                .next()
        });
        after
            .or_else(|| self.scenes.iter().next())
            .map(|(id, scene)| (*id, scene))
    }
}

impl FromIterator<(SceneId, Scene)> for SceneRegistry {
    fn from_iter<I: IntoIterator<Item = (SceneId, Scene)>>(iter: I) -> Self {
        Self {
            scenes: iter
                .into_iter()
                .map(|(id, scene)| (id, Arc::new(scene)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(name: &str) -> Scene {
        Scene::new(name, PipelineNode::Pass, PipelineNode::Discard)
    }

    #[test]
    fn dispatches_by_input_port() {
        let scene = empty("pass");
        assert_eq!(scene.process(Event::note_on(1, 1)).len(), 1);
        assert!(scene.process(Event::note_on(1, 1).on_port(PortId::HostBeatIn)).is_empty());
        assert!(scene.process(Event::note_on(1, 1).on_port(PortId::PadOut)).is_empty());
    }

    #[test]
    fn next_wraps_in_id_order() {
        let registry: SceneRegistry = [(5, empty("e")), (1, empty("a")), (3, empty("c"))]
            .into_iter()
            .collect();
        assert_eq!(registry.next_after(None).map(|(id, _)| id), Some(1));
        assert_eq!(registry.next_after(Some(1)).map(|(id, _)| id), Some(3));
        assert_eq!(registry.next_after(Some(3)).map(|(id, _)| id), Some(5));
        assert_eq!(registry.next_after(Some(5)).map(|(id, _)| id), Some(1));
        assert_eq!(registry.next_after(Some(2)).map(|(id, _)| id), Some(3));
        assert!(SceneRegistry::new().next_after(None).is_none());
    }
}
