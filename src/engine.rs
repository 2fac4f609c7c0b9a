use crate::error::MidiError;
use crate::events::{Event, PortId};
use crate::midi::{EventSink, EventSource};
use crate::scene::SceneRouter;
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Controller reset: every light off, default mapping.
pub const PAD_RESET: Event = Event::control(0, 0).on_port(PortId::PadOut);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub processed: u64,
    pub emitted: u64,
    /// Events that produced no output at all, switch events excluded.
    pub dropped: u64,
    /// Scene-switch presses and releases consumed by the router.
    pub switches: u64,
    pub send_failures: u64,
}

pub struct EngineHandle {
    thread: JoinHandle<EngineStats>,
}

impl EngineHandle {
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the source to run dry.
    pub fn join(self) -> std::thread::Result<EngineStats> {
        self.thread.join()
    }
}

pub fn spawn_engine<S, K>(router: Arc<SceneRouter>, source: S, sink: K) -> io::Result<EngineHandle>
where
    S: EventSource + Send + 'static,
    K: EventSink + Send + 'static,
{
    let thread = std::thread::Builder::new()
        .name("padroute-engine".into())
        .spawn(move || run(&router, source, sink))?;
    Ok(EngineHandle { thread })
}

/// Routes events one at a time, each to completion, until the source ends.
pub fn run<S, K>(router: &SceneRouter, mut source: S, mut sink: K) -> EngineStats
where
    S: EventSource,
    K: EventSink,
{
    let mut stats = EngineStats::default();
    let switch = router.switch_mode();
    tracing::debug!(?switch, "engine started");

    while let Some(event) = source.receive() {
        stats.processed += 1;
        if switch.action(&event).is_some() {
            stats.switches += 1;
            router.process(event);
            continue;
        }
        let routed = router.process(event);
        if routed.is_empty() {
            stats.dropped += 1;
            continue;
        }
        for out in routed {
            match sink.send(out, out.port) {
                Ok(()) => stats.emitted += 1,
                Err(e) => {
                    stats.send_failures += 1;
                    tracing::warn!(event = ?out, error = %e, "send failed");
                }
            }
        }
    }

    tracing::info!(
        processed = stats.processed,
        emitted = stats.emitted,
        dropped = stats.dropped,
        switches = stats.switches,
        "engine stopped"
    );
    stats
}

pub fn reset_pad<K: EventSink>(sink: &mut K) -> Result<(), MidiError> {
    sink.send(PAD_RESET, PortId::PadOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::layout;
    use crate::scene::SwitchMode;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    struct Script(VecDeque<Event>);

    impl EventSource for Script {
        fn receive(&mut self) -> Option<Event> {
            self.0.pop_front()
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Arc<Mutex<Vec<(PortId, Event)>>>,
        refuse: Option<PortId>,
    }

    impl EventSink for Recorder {
        fn send(&mut self, event: Event, port: PortId) -> Result<(), MidiError> {
            if self.refuse == Some(port) {
                return Err(MidiError::NotOpen(port));
            }
            self.sent.lock().push((port, event));
            Ok(())
        }
    }

    fn router() -> SceneRouter {
        let config = RouterConfig::default();
        let registry = layout::build_registry(&config).unwrap();
        let router = SceneRouter::new(registry, SwitchMode::default());
        router.select(2).unwrap();
        router
    }

    fn script(events: impl IntoIterator<Item = Event>) -> Script {
        Script(events.into_iter().collect())
    }

    #[test]
    fn routes_until_source_ends() {
        let router = router();
        let sink = Recorder::default();
        let stats = run(
            &router,
            script([
                Event::note_on(16, 100),
                Event::note_on(36, 8).on_port(PortId::HostBeatIn),
                Event::control(50, 3),
            ]),
            sink.clone(),
        );

        assert_eq!(stats.processed, 3);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.emitted, 3);

        let sent = sink.sent.lock();
        assert!(sent.contains(&(
            PortId::HostControlOut,
            Event::control(0, 127).on_port(PortId::HostControlOut)
        )));
        assert!(sent.contains(&(
            PortId::PadOut,
            Event::note_on(96, 1).on_port(PortId::PadOut)
        )));
    }

    #[test]
    fn send_failures_do_not_stop_the_loop() {
        let router = router();
        let sink = Recorder {
            refuse: Some(PortId::PadOut),
            ..Recorder::default()
        };
        let stats = run(
            &router,
            script([Event::note_on(0, 100), Event::note_on(2, 100)]),
            sink.clone(),
        );
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.send_failures, 2);
        assert_eq!(stats.emitted, 2);
        assert!(sink.sent.lock().iter().all(|(port, _)| *port == PortId::HostControlOut));
    }

    #[test]
    fn switch_press_changes_scene_midstream() {
        let router = router();
        let sink = Recorder::default();
        let stats = run(
            &router,
            script([Event::control(111, 127), Event::note_on(0, 100)]),
            sink.clone(),
        );
        assert_eq!(stats.switches, 1);
        assert_eq!(stats.dropped, 0);
        // scene 3 is the full keyboard: row 0 column 0 plays the tonic
        assert_eq!(router.active_id(), Some(3));
        let sent = sink.sent.lock();
        assert!(sent.iter().any(|(_, e)| e.kind == crate::events::EventKind::NoteOn
            && e.port == PortId::HostControlOut
            && e.number == crate::grid::A));
    }

    #[test]
    fn switch_releases_are_not_counted_as_dropped() {
        let router = router();
        let stats = run(
            &router,
            script([Event::control(111, 0), Event::control(50, 3)]),
            Recorder::default(),
        );
        assert_eq!(router.active_id(), Some(2));
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.switches, 1);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn spawned_engine_joins_to_stats() {
        let router = Arc::new(router());
        let (tx, rx) = crossbeam::channel::unbounded();
        let handle = spawn_engine(
            router,
            crate::midi::ChannelSource::new(rx),
            Recorder::default(),
        )
        .unwrap();
        tx.send(Event::note_on(0, 100)).unwrap();
        drop(tx);
        while !handle.is_finished() {
            std::thread::yield_now();
        }
        let stats = handle.join().unwrap();
        assert_eq!(stats.processed, 1);
    }

    #[test]
    fn reset_goes_to_the_pad() {
        let mut sink = Recorder::default();
        reset_pad(&mut sink).unwrap();
        assert_eq!(
            *sink.sent.lock(),
            vec![(PortId::PadOut, Event::control(0, 0).on_port(PortId::PadOut))]
        );
    }
}
