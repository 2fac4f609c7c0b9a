use crate::events::Event;
use crate::scene::KeySplit;

use super::{Predicate, Transform};

/// A unit of an event-translation graph.
///
/// Every node maps one event to zero or more events. An event a filter
/// rejects is dropped from that branch; nothing falls through implicitly.
#[derive(Debug, Clone)]
pub enum PipelineNode {
    Pass,
    Discard,
    Filter(Predicate),
    Transform(Transform),
    /// Each stage receives the output of the previous one.
    Chain(Vec<PipelineNode>),
    /// Every branch receives its own copy of the event.
    FanOut(Vec<PipelineNode>),
    /// Events matching `predicate` take `alternate` instead of `base`.
    Override {
        predicate: Predicate,
        base: Box<PipelineNode>,
        alternate: Box<PipelineNode>,
    },
    Split(KeySplit),
}

impl PipelineNode {
    pub fn process(&self, event: Event, out: &mut Vec<Event>) {
        match self {
            PipelineNode::Pass => out.push(event),
            PipelineNode::Discard => {}
            PipelineNode::Filter(predicate) => {
                if predicate.matches(&event) {
                    out.push(event);
                }
            }
            PipelineNode::Transform(transform) => out.extend(transform.apply(event)),
            PipelineNode::Chain(stages) => {
                let mut current = vec![event];
                for stage in stages {
                    let mut next = Vec::with_capacity(current.len());
                    for ev in current {
                        stage.process(ev, &mut next);
                    }
                    if next.is_empty() {
                        return;
                    }
                    current = next;
                }
                out.extend(current);
            }
            PipelineNode::FanOut(branches) => {
                for branch in branches {
                    branch.process(event, out);
                }
            }
            PipelineNode::Override {
                predicate,
                base,
                alternate,
            } => {
                if predicate.matches(&event) {
                    alternate.process(event, out);
                } else {
                    base.process(event, out);
                }
            }
            PipelineNode::Split(split) => split.process(event, out),
        }
    }

    pub fn run(&self, event: Event) -> Vec<Event> {
        let mut out = Vec::new();
        self.process(event, &mut out);
        out
    }
}

/// `a` then `b`. Nested chains are flattened.
pub fn chain(a: PipelineNode, b: PipelineNode) -> PipelineNode {
    chain_all([a, b])
}

pub fn chain_all(stages: impl IntoIterator<Item = PipelineNode>) -> PipelineNode {
    let mut flat = Vec::new();
    for stage in stages {
        match stage {
            PipelineNode::Chain(inner) => flat.extend(inner),
            PipelineNode::Pass => {}
            other => flat.push(other),
        }
    }
    match flat.len() {
        0 => PipelineNode::Pass,
        1 => flat.remove(0),
        _ => PipelineNode::Chain(flat),
    }
}

/// Routes events matching `predicate` through `alternate`; the rest take
/// `base`.
pub fn override_with(
    base: PipelineNode,
    alternate: PipelineNode,
    predicate: Predicate,
) -> PipelineNode {
    PipelineNode::Override {
        predicate,
        base: Box::new(base),
        alternate: Box::new(alternate),
    }
}

/// Broadcast to every branch. Branch order is not part of the contract.
pub fn fan_out(branches: impl IntoIterator<Item = PipelineNode>) -> PipelineNode {
    PipelineNode::FanOut(branches.into_iter().collect())
}

pub fn filter(predicate: Predicate) -> PipelineNode {
    PipelineNode::Filter(predicate)
}

pub fn transform(transform: Transform) -> PipelineNode {
    PipelineNode::Transform(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PortId;
    use crate::pipeline::{Source, negate};

    fn sorted(mut events: Vec<Event>) -> Vec<Event> {
        events.sort_by_key(|e| (e.number, e.value));
        events
    }

    #[test]
    fn chain_drops_rejected_events() {
        let node = chain(
            filter(Predicate::notes([1, 2])),
            transform(Transform::Transpose(10)),
        );
        assert_eq!(node.run(Event::note_on(1, 5)), vec![Event::note_on(11, 5)]);
        assert!(node.run(Event::note_on(3, 5)).is_empty());
    }

    #[test]
    fn chain_flattens_and_skips_pass() {
        let inner = chain(transform(Transform::Transpose(1)), transform(Transform::Transpose(2)));
        let node = chain_all([PipelineNode::Pass, inner, transform(Transform::Transpose(3))]);
        match &node {
            PipelineNode::Chain(stages) => assert_eq!(stages.len(), 3),
            other => panic!("expected chain, got {other:?}"),
        }
        assert_eq!(node.run(Event::note_on(0, 1))[0].number, 6);
        assert!(matches!(chain_all(Vec::new()), PipelineNode::Pass));
    }

    #[test]
    fn fan_out_broadcasts() {
        let node = fan_out([
            transform(Transform::Port(PortId::PadOut)),
            transform(Transform::Port(PortId::HostControlOut)),
            PipelineNode::Discard,
        ]);
        let out = node.run(Event::note_on(1, 1));
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|e| e.port == PortId::PadOut));
        assert!(out.iter().any(|e| e.port == PortId::HostControlOut));
    }

    #[test]
    fn override_replaces_only_matching_subset() {
        let node = override_with(
            transform(Transform::Transpose(1)),
            fan_out([
                transform(Transform::Key(40)),
                transform(Transform::Key(41)),
            ]),
            Predicate::notes([8]),
        );
        assert_eq!(node.run(Event::note_on(3, 1)), vec![Event::note_on(4, 1)]);
        assert_eq!(
            sorted(node.run(Event::note_on(8, 1))),
            vec![Event::note_on(40, 1), Event::note_on(41, 1)]
        );
    }

    #[test]
    fn override_as_control_remap() {
        let remap = override_with(
            PipelineNode::Pass,
            transform(Transform::ToControl {
                number: Source::Fixed(8),
                value: Source::Value,
            }),
            Predicate::controls([7]),
        );
        assert_eq!(remap.run(Event::control(7, 127)), vec![Event::control(8, 127)]);
        assert_eq!(remap.run(Event::control(6, 127)), vec![Event::control(6, 127)]);
        assert_eq!(remap.run(Event::note_on(7, 127)), vec![Event::note_on(7, 127)]);
    }

    #[test]
    fn negated_filter_passes_everything_else() {
        let node = filter(negate(Predicate::notes([8])));
        assert!(node.run(Event::note_on(8, 1)).is_empty());
        assert_eq!(node.run(Event::control(8, 1)).len(), 1);
    }

    #[test]
    fn unmatched_event_yields_nothing() {
        let node = fan_out([
            filter(Predicate::notes([1])),
            filter(Predicate::controls([1])),
        ]);
        assert!(node.run(Event::note_on(2, 1)).is_empty());
    }
}
