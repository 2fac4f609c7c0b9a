use crate::events::{Event, EventKind};
use crate::pipeline::PipelineNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Low,
    High,
    Both,
}

/// Two regions on one device: notes below `split` go to `low`, the rest to
/// `high`. Controls have no note address and reach both.
#[derive(Debug, Clone)]
pub struct KeySplit {
    split: u8,
    low: Box<PipelineNode>,
    high: Box<PipelineNode>,
}

impl KeySplit {
    pub fn new(split: u8, low: PipelineNode, high: PipelineNode) -> Self {
        Self {
            split,
            low: Box::new(low),
            high: Box::new(high),
        }
    }

    pub fn split_point(&self) -> u8 {
        self.split
    }

    pub fn side(&self, event: &Event) -> Side {
        match event.kind {
            EventKind::NoteOn | EventKind::NoteOff if event.number < self.split => Side::Low,
            EventKind::NoteOn | EventKind::NoteOff => Side::High,
            EventKind::Control => Side::Both,
        }
    }

    pub fn process(&self, event: Event, out: &mut Vec<Event>) {
        match self.side(&event) {
            Side::Low => self.low.process(event, out),
            Side::High => self.high.process(event, out),
            Side::Both => {
                self.low.process(event, out);
                self.high.process(event, out);
            }
        }
    }
}

pub fn key_split(split: u8, low: PipelineNode, high: PipelineNode) -> PipelineNode {
    PipelineNode::Split(KeySplit::new(split, low, high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PortId;
    use crate::pipeline::{Transform, transform};

    fn tagged() -> KeySplit {
        KeySplit::new(
            64,
            transform(Transform::Port(PortId::PadOut)),
            transform(Transform::Port(PortId::HostControlOut)),
        )
    }

    #[test]
    fn notes_go_to_exactly_one_side() {
        let split = tagged();
        for n in 0..128u8 {
            let mut out = Vec::new();
            split.process(Event::note_on(n, 1), &mut out);
            assert_eq!(out.len(), 1);
            let expected = if n < 64 { PortId::PadOut } else { PortId::HostControlOut };
            assert_eq!(out[0].port, expected, "note {n}");
        }
    }

    #[test]
    fn note_offs_follow_their_note() {
        assert_eq!(tagged().side(&Event::note_off(63, 0)), Side::Low);
        assert_eq!(tagged().side(&Event::note_off(64, 0)), Side::High);
    }

    #[test]
    fn controls_reach_both() {
        let mut out = Vec::new();
        tagged().process(Event::control(104, 127), &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|e| e.port == PortId::PadOut));
        assert!(out.iter().any(|e| e.port == PortId::HostControlOut));
    }
}
