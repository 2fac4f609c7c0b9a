use std::collections::BTreeSet;

use crate::events::{Event, EventKind, PortId};

/// Which event kinds a predicate is about. A predicate never matches an
/// event outside its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClass {
    Note,
    NoteOn,
    NoteOff,
    Control,
}

impl KindClass {
    pub fn accepts(self, kind: EventKind) -> bool {
        match (self, kind) {
            (KindClass::Note, EventKind::NoteOn | EventKind::NoteOff) => true,
            (KindClass::NoteOn, EventKind::NoteOn) => true,
            (KindClass::NoteOff, EventKind::NoteOff) => true,
            (KindClass::Control, EventKind::Control) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Number,
    Value,
}

impl Field {
    fn of(self, event: &Event) -> u8 {
        match self {
            Field::Number => event.number,
            Field::Value => event.value,
        }
    }
}

/// Boolean test over an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Kind(KindClass),
    Set {
        class: KindClass,
        field: Field,
        values: BTreeSet<u8>,
    },
    /// Half-open `[lo, hi)`.
    Range {
        class: KindClass,
        field: Field,
        lo: u16,
        hi: u16,
    },
    Port(PortId),
    All(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Predicate::Kind(class) => class.accepts(event.kind),
            Predicate::Set {
                class,
                field,
                values,
            } => class.accepts(event.kind) && values.contains(&field.of(event)),
            Predicate::Range {
                class,
                field,
                lo,
                hi,
            } => {
                let v = field.of(event) as u16;
                class.accepts(event.kind) && *lo <= v && v < *hi
            }
            Predicate::Port(port) => event.port == *port,
            Predicate::All(parts) => parts.iter().all(|p| p.matches(event)),
            Predicate::Not(inner) => !inner.matches(event),
        }
    }

    pub fn notes(numbers: impl IntoIterator<Item = u8>) -> Self {
        Self::set(KindClass::Note, Field::Number, numbers)
    }

    pub fn notes_in(lo: u16, hi: u16) -> Self {
        Self::range(KindClass::Note, Field::Number, lo, hi)
    }

    pub fn controls(numbers: impl IntoIterator<Item = u8>) -> Self {
        Self::set(KindClass::Control, Field::Number, numbers)
    }

    pub fn control_values(values: impl IntoIterator<Item = u8>) -> Self {
        Self::set(KindClass::Control, Field::Value, values)
    }

    /// NoteOn events whose velocity is in `[lo, hi)`.
    pub fn velocities_in(lo: u16, hi: u16) -> Self {
        Self::range(KindClass::NoteOn, Field::Value, lo, hi)
    }

    pub fn set(class: KindClass, field: Field, values: impl IntoIterator<Item = u8>) -> Self {
        Predicate::Set {
            class,
            field,
            values: values.into_iter().collect(),
        }
    }

    pub fn range(class: KindClass, field: Field, lo: u16, hi: u16) -> Self {
        Predicate::Range {
            class,
            field,
            lo,
            hi,
        }
    }
}

/// Matches exactly the events `predicate` rejects.
pub fn negate(predicate: Predicate) -> Predicate {
    match predicate {
        Predicate::Not(inner) => *inner,
        other => Predicate::Not(Box::new(other)),
    }
}

/// Matches when every part matches.
pub fn all_of(parts: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::All(parts.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_respect_kind_class() {
        let p = Predicate::notes([8, 24]);
        assert!(p.matches(&Event::note_on(8, 1)));
        assert!(p.matches(&Event::note_off(24, 0)));
        assert!(!p.matches(&Event::note_on(9, 1)));
        assert!(!p.matches(&Event::control(8, 1)));
    }

    #[test]
    fn ranges_are_half_open() {
        let p = Predicate::notes_in(16, 25);
        assert!(p.matches(&Event::note_on(16, 1)));
        assert!(p.matches(&Event::note_on(24, 1)));
        assert!(!p.matches(&Event::note_on(25, 1)));
        assert!(!p.matches(&Event::note_on(15, 1)));

        let top = Predicate::range(KindClass::Note, Field::Number, 120, 128);
        assert!(top.matches(&Event::note_on(127, 1)));
    }

    #[test]
    fn velocity_range_ignores_note_off() {
        let p = Predicate::velocities_in(0, 8);
        assert!(p.matches(&Event::note_on(36, 7)));
        assert!(!p.matches(&Event::note_off(36, 0)));
    }

    #[test]
    fn negation_is_complement() {
        let right = Predicate::notes([8, 24, 40]);
        let not_right = negate(right.clone());
        for ev in [
            Event::note_on(8, 1),
            Event::note_on(9, 1),
            Event::control(8, 1),
            Event::control(104, 127),
        ] {
            assert_ne!(right.matches(&ev), not_right.matches(&ev));
        }
        assert_eq!(negate(not_right), right);
    }

    #[test]
    fn conjunction_and_ports() {
        let p = all_of([Predicate::Port(PortId::PadIn), Predicate::Kind(KindClass::Control)]);
        assert!(p.matches(&Event::control(1, 1)));
        assert!(!p.matches(&Event::control(1, 1).on_port(PortId::HostBeatIn)));
        assert!(!p.matches(&Event::note_on(1, 1)));
    }
}
