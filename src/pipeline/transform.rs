use crate::events::{Event, EventKind, PortId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityOp {
    Offset(i16),
    Fixed(u8),
}

/// Where a generated field takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Fixed(u8),
    Number,
    Value,
}

impl Source {
    fn resolve(self, event: &Event) -> u8 {
        match self {
            Source::Fixed(v) => v,
            Source::Number => event.number,
            Source::Value => event.value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Shift note numbers. Controls pass unchanged.
    Transpose(i16),
    /// Change NoteOn velocity. NoteOff and controls pass unchanged.
    Velocity(VelocityOp),
    /// Replace the note number.
    Key(u8),
    /// Turn any event into a control change.
    ToControl { number: Source, value: Source },
    Port(PortId),
    Channel(u8),
}

impl Transform {
    /// Applies the transform; `None` when the result leaves 0..=127.
    pub fn apply(&self, event: Event) -> Option<Event> {
        match *self {
            Transform::Transpose(semitones) => match event.kind {
                EventKind::NoteOn | EventKind::NoteOff => Some(Event {
                    number: shift(event.number, semitones)?,
                    ..event
                }),
                EventKind::Control => Some(event),
            },
            Transform::Velocity(op) => match event.kind {
                EventKind::NoteOn => {
                    let value = match op {
                        VelocityOp::Offset(delta) => shift(event.value, delta)?,
                        VelocityOp::Fixed(v) => in_range(v as i32)?,
                    };
                    Some(Event { value, ..event })
                }
                EventKind::NoteOff | EventKind::Control => Some(event),
            },
            Transform::Key(number) => match event.kind {
                EventKind::NoteOn | EventKind::NoteOff => Some(Event {
                    number: in_range(number as i32)?,
                    ..event
                }),
                EventKind::Control => Some(event),
            },
            Transform::ToControl { number, value } => Some(Event {
                kind: EventKind::Control,
                number: in_range(number.resolve(&event) as i32)?,
                value: in_range(value.resolve(&event) as i32)?,
                ..event
            }),
            Transform::Port(port) => Some(event.on_port(port)),
            Transform::Channel(channel) => Some(event.on_channel(channel & 0x0F)),
        }
    }
}

fn shift(v: u8, delta: i16) -> Option<u8> {
    in_range(v as i32 + delta as i32)
}

fn in_range(v: i32) -> Option<u8> {
    if (0..=127).contains(&v) {
        Some(v as u8)
    } else {
        tracing::trace!(value = v, "transform left the 0..=127 domain, dropping");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_only_touches_notes() {
        let t = Transform::Transpose(-16);
        assert_eq!(t.apply(Event::note_on(20, 9)).unwrap().number, 4);
        assert_eq!(t.apply(Event::note_off(20, 0)).unwrap().number, 4);
        assert_eq!(t.apply(Event::control(20, 9)).unwrap().number, 20);
    }

    #[test]
    fn transpose_out_of_range_drops() {
        assert!(Transform::Transpose(-5).apply(Event::note_on(4, 9)).is_none());
        assert!(Transform::Transpose(10).apply(Event::note_on(120, 9)).is_none());
    }

    #[test]
    fn extreme_deltas_drop_instead_of_overflowing() {
        assert!(Transform::Transpose(i16::MAX).apply(Event::note_on(1, 1)).is_none());
        assert!(Transform::Transpose(i16::MIN).apply(Event::note_on(127, 1)).is_none());
        let up = Transform::Velocity(VelocityOp::Offset(i16::MAX));
        assert!(up.apply(Event::note_on(1, 127)).is_none());
        let down = Transform::Velocity(VelocityOp::Offset(i16::MIN));
        assert!(down.apply(Event::note_on(1, 0)).is_none());
    }

    #[test]
    fn velocity_only_touches_note_on() {
        let t = Transform::Velocity(VelocityOp::Fixed(48));
        assert_eq!(t.apply(Event::note_on(1, 100)).unwrap().value, 48);
        assert_eq!(t.apply(Event::note_off(1, 0)).unwrap().value, 0);
        assert_eq!(t.apply(Event::control(1, 100)).unwrap().value, 100);

        let t = Transform::Velocity(VelocityOp::Offset(-104));
        assert_eq!(t.apply(Event::note_on(1, 111)).unwrap().value, 7);
    }

    #[test]
    fn to_control_reads_sources() {
        let t = Transform::ToControl {
            number: Source::Number,
            value: Source::Fixed(127),
        };
        let ev = t.apply(Event::note_on(3, 100).on_port(PortId::PadIn)).unwrap();
        assert_eq!(ev, Event::control(3, 127).on_port(PortId::PadIn));

        let t = Transform::ToControl {
            number: Source::Fixed(8),
            value: Source::Value,
        };
        assert_eq!(t.apply(Event::control(7, 64)).unwrap(), Event::control(8, 64));
    }

    #[test]
    fn routing_labels() {
        let ev = Transform::Port(PortId::HostControlOut).apply(Event::note_on(1, 1)).unwrap();
        assert_eq!(ev.port, PortId::HostControlOut);
        let ev = Transform::Channel(18).apply(ev).unwrap();
        assert_eq!(ev.channel, 2);
    }
}
