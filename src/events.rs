/// Channel every outbound event is normalized to (MIDI channel 1).
pub const OUTPUT_CHANNEL: u8 = 0;

/// Routing label for the ports the router reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortId {
    PadIn,
    HostBeatIn,
    HostCandyIn,
    PadOut,
    HostControlOut,
}

impl PortId {
    pub const INPUTS: [PortId; 3] = [PortId::PadIn, PortId::HostBeatIn, PortId::HostCandyIn];
    pub const OUTPUTS: [PortId; 2] = [PortId::PadOut, PortId::HostControlOut];

    pub fn is_output(self) -> bool {
        matches!(self, PortId::PadOut | PortId::HostControlOut)
    }

    pub fn is_input(self) -> bool {
        !self.is_output()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    Control,
}

impl EventKind {
    pub fn is_note(self) -> bool {
        match self {
            EventKind::NoteOn | EventKind::NoteOff => true,
            EventKind::Control => false,
        }
    }
}

/// A single channel message flowing through the router.
///
/// Events are plain values: every transform returns a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub kind: EventKind,
    pub number: u8,
    pub value: u8,
    /// Zero-based channel nibble.
    pub channel: u8,
    pub port: PortId,
}

impl Event {
    pub const fn new(kind: EventKind, number: u8, value: u8) -> Self {
        Self {
            kind,
            number,
            value,
            channel: OUTPUT_CHANNEL,
            port: PortId::PadIn,
        }
    }

    pub const fn note_on(number: u8, value: u8) -> Self {
        Self::new(EventKind::NoteOn, number, value)
    }

    pub const fn note_off(number: u8, value: u8) -> Self {
        Self::new(EventKind::NoteOff, number, value)
    }

    pub const fn control(number: u8, value: u8) -> Self {
        Self::new(EventKind::Control, number, value)
    }

    pub const fn on_port(self, port: PortId) -> Self {
        Self { port, ..self }
    }

    pub const fn on_channel(self, channel: u8) -> Self {
        Self { channel, ..self }
    }

    pub fn is_note(&self) -> bool {
        self.kind.is_note()
    }

    /// Decodes a raw channel message. A NoteOn with velocity 0 is a NoteOff.
    pub fn from_midi(msg: &[u8], port: PortId) -> Option<Self> {
        if msg.len() < 3 {
            return None;
        }
        let status = msg[0] & 0xF0;
        let channel = msg[0] & 0x0F;
        let (number, value) = (msg[1] & 0x7F, msg[2] & 0x7F);

        let kind = match status {
            0x90 if value > 0 => EventKind::NoteOn,
            0x80 | 0x90 => EventKind::NoteOff,
            0xB0 => EventKind::Control,
            _ => return None,
        };

        Some(Self {
            kind,
            number,
            value,
            channel,
            port,
        })
    }

    pub fn to_midi(&self) -> [u8; 3] {
        let status = match self.kind {
            EventKind::NoteOn => 0x90,
            EventKind::NoteOff => 0x80,
            EventKind::Control => 0xB0,
        };
        [status | (self.channel & 0x0F), self.number & 0x7F, self.value & 0x7F]
    }
}
