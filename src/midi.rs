//! Device plumbing: event sources and sinks, and the midir backend.

use crossbeam::channel::{Receiver, Sender};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{PortSpec, RouterConfig};
use crate::error::MidiError;
use crate::events::{Event, PortId};

/// Where the engine pulls events from. Blocks until an event arrives;
/// `None` ends the loop.
pub trait EventSource {
    fn receive(&mut self) -> Option<Event>;
}

/// Where the engine writes routed events.
pub trait EventSink {
    fn send(&mut self, event: Event, port: PortId) -> Result<(), MidiError>;
}

/// Receiving end of the channel every input callback feeds.
pub struct ChannelSource {
    rx: Receiver<Event>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<Event>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelSource {
    fn receive(&mut self) -> Option<Event> {
        self.rx.recv().ok()
    }
}

/// Open output connections keyed by port. Clones share the connections.
#[derive(Clone, Default)]
pub struct MidiSink {
    outputs: Arc<Mutex<HashMap<PortId, MidiOutputConnection>>>,
}

impl MidiSink {
    pub fn is_open(&self, port: PortId) -> bool {
        self.outputs.lock().contains_key(&port)
    }
}

impl EventSink for MidiSink {
    fn send(&mut self, event: Event, port: PortId) -> Result<(), MidiError> {
        let mut outputs = self.outputs.lock();
        let connection = outputs.get_mut(&port).ok_or(MidiError::NotOpen(port))?;
        connection.send(&event.to_midi())?;
        Ok(())
    }
}

/// Live input connections. Dropping them closes the ports and, once every
/// input is gone, ends the paired [`ChannelSource`].
pub struct MidiInputs {
    connections: Vec<(PortId, MidiInputConnection<()>)>,
}

impl MidiInputs {
    pub fn ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.connections.iter().map(|(port, _)| *port)
    }

    pub fn close(self) {
        for (port, connection) in self.connections {
            let _ = connection.close();
            tracing::debug!(?port, "input closed");
        }
    }
}

pub struct MidiBackend {
    pub inputs: MidiInputs,
    pub source: ChannelSource,
    pub sink: MidiSink,
}

/// Opens every configured port. Inputs all feed one channel, so order is
/// kept per port but not across ports.
pub fn open(config: &RouterConfig) -> Result<MidiBackend, MidiError> {
    let (tx, rx) = crossbeam::channel::unbounded();

    let mut connections = Vec::new();
    for port in PortId::INPUTS {
        let Some(spec) = config.ports.spec(port) else {
            tracing::debug!(?port, "input not configured");
            continue;
        };
        let connection = open_input(&config.client_name, port, spec, tx.clone())?;
        tracing::info!(?port, ?spec, "input open");
        connections.push((port, connection));
    }

    let sink = MidiSink::default();
    for port in PortId::OUTPUTS {
        let Some(spec) = config.ports.spec(port) else {
            continue;
        };
        let connection = open_output(&config.client_name, port, spec)?;
        tracing::info!(?port, ?spec, "output open");
        sink.outputs.lock().insert(port, connection);
    }

    Ok(MidiBackend {
        inputs: MidiInputs { connections },
        source: ChannelSource::new(rx),
        sink,
    })
}

fn port_label(port: PortId) -> &'static str {
    match port {
        PortId::PadIn => "pad-in",
        PortId::HostBeatIn => "beat-in",
        PortId::HostCandyIn => "candy-in",
        PortId::PadOut => "pad-out",
        PortId::HostControlOut => "control-out",
    }
}

fn open_input(
    client_name: &str,
    port: PortId,
    spec: &PortSpec,
    tx: Sender<Event>,
) -> Result<MidiInputConnection<()>, MidiError> {
    let mut midi_in = MidiInput::new(client_name)?;
    midi_in.ignore(Ignore::All);

    let callback = move |_stamp: u64, message: &[u8], _: &mut ()| {
        match Event::from_midi(message, port) {
            Some(event) => {
                // the engine is gone once the receiver drops
                let _ = tx.send(event);
            }
            None => tracing::trace!(?message, ?port, "unsupported midi message ignored"),
        }
    };

    match spec {
        PortSpec::Connect(pattern) => {
            let ports = midi_in.ports();
            let mut found = None;
            for candidate in &ports {
                if midi_in.port_name(candidate)?.contains(pattern.as_str()) {
                    found = Some(candidate.clone());
                    break;
                }
            }
            let found = found.ok_or_else(|| MidiError::PortNotFound(pattern.clone()))?;
            midi_in
                .connect(&found, port_label(port), callback, ())
                .map_err(|e| MidiError::Connect {
                    port: pattern.clone(),
                    reason: e.to_string(),
                })
        }
        PortSpec::Virtual(name) => virtual_input(midi_in, name, callback),
    }
}

fn open_output(
    client_name: &str,
    port: PortId,
    spec: &PortSpec,
) -> Result<MidiOutputConnection, MidiError> {
    let midi_out = MidiOutput::new(client_name)?;
    match spec {
        PortSpec::Connect(pattern) => {
            let ports = midi_out.ports();
            let mut found = None;
            for candidate in &ports {
                if midi_out.port_name(candidate)?.contains(pattern.as_str()) {
                    found = Some(candidate.clone());
                    break;
                }
            }
            let found = found.ok_or_else(|| MidiError::PortNotFound(pattern.clone()))?;
            midi_out
                .connect(&found, port_label(port))
                .map_err(|e| MidiError::Connect {
                    port: pattern.clone(),
                    reason: e.to_string(),
                })
        }
        PortSpec::Virtual(name) => virtual_output(midi_out, name),
    }
}

#[cfg(unix)]
fn virtual_input<F>(
    midi_in: MidiInput,
    name: &str,
    callback: F,
) -> Result<MidiInputConnection<()>, MidiError>
where
    F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
{
    use midir::os::unix::VirtualInput;
    midi_in
        .create_virtual(name, callback, ())
        .map_err(|e| MidiError::Connect {
            port: name.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(not(unix))]
fn virtual_input<F>(
    _midi_in: MidiInput,
    _name: &str,
    _callback: F,
) -> Result<MidiInputConnection<()>, MidiError>
where
    F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
{
    Err(MidiError::VirtualUnsupported)
}

#[cfg(unix)]
fn virtual_output(midi_out: MidiOutput, name: &str) -> Result<MidiOutputConnection, MidiError> {
    use midir::os::unix::VirtualOutput;
    midi_out
        .create_virtual(name)
        .map_err(|e| MidiError::Connect {
            port: name.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(not(unix))]
fn virtual_output(_midi_out: MidiOutput, _name: &str) -> Result<MidiOutputConnection, MidiError> {
    Err(MidiError::VirtualUnsupported)
}

#[derive(Debug, Default)]
pub struct PortListing {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Names of every MIDI port the system currently offers.
pub fn list_ports(client_name: &str) -> Result<PortListing, MidiError> {
    let midi_in = MidiInput::new(client_name)?;
    let midi_out = MidiOutput::new(client_name)?;

    let mut listing = PortListing::default();
    for port in midi_in.ports() {
        listing.inputs.push(midi_in.port_name(&port)?);
    }
    for port in midi_out.ports() {
        listing.outputs.push(midi_out.port_name(&port)?);
    }
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_source_ends_when_senders_drop() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let mut source = ChannelSource::new(rx);
        let feeder = tx.clone();
        feeder.send(Event::note_on(1, 1)).unwrap();
        tx.send(Event::control(2, 2).on_port(PortId::HostBeatIn)).unwrap();
        drop(feeder);
        drop(tx);

        assert_eq!(source.receive(), Some(Event::note_on(1, 1)));
        assert_eq!(source.receive().map(|e| e.port), Some(PortId::HostBeatIn));
        assert_eq!(source.receive(), None);
    }

    #[test]
    fn sink_without_outputs_reports_closed_port() {
        let mut sink = MidiSink::default();
        assert!(!sink.is_open(PortId::PadOut));
        assert!(matches!(
            sink.send(Event::control(0, 0), PortId::PadOut),
            Err(MidiError::NotOpen(PortId::PadOut))
        ));
    }
}
