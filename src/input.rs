//! MIDI input listener
//!
//! Opens every available input port and funnels all callbacks into one merged
//! queue, so the dispatch engine runs as a single consumer regardless of how
//! many physical devices are plugged in.

use anyhow::{Context, Result};
use midir::{MidiInput, MidiInputConnection};
use tokio::sync::mpsc;
use tracing::{debug, info};

const CLIENT_NAME: &str = "midi-trigger";

/// Depth of the merged event queue. Callbacks drop events instead of blocking
/// when the consumer falls this far behind.
const EVENT_QUEUE_DEPTH: usize = 1024;

/// One raw MIDI message as delivered by a port callback.
#[derive(Debug, Clone)]
pub struct RawMidiEvent {
    /// Name of the port that delivered the message, for log context
    pub port: String,
    pub bytes: Vec<u8>,
}

/// Listens on all MIDI input ports and merges their events into one channel.
pub struct MidiListener {
    connections: Vec<MidiInputConnection<()>>,
    event_tx: mpsc::Sender<RawMidiEvent>,
    event_rx: Option<mpsc::Receiver<RawMidiEvent>>,
}

impl MidiListener {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        Self {
            connections: Vec::new(),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// List available MIDI input ports
    pub fn list_input_ports() -> Result<Vec<String>> {
        let midi_in = MidiInput::new(CLIENT_NAME).context("Failed to create MIDI input")?;

        let mut port_names = Vec::new();
        for port in midi_in.ports() {
            if let Ok(name) = midi_in.port_name(&port) {
                port_names.push(name);
            }
        }

        Ok(port_names)
    }

    /// Open every available input port.
    ///
    /// Returns the number of ports opened. Zero ports is not an error; the
    /// process simply idles until shutdown.
    pub fn connect_all(&mut self) -> Result<usize> {
        let probe = MidiInput::new(CLIENT_NAME).context("Failed to create MIDI input")?;
        let port_count = probe.ports().len();
        info!("{} MIDI input port(s) available", port_count);

        for index in 0..port_count {
            // midir consumes the client on connect, so each port gets its own.
            let input = MidiInput::new(CLIENT_NAME).context("Failed to create MIDI input")?;
            let ports = input.ports();
            let Some(port) = ports.get(index) else {
                // Port disappeared between enumeration and connect.
                debug!("input port #{} vanished before connect", index);
                continue;
            };

            let name = input
                .port_name(port)
                .unwrap_or_else(|_| format!("port-{}", index));
            info!("opening input port #{}: {}", index, name);

            let event_tx = self.event_tx.clone();
            let port_label = name.clone();
            let connection = input
                .connect(
                    port,
                    CLIENT_NAME,
                    move |_timestamp, bytes, _| {
                        let event = RawMidiEvent {
                            port: port_label.clone(),
                            bytes: bytes.to_vec(),
                        };
                        // Never block inside the MIDI callback.
                        let _ = event_tx.try_send(event);
                    },
                    (),
                )
                .map_err(|e| anyhow::anyhow!("failed to open input port '{}': {}", name, e))?;

            self.connections.push(connection);
        }

        Ok(self.connections.len())
    }

    /// Take the merged event receiver (for the dispatch loop to consume)
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<RawMidiEvent>> {
        self.event_rx.take()
    }

    /// Close all port connections
    pub fn disconnect(&mut self) {
        self.connections.clear();
        debug!("all MIDI input ports closed");
    }
}

impl Default for MidiListener {
    fn default() -> Self {
        Self::new()
    }
}
