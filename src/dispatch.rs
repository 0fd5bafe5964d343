//! Dispatch Engine - the per-control state machine.
//!
//! Consumes one raw MIDI message at a time, decides whether it represents a
//! meaningful change, applies the configured transform (linear rescale,
//! flip-flop, up-only filter), renders the command line, and queues it for
//! the command worker. The engine is owned by a single task; all MIDI ports
//! feed one merged queue in front of it, so no locking is needed here.

#[cfg(test)]
mod tests;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, trace, warn};

use crate::control::MidiControl;
use crate::error::DispatchError;
use crate::midi::{format_hex, MidiMessage};
use crate::state::ControlStateStore;
use crate::trigger::TriggerTable;

/// A rendered command line, queued for the command worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// The control that fired, for log context
    pub control: MidiControl,
    /// Complete shell command line
    pub line: String,
}

/// Rescale a 0-127 MIDI value into an output span using truncating integer
/// division. The configured minimum is deliberately not added as an offset;
/// the historic implementation only ever uses the span.
///
/// The intermediate product is widened to i64: any span up to `i32::MAX` is
/// valid configuration, and `127 * span` must not wrap. The result is back
/// in i32 range because it never exceeds the span.
pub(crate) fn rescale(raw_value: u8, span: i32) -> i32 {
    ((i64::from(raw_value) * i64::from(span)) / 127) as i32
}

/// The event-to-command dispatch engine.
pub struct DispatchEngine {
    table: TriggerTable,
    store: ControlStateStore,
    commands: mpsc::Sender<CommandRequest>,
}

impl DispatchEngine {
    /// Create an engine over a built trigger table. The state store is
    /// pre-seeded with default state for every configured control.
    pub fn new(table: TriggerTable, commands: mpsc::Sender<CommandRequest>) -> Self {
        let store = ControlStateStore::seeded(table.controls());
        Self { table, store, commands }
    }

    /// Feed one raw MIDI message through the engine.
    ///
    /// Everything that is not a control-change message is a no-op, as are
    /// unconfigured controllers. Dispatch failures are logged with the
    /// control's token and swallowed; event processing never stops.
    pub fn process(&mut self, raw: &[u8]) {
        let message = match MidiMessage::parse(raw) {
            Some(message) => message,
            None => {
                trace!("unparseable MIDI message: {}", format_hex(raw));
                return;
            }
        };

        let (cc, value) = match message {
            MidiMessage::ControlChange { cc, value, .. } => (cc, value),
            other => {
                trace!("ignoring non-CC message: {}", other);
                return;
            }
        };

        let control = match MidiControl::from_cc(cc) {
            Some(control) => control,
            None => {
                trace!("no identifier defined for controller {}", cc);
                return;
            }
        };

        if let Err(err) = self.dispatch(control, value) {
            warn!("dispatch failed for {}: {}", control.token(), err);
        }
    }

    fn dispatch(&mut self, control: MidiControl, raw_value: u8) -> Result<(), DispatchError> {
        // Unconfigured controls are filtered here, before the state store.
        let Some(def) = self.table.get(control) else {
            trace!("no trigger bound to {}", control.token());
            return Ok(());
        };

        let mut state = self
            .store
            .get(control)
            .ok_or(DispatchError::MissingState(control))?;

        let computed = rescale(raw_value, def.span());

        // Change filter: identical values never re-fire.
        if computed == state.last_value {
            return Ok(());
        }

        // The cache is committed before the modifier policy runs, so an
        // aborted dispatch still remembers the value (partial update).
        state.last_value = computed;

        let downstream = if def.flip_flop {
            if computed > 0 {
                state.toggle_bit = !state.toggle_bit;
                self.store.set(control, state);
                i32::from(state.toggle_bit)
            } else {
                // The toggle only fires on rising edges.
                self.store.set(control, state);
                return Ok(());
            }
        } else {
            self.store.set(control, state);
            if def.up_only && computed == 0 {
                return Ok(());
            }
            computed
        };

        let line = def.render(downstream);
        debug!("{} -> '{}'", control.token(), line);

        match self.commands.try_send(CommandRequest { control, line }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DispatchError::QueueFull(control)),
            Err(TrySendError::Closed(_)) => Err(DispatchError::QueueClosed(control)),
        }
    }
}
