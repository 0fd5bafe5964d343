//! midi-trigger - run shell commands from MIDI control-change events.
//!
//! A declarative configuration binds CC controller identifiers to command
//! templates; the dispatch engine consumes raw events from every input port,
//! filters meaningless changes, applies the configured modifier policy
//! (flip-flop toggle or rising-edge-only), and queues the rendered command
//! line for a worker that executes it through the platform shell.

pub mod config;
pub mod control;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod midi;
pub mod runner;
pub mod state;
pub mod trigger;

pub use config::AppConfig;
pub use control::MidiControl;
pub use dispatch::{CommandRequest, DispatchEngine};
pub use error::{CommandError, ConfigError, DispatchError};
pub use trigger::{TriggerDef, TriggerTable};
