//! Control State Store - per-control runtime state.
//!
//! One entry per configured control, seeded at setup and mutated only by the
//! dispatch engine. Nothing here is persisted; the store dies with the
//! process.

use std::collections::HashMap;

use crate::control::MidiControl;

/// Runtime state of one control: the last emitted output value and the
/// flip-flop toggle bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub last_value: i32,
    pub toggle_bit: bool,
}

/// Mutable per-control state, owned by the single dispatch context.
#[derive(Debug, Default)]
pub struct ControlStateStore {
    states: HashMap<MidiControl, ControlState>,
}

impl ControlStateStore {
    /// Create a store pre-seeded with default state for every given control.
    pub fn seeded(controls: impl IntoIterator<Item = MidiControl>) -> Self {
        Self {
            states: controls
                .into_iter()
                .map(|control| (control, ControlState::default()))
                .collect(),
        }
    }

    /// Look up the state for a control. `None` only for controls that were
    /// never seeded; configured controls always hit.
    pub fn get(&self, control: MidiControl) -> Option<ControlState> {
        self.states.get(&control).copied()
    }

    pub fn set(&mut self, control: MidiControl, state: ControlState) {
        self.states.insert(control, state);
    }
}
