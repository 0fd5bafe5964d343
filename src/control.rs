//! Canonical MIDI control-change identifiers and their symbolic tokens.
//!
//! One enumeration is the single source of truth; the token and controller
//! number lookups needed by config resolution and event dispatch are derived
//! from it once at startup.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::ConfigError;

macro_rules! midi_controls {
    ($($name:ident = $value:literal => $token:literal,)+) => {
        /// A MIDI CC controller identifier.
        ///
        /// Covers the named continuous controllers (0x00-0x3F MSB/LSB pairs),
        /// the pedal switches (0x40-0x43), the channel-mode controllers
        /// (0x7A-0x7F), and a sentinel for tokens that map to nothing.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum MidiControl {
            $($name = $value,)+
        }

        impl MidiControl {
            /// Every defined identifier, in controller-number order.
            pub const ALL: &'static [MidiControl] = &[$(MidiControl::$name,)+];

            /// The symbolic token used in configuration files.
            pub fn token(self) -> &'static str {
                match self {
                    $(MidiControl::$name => $token,)+
                }
            }
        }
    };
}

midi_controls! {
    ContinuousController0Msb = 0x00 => "MIDICTRL_CONTINUOUS_CONTROLLER0_MSB",
    ModulationWheelMsb = 0x01 => "MIDICTRL_MODULATION_WHEEL_MSB",
    BreathControlMsb = 0x02 => "MIDICTRL_BREATH_CONTROL_MSB",
    ContinuousController3Msb = 0x03 => "MIDICTRL_CONTINUOUS_CONTROLLER3_MSB",
    FootControllerMsb = 0x04 => "MIDICTRL_FOOT_CONTROLLER_MSB",
    PortamentoTimeMsb = 0x05 => "MIDICTRL_PORTAMENTO_TIME_MSB",
    DataEntryMsb = 0x06 => "MIDICTRL_DATA_ENTRY_MSB",
    MainVolumeMsb = 0x07 => "MIDICTRL_MAIN_VOLUME_MSB",
    ContinuousController8Msb = 0x08 => "MIDICTRL_CONTINUOUS_CONTROLLER8_MSB",
    ContinuousController9Msb = 0x09 => "MIDICTRL_CONTINUOUS_CONTROLLER9_MSB",
    ContinuousController10Msb = 0x0A => "MIDICTRL_CONTINUOUS_CONTROLLER10_MSB",
    ContinuousController11Msb = 0x0B => "MIDICTRL_CONTINUOUS_CONTROLLER11_MSB",
    ContinuousController12Msb = 0x0C => "MIDICTRL_CONTINUOUS_CONTROLLER12_MSB",
    ContinuousController13Msb = 0x0D => "MIDICTRL_CONTINUOUS_CONTROLLER13_MSB",
    ContinuousController14Msb = 0x0E => "MIDICTRL_CONTINUOUS_CONTROLLER14_MSB",
    ContinuousController15Msb = 0x0F => "MIDICTRL_CONTINUOUS_CONTROLLER15_MSB",
    ContinuousController16Msb = 0x10 => "MIDICTRL_CONTINUOUS_CONTROLLER16_MSB",
    ContinuousController17Msb = 0x11 => "MIDICTRL_CONTINUOUS_CONTROLLER17_MSB",
    ContinuousController18Msb = 0x12 => "MIDICTRL_CONTINUOUS_CONTROLLER18_MSB",
    ContinuousController19Msb = 0x13 => "MIDICTRL_CONTINUOUS_CONTROLLER19_MSB",
    ContinuousController20Msb = 0x14 => "MIDICTRL_CONTINUOUS_CONTROLLER20_MSB",
    ContinuousController21Msb = 0x15 => "MIDICTRL_CONTINUOUS_CONTROLLER21_MSB",
    ContinuousController22Msb = 0x16 => "MIDICTRL_CONTINUOUS_CONTROLLER22_MSB",
    ContinuousController23Msb = 0x17 => "MIDICTRL_CONTINUOUS_CONTROLLER23_MSB",
    ContinuousController24Msb = 0x18 => "MIDICTRL_CONTINUOUS_CONTROLLER24_MSB",
    ContinuousController25Msb = 0x19 => "MIDICTRL_CONTINUOUS_CONTROLLER25_MSB",
    ContinuousController26Msb = 0x1A => "MIDICTRL_CONTINUOUS_CONTROLLER26_MSB",
    ContinuousController27Msb = 0x1B => "MIDICTRL_CONTINUOUS_CONTROLLER27_MSB",
    ContinuousController28Msb = 0x1C => "MIDICTRL_CONTINUOUS_CONTROLLER28_MSB",
    ContinuousController29Msb = 0x1D => "MIDICTRL_CONTINUOUS_CONTROLLER29_MSB",
    ContinuousController30Msb = 0x1E => "MIDICTRL_CONTINUOUS_CONTROLLER30_MSB",
    ContinuousController31Msb = 0x1F => "MIDICTRL_CONTINUOUS_CONTROLLER31_MSB",
    ContinuousController0Lsb = 0x20 => "MIDICTRL_CONTINUOUS_CONTROLLER0_LSB",
    ModulationWheelLsb = 0x21 => "MIDICTRL_MODULATION_WHEEL_LSB",
    BreathControlLsb = 0x22 => "MIDICTRL_BREATH_CONTROL_LSB",
    ContinuousController3Lsb = 0x23 => "MIDICTRL_CONTINUOUS_CONTROLLER3_LSB",
    FootControllerLsb = 0x24 => "MIDICTRL_FOOT_CONTROLLER_LSB",
    PortamentoTimeLsb = 0x25 => "MIDICTRL_PORTAMENTO_TIME_LSB",
    DataEntryLsb = 0x26 => "MIDICTRL_DATA_ENTRY_LSB",
    MainVolumeLsb = 0x27 => "MIDICTRL_MAIN_VOLUME_LSB",
    ContinuousController8Lsb = 0x28 => "MIDICTRL_CONTINUOUS_CONTROLLER8_LSB",
    ContinuousController9Lsb = 0x29 => "MIDICTRL_CONTINUOUS_CONTROLLER9_LSB",
    ContinuousController10Lsb = 0x2A => "MIDICTRL_CONTINUOUS_CONTROLLER10_LSB",
    ContinuousController11Lsb = 0x2B => "MIDICTRL_CONTINUOUS_CONTROLLER11_LSB",
    ContinuousController12Lsb = 0x2C => "MIDICTRL_CONTINUOUS_CONTROLLER12_LSB",
    ContinuousController13Lsb = 0x2D => "MIDICTRL_CONTINUOUS_CONTROLLER13_LSB",
    ContinuousController14Lsb = 0x2E => "MIDICTRL_CONTINUOUS_CONTROLLER14_LSB",
    ContinuousController15Lsb = 0x2F => "MIDICTRL_CONTINUOUS_CONTROLLER15_LSB",
    ContinuousController16Lsb = 0x30 => "MIDICTRL_CONTINUOUS_CONTROLLER16_LSB",
    ContinuousController17Lsb = 0x31 => "MIDICTRL_CONTINUOUS_CONTROLLER17_LSB",
    ContinuousController18Lsb = 0x32 => "MIDICTRL_CONTINUOUS_CONTROLLER18_LSB",
    ContinuousController19Lsb = 0x33 => "MIDICTRL_CONTINUOUS_CONTROLLER19_LSB",
    ContinuousController20Lsb = 0x34 => "MIDICTRL_CONTINUOUS_CONTROLLER20_LSB",
    ContinuousController21Lsb = 0x35 => "MIDICTRL_CONTINUOUS_CONTROLLER21_LSB",
    ContinuousController22Lsb = 0x36 => "MIDICTRL_CONTINUOUS_CONTROLLER22_LSB",
    ContinuousController23Lsb = 0x37 => "MIDICTRL_CONTINUOUS_CONTROLLER23_LSB",
    ContinuousController24Lsb = 0x38 => "MIDICTRL_CONTINUOUS_CONTROLLER24_LSB",
    ContinuousController25Lsb = 0x39 => "MIDICTRL_CONTINUOUS_CONTROLLER25_LSB",
    ContinuousController26Lsb = 0x3A => "MIDICTRL_CONTINUOUS_CONTROLLER26_LSB",
    ContinuousController27Lsb = 0x3B => "MIDICTRL_CONTINUOUS_CONTROLLER27_LSB",
    ContinuousController28Lsb = 0x3C => "MIDICTRL_CONTINUOUS_CONTROLLER28_LSB",
    ContinuousController29Lsb = 0x3D => "MIDICTRL_CONTINUOUS_CONTROLLER29_LSB",
    ContinuousController30Lsb = 0x3E => "MIDICTRL_CONTINUOUS_CONTROLLER30_LSB",
    ContinuousController31Lsb = 0x3F => "MIDICTRL_CONTINUOUS_CONTROLLER31_LSB",
    DamperPedal = 0x40 => "MIDICTRL_DAMPER_PEDAL_ON_OFF",
    Portamento = 0x41 => "MIDICTRL_PORTAMENTO_ON_OFF",
    Sustenuto = 0x42 => "MIDICTRL_SUSTENUTO_ON_OFF",
    SoftPedal = 0x43 => "MIDICTRL_SOFT_PEDAL_ON_OFF",
    LocalControl = 0x7A => "MIDICTRL_LOCAL_CONTROL_ON_OFF",
    AllNotesOff = 0x7B => "MIDICTRL_ALL_NOTES_OFF",
    OmniModeOff = 0x7C => "MIDICTRL_OMNI_MODE_OFF",
    OmniModeOn = 0x7D => "MIDICTRL_OMNI_MODE_ON",
    PolyModeOnOff = 0x7E => "MIDICTRL_POLY_MODE_ON_OFF",
    PolyModeOn = 0x7F => "MIDICTRL_POLY_MODE_ON",
    Undefined = 0xFF => "MIDICTRL_CRTL_UNDEFINED",
}

static TOKEN_TO_CONTROL: Lazy<HashMap<&'static str, MidiControl>> =
    Lazy::new(|| MidiControl::ALL.iter().map(|c| (c.token(), *c)).collect());

static CC_TO_CONTROL: Lazy<HashMap<u8, MidiControl>> = Lazy::new(|| {
    MidiControl::ALL
        .iter()
        .filter(|c| **c != MidiControl::Undefined)
        .map(|c| (c.controller(), *c))
        .collect()
});

impl MidiControl {
    /// The raw controller number carried in a CC message.
    pub fn controller(self) -> u8 {
        self as u8
    }

    /// Resolve a controller number from an incoming CC message.
    ///
    /// Controller numbers without a defined identifier (0x44-0x79) resolve to
    /// `None` and are never dispatchable; the `Undefined` sentinel is not
    /// reachable from the wire either.
    pub fn from_cc(cc: u8) -> Option<MidiControl> {
        CC_TO_CONTROL.get(&cc).copied()
    }
}

impl FromStr for MidiControl {
    type Err = ConfigError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        TOKEN_TO_CONTROL
            .get(token)
            .copied()
            .ok_or_else(|| ConfigError::UnknownControlToken(token.to_string()))
    }
}

impl fmt::Display for MidiControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
