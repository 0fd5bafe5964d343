//! Trigger Table - validated, compiled per-control trigger definitions.
//!
//! Built once at startup from the parsed config document and read-only
//! afterwards. All the string-typed config fields are converted and checked
//! here so the dispatch path never parses anything.

use std::collections::HashMap;

use regex::Regex;
use tracing::warn;

use crate::config::{AppConfig, TriggerConfig};
use crate::control::MidiControl;
use crate::error::ConfigError;

/// A compiled trigger bound to one control identifier.
#[derive(Debug, Clone)]
pub struct TriggerDef {
    pub control: MidiControl,
    pub command: String,
    pub argument: String,
    /// Compiled injection placeholder pattern
    pub inject: Regex,
    pub range_min: i32,
    pub range_max: i32,
    /// Toggle mode; takes precedence over `up_only`
    pub flip_flop: bool,
    /// Suppress emission when the computed value is zero
    pub up_only: bool,
}

impl TriggerDef {
    fn from_config(cfg: &TriggerConfig) -> Result<Self, ConfigError> {
        let control: MidiControl = cfg.input.parse()?;

        let range_min = parse_number(&cfg.input, "RangeMin", &cfg.range_min)?;
        let range_max = parse_number(&cfg.input, "RangeMax", &cfg.range_max)?;
        if range_min >= range_max {
            return Err(ConfigError::InvalidRange {
                token: cfg.input.clone(),
                min: range_min,
                max: range_max,
            });
        }
        // The span must stay in i32 range so the dispatch arithmetic can't wrap.
        if i64::from(range_max) - i64::from(range_min) > i64::from(i32::MAX) {
            return Err(ConfigError::RangeTooWide {
                token: cfg.input.clone(),
                min: range_min,
                max: range_max,
            });
        }

        let inject = Regex::new(&cfg.inject).map_err(|source| ConfigError::InvalidInjectPattern {
            token: cfg.input.clone(),
            pattern: cfg.inject.clone(),
            source,
        })?;

        Ok(Self {
            control,
            command: cfg.command.clone(),
            argument: cfg.argument.clone(),
            inject,
            range_min,
            range_max,
            flip_flop: parse_flag(&cfg.flip_flop),
            up_only: parse_flag(&cfg.up_only),
        })
    }

    /// Output span used by the rescale. `range_min` is never applied as an
    /// offset, matching the historic behavior.
    pub fn span(&self) -> i32 {
        self.range_max - self.range_min
    }

    /// Substitute the downstream value into the argument template and build
    /// the final command line.
    pub fn render(&self, value: i32) -> String {
        let rendered = self.inject.replace_all(&self.argument, value.to_string().as_str());
        format!("{} {}", self.command, rendered)
    }
}

// Only the literal "true" enables a flag; anything else is false, matching
// the historic config format.
fn parse_flag(value: &str) -> bool {
    value == "true"
}

fn parse_number(token: &str, field: &'static str, value: &str) -> Result<i32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        token: token.to_string(),
        field,
        value: value.to_string(),
    })
}

/// Read-only lookup table from control identifier to trigger definition.
#[derive(Debug, Clone, Default)]
pub struct TriggerTable {
    entries: HashMap<MidiControl, TriggerDef>,
}

impl TriggerTable {
    /// Build the table from a parsed config document.
    ///
    /// Duplicate control identifiers keep the last-defined entry, with a
    /// warning.
    pub fn build(config: &AppConfig) -> Result<Self, ConfigError> {
        let mut entries = HashMap::new();

        for cfg in &config.triggers {
            let def = TriggerDef::from_config(cfg)?;
            if entries.insert(def.control, def).is_some() {
                warn!(
                    "duplicate trigger for control {}, keeping the last-defined entry",
                    cfg.input
                );
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, control: MidiControl) -> Option<&TriggerDef> {
        self.entries.get(&control)
    }

    /// Configured control identifiers, used to seed the state store.
    pub fn controls(&self) -> impl Iterator<Item = MidiControl> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
