//! Tests for the dispatch engine

use super::*;
use crate::config::{AppConfig, TriggerConfig};
use crate::trigger::TriggerTable;
use proptest::prelude::*;
use tokio::sync::mpsc;

fn make_trigger(input: &str, flip_flop: bool, up_only: bool) -> TriggerConfig {
    TriggerConfig {
        input: input.to_string(),
        command: "amixer".to_string(),
        argument: "set Master {VAL}%".to_string(),
        inject: "{VAL}".to_string(),
        range_min: "0".to_string(),
        range_max: "100".to_string(),
        flip_flop: if flip_flop { "true" } else { "false" }.to_string(),
        up_only: if up_only { "true" } else { "false" }.to_string(),
    }
}

fn make_engine(triggers: Vec<TriggerConfig>) -> (DispatchEngine, mpsc::Receiver<CommandRequest>) {
    let table = TriggerTable::build(&AppConfig { triggers }).unwrap();
    let (tx, rx) = mpsc::channel(16);
    (DispatchEngine::new(table, tx), rx)
}

fn drain(rx: &mut mpsc::Receiver<CommandRequest>) -> Vec<CommandRequest> {
    let mut requests = Vec::new();
    while let Ok(request) = rx.try_recv() {
        requests.push(request);
    }
    requests
}

#[test]
fn rescale_reference_values() {
    // range 0..100: floor(v * 100 / 127)
    assert_eq!(rescale(0, 100), 0);
    assert_eq!(rescale(64, 100), 50);
    assert_eq!(rescale(127, 100), 100);
    assert_eq!(rescale(1, 100), 0);
    assert_eq!(rescale(2, 100), 1);
}

#[test]
fn rescale_survives_huge_spans() {
    // 127 * span would wrap an i32 intermediate for spans this large.
    assert_eq!(rescale(127, 2_000_000_000), 2_000_000_000);
    assert_eq!(rescale(64, 2_000_000_000), 1_007_874_015);
    assert_eq!(rescale(127, i32::MAX), i32::MAX);
    assert_eq!(rescale(0, i32::MAX), 0);
}

#[test]
fn huge_range_dispatches_the_full_value() {
    let mut trigger = make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false);
    trigger.range_max = "2000000000".to_string();
    let (mut engine, mut rx) = make_engine(vec![trigger]);

    engine.process(&[0xB0, 0x07, 127]);

    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].line, "amixer set Master 2000000000%");
}

#[test]
fn end_to_end_volume_scenario() {
    // The canonical scenario: main volume fader at mid-travel.
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false)]);

    engine.process(&[0xB0, 0x07, 64]);

    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].control, MidiControl::MainVolumeMsb);
    assert_eq!(requests[0].line, "amixer set Master 50%");
}

#[test]
fn cc_on_any_channel_dispatches() {
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false)]);

    engine.process(&[0xBF, 0x07, 127]); // channel 16
    assert_eq!(drain(&mut rx).len(), 1);
}

#[test]
fn identical_value_is_suppressed() {
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false)]);

    engine.process(&[0xB0, 0x07, 64]);
    engine.process(&[0xB0, 0x07, 64]);

    // The second event hits the change filter.
    assert_eq!(drain(&mut rx).len(), 1);
}

#[test]
fn nearby_raw_values_coalesce_to_one_command() {
    // 1 and 0 both rescale to 0 in a 0..100 range.
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false)]);

    engine.process(&[0xB0, 0x07, 64]);
    engine.process(&[0xB0, 0x07, 1]);
    engine.process(&[0xB0, 0x07, 0]);

    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].line, "amixer set Master 50%");
    assert_eq!(requests[1].line, "amixer set Master 0%");
}

#[test]
fn flip_flop_toggles_on_positive_crossings() {
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_DAMPER_PEDAL_ON_OFF", true, false)]);

    // Press (rising edge): toggle goes true, emits 1.
    engine.process(&[0xB0, 0x40, 127]);
    // Release: computed 0, no command.
    engine.process(&[0xB0, 0x40, 0]);
    // Press again: toggle goes false, emits 0.
    engine.process(&[0xB0, 0x40, 127]);
    // Stuck at 0 afterwards never fires.
    engine.process(&[0xB0, 0x40, 0]);
    engine.process(&[0xB0, 0x40, 0]);

    let lines: Vec<String> = drain(&mut rx).into_iter().map(|r| r.line).collect();
    assert_eq!(lines, vec!["amixer set Master 1%", "amixer set Master 0%"]);
}

#[test]
fn flip_flop_takes_precedence_over_up_only() {
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_DAMPER_PEDAL_ON_OFF", true, true)]);

    engine.process(&[0xB0, 0x40, 127]);

    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 1);
    // Flip-flop output, not the rescaled value.
    assert_eq!(requests[0].line, "amixer set Master 1%");
}

#[test]
fn up_only_suppresses_zero_but_updates_cache() {
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, true)]);

    engine.process(&[0xB0, 0x07, 64]);
    engine.process(&[0xB0, 0x07, 0]);

    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].line, "amixer set Master 50%");

    // The zero was cached even though no command fired.
    let state = engine.store.get(MidiControl::MainVolumeMsb).unwrap();
    assert_eq!(state.last_value, 0);

    // So returning to the same non-zero value fires again.
    engine.process(&[0xB0, 0x07, 64]);
    assert_eq!(drain(&mut rx).len(), 1);
}

#[test]
fn unconfigured_controller_is_a_no_op() {
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false)]);

    engine.process(&[0xB0, 0x01, 127]); // modulation wheel, not configured
    engine.process(&[0xB0, 0x51, 127]); // controller with no defined identifier

    assert!(drain(&mut rx).is_empty());
}

#[test]
fn channel_mode_trigger_dispatches() {
    let mut trigger = make_trigger("MIDICTRL_ALL_NOTES_OFF", false, false);
    trigger.command = "playerctl".to_string();
    trigger.argument = "stop".to_string();
    let (mut engine, mut rx) = make_engine(vec![trigger]);

    engine.process(&[0xB0, 0x7B, 127]);

    let requests = drain(&mut rx);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].line, "playerctl stop");
}

#[test]
fn non_cc_messages_never_dispatch() {
    let (mut engine, mut rx) = make_engine(vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false)]);

    engine.process(&[0x90, 0x07, 64]); // note on
    engine.process(&[0x80, 0x07, 64]); // note off
    engine.process(&[0xD0, 0x07]); // channel pressure
    engine.process(&[0xE0, 0x00, 0x40]); // pitch bend
    engine.process(&[0xF8]); // timing clock
    engine.process(&[0xB0, 0x07]); // truncated CC

    assert!(drain(&mut rx).is_empty());
}

#[test]
fn injection_replaces_every_occurrence() {
    let trigger = TriggerConfig {
        input: "MIDICTRL_MAIN_VOLUME_MSB".to_string(),
        command: "pactl".to_string(),
        argument: "set-sink-volume 0 {VAL}% set-source-volume 0 {VAL}%".to_string(),
        inject: "{VAL}".to_string(),
        range_min: "0".to_string(),
        range_max: "100".to_string(),
        flip_flop: "false".to_string(),
        up_only: "false".to_string(),
    };
    let (mut engine, mut rx) = make_engine(vec![trigger]);

    engine.process(&[0xB0, 0x07, 127]);

    let requests = drain(&mut rx);
    assert_eq!(
        requests[0].line,
        "pactl set-sink-volume 0 100% set-source-volume 0 100%"
    );
}

#[test]
fn full_queue_drops_the_command() {
    let table = TriggerTable::build(&AppConfig {
        triggers: vec![make_trigger("MIDICTRL_MAIN_VOLUME_MSB", false, false)],
    })
    .unwrap();
    let (tx, mut rx) = mpsc::channel(1);
    let mut engine = DispatchEngine::new(table, tx);

    engine.process(&[0xB0, 0x07, 32]);
    engine.process(&[0xB0, 0x07, 64]); // queue full, dropped with a warning
    engine.process(&[0xB0, 0x07, 96]); // still full

    assert_eq!(drain(&mut rx).len(), 1);
}

proptest! {
    #[test]
    fn rescale_stays_within_span(raw in 0u8..=127, span in 1i32..=i32::MAX) {
        let value = rescale(raw, span);
        prop_assert!(value >= 0);
        prop_assert!(value <= span);
    }

    #[test]
    fn rescale_is_monotonic(raw in 0u8..127, span in 1i32..=i32::MAX) {
        prop_assert!(rescale(raw, span) <= rescale(raw + 1, span));
    }

    #[test]
    fn rescale_endpoints(span in 1i32..=i32::MAX) {
        prop_assert_eq!(rescale(0, span), 0);
        prop_assert_eq!(rescale(127, span), span);
    }
}
