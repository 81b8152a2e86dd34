#![forbid(unsafe_code)]
#![cfg(feature = "serde")]

//! JSON shape of run configuration.
//!
//!   cargo test -p scramble-text --features serde --test serde_config

use std::time::Duration;

use pretty_assertions::assert_eq;
use scramble_text::presets::hero_trigger;
use scramble_text::{Color, ColorChoice, Easing, ScrambleConfig, TargetText, TriggerConfig};

#[test]
fn partial_config_fills_defaults() {
    let json = r##"{
        "duration": { "secs": 1, "nanos": 50000000 },
        "scramble_ratio": 0.35,
        "alphabet": "MEDLOCK",
        "easing": "cubic-out",
        "active_color": { "fixed": "#75d8ff" }
    }"##;
    let config: ScrambleConfig = serde_json::from_str(json).expect("valid config");
    assert_eq!(config.duration, Duration::from_millis(1050));
    assert_eq!(config.easing, Easing::CubicOut);
    assert_eq!(config.active_color, ColorChoice::Fixed(Color::rgb(0x75, 0xd8, 0xff)));
    assert_eq!(config.target, TargetText::Base);
    assert!(config.play_once);
    assert_eq!(String::from(config.alphabet), "MEDLOCK");
}

#[test]
fn bad_color_is_rejected() {
    let json = r##"{ "settle_color": "#12" }"##;
    let err = serde_json::from_str::<ScrambleConfig>(json).unwrap_err();
    assert!(err.to_string().contains("invalid color"), "{err}");
}

#[test]
fn trigger_config_survives_json() {
    let trigger = hero_trigger();
    let json = serde_json::to_string(&trigger).expect("serializes");
    let back: TriggerConfig = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back, trigger);
}
