#![forbid(unsafe_code)]

//! Skip reasons and configuration errors.
//!
//! The engine has no error channel for bad run input. Degraded input is
//! clamped, and a run that cannot start is reported as a [`SkipReason`] inside
//! [`RunOutcome`](crate::engine::RunOutcome). [`ConfigError`] only covers
//! parsing configuration values from text (colors, easing names, env/CLI).

use std::fmt;

use scramble_core::animation::UnknownEasing;

/// Why a run request was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No surface is registered under the requested target id.
    MissingSurface,
    /// The resolved target text is empty.
    EmptyText,
    /// The target already finished a play-once run.
    AlreadyCompleted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSurface => f.write_str("no surface registered for target"),
            Self::EmptyText => f.write_str("target text is empty"),
            Self::AlreadyCompleted => f.write_str("play-once run already completed"),
        }
    }
}

/// Error parsing a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Not a `#RGB` / `#RRGGBB` color.
    InvalidColor(String),
    /// Unrecognized easing curve name.
    UnknownEasing(UnknownEasing),
    /// A named setting had a value that could not be parsed.
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor(raw) => write!(f, "invalid color: {raw:?}"),
            Self::UnknownEasing(err) => write!(f, "{err}"),
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownEasing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UnknownEasing> for ConfigError {
    fn from(err: UnknownEasing) -> Self {
        Self::UnknownEasing(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn skip_reason_messages() {
        assert_eq!(SkipReason::EmptyText.to_string(), "target text is empty");
        assert_eq!(
            SkipReason::AlreadyCompleted.to_string(),
            "play-once run already completed"
        );
    }

    #[test]
    fn invalid_value_message_names_key() {
        let err = ConfigError::InvalidValue {
            key: "frame_ms".into(),
            value: "fast".into(),
        };
        assert_eq!(err.to_string(), "invalid value for frame_ms: \"fast\"");
        assert!(err.source().is_none());
    }

    #[test]
    fn easing_error_keeps_source() {
        let err: ConfigError = "wobble".parse::<scramble_core::Easing>().unwrap_err().into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("wobble"));
    }
}
