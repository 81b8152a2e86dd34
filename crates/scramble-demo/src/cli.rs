#![forbid(unsafe_code)]

//! Command-line argument parsing for the scramble demo.
//!
//! Parses args by hand to keep the binary lean. Every option has a
//! `SCRAMBLE_DEMO_*` environment override; explicit flags win over the
//! environment, which wins over defaults.

use std::env;
use std::path::PathBuf;
use std::process;

use scramble_text::ConfigError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Scramble Demo: scramble-and-reveal text effects in the terminal

USAGE:
    scramble-demo [OPTIONS]

OPTIONS:
    --word=TEXT          Hero word, one target per letter (default: MEDLOCK)
    --intro=TEXT         Scrubbed intro line
    --frame-ms=N         Frame interval in milliseconds (default: 16)
    --seed=N             Fixed PRNG seed for reproducible frames
    --config=PATH        JSON file overriding the hero/hover/intro settings
    --log=PATH           Write tracing output to PATH
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    e               Hero enters view (staggered resolve)
    l               Hero leaves view (reset to the word)
    s / o           Shuffle in / mirrored scramble out
    1-9             Toggle hover on letter N
    Up / Down       Scrub the intro forward / back
    i               Play the intro to the end
    q / Esc         Quit

ENVIRONMENT VARIABLES:
    SCRAMBLE_DEMO_WORD            Override --word
    SCRAMBLE_DEMO_INTRO           Override --intro
    SCRAMBLE_DEMO_FRAME_MS        Override --frame-ms
    SCRAMBLE_DEMO_SEED            Override --seed
    SCRAMBLE_DEMO_CONFIG          Override --config
    SCRAMBLE_DEMO_LOG             Override --log
    SCRAMBLE_DEMO_LOG_LEVEL       Log filter directives (default: info)
    SCRAMBLE_DEMO_EXIT_AFTER_MS   Override --exit-after-ms";

const DEFAULT_INTRO: &str = "Good stays are made of small surprises";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub word: String,
    pub intro: String,
    pub frame_ms: u64,
    pub seed: Option<u64>,
    pub config_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            word: "MEDLOCK".into(),
            intro: DEFAULT_INTRO.into(),
            frame_ms: 16,
            seed: None,
            config_path: None,
            log_path: None,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl Opts {
    /// Parse the process environment and arguments, exiting on help,
    /// version, or a bad value.
    pub fn parse() -> Self {
        match Self::from_sources(|key| env::var(key).ok(), env::args().skip(1)) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("scramble-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from an environment lookup and an argument list.
    pub fn from_sources(
        env: impl Fn(&str) -> Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Command, ConfigError> {
        let mut opts = Self::default();

        if let Some(val) = env("SCRAMBLE_DEMO_WORD") {
            opts.word = val;
        }
        if let Some(val) = env("SCRAMBLE_DEMO_INTRO") {
            opts.intro = val;
        }
        if let Some(val) = env("SCRAMBLE_DEMO_FRAME_MS") {
            opts.frame_ms = number("SCRAMBLE_DEMO_FRAME_MS", &val)?;
        }
        if let Some(val) = env("SCRAMBLE_DEMO_SEED") {
            opts.seed = Some(number("SCRAMBLE_DEMO_SEED", &val)?);
        }
        if let Some(val) = env("SCRAMBLE_DEMO_CONFIG") {
            opts.config_path = Some(val.into());
        }
        if let Some(val) = env("SCRAMBLE_DEMO_LOG") {
            opts.log_path = Some(val.into());
        }
        if let Some(val) = env("SCRAMBLE_DEMO_EXIT_AFTER_MS") {
            opts.exit_after_ms = number("SCRAMBLE_DEMO_EXIT_AFTER_MS", &val)?;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--word=") {
                        opts.word = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--intro=") {
                        opts.intro = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--frame-ms=") {
                        opts.frame_ms = number("--frame-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(number("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--config=") {
                        opts.config_path = Some(val.into());
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log_path = Some(val.into());
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = number("--exit-after-ms", val)?;
                    } else {
                        return Err(ConfigError::InvalidValue {
                            key: "argument".into(),
                            value: other.to_string(),
                        });
                    }
                }
            }
        }

        opts.frame_ms = opts.frame_ms.max(1);
        if opts.word.trim().is_empty() {
            opts.word = Self::default().word;
        }
        Ok(Command::Run(opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(env: &[(&str, &str)], args: &[&str]) -> Result<Command, ConfigError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Opts::from_sources(
            |key| env.get(key).cloned(),
            args.iter().map(|a| a.to_string()),
        )
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.word, "MEDLOCK");
        assert_eq!(opts.frame_ms, 16);
        assert_eq!(opts.seed, None);
        assert_eq!(opts.exit_after_ms, 0);
    }

    #[test]
    fn flags_override_env() {
        let cmd = parse(
            &[("SCRAMBLE_DEMO_WORD", "HOTEL"), ("SCRAMBLE_DEMO_SEED", "7")],
            &["--word=STAY", "--frame-ms=33"],
        );
        let Ok(Command::Run(opts)) = cmd else {
            panic!("expected run");
        };
        assert_eq!(opts.word, "STAY");
        assert_eq!(opts.seed, Some(7));
        assert_eq!(opts.frame_ms, 33);
    }

    #[test]
    fn bad_number_names_the_key() {
        let err = parse(&[("SCRAMBLE_DEMO_FRAME_MS", "fast")], &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for SCRAMBLE_DEMO_FRAME_MS: \"fast\""
        );
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(parse(&[], &["--frobnicate"]).is_err());
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&[], &["--word=X", "-h"]), Ok(Command::Help));
        assert_eq!(parse(&[], &["-V"]), Ok(Command::Version));
    }

    #[test]
    fn degenerate_values_are_clamped() {
        let Ok(Command::Run(opts)) = parse(&[], &["--frame-ms=0", "--word=   "]) else {
            panic!("expected run");
        };
        assert_eq!(opts.frame_ms, 1);
        assert_eq!(opts.word, "MEDLOCK");
    }

    #[test]
    fn help_text_lists_env_overrides() {
        assert!(HELP_TEXT.contains("SCRAMBLE_DEMO_SEED"));
        assert!(HELP_TEXT.contains("SCRAMBLE_DEMO_EXIT_AFTER_MS"));
        assert!(!VERSION.is_empty());
    }
}
