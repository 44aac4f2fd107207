// Command-line flags and their merge with the stored configuration.

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::Configuration;
use crate::error::UsageError;

/// Flag names accepted in the single-dash form (`-apikey KEY`).
const LEGACY_FLAGS: &[&str] = &["apikey", "domain", "status", "available", "guid", "config"];

#[derive(Debug, Parser)]
#[command(
    name = "outcomes-import",
    version,
    about = "List, import and track Canvas global outcomes imports"
)]
pub struct Cli {
    /// Canvas API key
    #[arg(long, env = "OUTCOMES_IMPORT_APIKEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// The domain.  You can just say the school name if they have a vanity
    /// domain, like 'utah' for 'utah.instructure.com' or 'localhost'
    #[arg(long)]
    pub domain: Option<String>,

    /// Migration ID to check status
    #[arg(long, value_name = "ID")]
    pub status: Option<i64>,

    /// Check available migration IDs (also accepts `--available=true|false`)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub available: bool,

    /// GUID (or exact title) to schedule for import
    #[arg(long, value_name = "GUID|TITLE")]
    pub guid: Option<String>,

    /// Path of the config file (defaults to ~/.outcomes-import.conf)
    #[arg(long, env = "OUTCOMES_IMPORT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn parse_env() -> Self {
        Cli::parse_from(rewrite_legacy_flags(std::env::args_os()))
    }
}

/// Rewrite `-name` / `-name=value` to `--name` for the known flags. Other
/// arguments, and everything after a bare `--`, pass through unchanged.
pub fn rewrite_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for arg in args {
        if passthrough {
            out.push(arg);
            continue;
        }
        let rewritten = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                None
            }
            Some(s) if s.starts_with('-') && !s.starts_with("--") => {
                let name = s[1..].split('=').next().unwrap_or_default();
                LEGACY_FLAGS
                    .contains(&name)
                    .then(|| OsString::from(format!("-{s}")))
            }
            _ => None,
        };
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

/// The operation to run for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListAvailable,
    Import(String),
    Status(i64),
}

/// Flags after falling back to stored values. Empty strings and a zero
/// migration id mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub apikey: String,
    pub domain: String,
    pub status: i64,
    pub available: bool,
    pub guid: String,
}

impl Invocation {
    /// Fill every unset flag from `stored`. Explicit non-empty flags win.
    pub fn merge(cli: &Cli, stored: Option<&Configuration>) -> Self {
        let mut inv = Invocation {
            apikey: non_empty(cli.apikey.as_deref()),
            domain: non_empty(cli.domain.as_deref()),
            status: cli.status.unwrap_or(0),
            available: cli.available,
            guid: non_empty(cli.guid.as_deref()),
        };

        if let Some(cf) = stored {
            if inv.apikey.is_empty() {
                tracing::info!("Using API key from config file");
                inv.apikey = cf.apikey.clone();
            }
            if inv.status == 0 {
                tracing::info!("Using migration ID from config file");
                inv.status = cf.migration_id;
            }
            if inv.domain.is_empty() {
                tracing::info!("Using domain from config file");
                inv.domain = cf.domain.clone();
            }
        }
        inv
    }

    /// Reject invocations with no API key or domain.
    pub fn verify(&self) -> Result<(), UsageError> {
        if self.apikey.is_empty() {
            return Err(UsageError::MissingApiKey);
        }
        if self.domain.is_empty() {
            return Err(UsageError::MissingDomain);
        }
        Ok(())
    }

    /// Pick the operation: `available` first, then `guid`, then a status
    /// query for the explicit or remembered migration id.
    pub fn action(&self) -> Result<Action, UsageError> {
        if self.available {
            Ok(Action::ListAvailable)
        } else if !self.guid.is_empty() {
            Ok(Action::Import(self.guid.clone()))
        } else if self.status != 0 {
            Ok(Action::Status(self.status))
        } else {
            Err(UsageError::NoAction)
        }
    }
}

fn non_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let argv = std::iter::once("outcomes-import")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::try_parse_from(rewrite_legacy_flags(argv)).unwrap()
    }

    fn stored() -> Configuration {
        Configuration {
            apikey: "stored-key".to_string(),
            migration_id: 7,
            domain: "https://stored.instructure.com".to_string(),
        }
    }

    #[test]
    fn legacy_single_dash_flags_are_rewritten() {
        let argv = ["prog", "-apikey", "k", "-status=3", "-available", "-x", "--guid", "g"]
            .map(OsString::from);
        let out = rewrite_legacy_flags(argv);
        assert_eq!(
            out,
            ["prog", "--apikey", "k", "--status=3", "--available", "-x", "--guid", "g"]
                .map(OsString::from)
        );
    }

    #[test]
    fn available_accepts_an_explicit_boolean() {
        assert!(cli(&["-available"]).available);
        assert!(cli(&["-available=true"]).available);
        assert!(!cli(&["-available=false"]).available);
        assert!(!cli(&[]).available);
    }

    #[test]
    fn available_false_falls_through_to_guid_and_status() {
        let guid = cli(&["-available=false", "-guid", "g"]);
        assert_eq!(
            Invocation::merge(&guid, None).action(),
            Ok(Action::Import("g".to_string()))
        );

        let status = cli(&["--available=false", "--status", "9"]);
        assert_eq!(
            Invocation::merge(&status, None).action(),
            Ok(Action::Status(9))
        );
    }

    #[test]
    fn available_does_not_swallow_the_next_flag() {
        let args = cli(&["--available", "--guid", "g"]);
        assert!(args.available);
        assert_eq!(args.guid.as_deref(), Some("g"));
    }

    #[test]
    fn arguments_after_separator_are_untouched() {
        let argv = ["prog", "--", "-guid"].map(OsString::from);
        assert_eq!(rewrite_legacy_flags(argv.clone()), argv.to_vec());
    }

    #[test]
    fn legacy_and_modern_flags_parse_the_same() {
        let legacy = cli(&["-apikey", "k", "-domain", "utah", "-status", "42"]);
        let modern = cli(&["--apikey", "k", "--domain", "utah", "--status", "42"]);
        assert_eq!(
            Invocation::merge(&legacy, None),
            Invocation::merge(&modern, None)
        );
    }

    #[test]
    fn explicit_flags_override_stored_values() {
        let args = cli(&["--apikey", "k", "--domain", "utah", "--status", "42"]);
        let inv = Invocation::merge(&args, Some(&stored()));
        assert_eq!(inv.apikey, "k");
        assert_eq!(inv.domain, "utah");
        assert_eq!(inv.status, 42);
    }

    #[test]
    fn absent_flags_fall_back_to_stored_values() {
        let inv = Invocation::merge(&cli(&[]), Some(&stored()));
        assert_eq!(inv.apikey, "stored-key");
        assert_eq!(inv.domain, "https://stored.instructure.com");
        assert_eq!(inv.status, 7);
    }

    #[test]
    fn empty_or_zero_flags_count_as_absent() {
        let args = cli(&["--apikey", "", "--domain", "", "--status", "0"]);
        let inv = Invocation::merge(&args, Some(&stored()));
        assert_eq!(inv.apikey, "stored-key");
        assert_eq!(inv.domain, "https://stored.instructure.com");
        assert_eq!(inv.status, 7);
    }

    #[test]
    fn nothing_anywhere_leaves_fields_empty() {
        let inv = Invocation::merge(&cli(&[]), None);
        assert_eq!(inv, Invocation::default());
        assert_eq!(inv.verify(), Err(UsageError::MissingApiKey));
    }

    #[test]
    fn missing_domain_is_reported_after_key() {
        let inv = Invocation::merge(&cli(&["--apikey", "k"]), None);
        assert_eq!(inv.verify(), Err(UsageError::MissingDomain));
    }

    #[test]
    fn action_priority_is_available_then_guid_then_status() {
        let all = cli(&["--available", "--guid", "g", "--status", "5"]);
        assert_eq!(
            Invocation::merge(&all, None).action(),
            Ok(Action::ListAvailable)
        );

        let guid = cli(&["--guid", "g", "--status", "5"]);
        assert_eq!(
            Invocation::merge(&guid, None).action(),
            Ok(Action::Import("g".to_string()))
        );

        let status = cli(&["--status", "5"]);
        assert_eq!(
            Invocation::merge(&status, None).action(),
            Ok(Action::Status(5))
        );
    }

    #[test]
    fn stored_migration_id_resolves_status_action() {
        let inv = Invocation::merge(&cli(&[]), Some(&stored()));
        assert_eq!(inv.action(), Ok(Action::Status(7)));
    }

    #[test]
    fn no_action_is_a_usage_error() {
        let inv = Invocation::merge(&cli(&["--apikey", "k", "--domain", "d"]), None);
        assert_eq!(inv.action(), Err(UsageError::NoAction));
    }
}
