//! Interpreter configuration and the command line that produces it.

use crate::logging::LogLevel;
use argh::FromArgs;

pub const DEFAULT_PROMPT: &str = "> ";

/// What the `cd` builtin does when the directory cannot be entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CdFailurePolicy {
    /// Treat the failure as fatal and end the session.
    #[default]
    Abort,
    /// Print a diagnostic, return status 1 and keep going.
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Printed before each line read by the REPL.
    pub prompt: String,
    pub cd_failure: CdFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            cd_failure: CdFailurePolicy::default(),
        }
    }
}

#[derive(FromArgs, Debug)]
/// A small command interpreter supporting ';', '&', '&&', '||', '|' and redirections.
pub struct Args {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// prompt printed before each line
    pub prompt: String,

    #[argh(switch)]
    /// report a failed cd and keep the session alive instead of exiting
    pub lenient_cd: bool,

    #[argh(option)]
    /// log level: error, warn, info, debug or trace (overrides MINISHELL_LOG)
    pub log_level: Option<LogLevel>,

    #[argh(option, short = 'c')]
    /// run one command line and exit with its status
    pub command: Option<String>,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            prompt: args.prompt.clone(),
            cd_failure: if args.lenient_cd {
                CdFailurePolicy::Report
            } else {
                CdFailurePolicy::Abort
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_strict_cd() {
        let args = Args::from_args(&["minishell"], &[]).unwrap();
        let config = Config::from(&args);
        assert_eq!(config, Config::default());
        assert_eq!(config.cd_failure, CdFailurePolicy::Abort);
        assert!(args.command.is_none());
    }

    #[test]
    fn flags_map_onto_config() {
        let args = Args::from_args(
            &["minishell"],
            &["--lenient-cd", "--prompt", "$ ", "--log-level", "debug", "-c", "true"],
        )
        .unwrap();
        let config = Config::from(&args);
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.cd_failure, CdFailurePolicy::Report);
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(args.command.as_deref(), Some("true"));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        assert!(Args::from_args(&["minishell"], &["--log-level", "loud"]).is_err());
    }
}
