//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for testhub-assistant
#[derive(Parser, Debug)]
#[command(name = "testhub-assistant")]
#[command(author, version, about = "Conversational assistant for test management")]
#[command(long_about = r#"
testhub-assistant serves the AI assistant of the test-management platform.

Clients POST the full conversation to /api/chat and receive a streamed,
plain-text answer. The model may query and modify projects, test cases,
requirements, defects and test plans through a fixed set of tools.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./testhub.toml      Project-level config
3. ~/.config/testhub-assistant/config.toml   Global config

Environment variables override files: TESTHUB_SERVER__PORT=8080,
TESTHUB_AGENT__MAX_TOOL_TURNS=5, GEMINI_API_KEY=...

Example:
  testhub-assistant --port 8080 -v
  testhub-assistant --show-config
"#)]
pub struct Cli {
    /// Address to bind (overrides [server] host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides [server] port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Default tracing filter for the verbosity level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "testhub-assistant",
            "--port",
            "8080",
            "-vv",
            "--config",
            "custom.toml",
        ]);
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.log_filter(), "debug");
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(!cli.no_config);
        assert!(cli.host.is_none());
    }

    #[test]
    fn test_default_filter_is_warn() {
        let cli = Cli::parse_from(["testhub-assistant"]);
        assert_eq!(cli.log_filter(), "warn");
    }
}
