//! Configuration file loader with multi-source merging

use super::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;
use tracing::warn;

const APP_DIR: &str = "testhub-assistant";
const PROJECT_FILES: [&str; 2] = ["testhub.toml", ".testhub.toml"];
const ENV_PREFIX: &str = "TESTHUB_";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TESTHUB_*` environment variables (`TESTHUB_SERVER__PORT=8080`)
    /// 2. `GEMINI_API_KEY`
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./testhub.toml` or `./.testhub.toml`
    /// 5. XDG config: `$XDG_CONFIG_HOME/testhub-assistant/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        let config: FileConfig = Self::figment(config_path)
            .extract()
            .map_err(Box::new)?;

        let mut issues = config.validate().into_iter();
        match issues.next() {
            Some(first) => {
                for other in issues {
                    warn!("{}", other);
                }
                Err(first)
            }
            None => Ok(config),
        }
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Add global config (XDG or fallback)
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        // Add explicit config path (highest priority for files)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&[API_KEY_ENV])
                    .map(|_| "model.api_key".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    ///
    /// The credential is still read from `GEMINI_API_KEY`.
    pub fn load_defaults() -> FileConfig {
        let mut config = FileConfig::default();
        config.model.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        config
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/testhub-assistant/config.toml if set,
    /// otherwise falls back to ~/.config/testhub-assistant/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] {}* / {}", ENV_PREFIX, API_KEY_ENV);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./testhub.toml or ./.testhub.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.agent.max_tool_turns, 10);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR));
    }

    #[test]
    fn test_project_file_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "testhub.toml",
                r#"
[server]
port = 8080

[agent]
max_tool_turns = 5
"#,
            )?;
            jail.set_env("TESTHUB_AGENT__MAX_TOOL_TURNS", "3");
            jail.set_env("GEMINI_API_KEY", "from-env");

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;

            assert_eq!(config.server.port, 8080);
            assert_eq!(config.agent.max_tool_turns, 3);
            assert_eq!(config.model.api_key.as_deref(), Some("from-env"));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_beats_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".testhub.toml", "[server]\nport = 8080\n")?;
            jail.create_file("custom.toml", "[server]\nport = 9090\n")?;

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).map_err(|e| e.to_string())?;

            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_key_beats_gemini_key() {
        Jail::expect_with(|jail| {
            jail.set_env("GEMINI_API_KEY", "generic");
            jail.set_env("TESTHUB_MODEL__API_KEY", "specific");

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;

            assert_eq!(config.model.api_key.as_deref(), Some("specific"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("testhub.toml", "[agent]\nmax_tool_turns = 0\n")?;

            let err = ConfigLoader::load(None).unwrap_err();

            assert!(matches!(
                err,
                ConfigError::Invalid {
                    field: "agent.max_tool_turns",
                    ..
                }
            ));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        Jail::expect_with(|jail| {
            jail.create_file("testhub.toml", "[server]\nport = \"not a number\"\n")?;

            let err = ConfigLoader::load(None).unwrap_err();

            assert!(matches!(err, ConfigError::Load(_)));
            Ok(())
        });
    }
}
