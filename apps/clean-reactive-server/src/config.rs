//! Layered configuration: defaults, then YAML, then `APP__` environment
//! variables, then command-line overrides.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use info::InfoConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub info: InfoConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::default(),
        }
    }
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
}

impl AppConfig {
    /// # Errors
    /// Fails when the file is unreadable, the YAML is malformed or a value
    /// has the wrong shape
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .with_context(|| match path {
                Some(path) => format!("failed to load config from {}", path.display()),
                None => "failed to load config".to_owned(),
            })
    }

    pub fn apply_cli_overrides(&mut self, cli: CliOverrides) {
        if let Some(port) = cli.port {
            self.server.bind_addr.set_port(port);
        }
        match cli.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// # Errors
    /// Returns the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.info.validate()?;
        Ok(())
    }

    /// # Errors
    /// Fails if the YAML serializer rejects a value
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_saphyr::to_string(self).context("failed to render config as YAML")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use info::{RootMode, StorageKind};
    use std::time::Duration;

    fn write_yaml(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_without_file() {
        temp_env::with_vars_unset(["APP__SERVER__BIND_ADDR", "APP__LOGGING__LEVEL"], || {
            let config = AppConfig::load(None).unwrap();
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.server.bind_addr.port(), 8080);
        });
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(
            &dir,
            r#"
server:
  bind_addr: "0.0.0.0:9000"
logging:
  format: json
info:
  root_mode: infos
  storage: relational
  cache:
    ttl: 30s
"#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind_addr.port(), 9000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.info.root_mode, RootMode::Infos);
        assert_eq!(config.info.storage, StorageKind::Relational);
        assert_eq!(config.info.cache.ttl, Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "info:\n  greeting: from-file\n");

        temp_env::with_vars(
            [
                ("APP__INFO__GREETING", Some("from-env")),
                ("APP__INFO__UPSTREAM__URL", Some("http://localhost:1234/")),
            ],
            || {
                let config = AppConfig::load(Some(&path)).unwrap();
                assert_eq!(config.info.greeting, "from-env");
                assert_eq!(config.info.upstream.url, "http://localhost:1234/");
            },
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "server:\n  colour: blue\n");
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("colour"));
    }

    #[test]
    fn cli_overrides_port_and_level() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(CliOverrides {
            port: Some(3000),
            verbose: 2,
        });
        assert_eq!(config.server.bind_addr.port(), 3000);
        assert_eq!(config.logging.level, "debug");

        config.apply_cli_overrides(CliOverrides {
            port: None,
            verbose: 5,
        });
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn yaml_round_trips_through_loader() {
        let mut config = AppConfig::default();
        config.info.greeting = "round".to_owned();
        let yaml = config.to_yaml().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, &yaml);
        let loaded = temp_env::with_vars_unset(["APP__INFO__GREETING"], || {
            AppConfig::load(Some(&path)).unwrap()
        });
        assert_eq!(loaded, config);
    }
}
