use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    /// Roots scanned by `skillkit list`
    #[serde(default = "skillkit_core::default_search_paths")]
    pub paths: Vec<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            paths: skillkit_core::default_search_paths(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl Settings {
    /// Get the global config path: ~/.skillkit/skillkit.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skillkit").join("skillkit.toml"))
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skillkit/skillkit.toml (optional)
    /// 2. Local override: ./skillkit.toml (optional)
    /// 3. Environment variables with SKILLKIT__ prefix
    /// 4. SKILLKIT_LOG / SKILLKIT_PATH (highest priority)
    ///
    /// An explicit file replaces layers 1 and 2 and must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut config_builder = config::Config::builder();

        match explicit {
            Some(path) => {
                config_builder = config_builder.add_source(config::File::from(path));
            }
            None => {
                if let Some(global) = Self::global_config_path() {
                    config_builder =
                        config_builder.add_source(config::File::from(global).required(false));
                }
                config_builder = config_builder
                    .add_source(config::File::with_name("skillkit").required(false));
            }
        }

        config_builder = config_builder.add_source(
            config::Environment::with_prefix("SKILLKIT")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("discovery.paths")
                .try_parsing(true),
        );

        if let Ok(level) = env::var("SKILLKIT_LOG") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let mut settings: Self = config_builder.build()?.try_deserialize()?;

        if let Some(paths) = env::var_os("SKILLKIT_PATH") {
            settings.discovery.paths = env::split_paths(&paths).collect();
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.logging.level, "warn");
        assert!(settings
            .discovery
            .paths
            .contains(&PathBuf::from(".claude/skills")));
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(
            &path,
            "[logging]\nlevel = \"info\"\n\n[discovery]\npaths = [\"/opt/skills\", \"team-skills\"]\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        if env::var_os("SKILLKIT_LOG").is_none() {
            assert_eq!(settings.logging.level, "info");
        }
        if env::var_os("SKILLKIT_PATH").is_none() {
            assert_eq!(
                settings.discovery.paths,
                vec![PathBuf::from("/opt/skills"), PathBuf::from("team-skills")]
            );
        }
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("partial.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        if env::var_os("SKILLKIT_PATH").is_none() {
            assert!(settings.discovery.paths.contains(&PathBuf::from("skills")));
        }
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let tmp = tempdir().unwrap();
        assert!(Settings::load(Some(&tmp.path().join("absent.toml"))).is_err());
    }
}
