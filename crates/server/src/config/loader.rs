//! Finds and reads the organizer's RON config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

use super::Config;

pub const CONFIG_PATH_ENV: &str = "ORGANIZER_CONFIG_PATH";

/// Candidates tried, relative to the working directory, when
/// `ORGANIZER_CONFIG_PATH` is unset.
const CONFIG_FILENAMES: &[&str] = &["organizer.ron", ".organizer/config.ron"];

/// Where the running configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Discovered(PathBuf),
    Defaults,
}

/// Picks the config source. An explicit path wins and must exist; otherwise
/// the first existing candidate under `dir` is used.
pub fn locate(dir: &Path, explicit: Option<PathBuf>) -> Result<ConfigSource> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("{} points at a missing file: {}", CONFIG_PATH_ENV, path.display());
        }
        return Ok(ConfigSource::Explicit(path));
    }

    Ok(CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .map(ConfigSource::Discovered)
        .unwrap_or(ConfigSource::Defaults))
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    ron::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Reads `source`, then applies environment overrides and validates.
pub fn load_source(source: &ConfigSource) -> Result<Config> {
    let mut config = match source {
        ConfigSource::Explicit(path) | ConfigSource::Discovered(path) => {
            tracing::info!("Loading config from {}", path.display());
            load_from_file(path)?
        }
        ConfigSource::Defaults => {
            tracing::info!("No config file found, using defaults");
            Config::default()
        }
    };

    config.apply_env_overrides();
    config
        .validate()
        .map_err(|message| anyhow!(message))
        .context("Invalid configuration")?;
    Ok(config)
}

/// Configuration for the server process.
pub fn load() -> Result<Config> {
    let dir = std::env::current_dir().context("Failed to read working directory")?;
    let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    load_source(&locate(&dir, explicit)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "organizer.ron", "Config()");
        let explicit = write(dir.path(), "custom.ron", "Config()");

        let source = locate(dir.path(), Some(explicit.clone())).unwrap();
        assert_eq!(source, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn test_locate_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.ron");
        assert!(locate(dir.path(), Some(missing)).is_err());
    }

    #[test]
    fn test_locate_candidates_in_order() {
        let dir = TempDir::new().unwrap();
        assert_eq!(locate(dir.path(), None).unwrap(), ConfigSource::Defaults);

        let nested = write(dir.path(), ".organizer/config.ron", "Config()");
        assert_eq!(
            locate(dir.path(), None).unwrap(),
            ConfigSource::Discovered(nested)
        );

        let top = write(dir.path(), "organizer.ron", "Config()");
        assert_eq!(locate(dir.path(), None).unwrap(), ConfigSource::Discovered(top));
    }

    #[test]
    fn test_full_config_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "organizer.ron",
            r#"
Config(
    server: ServerSettings(
        bind: "127.0.0.1:8080",
        public_url: Some("https://organizer.example.com"),
    ),
    database: DatabaseSettings(
        path: "/var/lib/organizer",
        max_connections: 10,
    ),
)
"#,
        );

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(
            config.server.public_url.as_deref(),
            Some("https://organizer.example.com")
        );
        assert_eq!(config.database.path, PathBuf::from("/var/lib/organizer"));
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "organizer.ron",
            "Config(database: DatabaseSettings(max_connections: 2))",
        );

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.path, PathBuf::from(".organizer"));
        assert_eq!(config.server, crate::config::ServerSettings::default());
    }

    #[test]
    fn test_invalid_files_are_rejected() {
        let dir = TempDir::new().unwrap();
        let garbled = write(dir.path(), "organizer.ron", "This is not valid RON");
        assert!(load_from_file(&garbled).is_err());

        let invalid = write(
            dir.path(),
            "bad.ron",
            "Config(database: DatabaseSettings(max_connections: 0))",
        );
        assert!(load_source(&ConfigSource::Explicit(invalid)).is_err());
    }
}
