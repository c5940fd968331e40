use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};

/// Connection string used when nothing else is configured
pub const DEFAULT_DATABASE: &str = "acme-countryclub.db";

/// Listening port used when nothing else is configured
pub const DEFAULT_PORT: u16 = 1337;

pub const DATABASE_ENV: &str = "DATABASE_URL";
pub const PORT_ENV: &str = "PORT";

/// Values read from the optional TOML file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubConfig {
    pub database: String,
    pub port: u16,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Explicit overrides, typically from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<String>,
    pub port: Option<u16>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("countryclub.toml")
}

/// Read the TOML file at `path` (or the default location).
///
/// A missing default file is not an error; a missing explicit file is.
pub fn load_file(path: Option<&Path>) -> Result<Option<FileConfig>> {
    let explicit = path.is_some();
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        if explicit {
            return Err(Error::Config(format!("config file not found: {}", path.display())));
        }
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: FileConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

/// Resolve configuration from the process environment.
///
/// Precedence: overrides, then `DATABASE_URL` / `PORT`, then the file, then defaults.
pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Result<ClubConfig> {
    resolve_with(overrides, file, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup
pub fn resolve_with(
    overrides: Overrides,
    file: Option<FileConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClubConfig> {
    let file = file.unwrap_or_default();
    let defaults = ClubConfig::default();

    let env_port = match env(PORT_ENV) {
        Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
            Error::Config(format!("invalid {PORT_ENV} value {raw:?}: {e}"))
        })?),
        None => None,
    };

    let database = overrides
        .database
        .or_else(|| env(DATABASE_ENV))
        .or(file.database)
        .unwrap_or(defaults.database);

    let port = overrides
        .port
        .or(env_port)
        .or(file.port)
        .unwrap_or(defaults.port);

    Ok(ClubConfig { database, port })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = resolve_with(Overrides::default(), None, env_from(&[])).unwrap();
        assert_eq!(config.database, "acme-countryclub.db");
        assert_eq!(config.port, 1337);
    }

    #[test]
    fn test_precedence() {
        let file = FileConfig { database: Some("file.db".into()), port: Some(4000) };

        let config = resolve_with(Overrides::default(), Some(file.clone()), env_from(&[])).unwrap();
        assert_eq!(config, ClubConfig { database: "file.db".into(), port: 4000 });

        let env = env_from(&[("DATABASE_URL", "env.db"), ("PORT", "5000")]);
        let config = resolve_with(Overrides::default(), Some(file.clone()), env).unwrap();
        assert_eq!(config, ClubConfig { database: "env.db".into(), port: 5000 });

        let overrides = Overrides { database: Some("cli.db".into()), port: Some(6000) };
        let env = env_from(&[("DATABASE_URL", "env.db"), ("PORT", "5000")]);
        let config = resolve_with(overrides, Some(file), env).unwrap();
        assert_eq!(config, ClubConfig { database: "cli.db".into(), port: 6000 });
    }

    #[test]
    fn test_invalid_port_env() {
        let result = resolve_with(Overrides::default(), None, env_from(&[("PORT", "not-a-port")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countryclub.toml");
        std::fs::write(&path, "database = \"club.db\"\nport = 8080\n").unwrap();

        let file = load_file(Some(&path)).unwrap().unwrap();
        assert_eq!(file.database.as_deref(), Some("club.db"));
        assert_eq!(file.port, Some(8080));

        std::fs::write(&path, "port = \"eighty\"\n").unwrap();
        assert!(matches!(load_file(Some(&path)), Err(Error::Config(_))));

        let missing = dir.path().join("missing.toml");
        assert!(load_file(Some(&missing)).is_err());
    }
}
