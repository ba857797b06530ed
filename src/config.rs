//! User configuration (`config.toml`).
//!
//! Looked up in the platform config directory unless a path is given. A bad
//! file never stops the program: problems come back as warnings and the
//! defaults are used instead.

use directories::ProjectDirs;
use serde::Deserialize;
use shiftgrid_core::SpecialTokens;
use shiftgrid_engine::engine::PageGeometry;
use std::path::{Path, PathBuf};

/// Files larger than this are refused.
const MAX_CONFIG_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub special_tokens: SpecialTokens,
    pub print: PageGeometry,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite database file. Defaults to `shiftgrid.db` in the data directory.
    pub path: Option<PathBuf>,
    pub database: String,
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: None,
            database: "default".to_string(),
            collection: "schedules".to_string(),
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "shiftgrid")
}

fn user_config_path() -> Option<PathBuf> {
    let mut path = project_dirs()?.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Default database location.
pub fn default_db_path() -> Option<PathBuf> {
    let mut path = project_dirs()?.data_dir().to_path_buf();
    path.push("shiftgrid.db");
    Some(path)
}

/// Load the config from `config_file`, or from the user's config directory.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_BYTES => {
            warnings.push(format!(
                "Ignoring {}: larger than {} bytes",
                path.display(),
                MAX_CONFIG_BYTES
            ));
            return (Config::default(), warnings);
        }
        Ok(_) => {}
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            return (Config::default(), warnings);
        }
    }

    let config = match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => config,
            Err(err) => {
                warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                Config::default()
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            Config::default()
        }
    };
    (config, warnings)
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.store.database, "default");
        assert_eq!(config.store.collection, "schedules");
        assert!(config.store.path.is_none());
        assert_eq!(config.special_tokens, SpecialTokens::default());
        assert_eq!(config.print, PageGeometry::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_config(
            r#"
            [store]
            path = "/tmp/plans.db"
            collection = "night"

            [special_tokens]
            U = 8
            K = 6

            [print]
            page_width = 842.0
            page_height = 595.0
            "#,
        )
        .unwrap();
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/plans.db")));
        assert_eq!(config.store.database, "default");
        assert_eq!(config.store.collection, "night");
        assert_eq!(config.special_tokens.value("K"), Some(6));
        assert!(!config.special_tokens.is_special("A"));
        assert_eq!(config.print.page_width, 842.0);
        assert_eq!(config.print.row_height, 18.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_config("[store]\nhost = \"x\"\n").is_err());
        assert!(parse_config("colour = true\n").is_err());
    }

    #[test]
    fn bad_file_falls_back_with_warning() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store").unwrap();
        let (config, warnings) = load_config(Some(file.path()));
        assert_eq!(config.store.collection, "schedules");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
    }

    #[test]
    fn missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (_, warnings) = load_config(Some(&dir.path().join("nope.toml")));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not found"));
    }

    #[test]
    fn oversized_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let line = "# padding padding padding padding padding padding padding\n";
        for _ in 0..(MAX_CONFIG_BYTES as usize / line.len() + 1) {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();
        let (_, warnings) = load_config(Some(file.path()));
        assert!(warnings[0].contains("larger than"));
    }
}
