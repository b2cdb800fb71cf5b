//! Typed generator configuration.
//!
//! Settings are resolved in order of precedence: command-line flags, then the
//! first existing `KEY=VALUE` config file among the candidates, then built-in
//! defaults. Config files are parsed with `dotenv` but never exported into the
//! process environment.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};

use crate::error::{GeneratorError, Result};

pub const DEFAULT_ROOT: &str = "raw";
pub const DEFAULT_OUTPUT: &str = "sql/trino_schemas_generated.sql";
pub const DEFAULT_EXTENSION: &str = "csv";
pub const DEFAULT_CATALOG: &str = "hive";
pub const CONFIG_CANDIDATES: &[&str] = &[".env", "services/.env"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigKey {
    RawDir,
    Bucket,
    Output,
    Extension,
    Catalog,
    Encoding,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::RawDir => "RAW_DIR",
            ConfigKey::Bucket => "S3_RAW_BUCKET",
            ConfigKey::Output => "SQL_OUTPUT",
            ConfigKey::Extension => "CSV_EXTENSION",
            ConfigKey::Catalog => "TRINO_CATALOG",
            ConfigKey::Encoding => "CSV_ENCODING",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "RAW_DIR" => Ok(ConfigKey::RawDir),
            "S3_RAW_BUCKET" => Ok(ConfigKey::Bucket),
            "SQL_OUTPUT" => Ok(ConfigKey::Output),
            "CSV_EXTENSION" => Ok(ConfigKey::Extension),
            "TRINO_CATALOG" => Ok(ConfigKey::Catalog),
            "CSV_ENCODING" => Ok(ConfigKey::Encoding),
            other => Err(format!("Unrecognized configuration key '{other}'")),
        }
    }
}

/// Recognized values read from a config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub path: PathBuf,
    values: BTreeMap<ConfigKey, String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let entries = dotenv::from_path_iter(path).map_err(|err| GeneratorError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let mut values = BTreeMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(|err| GeneratorError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
            match key.parse::<ConfigKey>() {
                Ok(known) => {
                    values.insert(known, value.trim().to_string());
                }
                Err(reason) => debug!("{reason} in {path:?}; ignoring"),
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Loads the first candidate that exists.
    pub fn locate<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        for candidate in candidates {
            let path = candidate.as_ref();
            if path.is_file() {
                return Self::load(path);
            }
        }
        Err(GeneratorError::ConfigNotFound {
            candidates: candidates
                .iter()
                .map(|candidate| candidate.as_ref().to_path_buf())
                .collect(),
        })
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.values
            .get(&key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Values supplied on the command line; `None` defers to file or default.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub bucket: Option<String>,
    pub output: Option<PathBuf>,
    pub extension: Option<String>,
    pub catalog: Option<String>,
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub root: PathBuf,
    pub bucket: String,
    pub output: PathBuf,
    pub extension: String,
    pub catalog: String,
    pub encoding: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::resolve(&ConfigOverrides::default(), None)
    }
}

impl GeneratorConfig {
    /// Reads the config file (explicit or first candidate) and applies overrides.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let file = match &overrides.config {
            Some(path) => {
                if !path.is_file() {
                    return Err(GeneratorError::ConfigNotFound {
                        candidates: vec![path.clone()],
                    });
                }
                Some(ConfigFile::load(path)?)
            }
            None => match ConfigFile::locate(CONFIG_CANDIDATES) {
                Ok(file) => Some(file),
                Err(err @ GeneratorError::ConfigNotFound { .. }) => {
                    debug!("{err}; using defaults");
                    None
                }
                Err(err) => return Err(err),
            },
        };
        if let Some(file) = &file {
            info!("Loaded configuration from {:?}", file.path);
        }
        Ok(Self::resolve(overrides, file.as_ref()))
    }

    pub fn resolve(overrides: &ConfigOverrides, file: Option<&ConfigFile>) -> Self {
        let from_file = |key: ConfigKey| file.and_then(|f| f.get(key)).map(str::to_string);

        let root = overrides
            .root
            .clone()
            .or_else(|| from_file(ConfigKey::RawDir).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let bucket = overrides
            .bucket
            .clone()
            .or_else(|| from_file(ConfigKey::Bucket))
            .unwrap_or_else(|| default_bucket(&root));
        let output = overrides
            .output
            .clone()
            .or_else(|| from_file(ConfigKey::Output).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let extension = overrides
            .extension
            .clone()
            .or_else(|| from_file(ConfigKey::Extension))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
            .trim_start_matches('.')
            .to_string();
        let catalog = overrides
            .catalog
            .clone()
            .or_else(|| from_file(ConfigKey::Catalog))
            .unwrap_or_else(|| DEFAULT_CATALOG.to_string());
        let encoding = overrides
            .encoding
            .clone()
            .or_else(|| from_file(ConfigKey::Encoding));

        Self {
            root,
            bucket,
            output,
            extension,
            catalog,
            encoding,
        }
    }
}

fn default_bucket(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_ROOT.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn defaults_match_conventional_layout() {
        let config = GeneratorConfig::default();
        assert_eq!(config.root, PathBuf::from("raw"));
        assert_eq!(config.bucket, "raw");
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.extension, "csv");
        assert_eq!(config.catalog, "hive");
        assert!(config.encoding.is_none());
    }

    #[test]
    fn bucket_defaults_to_root_directory_name() {
        let overrides = ConfigOverrides {
            root: Some(PathBuf::from("/data/landing")),
            ..ConfigOverrides::default()
        };
        let config = GeneratorConfig::resolve(&overrides, None);
        assert_eq!(config.bucket, "landing");
    }

    #[test]
    fn config_file_values_fill_gaps_and_flags_win() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# storage\nS3_RAW_BUCKET=\"lake-raw\"\nTRINO_CATALOG=minio\nUNRELATED=1\nCSV_EXTENSION=.txt\n",
        )
        .expect("write config");

        let file = ConfigFile::load(&path).expect("load config");
        assert_eq!(file.get(ConfigKey::Bucket), Some("lake-raw"));

        let overrides = ConfigOverrides {
            catalog: Some("hive".to_string()),
            ..ConfigOverrides::default()
        };
        let config = GeneratorConfig::resolve(&overrides, Some(&file));
        assert_eq!(config.bucket, "lake-raw");
        assert_eq!(config.catalog, "hive");
        assert_eq!(config.extension, "txt");
        assert_eq!(config.root, PathBuf::from("raw"));
    }

    #[test]
    fn first_existing_candidate_is_used() {
        let dir = tempdir().expect("temp dir");
        let missing = dir.path().join("missing.env");
        let second = dir.path().join("second.env");
        fs::write(&second, "S3_RAW_BUCKET=second\n").expect("write config");

        let file = ConfigFile::locate(&[missing, second.clone()]).expect("locate");
        assert_eq!(file.path, second);
    }

    #[test]
    fn no_candidate_reports_config_not_found() {
        let dir = tempdir().expect("temp dir");
        let err = ConfigFile::locate(&[dir.path().join("a.env")]).unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigNotFound { .. }));
    }

    #[test]
    fn explicit_missing_config_is_fatal() {
        let dir = tempdir().expect("temp dir");
        let overrides = ConfigOverrides {
            config: Some(dir.path().join("nope.env")),
            ..ConfigOverrides::default()
        };
        assert!(GeneratorConfig::load(&overrides).is_err());
    }

    #[test]
    fn keys_round_trip_through_their_names() {
        for key in [
            ConfigKey::RawDir,
            ConfigKey::Bucket,
            ConfigKey::Output,
            ConfigKey::Extension,
            ConfigKey::Catalog,
            ConfigKey::Encoding,
        ] {
            assert_eq!(key.as_str().parse::<ConfigKey>(), Ok(key));
        }
    }
}
