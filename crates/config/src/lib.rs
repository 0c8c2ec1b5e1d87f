//! Layered configuration for `mtgetl`.
//!
//! Values are merged, lowest priority first, from:
//!
//! 1. built-in defaults,
//! 2. a configuration file (`.toml`, `.yaml`/`.yml` or `.json`),
//! 3. environment variables prefixed with `MTGETL_`, using `__` to reach
//!    nested keys (`MTGETL_RECENCY__TABLE=dataset_recency`).
//!
//! Figment lowercases environment keys, so dataset labels (which are case
//! sensitive) should be set in the configuration file rather than through
//! `MTGETL_DATASETS__*`.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use mtgetl_recency::{COLUMNS, Columns, DEFAULT_SCHEMA, DEFAULT_TABLE, TableDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const APPLICATION: &str = "mtgetl";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "recency.sqlite";
const ENV_PREFIX: &str = "MTGETL_";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub recency: RecencyConfig,
    /// Dataset label (the recency key) to dataset file.
    pub datasets: BTreeMap<String, PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}
impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE));
        Self { path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencyConfig {
    pub schema: String,
    pub table: String,
    pub columns: ColumnConfig,
}
impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            table: DEFAULT_TABLE.to_string(),
            columns: ColumnConfig::default(),
        }
    }
}
impl RecencyConfig {
    /// Build the table definition the upserter writes into.
    pub fn table_definition(&self) -> Result<TableDefinition> {
        let columns = Columns::new(&self.columns.key, &self.columns.date, &self.columns.version)
            .or_raise(|| ErrorKind::Invalid("recency.columns"))?;
        let table = TableDefinition::new(&self.schema, &self.table).or_raise(|| ErrorKind::Invalid("recency"))?;
        Ok(table.with_columns(columns))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub key: String,
    pub date: String,
    pub version: String,
}
impl Default for ColumnConfig {
    fn default() -> Self {
        let [key, date, version] = COLUMNS;
        Self {
            key: key.to_string(),
            date: date.to_string(),
            version: version.to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

/// The configuration file used when none is given explicitly, e.g.
/// `~/.config/mtgetl/config.toml` on Linux.
pub fn default_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit `file` must exist. Without one, the default file is used
    /// if present, otherwise only defaults and environment apply.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(path) => Some(path.to_path_buf()),
            None => default_file().filter(|path| path.is_file()),
        };
        Self::from_figment(Self::figment(file.as_deref())?)
    }

    /// Assemble the layered providers without extracting them.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "Reading configuration file");
            let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.display().to_string())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR)))
    }

    /// Extract and validate a configuration from assembled providers.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("database.path"));
        }
        self.recency.table_definition()?;
        for (label, path) in &self.datasets {
            if label.trim().is_empty() || label.trim() != label {
                exn::bail!(ErrorKind::Invalid("datasets"));
            }
            if path.as_os_str().is_empty() {
                exn::bail!(ErrorKind::Invalid("datasets"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn jailed(file: Option<&str>) -> Result<Config> {
        Config::from_figment(Config::figment(file.map(Path::new))?)
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = jailed(None).unwrap();
            assert_eq!(config.recency.schema, "main");
            assert_eq!(config.recency.table, "json_recency");
            assert!(config.datasets.is_empty());
            assert!(config.database.path.ends_with(DATABASE_FILE));
            assert_eq!(config.recency.table_definition().unwrap(), TableDefinition::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mtgetl.toml",
                r#"
                    [database]
                    path = "/var/lib/mtgetl/recency.sqlite"

                    [recency]
                    table = "dataset_recency"

                    [datasets]
                    AllPrintings = "AllPrintings.json.bz2"
                    SetList = "SetList.json.gz"
                "#,
            )?;
            let config = jailed(Some("mtgetl.toml")).unwrap();
            assert_eq!(config.database.path, PathBuf::from("/var/lib/mtgetl/recency.sqlite"));
            // Untouched keys keep their defaults.
            assert_eq!(config.recency.schema, "main");
            assert_eq!(config.recency.table, "dataset_recency");
            assert_eq!(
                config.datasets.keys().collect::<Vec<_>>(),
                ["AllPrintings", "SetList"]
            );
            assert_eq!(config.datasets["SetList"], PathBuf::from("SetList.json.gz"));
            Ok(())
        });
    }

    #[rstest]
    #[case("mtgetl.yaml", "recency:\n  table: from_yaml\n", "from_yaml")]
    #[case("mtgetl.yml", "recency:\n  table: from_yml\n", "from_yml")]
    #[case("mtgetl.json", r#"{"recency": {"table": "from_json"}}"#, "from_json")]
    fn test_other_formats(#[case] name: &str, #[case] contents: &str, #[case] table: &str) {
        Jail::expect_with(|jail| {
            jail.create_file(name, contents)?;
            assert_eq!(jailed(Some(name)).unwrap().recency.table, table);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("mtgetl.toml", "[recency]\nschema = \"from_file\"\ntable = \"from_file\"\n")?;
            jail.set_env("MTGETL_RECENCY__TABLE", "from_env");
            jail.set_env("MTGETL_RECENCY__COLUMNS__KEY", "dataset");
            let config = jailed(Some("mtgetl.toml")).unwrap();
            assert_eq!(config.recency.schema, "from_file");
            assert_eq!(config.recency.table, "from_env");
            let table = config.recency.table_definition().unwrap();
            assert_eq!(table.columns().key(), "dataset");
            assert_eq!(table.columns().date(), "latest_date");
            Ok(())
        });
    }

    #[rstest]
    #[case("MTGETL_RECENCY__TABLE", "json-recency", "recency")]
    #[case("MTGETL_RECENCY__SCHEMA", "1main", "recency")]
    #[case("MTGETL_RECENCY__COLUMNS__DATE", "latest_version", "recency.columns")]
    #[case("MTGETL_DATABASE__PATH", "", "database.path")]
    fn test_invalid_values(#[case] key: &str, #[case] value: &str, #[case] field: &'static str) {
        Jail::expect_with(|jail| {
            jail.set_env(key, value);
            let err = jailed(None).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid(field));
            Ok(())
        });
    }

    #[test]
    fn test_blank_dataset_label() {
        Jail::expect_with(|jail| {
            jail.create_file("mtgetl.toml", "[datasets]\n\" \" = \"AllPrintings.json\"\n")?;
            let err = jailed(Some("mtgetl.toml")).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid("datasets"));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file("mtgetl.toml", "datasets = 5\n")?;
            let err = jailed(Some("mtgetl.toml")).unwrap_err();
            assert_eq!(*err, ErrorKind::Load);
            Ok(())
        });
    }

    #[test]
    fn test_unsupported_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("mtgetl.ini", "[recency]\n")?;
            let err = jailed(Some("mtgetl.ini")).unwrap_err();
            assert_eq!(*err, ErrorKind::UnsupportedFormat("mtgetl.ini".to_string()));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mtgetl.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[test]
    fn test_default_file_location() {
        if let Some(path) = default_file() {
            assert!(path.ends_with("config.toml"));
            assert!(path.parent().is_some_and(|dir| dir.ends_with("mtgetl")));
        }
    }
}
