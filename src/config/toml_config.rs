use crate::core::aggregate::RoundingMode;
use crate::core::Store;
use crate::domain::model::{Catalog, ModuleId, NewModule, Professor, ProfessorId};
use crate::utils::error::{RatingError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_STORE_PATH: &str = "./data/prof-rates.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ratings: RatingsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub professors: Vec<ProfessorSeed>,
    #[serde(default)]
    pub modules: Vec<ModuleSeed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    DEFAULT_STORE_PATH.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingsConfig {
    #[serde(default)]
    pub rounding: RoundingMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorSeed {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSeed {
    pub id: u64,
    pub name: String,
    pub year: i32,
    pub semester: i32,
    #[serde(default)]
    pub professors: Vec<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RatingError::config("config_file", format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| RatingError::config("toml_parsing", format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| RatingError::config("env_substitution", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn validate_config(&self) -> Result<()> {
        if self.store.backend == StoreBackend::File {
            validation::validate_path("store.path", &self.store.path).map_err(as_config_error)?;
        }

        let mut professor_ids = HashSet::new();
        for (i, professor) in self.professors.iter().enumerate() {
            validation::validate_non_empty_string(&format!("professors[{}].name", i), &professor.name)
                .map_err(as_config_error)?;
            if !professor_ids.insert(professor.id) {
                return Err(RatingError::config(
                    &format!("professors[{}].id", i),
                    format!("duplicate professor id {}", professor.id),
                ));
            }
        }

        let mut module_ids = HashSet::new();
        for (i, module) in self.modules.iter().enumerate() {
            validation::validate_non_empty_string(&format!("modules[{}].name", i), &module.name)
                .map_err(as_config_error)?;
            validation::validate_range(&format!("modules[{}].semester", i), module.semester, 1, 12)
                .map_err(as_config_error)?;
            if !module_ids.insert(module.id) {
                return Err(RatingError::config(
                    &format!("modules[{}].id", i),
                    format!("duplicate module id {}", module.id),
                ));
            }
            if let Some(unknown) = module.professors.iter().find(|p| !professor_ids.contains(*p)) {
                return Err(RatingError::config(
                    &format!("modules[{}].professors", i),
                    format!("unknown professor id {}", unknown),
                ));
            }
        }

        Ok(())
    }

    /// The configured professors and modules, ready to be written to a store.
    pub fn catalog(&self) -> Catalog {
        Catalog {
            professors: self
                .professors
                .iter()
                .map(|p| Professor {
                    id: ProfessorId::new(p.id),
                    name: p.name.clone(),
                })
                .collect(),
            modules: self
                .modules
                .iter()
                .map(|m| NewModule {
                    id: Some(ModuleId::new(m.id)),
                    name: m.name.clone(),
                    year: m.year,
                    semester: m.semester,
                    professors: m.professors.iter().copied().map(ProfessorId::new).collect(),
                })
                .collect(),
        }
    }

    /// Loads the configured catalog into `store` if it holds no professors and no
    /// modules yet. The whole catalog is written in one store operation.
    /// Returns whether anything was written.
    pub async fn seed_catalog<S: Store + ?Sized>(&self, store: &S) -> Result<bool> {
        if self.professors.is_empty() && self.modules.is_empty() {
            return Ok(false);
        }

        let seeded = store.seed(self.catalog()).await?;
        if seeded {
            tracing::info!(
                "Seeded {} professors and {} modules",
                self.professors.len(),
                self.modules.len()
            );
        }
        Ok(seeded)
    }
}

fn as_config_error(err: RatingError) -> RatingError {
    match err {
        RatingError::InvalidInput { field, reason } => RatingError::Config {
            field,
            message: reason,
        },
        other => other,
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"
[store]
backend = "memory"

[ratings]
rounding = "half_up"

[[professors]]
id = 1
name = "Ada"

[[professors]]
id = 2
name = "Brian"

[[modules]]
id = 10
name = "Algorithms"
year = 2024
semester = 1
professors = [1]

[[modules]]
id = 20
name = "Graphics"
year = 2024
semester = 2
professors = [2]
"#;

    #[test]
    fn test_parse_catalog_config() {
        let config = TomlConfig::from_toml_str(CATALOG).unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.ratings.rounding, RoundingMode::HalfUp);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.professors.len(), 2);
        assert_eq!(config.modules[1].professors, vec![2]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.path, DEFAULT_STORE_PATH);
        assert_eq!(config.ratings.rounding, RoundingMode::HalfEven);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PROF_RATES_TEST_STORE", "/tmp/ratings-test.json");

        let config = TomlConfig::from_toml_str(
            r#"
[store]
path = "${PROF_RATES_TEST_STORE}"
"#,
        )
        .unwrap();
        assert_eq!(config.store.path, "/tmp/ratings-test.json");

        std::env::remove_var("PROF_RATES_TEST_STORE");
    }

    #[test]
    fn test_module_referencing_unknown_professor() {
        let config = TomlConfig::from_toml_str(
            r#"
[[professors]]
id = 1
name = "Ada"

[[modules]]
id = 10
name = "Algorithms"
year = 2024
semester = 1
professors = [1, 3]
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            RatingError::Config { ref field, .. } if field == "modules[0].professors"
        ));
    }

    #[test]
    fn test_duplicate_professor_ids() {
        let config = TomlConfig::from_toml_str(
            r#"
[[professors]]
id = 1
name = "Ada"

[[professors]]
id = 1
name = "Also Ada"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_file_path_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
[store]
backend = "file"
path = "  "
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(RatingError::Config { ref field, .. }) if field == "store.path"
        ));
    }

    #[test]
    fn test_unknown_rounding_mode_is_parse_error() {
        let err = TomlConfig::from_toml_str("[ratings]\nrounding = \"half_down\"\n").unwrap_err();
        assert!(matches!(err, RatingError::Config { ref field, .. } if field == "toml_parsing"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(CATALOG.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.modules[0].name, "Algorithms");
    }

    #[tokio::test]
    async fn test_seed_catalog_only_once() {
        let config = TomlConfig::from_toml_str(CATALOG).unwrap();
        let store = MemoryStore::new();

        assert!(config.seed_catalog(&store).await.unwrap());
        assert!(!config.seed_catalog(&store).await.unwrap());

        assert_eq!(store.professors().await.unwrap().len(), 2);
        let graphics = store.module(ModuleId::new(20)).await.unwrap().unwrap();
        assert!(graphics.is_taught_by(ProfessorId::new(2)));
        assert!(!graphics.is_taught_by(ProfessorId::new(1)));
    }

    #[tokio::test]
    async fn test_failed_seed_can_be_retried() {
        let mut config = TomlConfig::from_toml_str(CATALOG).unwrap();
        config.modules[1].professors = vec![9];
        let store = MemoryStore::new();

        assert!(config.seed_catalog(&store).await.is_err());
        assert!(store.professors().await.unwrap().is_empty());

        config.modules[1].professors = vec![2];
        assert!(config.seed_catalog(&store).await.unwrap());
        assert_eq!(store.modules().await.unwrap().len(), 2);
    }
}
