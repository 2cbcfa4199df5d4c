use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "refnote";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_TYPO_TOLERANCE: f64 = 0.8;
pub const DEFAULT_MIN_TAG_USES: i64 = 2;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub audit: AuditConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Similarity ratio (0..=1) above which two tags count as likely typos.
    pub typo_tolerance: f64,
    /// Tags used fewer times than this are flagged by `check`.
    pub min_tag_uses: i64,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub default_format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Plain,
    Latex,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            audit: AuditConfig {
                typo_tolerance: DEFAULT_TYPO_TOLERANCE,
                min_tag_uses: DEFAULT_MIN_TAG_USES,
            },
            export: ExportConfig {
                default_format: ExportFormat::Plain,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid typo_tolerance value (expected 0..=1): {0}")]
    InvalidTypoTolerance(f64),
    #[error("invalid min_tag_uses value: {0}")]
    InvalidMinTagUses(i64),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    audit: Option<AuditFile>,
    export: Option<ExportFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuditFile {
    typo_tolerance: Option<f64>,
    min_tag_uses: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportFile {
    default_format: Option<ExportFormat>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(audit) = parsed.audit {
        if let Some(tolerance) = audit.typo_tolerance {
            if !(0.0..=1.0).contains(&tolerance) {
                return Err(ConfigError::InvalidTypoTolerance(tolerance));
            }
            config.audit.typo_tolerance = tolerance;
        }
        if let Some(min_uses) = audit.min_tag_uses {
            if min_uses < 0 {
                return Err(ConfigError::InvalidMinTagUses(min_uses));
            }
            config.audit.min_tag_uses = min_uses;
        }
    }

    if let Some(export) = parsed.export {
        if let Some(format) = export.default_format {
            config.export.default_format = format;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, merge_config, AuditFile, ConfigFile, ExportFormat};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            audit: Some(AuditFile {
                typo_tolerance: Some(0.9),
                min_tag_uses: Some(3),
            }),
            export: None,
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.audit.typo_tolerance, 0.9);
        assert_eq!(merged.audit.min_tag_uses, 3);
        assert_eq!(merged.export.default_format, ExportFormat::Plain);
    }

    #[test]
    fn merge_config_rejects_out_of_range_tolerance() {
        let parsed = ConfigFile {
            audit: Some(AuditFile {
                typo_tolerance: Some(1.5),
                min_tag_uses: None,
            }),
            export: None,
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(err.to_string().contains("typo_tolerance"));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[audit]\ntypo_tolerance = 0.7\n[export]\ndefault_format = \"latex\"\n",
        )
        .expect("write config");

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.audit.typo_tolerance, 0.7);
        assert_eq!(config.export.default_format, ExportFormat::Latex);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "due_soon_days = 5\n").expect("write config");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
