use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::matcher::DEFAULT_SUGGEST_LIMIT;
use crate::store::{validate_key, DEFAULT_STATE_KEY};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewConfig {
    pub name: String,
    pub primary: CatalogConfig,
    pub candidate: CatalogConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
    #[serde(default)]
    pub state: StateConfig,
    /// Directory the config was read from; relative paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    pub file: PathBuf,
    /// Column prefix in CSV exports (`<label>_id`). Defaults to the side name.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_SUGGEST_LIMIT
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGEST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_STATE_KEY.to_string()
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReviewConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: ReviewConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file, remembering its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&input)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("name must not be empty".into()));
        }

        for (side, cat) in [("primary", &self.primary), ("candidate", &self.candidate)] {
            if cat.file.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{side}: file must not be empty")));
            }
            if let Some(ref label) = cat.label {
                if label.is_empty() || label.chars().any(|c| c == ',' || c == '"' || c.is_whitespace()) {
                    return Err(ConfigError::Validation(format!(
                        "{side}: label '{label}' must be non-empty without commas, quotes or spaces"
                    )));
                }
            }
        }

        if self.primary.file == self.candidate.file {
            return Err(ConfigError::Validation(format!(
                "primary and candidate both read '{}'",
                self.primary.file.display()
            )));
        }

        if self.suggest.limit == 0 {
            return Err(ConfigError::Validation("suggest.limit must be at least 1".into()));
        }

        validate_key(&self.state.key)
            .map_err(|_| ConfigError::Validation(format!("state.key '{}' is not a plain file stem", self.state.key)))?;

        Ok(())
    }

    pub fn primary_label(&self) -> &str {
        self.primary.label.as_deref().unwrap_or("primary")
    }

    pub fn candidate_label(&self) -> &str {
        self.candidate.label.as_deref().unwrap_or("candidate")
    }

    pub fn primary_path(&self) -> PathBuf {
        self.base_dir.join(&self.primary.file)
    }

    pub fn candidate_path(&self) -> PathBuf {
        self.base_dir.join(&self.candidate.file)
    }

    /// Where decisions are persisted. Without `state.dir`, a per-project
    /// directory under the user's data dir is used.
    pub fn state_dir(&self) -> PathBuf {
        match self.state.dir {
            Some(ref dir) => self.base_dir.join(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("shelfmatch")
                .join(slug(&self.name)),
        }
    }
}

/// Lowercase, `-`-joined alphanumeric runs. Never empty.
fn slug(name: &str) -> String {
    let parts: Vec<String> = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_ascii_lowercase())
        .collect();
    if parts.is_empty() {
        "default".into()
    } else {
        parts.join("-")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Shamrock vs US Foods"

[primary]
file = "data/shamrock.json"
label = "shamrock"

[candidate]
file = "data/usfoods.json"
label = "usfoods"

[suggest]
limit = 3

[state]
dir = ".shelfmatch"
"#;

    #[test]
    fn parse_valid() {
        let config = ReviewConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Shamrock vs US Foods");
        assert_eq!(config.primary_label(), "shamrock");
        assert_eq!(config.candidate_label(), "usfoods");
        assert_eq!(config.suggest.limit, 3);
        assert_eq!(config.state.key, "matches");
    }

    #[test]
    fn defaults_apply() {
        let config = ReviewConfig::from_toml(
            r#"
name = "x"
[primary]
file = "a.json"
[candidate]
file = "b.json"
"#,
        )
        .unwrap();
        assert_eq!(config.suggest.limit, 5);
        assert_eq!(config.primary_label(), "primary");
        assert_eq!(config.candidate_label(), "candidate");
        assert!(config.state.dir.is_none());
        assert!(config.state_dir().ends_with("shelfmatch/x"));
    }

    #[test]
    fn paths_resolve_against_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shelfmatch.toml");
        std::fs::write(&path, VALID).unwrap();
        let config = ReviewConfig::load(&path).unwrap();
        assert_eq!(config.primary_path(), tmp.path().join("data/shamrock.json"));
        assert_eq!(config.state_dir(), tmp.path().join(".shelfmatch"));
    }

    #[test]
    fn reject_zero_limit() {
        let input = VALID.replace("limit = 3", "limit = 0");
        let err = ReviewConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("suggest.limit"));
    }

    #[test]
    fn reject_label_with_comma() {
        let input = VALID.replace("label = \"usfoods\"", "label = \"us,foods\"");
        let err = ReviewConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("candidate"));
    }

    #[test]
    fn reject_same_file() {
        let input = VALID.replace("data/usfoods.json", "data/shamrock.json");
        assert!(ReviewConfig::from_toml(&input).is_err());
    }

    #[test]
    fn reject_unknown_field() {
        let input = format!("{VALID}\n[matcher]\nstemming = true\n");
        let err = ReviewConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reject_bad_state_key() {
        let input = format!("{VALID}key = \"../escape\"\n");
        assert!(ReviewConfig::from_toml(&input).is_err());
    }

    #[test]
    fn slug_shapes() {
        assert_eq!(slug("Shamrock vs US Foods"), "shamrock-vs-us-foods");
        assert_eq!(slug("***"), "default");
    }
}
