use modelgen_core::driver::Grouping;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use syn::Path as SynPath;
use thiserror::Error as ThisError;

/// Optional config file read from the crate root.
pub const CONFIG_FILE: &str = "modelgen.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid derive path '{0}'")]
    InvalidDerive(String),
}

///
/// Config
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for marked structs, relative to the crate root.
    pub source_dir: PathBuf,

    /// Output directory; `$OUT_DIR/modelgen` when unset.
    pub out_dir: Option<PathBuf>,

    pub grouping: Grouping,

    /// Derives added to every generated model.
    pub derive: Vec<String>,

    /// Emit the `@generated` header.
    pub header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            out_dir: None,
            grouping: Grouping::default(),
            derive: Vec::new(),
            header: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `modelgen.toml` from `root` when present, defaults otherwise.
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);

        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn derive_paths(&self) -> Result<Vec<SynPath>, ConfigError> {
        self.derive
            .iter()
            .map(|raw| {
                syn::parse_str::<SynPath>(raw.trim())
                    .map_err(|_| ConfigError::InvalidDerive(raw.clone()))
            })
            .collect()
    }
}

///
/// TESTS
///
