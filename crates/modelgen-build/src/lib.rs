//! Build-script host for modelgen.
//!
//! Scans a crate's source directory for structs marked `#[dto_to_model]`,
//! generates a model and converter for each, and writes one artifact per
//! originating file below `$OUT_DIR/modelgen`. The crate includes them back
//! with `modelgen::include_models!`.

pub mod config;
pub mod emit;
mod macros;
pub mod scan;

pub use config::{CONFIG_FILE, Config, ConfigError};
pub use emit::{EmitMode, FileEmitter};
pub use scan::Universe;

use modelgen_core::{
    diag::Diagnostics,
    driver::{self, Artifact, Driver, Grouping, RunSummary},
};
use std::{
    env,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

#[doc(hidden)]
pub mod __private {
    pub use modelgen_core::diag::TracingDiagnostics;
}

/// Subdirectory of `OUT_DIR` that receives generated files.
pub const OUT_SUBDIR: &str = "modelgen";

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{file}:{line}: {source}")]
    Parse {
        file: PathBuf,
        line: usize,
        source: syn::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{file}: {source}")]
    Generate {
        file: PathBuf,
        source: modelgen_core::Error,
    },

    #[error(transparent)]
    Core(#[from] modelgen_core::Error),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

impl BuildError {
    pub(crate) fn generate(file: &Path, source: modelgen_core::Error) -> Self {
        Self::Generate {
            file: file.to_path_buf(),
            source,
        }
    }
}

///
/// Generator
///

#[derive(Clone, Debug)]
pub struct Generator {
    config: Config,
    manifest_dir: PathBuf,
    out_dir: PathBuf,
    cargo: bool,
}

impl Generator {
    #[must_use]
    pub fn new(config: Config, manifest_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            manifest_dir: manifest_dir.into(),
            out_dir: out_dir.into(),
            cargo: false,
        }
    }

    /// Set up from the environment of a running build script: the crate
    /// root, `OUT_DIR`, and an optional `modelgen.toml`.
    pub fn from_env() -> Result<Self, BuildError> {
        let manifest_dir = env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .ok_or(BuildError::MissingEnv("CARGO_MANIFEST_DIR"))?;
        let out_dir = env::var_os("OUT_DIR")
            .map(PathBuf::from)
            .ok_or(BuildError::MissingEnv("OUT_DIR"))?;
        let config = Config::load_or_default(&manifest_dir)?;

        Ok(Self::new(config, manifest_dir, out_dir.join(OUT_SUBDIR)).cargo_directives(true))
    }

    #[must_use]
    pub const fn cargo_directives(mut self, cargo: bool) -> Self {
        self.cargo = cargo;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn source_root(&self) -> PathBuf {
        self.manifest_dir.join(&self.config.source_dir)
    }

    /// Where artifacts go; `out_dir` from the config wins over the default.
    #[must_use]
    pub fn out_root(&self) -> PathBuf {
        match &self.config.out_dir {
            Some(dir) => self.manifest_dir.join(dir),
            None => self.out_dir.clone(),
        }
    }

    /// Parse the source tree into a universe of structs.
    pub fn scan(&self) -> Result<Universe, BuildError> {
        let derives = self.config.derive_paths()?;

        Universe::scan(&self.source_root(), &derives)
    }

    /// Plan every artifact without touching the disk.
    pub fn plan(&self, diag: &mut dyn Diagnostics) -> Result<Vec<Artifact>, BuildError> {
        let universe = self.scan()?;

        Ok(Driver::new(self.config.grouping).plan(&universe, diag)?)
    }

    /// Generate and write every artifact.
    pub fn run(&self, diag: &mut dyn Diagnostics) -> Result<RunSummary, BuildError> {
        let mut emitter = self.emitter(EmitMode::Write);

        self.drive(&mut emitter, diag)
    }

    /// Generate in memory and report which artifacts on disk are stale.
    pub fn check(&self, diag: &mut dyn Diagnostics) -> Result<Vec<PathBuf>, BuildError> {
        let mut emitter = self.emitter(EmitMode::Check);
        self.drive(&mut emitter, diag)?;

        Ok(emitter.stale)
    }

    fn emitter(&self, mode: EmitMode) -> FileEmitter {
        FileEmitter::new(self.source_root(), self.out_root())
            .header(self.config.header)
            .mode(mode)
            .cargo_directives(self.cargo && mode == EmitMode::Write)
    }

    fn drive(
        &self,
        emitter: &mut FileEmitter,
        diag: &mut dyn Diagnostics,
    ) -> Result<RunSummary, BuildError> {
        let universe = self.scan()?;

        if self.cargo {
            // new files under the source dir must trigger a rescan
            println!("cargo:rerun-if-changed={}", self.source_root().display());
            for file in &universe.files {
                println!("cargo:rerun-if-changed={}", file.display());
            }
            let config = self.manifest_dir.join(CONFIG_FILE);
            if config.is_file() {
                println!("cargo:rerun-if-changed={}", config.display());
            }
        }

        diag.debug(
            &self.source_root().display().to_string(),
            &format!(
                "{} file(s), {} struct(s), {} marked",
                universe.files.len(),
                universe.len(),
                universe.marked_count()
            ),
        );

        let driver = Driver::new(self.config.grouping);
        let mut artifacts = driver.plan(&universe, diag)?;

        // a file that lost its last marker keeps an empty artifact so its
        // include_models! call still resolves
        if self.config.grouping == Grouping::PerFile {
            let placeholders = emitter.placeholders(&artifacts, &universe.files);
            for placeholder in &placeholders {
                diag.info(
                    &placeholder.origin.display().to_string(),
                    "no marked declarations left",
                );
            }
            artifacts.extend(placeholders);
        }

        let summary = driver::emit(&artifacts, emitter, diag)?;
        emitter.sweep(&artifacts)?;

        Ok(summary)
    }
}
