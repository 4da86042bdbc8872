use crate::{
    BuildError,
    scan::{module_path, walk},
};
use modelgen_core::driver::{Artifact, ArtifactScope, Emitter, GENERATED_HEADER};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

///
/// EmitMode
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EmitMode {
    #[default]
    Write,

    /// Compare against what is on disk, touch nothing.
    Check,
}

///
/// FileEmitter
///
/// Writes each artifact below `out_root`, mirroring the originating file's
/// path under the source root. Unchanged files are left alone so their
/// mtime does not trigger downstream rebuilds, and generated files no
/// artifact claims any more are swept.
///

#[derive(Debug)]
pub struct FileEmitter {
    source_root: PathBuf,
    out_root: PathBuf,
    header: bool,
    mode: EmitMode,
    cargo: bool,

    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub stale: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl FileEmitter {
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, out_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            out_root: out_root.into(),
            header: true,
            mode: EmitMode::Write,
            cargo: false,
            written: Vec::new(),
            unchanged: Vec::new(),
            stale: Vec::new(),
            removed: Vec::new(),
        }
    }

    #[must_use]
    pub const fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub const fn mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Print `cargo:rerun-if-changed` for every artifact's sources.
    #[must_use]
    pub const fn cargo_directives(mut self, cargo: bool) -> Self {
        self.cargo = cargo;
        self
    }

    /// Output path of an artifact.
    ///
    /// `src/api/user.rs` becomes `<out>/api/user.rs` for a file artifact and
    /// `<out>/api/user/<Model>.rs` for a declaration artifact.
    #[must_use]
    pub fn target(&self, artifact: &Artifact) -> PathBuf {
        let rel = artifact
            .origin
            .strip_prefix(&self.source_root)
            .unwrap_or(&artifact.origin);

        match &artifact.scope {
            ArtifactScope::File => self.out_root.join(rel),
            ArtifactScope::Declaration { model } => self
                .out_root
                .join(rel.with_extension(""))
                .join(format!("{model}.rs")),
        }
    }

    /// Header-only artifacts for scanned files that plan nothing this pass
    /// but still have a file artifact on disk from an earlier one.
    #[must_use]
    pub fn placeholders(&self, planned: &[Artifact], files: &[PathBuf]) -> Vec<Artifact> {
        files
            .iter()
            .filter(|file| planned.iter().all(|artifact| &artifact.origin != *file))
            .map(|file| {
                let rel = file.strip_prefix(&self.source_root).unwrap_or(file);
                Artifact::placeholder(file, module_path(rel).join("::"))
            })
            .filter(|artifact| self.target(artifact).is_file())
            .collect()
    }

    /// Remove generated files under `out_root` that none of `planned`
    /// targets. Check mode reports them as stale instead.
    pub fn sweep(&mut self, planned: &[Artifact]) -> Result<(), BuildError> {
        if !self.out_root.is_dir() {
            return Ok(());
        }

        let targets: BTreeSet<PathBuf> = planned.iter().map(|a| self.target(a)).collect();
        let mut files = Vec::new();
        walk(&self.out_root, &mut files)?;
        files.sort();

        for path in files {
            if targets.contains(&path) || !self.owns(&path) {
                continue;
            }

            match self.mode {
                EmitMode::Check => {
                    tracing::warn!(target: "modelgen", path = %path.display(), "orphaned");
                    self.stale.push(path);
                }
                EmitMode::Write => {
                    fs::remove_file(&path).map_err(|source| BuildError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    tracing::info!(target: "modelgen", path = %path.display(), "removed");
                    self.removed.push(path);
                }
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty()
    }

    // owns
    // with headers on, only files carrying the generated header are ours
    fn owns(&self, path: &Path) -> bool {
        !self.header
            || fs::read_to_string(path).is_ok_and(|text| text.starts_with(GENERATED_HEADER))
    }
}

impl Emitter for FileEmitter {
    type Error = BuildError;

    fn emit(&mut self, artifact: &Artifact) -> Result<(), BuildError> {
        let target = self.target(artifact);
        let text = artifact.render(self.header, &self.source_root);

        let current = fs::read_to_string(&target).ok();
        let up_to_date = current.as_deref() == Some(text.as_str());

        if self.cargo {
            for source in &artifact.dependencies.sources {
                println!("cargo:rerun-if-changed={}", source.display());
            }
        }

        match (self.mode, up_to_date) {
            (_, true) => {
                tracing::debug!(target: "modelgen", path = %target.display(), "unchanged");
                self.unchanged.push(target);
            }
            (EmitMode::Check, false) => {
                tracing::warn!(target: "modelgen", path = %target.display(), "stale");
                self.stale.push(target);
            }
            (EmitMode::Write, false) => {
                write(&target, &text)?;
                tracing::info!(target: "modelgen", path = %target.display(), "written");
                self.written.push(target);
            }
        }

        Ok(())
    }
}

fn write(path: &Path, text: &str) -> Result<(), BuildError> {
    let io = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io)?;
    }

    fs::write(path, text).map_err(io)
}

///
/// TESTS
///
