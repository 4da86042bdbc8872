//! Pass driver: discovery, grouping by originating file, generation and
//! emission through a host-supplied [`Emitter`].

use crate::{
    collect::TypeUniverse,
    diag::Diagnostics,
    error::Error,
    source::SourceType,
    synth::{GeneratedPair, generate},
};
use proc_macro2::TokenStream;
use quote::ToTokens;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// First line of every rendered artifact.
pub const GENERATED_HEADER: &str = "// @generated by modelgen. Do not edit by hand.";

///
/// SymbolSource
///
/// The host's view of one compilation unit: every marked declaration, plus
/// base resolution across the whole unit.
///

pub trait SymbolSource: TypeUniverse {
    fn marked(&self) -> Vec<&SourceType>;
}

///
/// Emitter
///

pub trait Emitter {
    type Error: From<Error>;

    fn emit(&mut self, artifact: &Artifact) -> Result<(), Self::Error>;
}

///
/// Grouping
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grouping {
    /// One artifact per originating file.
    #[default]
    PerFile,

    /// One artifact per marked declaration.
    PerDeclaration,
}

///
/// Dependencies
/// the incremental-build edge from an artifact back to its sources
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dependencies {
    pub aggregating: bool,
    pub sources: Vec<PathBuf>,
}

///
/// ArtifactScope
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArtifactScope {
    File,
    Declaration { model: String },
}

///
/// Artifact
///

#[derive(Clone, Debug)]
pub struct Artifact {
    pub origin: PathBuf,
    pub namespace: String,
    pub scope: ArtifactScope,
    pub models: Vec<String>,
    pub items: Vec<TokenStream>,
    pub dependencies: Dependencies,
}

impl Artifact {
    fn new(origin: &Path, namespace: String, scope: ArtifactScope, aggregating: bool) -> Self {
        Self {
            origin: origin.to_path_buf(),
            namespace,
            scope,
            models: Vec::new(),
            items: Vec::new(),
            dependencies: Dependencies {
                aggregating,
                sources: vec![origin.to_path_buf()],
            },
        }
    }

    /// A file artifact with no items. Keeps an `include!` of a file whose
    /// markers were all removed compiling.
    #[must_use]
    pub fn placeholder(origin: &Path, namespace: String) -> Self {
        Self::new(origin, namespace, ArtifactScope::File, true)
    }

    fn push(&mut self, pair: &GeneratedPair) {
        self.models.push(pair.model.name());
        self.items.push(pair.to_token_stream());
    }

    /// Render to source text. The header names the origin relative to
    /// `root`, so output depends only on the artifact and the project
    /// layout, never on where the checkout lives.
    #[must_use]
    pub fn render(&self, header: bool, root: &Path) -> String {
        let mut out = String::new();

        if header {
            let origin = self.origin.strip_prefix(root).unwrap_or(&self.origin);

            out.push_str(GENERATED_HEADER);
            out.push('\n');
            out.push_str(&format!("// source: {}\n", display_path(origin)));
            if !self.namespace.is_empty() {
                out.push_str(&format!("// namespace: {}\n", self.namespace));
            }
            out.push('\n');
        }

        for item in &self.items {
            out.push_str(&item.to_string());
            out.push('\n');
        }

        out
    }
}

///
/// RunSummary
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub artifacts: usize,
    pub models: Vec<String>,
    pub sources: Vec<PathBuf>,
}

///
/// GroupingTable
/// originating file -> marked declarations, in declaration order
///

pub type GroupingTable<'a> = BTreeMap<PathBuf, Vec<&'a SourceType>>;

/// Group marked declarations by the file they were declared in.
pub fn group<'a>(declarations: &[&'a SourceType]) -> Result<GroupingTable<'a>, Error> {
    let mut table = GroupingTable::new();

    for &decl in declarations {
        let origin = decl.origin().ok_or_else(|| Error::MissingSource {
            dto: decl.qualified_name(),
            span: decl.span(),
        })?;

        table.entry(origin.to_path_buf()).or_default().push(decl);
    }

    Ok(table)
}

///
/// Driver
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Driver {
    grouping: Grouping,
}

impl Driver {
    #[must_use]
    pub const fn new(grouping: Grouping) -> Self {
        Self { grouping }
    }

    /// Build every artifact of the pass without emitting anything. Any
    /// error aborts the whole pass.
    pub fn plan<S: SymbolSource>(
        &self,
        symbols: &S,
        diag: &mut dyn Diagnostics,
    ) -> Result<Vec<Artifact>, Error> {
        let marked = symbols.marked();
        let table = group(&marked)?;

        let mut owners: BTreeMap<(String, String), String> = BTreeMap::new();
        let mut artifacts = Vec::new();

        for (origin, decls) in &table {
            diag.debug(
                &display_path(origin),
                &format!("{} marked declaration(s)", decls.len()),
            );

            let mut file_artifact: Option<Artifact> = None;

            for decl in decls {
                let pair = generate(decl, symbols, diag)?;
                claim(&mut owners, decl, &pair)?;

                match self.grouping {
                    Grouping::PerFile => file_artifact
                        .get_or_insert_with(|| {
                            Artifact::new(origin, decl.namespace_name(), ArtifactScope::File, true)
                        })
                        .push(&pair),
                    Grouping::PerDeclaration => {
                        let scope = ArtifactScope::Declaration {
                            model: pair.model.name(),
                        };
                        let mut artifact =
                            Artifact::new(origin, decl.namespace_name(), scope, false);
                        artifact.push(&pair);
                        artifacts.push(artifact);
                    }
                }
            }

            artifacts.extend(file_artifact);
        }

        Ok(artifacts)
    }

    /// Plan the pass and hand every artifact to `emitter`.
    pub fn run<S: SymbolSource, E: Emitter>(
        &self,
        symbols: &S,
        emitter: &mut E,
        diag: &mut dyn Diagnostics,
    ) -> Result<RunSummary, E::Error> {
        let artifacts = self.plan(symbols, diag)?;

        emit(&artifacts, emitter, diag)
    }
}

/// Hand planned artifacts to `emitter`, in order.
pub fn emit<E: Emitter>(
    artifacts: &[Artifact],
    emitter: &mut E,
    diag: &mut dyn Diagnostics,
) -> Result<RunSummary, E::Error> {
    let mut summary = RunSummary::default();

    for artifact in artifacts {
        emitter.emit(artifact)?;

        let message = if artifact.models.is_empty() {
            "emitted an empty artifact".to_string()
        } else {
            format!("emitted {}", artifact.models.join(", "))
        };
        diag.info(&display_path(&artifact.origin), &message);

        summary.artifacts += 1;
        summary.models.extend(artifact.models.iter().cloned());
        if !summary.sources.contains(&artifact.origin) {
            summary.sources.push(artifact.origin.clone());
        }
    }

    Ok(summary)
}

// claim
// a generated name may only be produced once per namespace
fn claim(
    owners: &mut BTreeMap<(String, String), String>,
    decl: &SourceType,
    pair: &GeneratedPair,
) -> Result<(), Error> {
    let key = (decl.namespace_name(), pair.model.name());

    if let Some(first) = owners.get(&key) {
        return Err(Error::DuplicateModel {
            model: key.1,
            namespace: key.0,
            first: first.clone(),
            second: decl.qualified_name(),
            span: decl.span(),
        });
    }
    owners.insert(key, decl.qualified_name());

    Ok(())
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

///
/// TESTS
///
