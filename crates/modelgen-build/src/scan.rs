//! Source scanning: the build-script stand-in for a compiler's symbol table.

use crate::BuildError;
use modelgen_core::{
    Error,
    collect::TypeUniverse,
    driver::SymbolSource,
    marker::{GENERATE_ATTR, ModelArgs, is_marker},
    source::SourceType,
};
use quote::ToTokens;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use syn::{Item, ItemMod, Path as SynPath, Type, UseTree, spanned::Spanned};

/// `use` aliases of one file, mapped to the path they import.
type Imports = BTreeMap<String, Vec<String>>;

///
/// Universe
///
/// Every plain struct found under the source directory. Marked structs are
/// generation targets; the rest are only candidates for `#[model_base]`.
///

#[derive(Debug, Default)]
pub struct Universe {
    pub files: Vec<PathBuf>,
    structs: Vec<Entry>,
    imports: BTreeMap<PathBuf, Imports>,
}

#[derive(Debug)]
struct Entry {
    source: SourceType,
    marked: bool,
}

impl Universe {
    /// Scan `root` recursively. Files are visited in sorted order so the
    /// universe, and everything generated from it, is deterministic.
    pub fn scan(root: &Path, default_derives: &[SynPath]) -> Result<Self, BuildError> {
        let mut files = Vec::new();
        walk(root, &mut files)?;
        files.sort();

        let mut universe = Self::default();
        for file in files {
            let text = fs::read_to_string(&file).map_err(|source| BuildError::Io {
                path: file.clone(),
                source,
            })?;
            let rel = file.strip_prefix(root).unwrap_or(&file).to_path_buf();
            universe.add_file(&file, &rel, &text, default_derives)?;
        }

        Ok(universe)
    }

    /// Parse one file. `rel` is the path below the source root and decides
    /// the module path.
    pub fn add_file(
        &mut self,
        file: &Path,
        rel: &Path,
        text: &str,
        default_derives: &[SynPath],
    ) -> Result<(), BuildError> {
        let parsed = syn::parse_file(text).map_err(|source| BuildError::Parse {
            file: file.to_path_buf(),
            line: source.span().start().line,
            source,
        })?;
        let namespace = module_path(rel);
        let first = self.structs.len();

        let located = |source: Error| BuildError::generate(file, source);
        let mut imports = Imports::new();

        for item in &parsed.items {
            match item {
                Item::Use(item) => flatten_use(&item.tree, &mut Vec::new(), &mut imports),
                Item::Struct(item) => {
                    let marked = ModelArgs::from_attrs(&item.attrs, GENERATE_ATTR).map_err(located)?;
                    let is_marked = marked.is_some();
                    let source = match marked {
                        Some(args) => SourceType::from_item_struct(
                            item,
                            args.with_default_derives(default_derives),
                        )
                        .map_err(located)?,

                        // unmarked structs are only base candidates
                        None => match SourceType::from_item_struct(item, ModelArgs::default()) {
                            Ok(source) => source,
                            Err(_) => continue,
                        },
                    };

                    self.structs.push(Entry {
                        source: source.with_namespace(namespace.clone()).with_origin(file),
                        marked: is_marked,
                    });
                }
                Item::Enum(item) if item.attrs.iter().any(|a| is_marker(a, GENERATE_ATTR)) => {
                    return Err(located(Error::structural(
                        item.span(),
                        format!("'{}' is an enum; only structs can be marked", item.ident),
                    )));
                }
                Item::Mod(module) => reject_inline_marks(module).map_err(located)?,
                _ => {}
            }
        }

        // inherent impls contribute function members to structs of this file
        for item in &parsed.items {
            let Item::Impl(block) = item else { continue };
            let Type::Path(self_ty) = &*block.self_ty else {
                continue;
            };
            let Some(segment) = self_ty.path.segments.last() else {
                continue;
            };
            let Some(entry) = self.structs[first..]
                .iter_mut()
                .find(|entry| entry.source.ident == segment.ident)
            else {
                continue;
            };

            match &block.trait_ {
                None => entry.source.absorb_impl(block),

                // the converter moves fields out of self
                Some((_, trait_path, _)) if entry.marked && is_drop(trait_path) => {
                    return Err(located(Error::structural(
                        block.span(),
                        format!(
                            "'{}' implements Drop; its fields cannot be moved into a model",
                            segment.ident
                        ),
                    )));
                }
                Some(_) => {}
            }
        }

        self.files.push(file.to_path_buf());
        self.imports.insert(file.to_path_buf(), imports);

        Ok(())
    }

    pub fn marked_count(&self) -> usize {
        self.structs.iter().filter(|entry| entry.marked).count()
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    // imported
    // expand a leading `use` alias of the declaring file into its full path
    fn imported(&self, written: Vec<String>, from: &SourceType) -> Vec<String> {
        let Some(imports) = from.origin().and_then(|origin| self.imports.get(origin)) else {
            return written;
        };
        let Some(full) = written.first().and_then(|head| imports.get(head)) else {
            return written;
        };

        [full.as_slice(), &written[1..]].concat()
    }
}

impl TypeUniverse for Universe {
    fn resolve_base(&self, ty: &Type, from: &SourceType) -> Result<&SourceType, Error> {
        let unresolved = |reason: String| Error::UnresolvedBase {
            dto: from.qualified_name(),
            base: ty.to_token_stream().to_string(),
            reason,
            span: ty.span(),
        };

        let Type::Path(path) = ty else {
            return Err(unresolved("a base must be a plain struct type".to_string()));
        };
        if path.qself.is_some() {
            return Err(unresolved("qualified self types are not supported".to_string()));
        }

        let written: Vec<String> = path
            .path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        let full = self.imported(written, from);
        let Some((last, prefix)) = full.split_last() else {
            return Err(unresolved("empty path".to_string()));
        };

        let candidates: Vec<&SourceType> = self
            .structs
            .iter()
            .map(|entry| &entry.source)
            .filter(|source| source.ident == last.as_str())
            .collect();
        if candidates.is_empty() {
            return Err(unresolved(format!(
                "no struct named '{last}' with named fields was found"
            )));
        }

        let chosen: Vec<&SourceType> = if prefix.is_empty() {
            // a bare name: the declaring module's own struct, else a unique one
            let local: Vec<&SourceType> = candidates
                .iter()
                .copied()
                .filter(|source| source.namespace == from.namespace)
                .collect();
            if local.is_empty() { candidates } else { local }
        } else {
            let wanted = expected_namespace(prefix, &from.namespace);
            let found: Vec<&SourceType> = candidates
                .into_iter()
                .filter(|source| source.namespace == wanted)
                .collect();
            if found.is_empty() {
                return Err(unresolved(format!(
                    "no struct named '{last}' in module '{}'",
                    wanted.join("::")
                )));
            }
            found
        };

        match chosen.as_slice() {
            [one] => Ok(*one),
            _ => Err(unresolved(format!(
                "'{last}' is ambiguous; write its module path"
            ))),
        }
    }
}

impl SymbolSource for Universe {
    fn marked(&self) -> Vec<&SourceType> {
        self.structs
            .iter()
            .filter(|entry| entry.marked)
            .map(|entry| &entry.source)
            .collect()
    }
}

/// Module path of a file relative to the source root.
///
/// `lib.rs`/`main.rs` -> `crate`, `a/mod.rs` -> `crate::a`, `a/b.rs` ->
/// `crate::a::b`.
#[must_use]
pub fn module_path(rel: &Path) -> Vec<String> {
    let mut segments = vec!["crate".to_string()];
    let parts: Vec<String> = rel
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some((file, dirs)) = parts.split_last() {
        segments.extend(dirs.iter().cloned());

        let stem = file.strip_suffix(".rs").unwrap_or(file);
        let is_root = dirs.is_empty() && (stem == "lib" || stem == "main");
        if stem != "mod" && !is_root {
            segments.push(stem.to_string());
        }
    }

    segments
}

// expected_namespace
// where a written base path points, seen from the declaring module
fn expected_namespace(prefix: &[String], from: &[String]) -> Vec<String> {
    match prefix.first().map(String::as_str) {
        Some("crate") => prefix.to_vec(),
        Some("self") => [from, &prefix[1..]].concat(),
        Some("super") => {
            let mut base = from.to_vec();
            let mut rest = prefix;
            while let Some(("super", tail)) = rest.split_first().map(|(h, t)| (h.as_str(), t)) {
                base.pop();
                rest = tail;
            }
            [base.as_slice(), rest].concat()
        }
        _ => [from, prefix].concat(),
    }
}

// flatten_use
// alias -> imported path for every named leaf of a use tree; globs are skipped
fn flatten_use(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Imports) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            flatten_use(&path.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(name) if name.ident == "self" => {
            if let Some(last) = prefix.last() {
                out.insert(last.clone(), prefix.clone());
            }
        }
        UseTree::Name(name) => {
            let mut target = prefix.clone();
            target.push(name.ident.to_string());
            out.insert(name.ident.to_string(), target);
        }
        UseTree::Rename(rename) => {
            let mut target = prefix.clone();
            if rename.ident != "self" {
                target.push(rename.ident.to_string());
            }
            out.insert(rename.rename.to_string(), target);
        }
        UseTree::Group(group) => {
            for item in &group.items {
                flatten_use(item, prefix, out);
            }
        }
        UseTree::Glob(_) => {}
    }
}

fn is_drop(path: &SynPath) -> bool {
    path.segments.last().is_some_and(|segment| segment.ident == "Drop")
}

fn reject_inline_marks(module: &ItemMod) -> Result<(), Error> {
    let Some((_, items)) = &module.content else {
        return Ok(());
    };

    for item in items {
        match item {
            Item::Struct(item) if item.attrs.iter().any(|a| is_marker(a, GENERATE_ATTR)) => {
                return Err(Error::structural(
                    item.ident.span(),
                    format!(
                        "'{}' is marked inside inline module '{}'; move it to its own file",
                        item.ident, module.ident
                    ),
                ));
            }
            Item::Mod(inner) => reject_inline_marks(inner)?,
            _ => {}
        }
    }

    Ok(())
}

pub(crate) fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    let entries = fs::read_dir(dir).map_err(|source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| BuildError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn universe(files: &[(&str, &str)]) -> Universe {
        let mut universe = Universe::default();
        for (rel, text) in files {
            universe
                .add_file(&Path::new("src").join(rel), Path::new(rel), text, &[])
                .unwrap();
        }

        universe
    }

    #[test]
    fn module_paths_follow_file_layout() {
        assert_eq!(module_path(Path::new("lib.rs")), vec!["crate"]);
        assert_eq!(module_path(Path::new("main.rs")), vec!["crate"]);
        assert_eq!(module_path(Path::new("dto.rs")), vec!["crate", "dto"]);
        assert_eq!(module_path(Path::new("api/mod.rs")), vec!["crate", "api"]);
        assert_eq!(
            module_path(Path::new("api/user.rs")),
            vec!["crate", "api", "user"]
        );
        assert_eq!(
            module_path(Path::new("api/lib.rs")),
            vec!["crate", "api", "lib"]
        );
    }

    #[test]
    fn marked_and_unmarked_structs_are_separated() {
        let universe = universe(&[(
            "dto.rs",
            r"
            #[dto_to_model]
            pub struct TestDto { pub id: String }

            pub struct Audit { pub by: String }

            pub struct Pair(u8, u8);
            ",
        )]);

        assert_eq!(universe.len(), 2);
        assert_eq!(universe.marked_count(), 1);

        let marked = universe.marked();
        assert_eq!(marked[0].qualified_name(), "crate::dto::TestDto");
        assert_eq!(marked[0].origin(), Some(Path::new("src/dto.rs")));
    }

    #[test]
    fn default_derives_apply_to_marked_structs() {
        let defaults: [SynPath; 2] = [parse_quote!(Debug), parse_quote!(Clone)];
        let mut universe = Universe::default();
        universe
            .add_file(
                Path::new("src/dto.rs"),
                Path::new("dto.rs"),
                "#[dto_to_model(derive(Clone))] pub struct TestDto { pub id: String }",
                &defaults,
            )
            .unwrap();

        assert_eq!(universe.marked()[0].args.derive.len(), 2);
    }

    #[test]
    fn inherent_impls_become_members() {
        let universe = universe(&[(
            "dto.rs",
            r"
            #[dto_to_model]
            pub struct TestDto { pub id: String }

            impl TestDto {
                pub fn label(&self) -> &str { &self.id }
            }

            impl Clone for TestDto {
                fn clone(&self) -> Self { todo!() }
            }
            ",
        )]);

        let marked = universe.marked();
        assert_eq!(marked[0].members.len(), 2);
        assert_eq!(marked[0].properties().count(), 1);
    }

    #[test]
    fn marked_tuple_struct_fails_with_file() {
        let mut universe = Universe::default();
        let err = universe
            .add_file(
                Path::new("src/dto.rs"),
                Path::new("dto.rs"),
                "#[dto_to_model] pub struct TestDto(String);",
                &[],
            )
            .unwrap_err();

        assert!(err.to_string().contains("src/dto.rs"));
        assert!(err.to_string().contains("tuple struct"));
    }

    #[test]
    fn marks_inside_inline_modules_are_rejected() {
        let mut universe = Universe::default();
        let err = universe
            .add_file(
                Path::new("src/lib.rs"),
                Path::new("lib.rs"),
                "mod inner { #[dto_to_model] pub struct TestDto { pub id: String } }",
                &[],
            )
            .unwrap_err();

        assert!(err.to_string().contains("inline module"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let mut universe = Universe::default();
        let err = universe
            .add_file(Path::new("src/bad.rs"), Path::new("bad.rs"), "pub struct {", &[])
            .unwrap_err();

        assert!(matches!(err, BuildError::Parse { .. }));
        assert!(err.to_string().contains("src/bad.rs"));
    }

    #[test]
    fn unique_base_resolves_by_name() {
        let universe = universe(&[
            ("audit.rs", "pub struct Audit { pub by: String }"),
            (
                "dto.rs",
                "#[dto_to_model] pub struct TestDto { #[model_base] pub audit: crate::audit::Audit }",
            ),
        ]);
        let dto = universe.marked()[0];
        let ty: Type = parse_quote!(crate::audit::Audit);

        let base = universe.resolve_base(&ty, dto).unwrap();
        assert_eq!(base.qualified_name(), "crate::audit::Audit");
    }

    #[test]
    fn written_path_must_match_a_unique_base() {
        let universe = universe(&[
            ("a.rs", "pub struct Audit { pub by: String }"),
            (
                "dto.rs",
                "#[dto_to_model] pub struct TestDto { #[model_base] pub audit: other_crate::Audit }",
            ),
        ]);
        let dto = universe.marked()[0];

        let foreign: Type = parse_quote!(other_crate::Audit);
        let err = universe.resolve_base(&foreign, dto).unwrap_err();
        assert!(matches!(err, Error::UnresolvedBase { .. }));
        assert!(err.to_string().contains("crate::dto::other_crate"));

        let wrong_module: Type = parse_quote!(crate::b::Audit);
        assert!(universe.resolve_base(&wrong_module, dto).is_err());

        // a bare name still finds the only struct of that name
        let bare: Type = parse_quote!(Audit);
        assert_eq!(
            universe.resolve_base(&bare, dto).unwrap().qualified_name(),
            "crate::a::Audit"
        );
    }

    #[test]
    fn use_imports_resolve_bare_and_aliased_bases() {
        let universe = universe(&[
            ("a.rs", "pub struct Audit { pub by: String }"),
            ("b.rs", "pub struct Audit { pub at: u64 }"),
            (
                "dto.rs",
                r"
                use crate::b::Audit;
                use super::{a::Audit as Trail, b};

                #[dto_to_model]
                pub struct TestDto { #[model_base] pub audit: Audit }
                ",
            ),
        ]);
        let dto = universe.marked()[0];

        let bare: Type = parse_quote!(Audit);
        assert_eq!(
            universe.resolve_base(&bare, dto).unwrap().qualified_name(),
            "crate::b::Audit"
        );

        let renamed: Type = parse_quote!(Trail);
        assert_eq!(
            universe.resolve_base(&renamed, dto).unwrap().qualified_name(),
            "crate::a::Audit"
        );

        let through_module: Type = parse_quote!(b::Audit);
        assert_eq!(
            universe.resolve_base(&through_module, dto).unwrap().qualified_name(),
            "crate::b::Audit"
        );
    }

    #[test]
    fn marked_structs_implementing_drop_are_rejected() {
        let mut universe = Universe::default();
        let err = universe
            .add_file(
                Path::new("src/dto.rs"),
                Path::new("dto.rs"),
                r"
                #[dto_to_model]
                pub struct TestDto { pub id: String }

                impl Drop for TestDto {
                    fn drop(&mut self) {}
                }
                ",
                &[],
            )
            .unwrap_err();

        assert!(err.to_string().contains("src/dto.rs"));
        assert!(err.to_string().contains("implements Drop"));

        // an unmarked base may still implement Drop
        let plain = universe.add_file(
            Path::new("src/audit.rs"),
            Path::new("audit.rs"),
            "pub struct Audit { pub by: String } impl Drop for Audit { fn drop(&mut self) {} }",
            &[],
        );
        assert!(plain.is_ok());
    }

    #[test]
    fn ambiguous_base_uses_the_written_path() {
        let universe = universe(&[
            ("a.rs", "pub struct Audit { pub by: String }"),
            ("b.rs", "pub struct Audit { pub at: u64 }"),
            (
                "dto.rs",
                "#[dto_to_model] pub struct TestDto { #[model_base] pub audit: super::b::Audit }",
            ),
        ]);
        let dto = universe.marked()[0];

        let ty: Type = parse_quote!(super::b::Audit);
        assert_eq!(
            universe.resolve_base(&ty, dto).unwrap().qualified_name(),
            "crate::b::Audit"
        );

        let bare: Type = parse_quote!(Audit);
        assert!(universe.resolve_base(&bare, dto).is_err());
    }

    #[test]
    fn unknown_base_is_reported() {
        let universe = universe(&[(
            "dto.rs",
            "#[dto_to_model] pub struct TestDto { #[model_base] pub audit: Missing }",
        )]);
        let dto = universe.marked()[0];
        let ty: Type = parse_quote!(Missing);

        let err = universe.resolve_base(&ty, dto).unwrap_err();
        assert!(err.to_string().contains("no struct named 'Missing'"));
    }
}
