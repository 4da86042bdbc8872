use crate::cli::{GenerateArgs, InspectArgs};
use modelgen_build::{BuildError, Config, Generator, OUT_SUBDIR};
use modelgen_core::{
    collect::collect_properties,
    diag::{DiagnosticLog, Level, TracingDiagnostics},
    driver::SymbolSource,
    naming::model_ident,
};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

/// Default output directory when neither the flag nor the config names one.
const DEFAULT_OUT: &str = "target";

// load_config
// explicit --config must exist; the default file is optional
fn load_config(path: Option<&Path>) -> Result<Config, BuildError> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::load_or_default(Path::new("."))?),
    }
}

fn generator(args: &GenerateArgs) -> Result<Generator, BuildError> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(src) = &args.src {
        config.source_dir.clone_from(src);
    }
    if let Some(out) = &args.out {
        config.out_dir = Some(out.clone());
    }
    if let Some(grouping) = args.grouping {
        config.grouping = grouping.into();
    }

    Ok(Generator::new(
        config,
        ".",
        PathBuf::from(DEFAULT_OUT).join(OUT_SUBDIR),
    ))
}

pub fn generate(args: &GenerateArgs) -> Result<ExitCode, BuildError> {
    let generator = generator(args)?;

    if args.check {
        let mut log = DiagnosticLog::new();
        let stale = generator.check(&mut log)?;

        for entry in log.at_level(Level::Warn) {
            tracing::warn!(target: "modelgen", "{entry}");
        }
        if stale.is_empty() {
            println!("up to date");
            return Ok(ExitCode::SUCCESS);
        }

        for path in &stale {
            println!("stale: {}", path.display());
        }
        return Ok(ExitCode::FAILURE);
    }

    let summary = generator.run(&mut TracingDiagnostics)?;
    println!(
        "generated {} model(s) in {} file(s) under {}",
        summary.models.len(),
        summary.artifacts,
        generator.out_root().display()
    );

    Ok(ExitCode::SUCCESS)
}

pub fn inspect(args: &InspectArgs) -> Result<ExitCode, BuildError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(src) = &args.src {
        config.source_dir.clone_from(src);
    }

    let generator = Generator::new(config, ".", DEFAULT_OUT);
    let universe = generator.scan()?;
    let mut log = DiagnosticLog::new();

    for source in universe.marked() {
        let origin = source
            .origin()
            .map_or_else(String::new, |path| path.display().to_string());
        let model = model_ident(source)?;
        let properties = collect_properties(source, &universe, &mut log)?;

        tracing::debug!(target: "modelgen", dto = %source.qualified_name(), fields = properties.len());
        println!("{} ({origin})", source.qualified_name());
        println!("  -> {model}");
        for prop in &properties {
            let via: String = prop.access.iter().map(|seg| format!("{seg}.")).collect();
            println!("     {}: {}  [self.{via}{}]", prop.name(), prop.type_key(), prop.name());
        }
    }

    Ok(ExitCode::SUCCESS)
}

///
/// TESTS
///
