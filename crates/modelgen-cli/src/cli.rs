use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use modelgen_core::driver::Grouping;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "modelgen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate model twins and converters from #[dto_to_model] structs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More logging (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a source tree and write generated models
    Generate(GenerateArgs),

    /// List marked structs and what they resolve to
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Source directory to scan
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub grouping: Option<GroupingArg>,

    /// Config file, `modelgen.toml` in the current directory by default
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Render without writing; fail if anything on disk is stale
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Source directory to scan
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

///
/// GroupingArg
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum GroupingArg {
    PerFile,
    PerDeclaration,
}

impl From<GroupingArg> for Grouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::PerFile => Self::PerFile,
            GroupingArg::PerDeclaration => Self::PerDeclaration,
        }
    }
}

///
/// TESTS
///
