use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tsr binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsr",
    version,
    about = "Generate and inspect runtime type reflection metadata"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored diagnostics.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe every reflected type of a static type graph and emit
    /// per-module metadata.
    Generate(GenerateArgs),
    /// Load an emitted artifact into a runtime store and print the types.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Serialized static type graph.
    #[arg(long)]
    pub graph: PathBuf,

    /// Project config (tsconfig-style JSON or tsr.json) or a directory
    /// containing one.
    #[arg(short = 'p', long)]
    pub project: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Output form.
    #[arg(long, value_enum, default_value_t = Emit::Json, ignore_case = true)]
    pub emit: Emit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The generation artifact as JSON.
    Json,
    /// Registration and replacement statements.
    Js,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Artifact written by `tsr generate`.
    #[arg(long)]
    pub metadata: PathBuf,

    /// Print only the type with this id.
    #[arg(long)]
    pub id: Option<u32>,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
