use clap::{Parser, Subcommand};

use self::{build_table::BuildTableArg, generate_labels::GenerateLabelsArg};

mod build_table;
mod generate_labels;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Build the corpus-wide run-expectancy table
    BuildTable(#[clap(flatten)] BuildTableArg),
    /// Emit per-pitch training labels from an existing table
    GenerateLabels(#[clap(flatten)] GenerateLabelsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::BuildTable(arg) => build_table::run(&arg)?,
        Mode::GenerateLabels(arg) => generate_labels::run(&arg)?,
    }
    Ok(())
}
