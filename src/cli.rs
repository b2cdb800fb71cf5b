use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate Trino table definitions from raw CSV files",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the raw directory tree and write CREATE SCHEMA/TABLE statements
    Generate(GenerateArgs),
    /// Show the detected delimiter and normalized columns of one CSV file
    Inspect(InspectArgs),
    /// Print the normalized identifier for each given name
    Normalize(NormalizeArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// KEY=VALUE configuration file (defaults to the first of .env, services/.env)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Root directory holding one sub-directory per source system
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    /// Bucket used to build s3:// external locations (defaults to the root's name)
    #[arg(long)]
    pub bucket: Option<String>,
    /// Destination SQL file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// File extension to scan for
    #[arg(long)]
    pub extension: Option<String>,
    /// Trino catalog that schemas are created in
    #[arg(long)]
    pub catalog: Option<String>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print the generated SQL to stdout instead of writing the output file
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config: self.config.clone(),
            root: self.root.clone(),
            bucket: self.bucket.clone(),
            output: self.output.clone(),
            extension: self.extension.clone(),
            catalog: self.catalog.clone(),
            encoding: self.input_encoding.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Root directory; when given, the file's schema, table and location are shown
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    /// Bucket used for the external location (defaults to the root's name)
    #[arg(long)]
    pub bucket: Option<String>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Raw header tokens or directory names
    #[arg(required = true)]
    pub names: Vec<String>,
}
