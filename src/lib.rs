pub mod cli;
pub mod config;
pub mod ddl;
pub mod error;
pub mod generate;
pub mod header;
pub mod inspect;
pub mod io_utils;
pub mod naming;
pub mod normalize_cmd;
pub mod placement;
pub mod sniff;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("raw_schema_gen", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate::execute(&args),
        Commands::Inspect(args) => inspect::execute(&args),
        Commands::Normalize(args) => normalize_cmd::execute(&args),
    }
}
