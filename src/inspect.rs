//! Single-file inspection: delimiter, padding, and raw vs normalized columns.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::InspectArgs,
    config::{ConfigOverrides, GeneratorConfig},
    header, io_utils,
    placement::{self, SourceFile},
    sniff::{self, DetectedFormat},
    table,
};

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub format: DetectedFormat,
    pub columns: Vec<ColumnReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetReport>,
}

#[derive(Debug, Serialize)]
pub struct ColumnReport {
    pub raw: String,
    pub normalized: String,
}

#[derive(Debug, Serialize)]
pub struct TargetReport {
    pub schema: String,
    pub table: String,
    pub location: String,
}

pub fn execute(args: &InspectArgs) -> Result<()> {
    let report = build_report(args)?;
    if args.json {
        let rendered = serde_json::to_string_pretty(&report).context("Serializing report")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("File:         {}", report.path.display());
    println!("Delimiter:    {}", report.format.delimiter);
    println!("Strip spaces: {}", report.format.strip_spaces);
    if let Some(target) = &report.target {
        println!("Table:        {}.{}", target.schema, target.table);
        println!("Location:     {}", target.location);
    }
    println!();
    let rows = report
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                (idx + 1).to_string(),
                column.raw.clone(),
                column.normalized.clone(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["#", "raw", "normalized"], &rows);
    info!(
        "Inspected {} column(s) in {:?}",
        report.columns.len(),
        report.path
    );
    Ok(())
}

pub fn build_report(args: &InspectArgs) -> Result<FileReport> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let format = sniff::detect_format(&args.input, encoding)
        .with_context(|| format!("Detecting delimiter of {:?}", args.input))?;
    let header_columns = header::read_header_columns(&args.input, format, encoding)
        .with_context(|| format!("Reading header of {:?}", args.input))?;

    let target = match &args.root {
        Some(root) => {
            let config = GeneratorConfig::resolve(
                &ConfigOverrides {
                    root: Some(root.clone()),
                    bucket: args.bucket.clone(),
                    ..ConfigOverrides::default()
                },
                None,
            );
            let file = SourceFile::new(args.input.clone(), &config.root)?;
            let placed = file.placement()?;
            Some(TargetReport {
                schema: placed.schema,
                table: placed.table,
                location: placement::external_location(&file.relative, &config.bucket),
            })
        }
        None => None,
    };

    let columns = header_columns
        .raw
        .into_iter()
        .zip(header_columns.normalized)
        .map(|(raw, normalized)| ColumnReport { raw, normalized })
        .collect();

    Ok(FileReport {
        path: args.input.clone(),
        format,
        columns,
        target,
    })
}
