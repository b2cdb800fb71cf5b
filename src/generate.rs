//! Run orchestration for the `generate` command.
//!
//! Files are grouped by schema, visited in sorted order, and rendered into a
//! single script. All run state (the output lines and the set of claimed
//! tables) lives in a [`ScriptBuilder`] owned by one invocation.

use std::{
    collections::{BTreeMap, HashMap},
    error::Error as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result as AnyResult};
use encoding_rs::Encoding;
use log::{debug, info, warn};

use crate::{
    cli::GenerateArgs,
    config::GeneratorConfig,
    ddl::{self, TableDefinition},
    error::{GeneratorError, Result},
    header, io_utils,
    placement::{self, Placement, SourceFile},
    sniff,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub schemas: usize,
    pub tables: usize,
    pub unreadable_files: usize,
    pub duplicate_files: usize,
    pub unplaced_files: usize,
    pub unreadable_entries: usize,
}

impl GenerationSummary {
    pub fn skipped(&self) -> usize {
        self.unreadable_files + self.duplicate_files + self.unplaced_files + self.unreadable_entries
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedScript {
    pub sql: String,
    pub summary: GenerationSummary,
}

pub fn execute(args: &GenerateArgs) -> AnyResult<()> {
    let config = GeneratorConfig::load(&args.overrides()).context("Resolving configuration")?;
    debug!("Resolved configuration: {config:?}");

    if args.dry_run {
        let script = render(&config)
            .with_context(|| format!("Generating DDL from {:?}", config.root))?;
        print!("{}", script.sql);
        log_summary(&script.summary);
        return Ok(());
    }

    let summary = generate(&config)
        .with_context(|| format!("Generating DDL from {:?}", config.root))?;
    info!("Generated SQL schema: {:?}", config.output);
    log_summary(&summary);
    Ok(())
}

/// Renders the script for `config` and writes it to the configured output path.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationSummary> {
    let script = render(config)?;
    write_output(&config.output, &script.sql)?;
    Ok(script.summary)
}

/// Scans the configured root and renders the full script in memory.
pub fn render(config: &GeneratorConfig) -> Result<GeneratedScript> {
    let encoding = io_utils::resolve_encoding(config.encoding.as_deref())?;
    info!(
        "Scanning {:?} for .{} files",
        config.root, config.extension
    );
    let discovered = placement::discover_files(&config.root, &config.extension)?;
    debug!("Discovered {} file(s)", discovered.files.len());

    let mut builder = ScriptBuilder::new(config, encoding);
    builder.summary.unreadable_entries = discovered.unreadable_entries;
    let groups = builder.group_by_schema(discovered.files);
    builder.summary.schemas = groups.len();
    for (schema, members) in &groups {
        builder.push_schema(schema, members)?;
    }
    Ok(builder.finish())
}

fn write_output(path: &Path, sql: &str) -> Result<()> {
    let to_error = |source| GeneratorError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, sql).map_err(to_error)
}

fn log_summary(summary: &GenerationSummary) {
    info!("Total schemas: {}", summary.schemas);
    info!("Total tables: {}", summary.tables);
    if summary.skipped() > 0 {
        warn!(
            "Skipped {} path(s): {} unreadable, {} duplicate table(s), {} outside a schema directory, {} unlistable",
            summary.skipped(),
            summary.unreadable_files,
            summary.duplicate_files,
            summary.unplaced_files,
            summary.unreadable_entries
        );
    }
}

struct ScriptBuilder<'a> {
    config: &'a GeneratorConfig,
    encoding: &'static Encoding,
    lines: Vec<String>,
    claimed: HashMap<Placement, PathBuf>,
    summary: GenerationSummary,
}

impl<'a> ScriptBuilder<'a> {
    fn new(config: &'a GeneratorConfig, encoding: &'static Encoding) -> Self {
        let root_label = config.root.display().to_string();
        let root_label = root_label.trim_end_matches(['/', '\\']);
        Self {
            config,
            encoding,
            lines: ddl::script_header(root_label),
            claimed: HashMap::new(),
            summary: GenerationSummary::default(),
        }
    }

    fn group_by_schema(
        &mut self,
        files: Vec<SourceFile>,
    ) -> BTreeMap<String, Vec<(SourceFile, Placement)>> {
        let mut groups: BTreeMap<String, Vec<(SourceFile, Placement)>> = BTreeMap::new();
        for file in files {
            match file.placement() {
                Ok(placement) => groups
                    .entry(placement.schema.clone())
                    .or_default()
                    .push((file, placement)),
                Err(err) => {
                    warn!("Skipping {:?}: {err}", file.path);
                    self.summary.unplaced_files += 1;
                }
            }
        }
        for members in groups.values_mut() {
            members.sort_by(|(a, _), (b, _)| a.path.cmp(&b.path));
        }
        groups
    }

    fn push_schema(&mut self, schema: &str, members: &[(SourceFile, Placement)]) -> Result<()> {
        self.lines
            .extend(ddl::schema_statements(&self.config.catalog, schema));
        for (file, placement) in members {
            if let Some(owner) = self.claimed.get(placement) {
                warn!(
                    "Skipping {:?}: table {placement} already claimed by {owner:?}",
                    file.path
                );
                self.summary.duplicate_files += 1;
                continue;
            }
            // The first file owns its table even if it then fails to read.
            self.claimed.insert(placement.clone(), file.path.clone());
            match self.table_definition(file, placement) {
                Ok(definition) => {
                    let source = file.path.display().to_string();
                    self.lines.extend(ddl::table_block(&definition, &source));
                    self.summary.tables += 1;
                }
                Err(err) if err.is_per_file() => {
                    warn!("Skipping {:?}: {}", file.path, error_chain(&err));
                    self.summary.unreadable_files += 1;
                }
                Err(err) => return Err(err),
            }
        }
        self.lines.push(String::new());
        Ok(())
    }

    fn table_definition(&self, file: &SourceFile, placement: &Placement) -> Result<TableDefinition> {
        info!("Processing {:?}", file.path);
        let format = sniff::detect_format(&file.path, self.encoding)?;
        let columns = header::read_header_columns(&file.path, format, self.encoding)?;
        let definition = TableDefinition {
            schema: placement.schema.clone(),
            table: placement.table.clone(),
            columns: columns.normalized,
            location: placement::external_location(&file.relative, &self.config.bucket),
            delimiter: format.delimiter,
        };
        info!(
            "  {}.{}: delimiter {}, strip_spaces={}, {} column(s), location {}",
            definition.schema,
            definition.table,
            format.delimiter,
            format.strip_spaces,
            definition.columns.len(),
            definition.location
        );
        Ok(definition)
    }

    fn finish(self) -> GeneratedScript {
        GeneratedScript {
            sql: self.lines.join("\n"),
            summary: self.summary,
        }
    }
}

fn error_chain(err: &GeneratorError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
