//! fplink - fingerprint similarity and identity clustering
//!
//! The main entry point for the `fplink` binary, handling:
//! - Pairwise fingerprint comparison
//! - Device statistics and analytics over a fingerprint log
//! - Entropy analysis and dataset comparison
//! - Record ingestion into a JSON-lines log
//! - Configuration checks and JSON Schema export

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use fl_common::error::{format_error_human, StructuredError};
use fl_common::{ComponentBag, Error, FingerprintRecord, OutputFormat, SCHEMA_VERSION};
use fl_core::config::{load_config, ConfigError, ConfigOptions, ResolvedConfig};
use fl_core::engine::Engine;
use fl_core::entropy::compare_datasets;
use fl_core::exit_codes::ExitCode;
use fl_core::log_event;
use fl_core::logging::{event_names, generate_run_id, init_logging, LogConfig, LogContext, Stage};
use fl_core::report::Render;
use fl_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use fl_core::store::{FingerprintRepository, JsonlLogStore};
use serde::{Deserialize, Serialize};

/// fplink - link repeated browser fingerprints to physical devices
#[derive(Parser)]
#[command(name = "fplink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to engine.json (overrides FPLINK_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two fingerprints and report similarity and confidence
    Compare(CompareArgs),

    /// Cluster a fingerprint log into devices and summarize
    Stats(StatsArgs),

    /// Device statistics plus the most recent records
    Analytics(StatsArgs),

    /// Entropy analysis of a fingerprint log
    Analyze(AnalyzeArgs),

    /// Compare entropy between two fingerprint logs
    Diff(DiffArgs),

    /// Append one collector payload to a fingerprint log
    Ingest(IngestArgs),

    /// Print one record from a fingerprint log
    Show(ShowArgs),

    /// Validate configuration and print the effective settings
    Check,

    /// Print JSON Schemas for input and output types
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct CompareArgs {
    /// First fingerprint: a log record, a collector payload, or a bare component bag ("-" for stdin)
    first: PathBuf,

    /// Second fingerprint, same shapes as the first
    second: PathBuf,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Fingerprint log (JSON lines)
    #[arg(long)]
    log: PathBuf,

    /// Evaluation time for the recent-activity window (RFC 3339; default: now)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Fingerprint log (JSON lines)
    #[arg(long)]
    log: PathBuf,

    /// Also write the JSON report to this path
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Baseline fingerprint log
    #[arg(short = 'a', long = "dataset-a")]
    dataset_a: PathBuf,

    /// Fingerprint log to compare against the baseline
    #[arg(short = 'b', long = "dataset-b")]
    dataset_b: PathBuf,
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// Fingerprint log to append to (created if missing)
    #[arg(long)]
    log: PathBuf,

    /// Collector payload JSON ("-" for stdin)
    payload: PathBuf,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Fingerprint log (JSON lines)
    #[arg(long)]
    log: PathBuf,

    /// Record id; a shortened id ending in "..." matches by prefix
    id: String,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name to print
    name: Option<String>,

    /// List available schema types
    #[arg(long, conflicts_with_all = ["name", "all"])]
    list: bool,

    /// Print every schema
    #[arg(long, conflicts_with = "name")]
    all: bool,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::for_cli(
        cli.global.verbose,
        cli.global.quiet,
        cli.global.format.is_machine(),
    ));

    let exit_code = match &cli.command {
        Commands::Compare(args) => run_compare(&cli.global, args),
        Commands::Stats(args) => run_stats(&cli.global, args, false),
        Commands::Analytics(args) => run_stats(&cli.global, args, true),
        Commands::Analyze(args) => run_analyze(&cli.global, args),
        Commands::Diff(args) => run_diff(&cli.global, args),
        Commands::Ingest(args) => run_ingest(&cli.global, args),
        Commands::Show(args) => run_show(&cli.global, args),
        Commands::Check => run_check(&cli.global),
        Commands::Schema(args) => run_schema(&cli.global, args),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Print a command payload to stdout in the selected format.
fn emit<T: Serialize + Render>(global: &GlobalOpts, command: &str, payload: &T) -> Result<(), Error> {
    match global.format {
        OutputFormat::Json => {
            let envelope = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "command": command,
                "generated_at": Utc::now().to_rfc3339(),
                "result": payload,
            });
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        OutputFormat::Md => print!("{}", payload.to_markdown()),
        OutputFormat::Summary => println!("{}", payload.summary_line()),
    }
    Ok(())
}

/// Report an error on stderr and map it to an exit code.
fn output_error(global: &GlobalOpts, ctx: &LogContext, error: &Error) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(error).with_context("run_id", &ctx.run_id);
            eprintln!("{}", structured.to_json());
        }
        OutputFormat::Summary => eprintln!("error: {}", error),
        OutputFormat::Md => eprintln!("{}", format_error_human(error, std::io::stderr().is_terminal())),
    }
    ExitCode::from(error)
}

/// Output a config error in the appropriate format.
fn output_config_error(global: &GlobalOpts, ctx: &LogContext, error: &ConfigError) -> ExitCode {
    log_event!(
        ctx,
        ERROR,
        event_names::CONFIG_ERROR,
        Stage::Init,
        "configuration rejected",
        error = tracing::field::display(error)
    );

    let (error_code, exit_code) = match error {
        ConfigError::NotFound { .. } => (10, ExitCode::ConfigError),
        ConfigError::ParseError { .. } => (11, ExitCode::ConfigError),
        ConfigError::ValidationError(e) => (e.code(), ExitCode::ConfigError),
        ConfigError::IoError { .. } => (60, ExitCode::IoError),
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "status": "error",
                "error": {
                    "code": error_code,
                    "message": error.to_string(),
                }
            });
            eprintln!("{}", response);
        }
        OutputFormat::Summary => eprintln!("config error: {}", error),
        OutputFormat::Md => {
            eprintln!("# Configuration Error");
            eprintln!();
            eprintln!("Error: {}", error);
        }
    }

    exit_code
}

fn load_resolved(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedConfig, ExitCode> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
    };
    match load_config(&options) {
        Ok(resolved) => {
            if let Some(path) = &resolved.paths.engine {
                log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "engine config loaded",
                    path = tracing::field::display(path.display()),
                    source = tracing::field::display(resolved.paths.engine_source)
                );
            } else {
                log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "no engine config found; using defaults"
                );
            }
            Ok(resolved)
        }
        Err(e) => Err(output_config_error(global, ctx, &e)),
    }
}

fn load_engine(global: &GlobalOpts, ctx: &LogContext) -> Result<Engine, ExitCode> {
    let resolved = load_resolved(global, ctx)?;
    Ok(Engine::from_config(&resolved.engine).with_context(ctx.clone()))
}

/// Read a JSON document from a file, or from stdin for "-".
fn read_json_input(path: &Path) -> Result<serde_json::Value, Error> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    serde_json::from_str(&text).map_err(|e| Error::InvalidPayload(format!("{}: {}", path.display(), e)))
}

/// Extract the component bag from a log record, a collector payload, or a bare bag.
fn components_from_value(value: &serde_json::Value, source: &Path) -> Result<ComponentBag, Error> {
    if !value.is_object() {
        return Err(Error::InvalidPayload(format!(
            "{}: expected a JSON object",
            source.display()
        )));
    }
    let inner = value
        .get("components")
        .or_else(|| value.get("data"))
        .unwrap_or(value);
    let bag = ComponentBag::deserialize(inner)
        .map_err(|e| Error::InvalidPayload(format!("{}: {}", source.display(), e)))?;
    if bag.scoreable_count() == 0 {
        return Err(Error::InvalidPayload(format!(
            "{}: no fingerprint components found",
            source.display()
        )));
    }
    Ok(bag)
}

/// Load every record from an existing log.
fn load_log(path: &Path, ctx: &LogContext) -> Result<Vec<FingerprintRecord>, Error> {
    let store = JsonlLogStore::new(path);
    if !store.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("fingerprint log not found: {}", path.display()),
        )));
    }
    let report = store.load_report()?;
    log_event!(
        ctx,
        INFO,
        event_names::INGEST_LOADED,
        Stage::Ingest,
        "fingerprint log loaded",
        records = report.records.len(),
        skipped = report.skipped()
    );
    Ok(report.records)
}

fn run_context(dataset: Option<&Path>, command: &str) -> LogContext {
    let mut ctx = LogContext::new(generate_run_id());
    if let Some(path) = dataset {
        ctx = ctx.with_dataset(path.display().to_string());
    }
    log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "command started",
        command = command
    );
    ctx
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_compare(global: &GlobalOpts, args: &CompareArgs) -> ExitCode {
    let ctx = run_context(None, "compare");
    let engine = match load_engine(global, &ctx) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let result = (|| -> Result<bool, Error> {
        let first = components_from_value(&read_json_input(&args.first)?, &args.first)?;
        let second = components_from_value(&read_json_input(&args.second)?, &args.second)?;
        let comparison = engine.compare(&first, &second);
        emit(global, "compare", &comparison)?;
        Ok(comparison.is_match)
    })();

    match result {
        Ok(true) => ExitCode::Clean,
        Ok(false) => ExitCode::NoMatch,
        Err(e) => output_error(global, &ctx, &e),
    }
}

fn run_stats(global: &GlobalOpts, args: &StatsArgs, analytics: bool) -> ExitCode {
    let command = if analytics { "analytics" } else { "stats" };
    let ctx = run_context(Some(&args.log), command);
    let engine = match load_engine(global, &ctx) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    let now = args.now.unwrap_or_else(Utc::now);

    let result = (|| -> Result<usize, Error> {
        let records = load_log(&args.log, &ctx)?;
        if analytics {
            emit(global, command, &engine.analytics(&records, now))?;
        } else {
            emit(global, command, &engine.stats(&records, now))?;
        }
        Ok(records.len())
    })();

    finish(global, &ctx, result)
}

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    let ctx = run_context(Some(&args.log), "analyze");
    let engine = match load_engine(global, &ctx) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let result = (|| -> Result<usize, Error> {
        let records = load_log(&args.log, &ctx)?;
        let report = engine.entropy(&records);
        if let Some(output) = &args.output {
            std::fs::write(output, serde_json::to_string_pretty(&report)?)?;
            log_event!(
                ctx,
                INFO,
                event_names::RUN_FINISHED,
                Stage::Report,
                "entropy report written",
                path = tracing::field::display(output.display())
            );
        }
        emit(global, "analyze", &report)?;
        Ok(records.len())
    })();

    finish(global, &ctx, result)
}

fn run_diff(global: &GlobalOpts, args: &DiffArgs) -> ExitCode {
    let ctx = run_context(Some(&args.dataset_a), "diff");
    let engine = match load_engine(global, &ctx) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let result = (|| -> Result<usize, Error> {
        let a = load_log(&args.dataset_a, &ctx)?;
        let b = load_log(&args.dataset_b, &ctx)?;
        let comparison = compare_datasets(&engine.entropy(&a), &engine.entropy(&b));
        emit(global, "diff", &comparison)?;
        Ok(a.len().min(b.len()))
    })();

    finish(global, &ctx, result)
}

fn run_ingest(global: &GlobalOpts, args: &IngestArgs) -> ExitCode {
    let ctx = run_context(Some(&args.log), "ingest");

    let result = (|| -> Result<usize, Error> {
        let payload = read_json_input(&args.payload)?;
        let record = FingerprintRecord::from_payload(&payload, Utc::now())?;
        let mut store = JsonlLogStore::new(&args.log);
        store.append(&record)?;
        log_event!(
            ctx,
            INFO,
            event_names::INGEST_APPENDED,
            Stage::Ingest,
            "record appended",
            id = record.id.as_str(),
            components = record.components.scoreable_count()
        );
        emit(global, "ingest", &IngestReceipt::from(&record))?;
        Ok(1)
    })();

    finish(global, &ctx, result)
}

fn run_show(global: &GlobalOpts, args: &ShowArgs) -> ExitCode {
    let ctx = run_context(Some(&args.log), "show");

    let result = (|| -> Result<usize, Error> {
        let records = load_log(&args.log, &ctx)?;
        let record = match args.id.strip_suffix("...") {
            Some(prefix) => records.iter().find(|r| r.id.as_str().starts_with(prefix)),
            None => records.iter().find(|r| r.id.as_str() == args.id),
        }
        .ok_or_else(|| Error::RecordNotFound {
            id: args.id.clone(),
        })?;
        emit(global, "show", &RecordView(record))?;
        Ok(1)
    })();

    finish(global, &ctx, result)
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    let ctx = run_context(None, "check");
    let resolved = match load_resolved(global, &ctx) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    let snapshot = resolved.snapshot();
    match emit(global, "check", &snapshot) {
        Ok(()) => ExitCode::Clean,
        Err(e) => output_error(global, &ctx, &e),
    }
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    let output = if args.list {
        let list: Vec<_> = available_schemas()
            .into_iter()
            .map(|(name, description)| serde_json::json!({"name": name, "description": description}))
            .collect();
        if global.format == OutputFormat::Json {
            serde_json::json!(list)
        } else {
            for (name, description) in available_schemas() {
                println!("{:<20} {}", name, description);
            }
            return ExitCode::Clean;
        }
    } else if args.all {
        serde_json::json!(generate_all_schemas())
    } else if let Some(name) = &args.name {
        match generate_schema(name) {
            Some(schema) => schema,
            None => {
                eprintln!(
                    "unknown schema type '{}'; run `fplink schema --list` for the available types",
                    name
                );
                return ExitCode::ArgsError;
            }
        }
    } else {
        eprintln!("specify a type name, --list, or --all");
        return ExitCode::ArgsError;
    };

    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::Clean
        }
        Err(_) => ExitCode::InternalError,
    }
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "fplink_version": env!("CARGO_PKG_VERSION"),
    });

    match global.format {
        OutputFormat::Json => println!("{}", version_info),
        _ => {
            println!("fplink {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

/// Map a command result to an exit code; an empty dataset is exit 2.
fn finish(global: &GlobalOpts, ctx: &LogContext, result: Result<usize, Error>) -> ExitCode {
    match result {
        Ok(count) => {
            log_event!(
                ctx,
                INFO,
                event_names::RUN_FINISHED,
                Stage::Report,
                "command finished",
                records = count
            );
            if count == 0 {
                ExitCode::EmptyDataset
            } else {
                ExitCode::Clean
            }
        }
        Err(e) => output_error(global, ctx, &e),
    }
}

// ============================================================================
// Output views
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IngestReceipt {
    id: String,
    session_id: String,
    server_timestamp: DateTime<Utc>,
    components: usize,
}

impl From<&FingerprintRecord> for IngestReceipt {
    fn from(record: &FingerprintRecord) -> Self {
        Self {
            id: record.id.to_string(),
            session_id: record.session_id.to_string(),
            server_timestamp: record.server_timestamp,
            components: record.components.scoreable_count(),
        }
    }
}

impl Render for IngestReceipt {
    fn to_markdown(&self) -> String {
        format!(
            "# Record ingested\n\n- Id: {}\n- Session: {}\n- Received: {}\n- Components: {}\n",
            self.id,
            self.session_id,
            self.server_timestamp.to_rfc3339(),
            self.components
        )
    }

    fn summary_line(&self) -> String {
        format!("ingested {} ({} components)", self.id, self.components)
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct RecordView<'a>(&'a FingerprintRecord);

impl Render for RecordView<'_> {
    fn to_markdown(&self) -> String {
        let r = self.0;
        let mut out = format!(
            "# Record {}\n\n- Session: {}\n- Received: {}\n",
            r.id,
            r.session_id,
            r.server_timestamp.to_rfc3339()
        );
        if let Some(client) = r.client_timestamp {
            out.push_str(&format!("- Client time: {}\n", client.to_rfc3339()));
        }
        out.push_str(&format!("- Components: {}\n", r.components.scoreable_count()));
        out
    }

    fn summary_line(&self) -> String {
        format!("{} {}", self.0.id.short(), self.0.session_id)
    }
}
