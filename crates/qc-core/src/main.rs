//! qc - data quality control reporting.
//!
//! Reads logger exports, records metrics, renders monitoring reports and
//! dashboards, and emails results. The QC tests themselves run elsewhere;
//! this binary handles their inputs and outputs.

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use qc_common::{format_timestamp, parse_value, MetricsTable, TestResults};
use qc_core::config::{load_config, QcConfig};
use qc_core::error::CommandError;
use qc_core::exit_codes::ExitCode;
use qc_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use qc_io::{
    read_campbell_scientific, read_metrics, read_test_results, try_read_campbell_scientific,
    write_metrics,
};
use qc_notify::{send_email, EmailMessage, SmtpSettings};
use qc_report::{write_dashboard, write_monitoring_report, DashboardSpec, MonitoringRun};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Data quality control reporting
#[derive(Parser)]
#[command(name = "qc")]
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
    /// Run configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Also write the log to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a Campbell Scientific CSV file and print a summary
    Read(ReadArgs),

    /// Merge one row of metrics into a metrics file
    Metrics(MetricsArgs),

    /// Render a monitoring report
    Report(ReportArgs),

    /// Render a dashboard from a TOML or JSON description
    Dashboard(DashboardArgs),

    /// Send an email, optionally with an attachment
    Email(EmailArgs),
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// Logger export to read
    path: PathBuf,

    /// Timestamp column
    #[arg(long)]
    index_col: Option<String>,

    /// Character encoding (utf-8, utf-16, latin1, ...)
    #[arg(long)]
    encoding: Option<String>,

    /// Fail instead of printing an empty summary when the file is unusable
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct MetricsArgs {
    /// Metrics file to create or merge into
    path: PathBuf,

    /// Row label; defaults to the current local time
    #[arg(long)]
    label: Option<String>,

    /// Metric value as name=value (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", required = true)]
    values: Vec<String>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Logger export the QC tests ran over
    #[arg(long)]
    data: PathBuf,

    /// Test results file written by the QC run
    #[arg(long)]
    test_results: Option<PathBuf>,

    /// Metrics file to include
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// HTML file to write
    #[arg(long, short)]
    output: PathBuf,

    #[arg(long)]
    title: Option<String>,

    /// Test-result graphic (repeatable)
    #[arg(long = "graphic")]
    graphics: Vec<PathBuf>,

    /// Custom graphic (repeatable)
    #[arg(long = "custom-graphic")]
    custom_graphics: Vec<PathBuf>,

    #[arg(long)]
    logo: Option<PathBuf>,

    /// Embed graphics in the HTML
    #[arg(long)]
    encode: bool,

    /// Notes source; defaults to the log file
    #[arg(long)]
    notes: Option<PathBuf>,

    #[arg(long)]
    index_col: Option<String>,

    #[arg(long)]
    encoding: Option<String>,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// Dashboard description (.json, otherwise TOML)
    #[arg(long)]
    spec: PathBuf,

    /// HTML file to write
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct EmailArgs {
    #[arg(long)]
    subject: String,

    /// Message body; HTML when it contains </html>
    #[arg(long, conflicts_with = "body_file", required_unless_present = "body_file")]
    body: Option<String>,

    /// Read the message body from a file
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// Recipient (repeatable)
    #[arg(long)]
    to: Vec<String>,

    /// Sender address
    #[arg(long)]
    from: Option<String>,

    /// File to attach
    #[arg(long)]
    attach: Option<PathBuf>,

    /// Mail host as host[:port]
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    username: Option<String>,

    #[arg(long, env = "QC_SMTP_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let loaded = match load_config(cli.global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("qc: {}", e);
            std::process::exit(ExitCode::ConfigError.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let mut log_config =
        LogConfig::from_sources(&loaded.config.logging, cli_level, cli.global.log_format);
    if let Some(path) = &cli.global.log_file {
        log_config.log_file = Some(path.clone());
    }
    if let Err(e) = init_logging(&log_config) {
        eprintln!("qc: cannot initialize logging: {}", e);
        std::process::exit(ExitCode::IoError.as_i32());
    }
    debug!(source = %loaded.source, path = ?loaded.path, "Configuration resolved");

    let config = &loaded.config;
    let result = match &cli.command {
        Commands::Read(args) => run_read(config, args),
        Commands::Metrics(args) => run_metrics(args),
        Commands::Report(args) => run_report(config, log_config.log_file.as_deref(), args),
        Commands::Dashboard(args) => run_dashboard(config, args),
        Commands::Email(args) => run_email(config, args),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(e) => {
            eprintln!("qc: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn print_json(value: &serde_json::Value) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_read(config: &QcConfig, args: &ReadArgs) -> Result<(), CommandError> {
    let index_col = args
        .index_col
        .as_deref()
        .unwrap_or(&config.report.index_column);
    let encoding = args.encoding.as_deref().or(config.report.encoding.as_deref());

    let table = if args.strict {
        try_read_campbell_scientific(&args.path, index_col, encoding)?
    } else {
        read_campbell_scientific(&args.path, index_col, encoding)
    };

    print_json(&json!({
        "path": args.path.display().to_string(),
        "rows": table.len(),
        "columns": table.columns(),
        "start": table.start().map(|t| format_timestamp(&t)),
        "end": table.end().map(|t| format_timestamp(&t)),
    }))
}

/// Parse `name=value`; the value accepts `NaN` like the metrics file does.
fn parse_assignment(raw: &str) -> Result<(String, f64), CommandError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CommandError::Args(format!("expected NAME=VALUE, got '{}'", raw)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::Args(format!("empty metric name in '{}'", raw)));
    }
    let value = parse_value(value.trim())
        .ok_or_else(|| CommandError::Args(format!("'{}' is not a number", value.trim())))?;
    Ok((name.to_string(), value))
}

fn run_metrics(args: &MetricsArgs) -> Result<(), CommandError> {
    let values = args
        .values
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let label = args
        .label
        .clone()
        .unwrap_or_else(|| MetricsTable::label_for(&Local::now().naive_local()));

    let mut metrics = MetricsTable::new();
    metrics.push_row(label.clone(), values);
    let merged = write_metrics(&args.path, &metrics)?;
    info!(path = %args.path.display(), label = %label, rows = merged.len(), "Metrics merged");

    print_json(&json!({
        "path": args.path.display().to_string(),
        "label": label,
        "rows": merged.len(),
        "columns": merged.columns(),
    }))
}

fn run_report(
    config: &QcConfig,
    log_file: Option<&Path>,
    args: &ReportArgs,
) -> Result<(), CommandError> {
    let index_col = args
        .index_col
        .as_deref()
        .unwrap_or(&config.report.index_column);
    let encoding = args.encoding.as_deref().or(config.report.encoding.as_deref());
    let data = read_campbell_scientific(&args.data, index_col, encoding);

    let test_results = match &args.test_results {
        Some(path) => read_test_results(path)?,
        None => TestResults::new(),
    };

    let mut options = config.report.options.clone();
    if let Some(title) = &args.title {
        options.title = title.clone();
    }
    if let Some(path) = &args.metrics {
        options.metrics = Some(read_metrics(path)?);
    }
    if !args.graphics.is_empty() {
        options.test_results_graphics = args.graphics.clone();
    }
    if !args.custom_graphics.is_empty() {
        options.custom_graphics = args.custom_graphics.clone();
    }
    if let Some(logo) = &args.logo {
        options.logo = Some(logo.clone());
    }
    options.encode |= args.encode;
    if let Some(notes) = args.notes.as_deref().or(log_file) {
        options.notes_path = Some(notes.to_path_buf());
    }

    let rows = data.len();
    let results = test_results.len();
    let run = MonitoringRun::new(data, test_results);
    write_monitoring_report(&args.output, &run, &options, &config.report.render)?;

    print_json(&json!({
        "output": args.output.display().to_string(),
        "rows": rows,
        "test_results": results,
    }))
}

fn load_dashboard_spec(path: &Path) -> Result<DashboardSpec, CommandError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CommandError::Input(format!("cannot read dashboard spec '{}': {}", path.display(), e))
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    } else {
        toml::from_str(&text).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| {
        CommandError::Input(format!("invalid dashboard spec '{}': {}", path.display(), e))
    })
}

fn run_dashboard(config: &QcConfig, args: &DashboardArgs) -> Result<(), CommandError> {
    let spec = load_dashboard_spec(&args.spec)?;
    write_dashboard(&args.output, &spec, &config.dashboard.render)?;

    print_json(&json!({
        "output": args.output.display().to_string(),
        "rows": spec.row_names.len(),
        "columns": spec.column_names.len(),
    }))
}

fn run_email(config: &QcConfig, args: &EmailArgs) -> Result<(), CommandError> {
    let body = match (&args.body, &args.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            CommandError::Input(format!("cannot read body '{}': {}", path.display(), e))
        })?,
        (None, None) => return Err(CommandError::Args("--body or --body-file is required".into())),
    };
    let sender = args
        .from
        .clone()
        .or_else(|| config.email.sender.clone())
        .ok_or_else(|| CommandError::Args("--from is required".into()))?;
    let recipients = if args.to.is_empty() {
        config.email.recipients.clone()
    } else {
        args.to.clone()
    };

    let mut message = EmailMessage::new(&args.subject, body, sender);
    message.recipients = recipients;
    message.attachment = args.attach.clone();

    let mut settings = SmtpSettings::new(
        args.host
            .clone()
            .or_else(|| config.email.host.clone())
            .unwrap_or_else(|| SmtpSettings::default().host),
    );
    settings.username = args.username.clone().or_else(|| config.email.username.clone());
    settings.password = args.password.clone();

    send_email(&message, &settings)?;

    print_json(&json!({
        "sent": true,
        "recipients": message.recipients,
    }))
}
