//! fit-assemble CLI - Command-line interface for fit-assembly
//!
//! Commands:
//! - assemble: Assemble decoded messages into an activity, monitoring day,
//!   HRV or sleep session
//! - validate: Report every message that fails its required-field contract
//! - schema: Print the required fields of each message kind

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fit_assembly::config::parse_utc_offset;
use fit_assembly::{
    DecodedFile, FitProcessor, InputError, MessageKind, ParseOptions, ParseTarget, VERSION,
};

/// fit-assemble - Turn decoded FIT messages into typed models
#[derive(Parser)]
#[command(name = "fit-assemble")]
#[command(version = VERSION)]
#[command(about = "Validate and assemble decoded FIT messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble one decoded file and print the outcome as JSON
    Assemble {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// What to assemble
        #[arg(long, default_value = "auto")]
        target: TargetArg,

        /// Wearer's UTC offset (+HH:MM, Z or "local"); defaults to $FIT_UTC_OFFSET, else the host offset
        #[arg(long)]
        utc_offset: Option<String>,

        /// Pretty-print the outcome
        #[arg(long)]
        pretty: bool,
    },

    /// Validate messages without assembling them
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Kinds to validate, as for assemble
        #[arg(long, default_value = "auto")]
        target: TargetArg,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the required fields of each message kind
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON object with "messages" and "errors", or a bare message array
    Json,
    /// Newline-delimited JSON (one message per line)
    Ndjson,
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    /// Infer from the anchor messages present
    Auto,
    Activity,
    Monitoring,
    Hrv,
    Sleep,
}

impl TargetArg {
    fn resolve(self, file: &DecodedFile) -> ParseTarget {
        match self {
            TargetArg::Auto => ParseTarget::detect(&file.messages),
            TargetArg::Activity => ParseTarget::Activity,
            TargetArg::Monitoring => ParseTarget::Monitoring,
            TargetArg::Hrv => ParseTarget::Hrv,
            TargetArg::Sleep => ParseTarget::Sleep,
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, filtered by RUST_LOG (default: warn)
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), FitCliError> {
    match cli.command {
        Commands::Assemble {
            input,
            input_format,
            target,
            utc_offset,
            pretty,
        } => cmd_assemble(&input, input_format, target, utc_offset.as_deref(), pretty),
        Commands::Validate {
            input,
            input_format,
            target,
            json,
        } => cmd_validate(&input, input_format, target, json),
        Commands::Schema { json } => cmd_schema(json),
    }
}

fn cmd_assemble(
    input: &Path,
    input_format: InputFormat,
    target: TargetArg,
    utc_offset: Option<&str>,
    pretty: bool,
) -> Result<(), FitCliError> {
    let file = read_decoded(input, input_format)?;
    let options = match utc_offset {
        Some("local") => ParseOptions::local(),
        Some(raw) => ParseOptions::new(parse_utc_offset(raw)?),
        None => ParseOptions::from_env()?,
    };

    let target = target.resolve(&file);
    tracing::debug!(parse_target = target.as_str(), messages = file.messages.len(), "assembling");

    let outcome = FitProcessor::new(options).parse_as(target, &file);
    let output = if pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{}", output);

    if outcome.is_error() {
        Err(FitCliError::ParseFailed(outcome.errors().len()))
    } else {
        Ok(())
    }
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    target: TargetArg,
    json: bool,
) -> Result<(), FitCliError> {
    let file = read_decoded(input, input_format)?;
    let target = target.resolve(&file);
    let errors = FitProcessor::default().validate(target, &file);

    let report = ValidationReport {
        target: target.as_str(),
        total_messages: file.messages.len(),
        consumed_messages: file
            .messages
            .iter()
            .filter(|m| m.message_kind().is_some_and(|k| target.consumes(k)))
            .count(),
        decoder_errors: file.errors.len(),
        errors: errors.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Target:            {}", report.target);
        println!("Total messages:    {}", report.total_messages);
        println!("Consumed messages: {}", report.consumed_messages);
        println!("Decoder errors:    {}", report.decoder_errors);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {}", err);
            }
        }
    }

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(FitCliError::ValidationFailed(report.errors.len()))
    }
}

fn cmd_schema(json: bool) -> Result<(), FitCliError> {
    if json {
        let schema: serde_json::Map<String, serde_json::Value> = MessageKind::ALL
            .iter()
            .map(|kind| (kind.as_str().to_string(), serde_json::json!(kind.required_fields())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        for kind in MessageKind::ALL {
            let required = kind.required_fields();
            if required.is_empty() {
                println!("{:<20} (none)", kind.as_str());
            } else {
                println!("{:<20} {}", kind.as_str(), required.join(", "));
            }
        }
    }
    Ok(())
}

fn read_decoded(input: &Path, format: InputFormat) -> Result<DecodedFile, FitCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(FitCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let file = match format {
        InputFormat::Json => DecodedFile::from_json(&input_data)?,
        InputFormat::Ndjson => DecodedFile::from_ndjson(&input_data)?,
    };
    Ok(file)
}

// Error types

#[derive(Debug)]
enum FitCliError {
    Io(io::Error),
    Input(InputError),
    Json(serde_json::Error),
    NoInput,
    ParseFailed(usize),
    ValidationFailed(usize),
}

impl From<io::Error> for FitCliError {
    fn from(e: io::Error) -> Self {
        FitCliError::Io(e)
    }
}

impl From<InputError> for FitCliError {
    fn from(e: InputError) -> Self {
        FitCliError::Input(e)
    }
}

impl From<serde_json::Error> for FitCliError {
    fn from(e: serde_json::Error) -> Self {
        FitCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<FitCliError> for CliError {
    fn from(e: FitCliError) -> Self {
        match e {
            FitCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            FitCliError::Input(e) => CliError {
                code: "INPUT_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input holds decoded messages as {\"kind\", \"fields\"} objects".to_string()),
            },
            FitCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            FitCliError::NoInput => CliError {
                code: "NO_INPUT".to_string(),
                message: "stdin is a terminal".to_string(),
                hint: Some("Pipe decoder output in or pass --input <file>".to_string()),
            },
            FitCliError::ParseFailed(count) => CliError {
                code: "PARSE_FAILED".to_string(),
                message: format!("Assembly failed with {} error(s)", count),
                hint: Some("Run 'fit-assemble validate' for details".to_string()),
            },
            FitCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} message(s) failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    target: &'static str,
    total_messages: usize,
    consumed_messages: usize,
    decoder_errors: usize,
    errors: Vec<String>,
}
