//! PDF Protection Tool - CLI Interface
//! Author: kartik4091
//!
//! Password-protects a PDF with native encryption, or with an encrypted ZIP
//! archive of the original when native encryption is unavailable.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info};

use pdflock::config::ProtectConfig;
use pdflock::error::{Error, Result};
use pdflock::pdf_document::DocumentPreview;
use pdflock::report::{DirectorySink, ReportFormat, ReportFormatter, Reporter};
use pdflock::security::{self, RawOptions, RawPermissions};
use pdflock::utils::{init_logging, LogLevel};
use pdflock::{Pipeline, Session, SourceDocument};

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("quiet") {
        LogLevel::Error
    } else {
        matches
            .get_one::<String>("verbose")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    };
    if let Err(e) = init_logging(level) {
        eprintln!("{}", e);
    }

    match run(&matches).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    }
}

fn build_cli() -> Command {
    Command::new("pdflock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Password-protect PDF documents")
        .long_about(
            "Encrypts a PDF with open/owner passwords and permission flags. When native \
             encryption is unavailable, the original document is stored in a \
             password-protected ZIP archive instead (open password required).",
        )
        // Input/Output
        .arg(Arg::new("input")
            .short('i')
            .long("input")
            .value_name("FILE")
            .help("Input PDF file path")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output-dir")
            .value_name("DIR")
            .help("Directory for the protected file (defaults to the input's directory)"))
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Configuration file (JSON/YAML)"))
        // Passwords and permissions
        .arg(Arg::new("open-password")
            .long("open-password")
            .value_name("PASSWORD")
            .help("Password required to open the document"))
        .arg(Arg::new("owner-password")
            .long("owner-password")
            .value_name("PASSWORD")
            .help("Password required to change permissions"))
        .arg(Arg::new("allow-print")
            .long("allow-print")
            .action(ArgAction::SetTrue)
            .help("Allow full-quality printing"))
        .arg(Arg::new("allow-copy")
            .long("allow-copy")
            .action(ArgAction::SetTrue)
            .help("Allow copying text and images"))
        .arg(Arg::new("no-native")
            .long("no-native")
            .action(ArgAction::SetTrue)
            .help("Skip native PDF encryption and use the ZIP fallback"))
        // Output and reporting
        .arg(Arg::new("format")
            .short('f')
            .long("format")
            .value_parser(["text", "json"])
            .default_value("text")
            .help("Report format"))
        .arg(Arg::new("force")
            .long("force")
            .action(ArgAction::SetTrue)
            .help("Overwrite an existing protected file"))
        .arg(Arg::new("dry-run")
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Show the selected strategy without protecting anything"))
        // Logging
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .value_parser(LogLevel::VARIANTS)
            .default_value("info")
            .help("Set logging verbosity"))
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .help("Suppress all output except errors"))
}

/// Returns whether the protected file was produced.
async fn run(matches: &ArgMatches) -> Result<bool> {
    let input = PathBuf::from(
        matches
            .get_one::<String>("input")
            .ok_or_else(|| Error::ConfigError("Missing input file".into()))?,
    );
    if !input.exists() {
        return Err(Error::ConfigError(format!(
            "Input file does not exist: {}",
            input.display()
        )));
    }

    let config = load_config(matches, &input)?;
    let options = extract_options(matches);
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => ReportFormat::Json,
        _ => ReportFormat::PlainText,
    };

    let output_dir = config
        .output
        .directory
        .clone()
        .unwrap_or_else(|| default_output_dir(&input));
    let sink = DirectorySink::new(output_dir).force_overwrite(config.output.force_overwrite);

    let pipeline = Pipeline::new(config);

    if matches.get_flag("dry-run") {
        return dry_run(&pipeline, &input, &options).await;
    }

    let session = Session::new(pipeline, Reporter::new(Arc::new(sink)));
    let report = session.submit(&input, &options).await?;

    println!("{}", ReportFormatter::format(&report, format)?);
    Ok(report.is_success())
}

fn load_config(matches: &ArgMatches, input: &Path) -> Result<ProtectConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ProtectConfig::load(path)?,
        None => ProtectConfig::default(),
    };

    // Command line overrides
    if matches.get_flag("no-native") {
        config.native.enabled = false;
    }
    if matches.get_flag("force") {
        config.output.force_overwrite = true;
    }
    if let Some(dir) = matches.get_one::<String>("output") {
        config.output.directory = Some(PathBuf::from(dir));
    }
    config.validate()?;

    info!("📋 Input: {}", input.display());
    Ok(config)
}

fn extract_options(matches: &ArgMatches) -> RawOptions {
    RawOptions {
        open_password: matches
            .get_one::<String>("open-password")
            .cloned()
            .unwrap_or_default(),
        owner_password: matches
            .get_one::<String>("owner-password")
            .cloned()
            .unwrap_or_default(),
        permissions: RawPermissions {
            allow_print: matches.get_flag("allow-print"),
            allow_copy: matches.get_flag("allow-copy"),
        },
    }
}

fn default_output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

async fn dry_run(pipeline: &Pipeline, input: &Path, options: &RawOptions) -> Result<bool> {
    info!("🔍 Dry run mode - no files will be written");

    let request = match pipeline.prepare(options) {
        Ok(request) => request,
        Err(e) => {
            println!("{}", e);
            return Ok(false);
        }
    };

    let document = SourceDocument::load(input).await?;
    let preview = DocumentPreview::of(&document);
    println!("File:     {}", preview.name);
    println!("Pages:    {}", preview.page_count);

    let strategy = security::select(&request, pipeline.backend_available());
    println!("Strategy: {}", strategy);

    Ok(strategy.is_backend_call())
}
