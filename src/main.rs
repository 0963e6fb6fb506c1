//! GrammarBot - grammar analysis client
//!
//! A CLI tool that creates students on a GrammarBot server, submits
//! text for grammar analysis, and renders the returned corrections and
//! feedback.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, backend rejection, etc.)
//!   2 - Input rejected before any request was sent

mod api;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod render;
mod session;
mod shell;

use anyhow::{Context, Result};
use api::HttpApi;
use chrono::Utc;
use cli::{Args, Command};
use client::{confirmation, AnalysisClient};
use config::{Config, CONFIG_FILE_NAME};
use error::ClientError;
use render::OutputFormat;
use session::SessionState;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    debug!("GrammarBot v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .grammarbot.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to point at your GrammarBot server.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so rendered output on stdout can be piped.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the selected command. Returns the process exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let api = HttpApi::new(config.http_api_config())?;
    let base_url = api.base_url().to_string();
    info!("Using GrammarBot API at {}", base_url);

    let client = AnalysisClient::new(Arc::new(api))
        .with_format(config.output.format)
        .with_options(config.render_options())
        .with_progress(show_progress(
            args.quiet,
            config.output.format,
            args.output.as_deref(),
        ));

    let command = match args.command.clone() {
        Some(command) => command,
        None => return Ok(1),
    };

    let outcome = match command {
        Command::CreateStudent { name } => client.create_student(&name).await.map(|student| {
            println!("✅ {}", confirmation(&student));
        }),
        Command::Analyze {
            text,
            file,
            student_id,
            name,
        } => {
            let text = read_text(text, file.as_deref())?;
            let result = analyze(
                &client,
                args.quiet,
                &text,
                student_id.as_deref(),
                name.as_deref(),
            )
            .await;
            match result {
                Ok((analysis, feedback)) => {
                    emit(
                        args.output.as_deref(),
                        client.format(),
                        &analysis,
                        feedback.as_deref(),
                    )?;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Feedback { student_id } => {
            match client.fetch_feedback(Some(student_id)).await {
                Ok(_) => {
                    let feedback = client.regions().feedback.unwrap_or_default();
                    emit(args.output.as_deref(), client.format(), &feedback, None)?;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::History { student_id } => match client.fetch_history(Some(student_id)).await {
            Ok(entries) => {
                let rendered = render::render_history(client.format(), student_id, &entries);
                emit(args.output.as_deref(), client.format(), &rendered, None)?;
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::Shell { student_id } => {
            let client = match student_id {
                Some(id) => client.with_session(SessionState::with_student(id)),
                None => client,
            };
            shell::run(&client, &base_url).await?;
            Ok(())
        }
    };

    match outcome {
        Ok(()) => Ok(0),
        Err(e) => Ok(report_failure(&e)),
    }
}

/// Create a student if asked, analyze, and return both rendered regions.
async fn analyze(
    client: &AnalysisClient,
    quiet: bool,
    text: &str,
    student_id: Option<&str>,
    name: Option<&str>,
) -> Result<(String, Option<String>), ClientError> {
    if let Some(name) = name {
        let student = client.create_student(name).await?;
        if !quiet {
            eprintln!("✅ {}", confirmation(&student));
        }
    }

    let outcome = client.analyze_text(text, student_id).await?;
    debug!("Analyzed text for student {}", outcome.student_id);

    let regions = client.regions();
    let feedback = if outcome.feedback_rendered {
        regions.feedback
    } else {
        None
    };
    Ok((regions.analysis.unwrap_or_default(), feedback))
}

/// The spinner stays off in quiet mode and when HTML goes to stdout.
fn show_progress(quiet: bool, format: OutputFormat, output: Option<&Path>) -> bool {
    !quiet && !(format == OutputFormat::Html && output.is_none())
}

/// Print a user-facing failure and pick the exit code.
fn report_failure(err: &ClientError) -> i32 {
    debug!("Action '{}' failed: {:?}", err.action(), err);
    eprintln!("❌ {}", err);
    err.exit_code()
}

/// Resolve the text to analyze from the argument or a file.
fn read_text(text: Option<String>, file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => Ok(text.unwrap_or_default()),
    }
}

/// Write rendered regions to stdout or to the `--output` file.
fn emit(
    output: Option<&Path>,
    format: OutputFormat,
    primary: &str,
    feedback: Option<&str>,
) -> Result<()> {
    let content = match (output, format) {
        (Some(_), OutputFormat::Html) => render::html::document(primary, feedback, Utc::now()),
        (_, OutputFormat::Json) => json_document(primary, feedback),
        _ => match feedback {
            Some(feedback) => format!("{}\n{}", primary.trim_end(), feedback),
            None => primary.to_string(),
        },
    };

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            println!("✅ Output saved to: {}", path.display());
        }
        None => {
            println!("{}", content.trim_end());
        }
    }
    Ok(())
}

/// Combine JSON regions into one document.
///
/// A lone region is written as is; with feedback present the output is
/// `{"analysis": ..., "feedback": ...}`.
fn json_document(primary: &str, feedback: Option<&str>) -> String {
    let Some(feedback) = feedback else {
        return primary.to_string();
    };

    let region = |raw: &str| {
        serde_json::from_str::<serde_json::Value>(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
    };
    let document = serde_json::json!({
        "analysis": region(primary),
        "feedback": region(feedback),
    });
    serde_json::to_string_pretty(&document).unwrap_or_default()
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
