//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::StudentId;
use crate::render::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GrammarBot - grammar analysis client
///
/// Create students, submit text for grammar analysis, and read the
/// corrections and feedback returned by a GrammarBot server.
///
/// Examples:
///   grammarbot create-student Alice
///   grammarbot analyze --student-id 7 "She go to the store yesterday."
///   grammarbot analyze --name Bob --file essay.txt --format html -o result.html
///   grammarbot feedback 7
///   grammarbot shell
///   grammarbot --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the GrammarBot API
    ///
    /// Defaults to http://localhost:8000 or the value in .grammarbot.toml.
    #[arg(long, value_name = "URL", env = "GRAMMARBOT_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .grammarbot.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Output format (text, html, json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Write rendered output to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Show the submitted text above the correction
    #[arg(long, global = true)]
    pub show_original: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .grammarbot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a new student and print its ID
    CreateStudent {
        /// Display name of the student
        name: String,
    },

    /// Analyze text and print corrections and feedback
    Analyze {
        /// Text to analyze
        #[arg(required_unless_present = "file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, value_name = "FILE", conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Existing student ID to analyze for
        #[arg(short, long, value_name = "ID", conflicts_with = "name")]
        student_id: Option<String>,

        /// Create a student with this name first and analyze for it
        #[arg(short, long, value_name = "NAME")]
        name: Option<String>,
    },

    /// Print feedback for a student
    Feedback {
        /// Student ID
        student_id: StudentId,
    },

    /// Print the error history of a student
    History {
        /// Student ID
        student_id: StudentId,
    },

    /// Start an interactive session
    Shell {
        /// Start with this student already active
        #[arg(short, long, value_name = "ID")]
        student_id: Option<StudentId>,
    },
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("A command is required. Run with --help for usage.".to_string());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if matches!(self.command, Some(Command::Shell { .. })) && self.output.is_some() {
            return Err("--output cannot be used with the interactive shell".to_string());
        }

        if let Some(Command::Analyze {
            file: Some(ref path),
            ..
        }) = self.command
        {
            if !path.is_file() {
                return Err(format!("Input file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
