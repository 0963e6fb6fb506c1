//! Interactive session.
//!
//! One `AnalysisClient` lives for the whole shell, so the active student
//! carries over between commands the same way it would within a single
//! page session. Errors are printed and the loop continues.

use crate::client::{confirmation, AnalysisClient};
use crate::error::ClientError;
use crate::render;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  student <name>     create a student and make it active
  use <id>           make an existing student active
  analyze <text>     analyze text for the active student
  feedback           show feedback for the active student
  history            show the error history of the active student
  whoami             show the active student ID
  help               show this message
  quit               leave the shell";

/// A parsed shell input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Student(String),
    Use(String),
    Analyze(String),
    Feedback,
    History,
    WhoAmI,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Split a line into a command word and its (untrimmed-inside) argument.
pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "student" | "create" => ShellCommand::Student(rest.to_string()),
        "use" => ShellCommand::Use(rest.to_string()),
        "analyze" | "a" => ShellCommand::Analyze(rest.to_string()),
        "feedback" => ShellCommand::Feedback,
        "history" => ShellCommand::History,
        "whoami" => ShellCommand::WhoAmI,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other.to_string()),
    }
}

/// Run the shell until `quit` or end of input.
pub async fn run(client: &AnalysisClient, base_url: &str) -> Result<()> {
    println!("GrammarBot shell connected to {}", base_url);
    println!("Type 'help' for commands.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(client)?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let command = parse_line(&line);
        debug!("shell command: {:?}", command);

        if command == ShellCommand::Quit {
            break;
        }

        if let Err(e) = execute(client, command).await {
            eprintln!("❌ {}", e);
        }
    }

    Ok(())
}

fn prompt(client: &AnalysisClient) -> Result<()> {
    match client.active_student_id() {
        Some(id) => print!("grammarbot[{}]> ", id),
        None => print!("grammarbot> "),
    }
    std::io::stdout().flush()?;
    Ok(())
}

/// Execute one command, printing its result.
pub async fn execute(client: &AnalysisClient, command: ShellCommand) -> Result<(), ClientError> {
    match command {
        ShellCommand::Student(name) => {
            let student = client.create_student(&name).await?;
            println!("✅ {}", confirmation(&student));
        }
        ShellCommand::Use(raw) => {
            let id = client.use_student(&raw)?;
            println!("Active student: {}", id);
        }
        ShellCommand::Analyze(text) => {
            let outcome = client.analyze_text(&text, None).await?;
            if outcome.rendered {
                let regions = client.regions();
                if let Some(analysis) = regions.analysis {
                    println!("\n{}", analysis);
                }
                if outcome.feedback_rendered {
                    if let Some(feedback) = regions.feedback {
                        println!("{}", feedback);
                    }
                }
            } else {
                println!("(result for student {} superseded by a newer analysis)", outcome.student_id);
            }
        }
        ShellCommand::Feedback => {
            let feedback = client.fetch_feedback(None).await?;
            println!("{}", render::render_feedback(client.format(), &feedback));
        }
        ShellCommand::History => {
            let entries = client.fetch_history(None).await?;
            let student_id = client.active_student_id().unwrap_or_default();
            println!(
                "{}",
                render::render_history(client.format(), student_id, &entries)
            );
        }
        ShellCommand::WhoAmI => match client.active_student_id() {
            Some(id) => println!("Active student: {}", id),
            None => println!("No active student."),
        },
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Unknown(word) => {
            println!("Unknown command '{}'. Type 'help' for commands.", word)
        }
        ShellCommand::Empty | ShellCommand::Quit => {}
    }
    Ok(())
}
