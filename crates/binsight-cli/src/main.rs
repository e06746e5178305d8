#![forbid(unsafe_code)]

use binsight_export::{to_csv, to_json};
use binsight_model::{now_iso, validate, RawSubmission};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

mod client;
mod prefs;

use client::SubmissionClient;
use prefs::Preferences;

const EXIT_SUCCESS: u8 = 0;
const EXIT_VALIDATION: u8 = 3;
const EXIT_DEPENDENCY: u8 = 4;

#[derive(Parser)]
#[command(name = "binsight")]
#[command(about = "Survey submission operations CLI")]
struct Cli {
    /// Base URL of the survey server.
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    base_url: String,
    #[arg(long, global = true, env = "SURVEY_ADMIN_USER")]
    admin_user: Option<String>,
    #[arg(long, global = true, env = "SURVEY_ADMIN_PASS")]
    admin_pass: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a raw submission file locally, then send it.
    Submit {
        #[arg(long)]
        input: PathBuf,
    },
    /// Fetch all stored submissions and print them as JSON.
    List,
    /// Fetch all stored submissions and write a JSON export file.
    ExportJson {
        #[arg(long, default_value = "survey_submissions.json")]
        out: PathBuf,
    },
    /// Fetch all stored submissions and write a CSV export file.
    ExportCsv {
        #[arg(long, default_value = "survey_submissions.csv")]
        out: PathBuf,
    },
    /// Delete every stored submission.
    Clear {
        /// Required; clearing is irreversible.
        #[arg(long)]
        yes: bool,
    },
    /// Delete one stored submission.
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Show or change persisted client preferences.
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
}

#[derive(Subcommand)]
enum PrefsCommand {
    /// The "write a JSON export after each submit" toggle.
    AutoJson {
        #[arg(value_parser = ["on", "off", "show"])]
        value: String,
    },
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    let admin = match (cli.admin_user.clone(), cli.admin_pass.clone()) {
        (Some(user), Some(pass)) => Some((user, pass)),
        _ => None,
    };
    let client = SubmissionClient::new(cli.base_url.clone(), admin);
    let prefs = Preferences::new(Preferences::default_path());

    let code = match run(&cli.command, &client, &prefs) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            EXIT_DEPENDENCY
        }
    };
    ProcessExitCode::from(code)
}

fn run(
    command: &Commands,
    client: &SubmissionClient,
    prefs: &Preferences,
) -> Result<u8, String> {
    match command {
        Commands::Submit { input } => submit(input, client, prefs),
        Commands::List => {
            let records = client.fetch_all().map_err(|e| e.to_string())?;
            println!("{}", to_json(&records).map_err(|e| e.to_string())?);
            Ok(EXIT_SUCCESS)
        }
        Commands::ExportJson { out } => {
            let records = client.fetch_all().map_err(|e| e.to_string())?;
            let json = to_json(&records).map_err(|e| e.to_string())?;
            fs::write(out, json).map_err(|e| e.to_string())?;
            println!("wrote {} submissions to {}", records.len(), out.display());
            Ok(EXIT_SUCCESS)
        }
        Commands::ExportCsv { out } => {
            let records = client.fetch_all().map_err(|e| e.to_string())?;
            fs::write(out, to_csv(&records)).map_err(|e| e.to_string())?;
            println!("wrote {} submissions to {}", records.len(), out.display());
            Ok(EXIT_SUCCESS)
        }
        Commands::Clear { yes } => {
            if !yes {
                return Err(
                    "clearing deletes all server-stored submissions; pass --yes to continue"
                        .to_string(),
                );
            }
            client.clear().map_err(|e| e.to_string())?;
            println!("submissions cleared");
            Ok(EXIT_SUCCESS)
        }
        Commands::Delete { id } => {
            client.delete(id).map_err(|e| e.to_string())?;
            println!("deleted {id}");
            Ok(EXIT_SUCCESS)
        }
        Commands::Prefs { command } => match command {
            PrefsCommand::AutoJson { value } => {
                match value.as_str() {
                    "on" => prefs.set_auto_json(true).map_err(|e| e.to_string())?,
                    "off" => prefs.set_auto_json(false).map_err(|e| e.to_string())?,
                    _ => {}
                }
                println!(
                    "auto-json: {}",
                    if prefs.auto_json() { "on" } else { "off" }
                );
                Ok(EXIT_SUCCESS)
            }
        },
    }
}

fn submit(
    input: &PathBuf,
    client: &SubmissionClient,
    prefs: &Preferences,
) -> Result<u8, String> {
    let raw_text = fs::read_to_string(input)
        .map_err(|e| format!("cannot read {}: {e}", input.display()))?;
    let raw: RawSubmission = serde_json::from_str(&raw_text)
        .map_err(|e| format!("{} is not a submission: {e}", input.display()))?;

    let record = raw.normalize(&now_iso());
    let issues = validate(&record);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("- {issue}");
        }
        return Ok(EXIT_VALIDATION);
    }

    let id = client.submit(&record).map_err(|e| e.to_string())?;
    println!("submitted as {id}");

    if prefs.auto_json() {
        let records = client.fetch_all().map_err(|e| e.to_string())?;
        let json = to_json(&records).map_err(|e| e.to_string())?;
        let out = PathBuf::from("survey_submissions.json");
        fs::write(&out, json).map_err(|e| e.to_string())?;
        println!("wrote {} submissions to {}", records.len(), out.display());
    }
    Ok(EXIT_SUCCESS)
}
