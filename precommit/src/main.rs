//! Pre-commit helper (§6): calls `POST /quality-gate/:repo/check` against a
//! running coderadar server and maps the gate result to an exit code a
//! git hook or CI step can act on without parsing JSON itself.
//!
//! Exit codes: `0` pass, `1` gate failed, `2` configuration missing, `3`
//! network error.

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use domain::GateResult;
use serde::Serialize;

const EXIT_PASS: u8 = 0;
const EXIT_FAILED: u8 = 1;
const EXIT_CONFIG_MISSING: u8 = 2;
const EXIT_NETWORK_ERROR: u8 = 3;

#[derive(Parser)]
#[command(name = "coderadar-precommit")]
#[command(about = "Run a coderadar quality-gate check before commit/push")]
struct Cli {
    /// Repository id as assigned by `/repos/submit`.
    #[arg(long, env = "CODERADAR_REPO_ID")]
    repo: i64,

    /// Base URL of the coderadar server.
    #[arg(long, env = "CODERADAR_URL", default_value = "http://localhost:8080")]
    server: String,

    /// Branch name to record on the resulting `CICDRun`.
    #[arg(long)]
    branch: Option<String>,

    /// Commit sha to record on the resulting `CICDRun`.
    #[arg(long)]
    commit: Option<String>,

    /// Request timeout in seconds before treating the server as unreachable.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Serialize)]
struct CheckRequest<'a> {
    branch: Option<&'a str>,
    commit: Option<&'a str>,
    triggered_by: &'static str,
}

#[derive(serde::Deserialize)]
struct Envelope {
    success: bool,
    data: Option<GateResult>,
    error: Option<EnvelopeError>,
}

#[derive(serde::Deserialize)]
struct EnvelopeError {
    message: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.server.trim().is_empty() {
        eprintln!("{}", "coderadar-precommit: --server/CODERADAR_URL is required".red());
        return ExitCode::from(EXIT_CONFIG_MISSING);
    }

    match run(&cli) {
        Ok(result) => {
            print_result(&result);
            if result.passed {
                ExitCode::from(EXIT_PASS)
            } else {
                ExitCode::from(EXIT_FAILED)
            }
        }
        Err(Error::Network(message)) => {
            eprintln!("{} {message}", "coderadar-precommit: network error:".red().bold());
            ExitCode::from(EXIT_NETWORK_ERROR)
        }
        Err(Error::Server(message)) => {
            eprintln!("{} {message}", "coderadar-precommit: server error:".red().bold());
            ExitCode::from(EXIT_NETWORK_ERROR)
        }
    }
}

enum Error {
    Network(String),
    Server(String),
}

fn run(cli: &Cli) -> Result<GateResult, Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(cli.timeout))
        .build()
        .map_err(|e| Error::Network(e.to_string()))?;

    let url = format!("{}/quality-gate/{}/check", cli.server.trim_end_matches('/'), cli.repo);
    let body = CheckRequest {
        branch: cli.branch.as_deref(),
        commit: cli.commit.as_deref(),
        triggered_by: "precommit",
    };

    let response = client.post(&url).json(&body).send().map_err(|e| Error::Network(e.to_string()))?;
    let status = response.status();
    let envelope: Envelope = response.json().map_err(|e| Error::Network(e.to_string()))?;

    if !status.is_success() || !envelope.success {
        let message = envelope.error.map(|e| e.message).unwrap_or_else(|| format!("HTTP {status}"));
        return Err(Error::Server(message));
    }

    envelope.data.ok_or_else(|| Error::Server("server returned no gate result".to_string()))
}

fn print_result(result: &GateResult) {
    let header = if result.passed { "QUALITY GATE PASSED".green().bold() } else { "QUALITY GATE FAILED".red().bold() };
    println!("{header}");
    println!("score: {:.1}", result.quality_score);
    for check in &result.checks {
        let mark = if check.passed { "✓".green() } else { "✗".red() };
        println!("  {mark} {}: {}", check.name, check.message);
    }
    println!("{}", result.summary);
    if result.block_merge {
        println!("{}", "this failure blocks the merge".red());
    }
}
