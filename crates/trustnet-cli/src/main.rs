//! `trustnet`: submit a question, context and answer to the evaluation
//! service and print the trust assessment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use trustnet_core::{normalize_value, EvaluationRequest, EvaluationResult};
use trustnet_runtime::config::parse_duration;
use trustnet_runtime::{ClientConfig, EvaluationSession, EvaluatorClient};

mod input;
mod render;

use input::{read_raw_response, RequestInput};
use render::{render_result, render_signals, Report};

#[derive(Parser)]
#[command(name = "trustnet", version, about = "Hallucination detection for LLM answers")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,

    /// Increase log verbosity (logs go to stderr; RUST_LOG overrides)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Cmd {
    /// Evaluate an answer against its context
    Evaluate {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        service: ServiceArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Fetch only the signal breakdown
    Signals {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        service: ServiceArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Normalize a saved raw service response without calling the service
    Normalize {
        #[command(flatten)]
        input: InputArgs,
        /// Raw JSON response file, or - for stdin
        #[arg(long)]
        raw: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct InputArgs {
    /// The question that was asked
    #[arg(long)]
    question: Option<String>,

    /// Reference context the answer should be grounded in
    #[arg(long)]
    context: Option<String>,

    /// The LLM-generated answer to evaluate
    #[arg(long)]
    answer: Option<String>,

    /// YAML or JSON file with question/context/answer (flags override it)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

impl InputArgs {
    fn load(self) -> Result<RequestInput> {
        let base = match &self.input {
            Some(path) => RequestInput::from_file(path)?,
            None => RequestInput::default(),
        };
        Ok(base.with_overrides(self.question, self.context, self.answer))
    }
}

#[derive(Args)]
struct ServiceArgs {
    /// Evaluation service base URL [env: TRUSTNET_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout, e.g. 15s [env: TRUSTNET_TIMEOUT]
    #[arg(long, value_parser = parse_duration)]
    timeout: Option<Duration>,
}

impl ServiceArgs {
    fn config(self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = self.api_url {
            config = config.with_api_url(url);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        debug!(api_url = %config.api_url, timeout = ?config.timeout, "resolved client config");
        config
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Evaluate {
            input,
            service,
            format,
        } => {
            let input = input.load()?;
            let client = EvaluatorClient::http(service.config())?;
            info!(endpoint = %client.config().endpoint("/evaluate"), "evaluating answer");
            let session = EvaluationSession::new(client);

            let result = session
                .submit(&input.question, &input.context, &input.answer)
                .await
                .map_err(|e| anyhow!(e.user_message()))?;

            print_result(&result, format)?;
        }
        Cmd::Signals {
            input,
            service,
            format,
        } => {
            let request = build_request(input.load()?)?;
            let client = EvaluatorClient::http(service.config())?;
            info!(endpoint = %client.config().endpoint("/signals"), "fetching signals");

            let signals = client
                .signals(&request)
                .await
                .map_err(|e| anyhow!(e.user_message()))?;

            match format {
                OutputFormat::Text => print!("{}", render_signals(&signals)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&signals)?),
            }
        }
        Cmd::Normalize { input, raw, format } => {
            let request = build_request(input.load()?)?;
            info!(path = %raw.display(), "normalizing saved response");
            let raw = read_raw_response(&raw)?;
            print_result(&normalize_value(&raw, &request), format)?;
        }
    }

    Ok(())
}

fn build_request(input: RequestInput) -> Result<EvaluationRequest> {
    EvaluationRequest::build(&input.question, &input.context, &input.answer)
        .map_err(|e| anyhow!(e.user_message()))
}

fn print_result(result: &EvaluationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_result(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Report::new(result))?),
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
