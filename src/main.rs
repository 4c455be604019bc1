use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use orbita::config::Config;
use orbita::logging::init_tracing;
use orbita::router::{Router, VisitOptions, VisitOutcome};
use orbita::transport::Method;

#[derive(Parser)]
#[command(name = "orbita")]
#[command(about = "Drive Orbita page visits from the command line", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/orbita/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform one visit and print the resulting page as JSON
    Visit(VisitArgs),
}

#[derive(clap::Args)]
struct VisitArgs {
    /// Page URL, absolute or relative to the base URL
    url: String,

    /// HTTP method (get, post, put, patch, delete)
    #[arg(long, default_value = "get")]
    method: Method,

    /// Request data as a JSON object
    #[arg(long)]
    data: Option<String>,

    /// Components to reload (partial reload)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    #[arg(long)]
    preserve_state: bool,

    #[arg(long)]
    preserve_scroll: bool,

    /// Extra request header, `Name: value`. Repeatable.
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
        config.validate()?;
    }

    let router = Router::from_settings(&config.client).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Visit(args) => visit(&router, args).await,
    }
}

async fn visit(router: &Router, args: VisitArgs) -> Result<bool> {
    let mut options = VisitOptions::default()
        .with_method(args.method)
        .with_only(args.only)
        .with_preserve_state(args.preserve_state)
        .with_preserve_scroll(args.preserve_scroll);

    if let Some(raw) = args.data {
        let Value::Object(data) = serde_json::from_str::<Value>(&raw).context("--data is not valid JSON")?
        else {
            bail!("--data must be a JSON object");
        };
        options = options.with_data(data);
    }
    for (name, value) in args.headers {
        options = options.with_header(name, value);
    }

    let outcome = router.navigate(&args.url, options).await;
    let (report, ok) = match outcome {
        VisitOutcome::Succeeded(page) => (serde_json::to_value(&page)?, true),
        VisitOutcome::Failed(err) => (
            json!({
                "status": err.status(),
                "error": err.to_string(),
                "errors": err.error_map(),
            }),
            false,
        ),
        VisitOutcome::Cancelled => (json!({ "cancelled": true }), false),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ok)
}
