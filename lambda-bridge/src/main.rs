//! lambda-bridge - AWS Lambda invocation and event binding from the command line
//!
//! `invoke` calls a function the way application code does through the adapter;
//! `bind` runs a trigger event through the binding lifecycle and prints what the
//! gateway callback receives. `serve` does the same for events delivered by the
//! Lambda runtime API.

mod commands;

use clap::{Parser, Subcommand};
use lambda_bridge_core::{ConfigOverrides, LambdaConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lambda-bridge")]
#[command(about = "Invoke AWS Lambda functions and bind trigger events", long_about = None)]
struct Args {
    /// AWS region (overrides config file and environment)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Maximum attempts per request made by the SDK client
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Custom Lambda endpoint, e.g. a local emulator
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Configuration file name, without extension
    #[arg(long, default_value = "lambda-bridge", env = "LAMBDA_BRIDGE_CONFIG")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LAMBDA_BRIDGE_LOG_LEVEL", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Invoke a Lambda function and print its response
    Invoke {
        /// Function name or ARN
        function_name: String,

        /// JSON event passed to the function
        #[arg(long, default_value = "{}")]
        payload: String,

        /// Wait for the function's response
        #[arg(long)]
        sync: bool,
    },

    /// Bind a trigger event and print the resulting auth record
    Bind {
        /// Event JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        event: String,
    },

    /// Run as a Lambda function, answering each event with its auth record
    Serve,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            region: self.region.clone(),
            max_retries: self.max_retries,
            endpoint_url: self.endpoint_url.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "lambda_bridge={0},lambda_bridge_core={0},lambda_bridge_lambda={0}",
                    args.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = LambdaConfig::load_from(&args.config)?.merge(args.overrides());
    info!(
        region = %config.region,
        max_retries = config.max_retries,
        endpoint_url = ?config.endpoint_url,
        "Loaded configuration"
    );

    let output = match args.command {
        Command::Invoke {
            function_name,
            payload,
            sync,
        } => commands::invoke(config, &function_name, &payload, sync).await?,
        Command::Bind { event } => commands::bind(&event).await?,
        Command::Serve => return commands::serve().await,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
