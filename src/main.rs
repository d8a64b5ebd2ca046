use clap::{Parser, ValueEnum};
use mlinput::config::{self, ExplicitFields};
use mlinput::error::{ConfigurationError, Error};
use mlinput::input::builder;
use mlinput::input::{InputCreationResult, NetworkRoute, SourceType};
use mlinput::medialive::client::MediaLiveClient;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

/// Create an AWS MediaLive RTMP push input
///
/// One creation call per invocation. The created input's id, state and
/// push endpoints are printed as JSON on stdout; diagnostics go to stderr.
/// Exit codes: 0 success, 2 configuration error, 3 validation error,
/// 4 remote request error.
#[derive(Parser, Debug)]
#[command(name = "mlinput", version, about, long_about = None)]
struct Args {
    /// Path to a JSON configuration document supplying any of the fields below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name for the RTMP input
    #[arg(long)]
    name: Option<String>,

    /// Network topology variant (required unless the config document supplies it)
    #[arg(long, value_enum)]
    source_type: Option<SourceType>,

    /// RTMP application name (primary stream path)
    #[arg(long)]
    app_name: Option<String>,

    /// RTMP application instance (primary stream path)
    #[arg(long)]
    app_instance: Option<String>,

    /// Application name for the backup destination (defaults to --app-name)
    #[arg(long)]
    secondary_app_name: Option<String>,

    /// Application instance for the backup destination (defaults to --app-instance)
    #[arg(long)]
    secondary_app_instance: Option<String>,

    /// CIDR block allowed to push (AWS source type)
    #[arg(long)]
    allowed_cidr: Option<String>,

    /// Subnet IDs, at least 2 (AWS_VPC source type)
    #[arg(long, num_args = 1..)]
    subnet_ids: Option<Vec<String>>,

    /// EC2 security group ID (AWS_VPC source type)
    #[arg(long)]
    security_group_id: Option<String>,

    /// IAM role ARN MediaLive uses to manage network interfaces (AWS_VPC source type)
    #[arg(long)]
    role_arn: Option<String>,

    /// Pre-provisioned MediaLive network ID (ON_PREMISES source type)
    #[arg(long)]
    network_id: Option<String>,

    /// Static IP address for the push destination (ON_PREMISES source type)
    #[arg(long)]
    static_ip: Option<String>,

    /// Network routes as CIDR[:GATEWAY] (ON_PREMISES source type)
    #[arg(long, num_args = 1.., value_parser = parse_network_route)]
    network_routes: Option<Vec<NetworkRoute>>,

    /// Tags as KEY=VALUE pairs
    #[arg(long, num_args = 1..)]
    tags: Vec<String>,

    /// AWS region (falls back to the document, environment, then us-east-2)
    #[arg(long)]
    region: Option<String>,

    /// Log level for diagnostics on stderr
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn parse_network_route(s: &str) -> Result<NetworkRoute, String> {
    s.parse()
}

impl Args {
    fn explicit_fields(&self) -> ExplicitFields {
        ExplicitFields {
            name: self.name.clone(),
            application_name: self.app_name.clone(),
            application_instance: self.app_instance.clone(),
            secondary_application_name: self.secondary_app_name.clone(),
            secondary_application_instance: self.secondary_app_instance.clone(),
            source_type: self.source_type,
            allowed_cidr: self.allowed_cidr.clone(),
            subnet_ids: self.subnet_ids.clone(),
            security_group_id: self.security_group_id.clone(),
            role_arn: self.role_arn.clone(),
            network_id: self.network_id.clone(),
            static_ip: self.static_ip.clone(),
            network_routes: self.network_routes.clone(),
            tags: self.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) {
    let Some(tracing_level) = level.to_tracing_level() else {
        return;
    };

    // stdout carries the JSON report, so diagnostics stay on stderr.
    // RUST_LOG overrides the flag when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(tracing_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.log_level);

    match run(args).await {
        Ok(result) => {
            // JSON pass-through on stdout so the tool can sit in a scripted chain
            match serde_json::to_string_pretty(&result) {
                Ok(report) => println!("{report}"),
                Err(e) => {
                    eprintln!("Error: failed to serialize report: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Resolve, validate, submit, extract - in that strict order.
async fn run(args: Args) -> Result<InputCreationResult, Error> {
    let document = match &args.config {
        Some(path) => {
            tracing::info!("Using configuration from {}", path.display());
            Some(config::load_document(path)?)
        }
        None => None,
    };

    let region = config::resolve_region(args.region.as_deref(), document.as_ref());
    let spec = config::resolve(args.explicit_fields(), document.as_ref())?;

    tracing::info!("Using region: {}", region);
    let client = MediaLiveClient::new(&region).await.map_err(|e| {
        ConfigurationError::new(format!("failed to initialize MediaLive client: {e:#}"))
    })?;

    builder::build_and_submit(&spec, &client).await
}
