use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use nginx_gateway::config::{load_gateway, ConfigError};
use nginx_gateway::health::{TcpProbe, ValidationStatus, Validator};
use nginx_gateway::observability::init_logging;

#[derive(Parser)]
#[command(name = "validate-env")]
#[command(about = "Validate backend hosts, reachability and route priorities in a .env file", long_about = None)]
struct Cli {
    /// Environment file describing the backend applications.
    #[arg(short, long, env = "GATEWAY_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Per-backend connection timeout in milliseconds.
    #[arg(short, long, default_value_t = 3000)]
    timeout_ms: u64,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let (apps, _) = match load_gateway(&cli.env_file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                ConfigError::ConfigNotFound { .. } => {
                    eprintln!("Copy the template first:");
                    eprintln!("  cp .env.example .env");
                }
                ConfigError::NoApplicationsFound => {
                    eprintln!("Add at least one application, for example:");
                    eprintln!("  MY_APP_HOST=192.168.1.100:3000");
                }
                ConfigError::Io { .. } => {}
            }
            return ExitCode::FAILURE;
        }
    };

    let validator = Validator::new(TcpProbe, Duration::from_millis(cli.timeout_ms));
    let report = validator.validate(&apps).await;

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report);
        if report.status() != ValidationStatus::Failed {
            println!();
            println!("Next steps:");
            println!("  nginx-gateway                 # generate nginx.conf");
            println!("  nginx-gateway --stdout        # preview without writing");
        }
    }

    ExitCode::from(report.exit_code())
}
