//! nginx gateway configuration generator.
//!
//! ```text
//!   .env ──▶ config ──▶ routing ──▶ render ──▶ nginx.conf
//!            (apps,     (priority,  (upstreams,
//!             globals)   protocol)   locations)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use nginx_gateway::config::{load_gateway, AppConfig, ConfigError, GatewaySettings};
use nginx_gateway::observability::init_logging;
use nginx_gateway::render::{render_config, write_config};

#[derive(Parser)]
#[command(name = "nginx-gateway")]
#[command(about = "Generate an nginx reverse-proxy configuration from a .env file", long_about = None)]
struct Cli {
    /// Environment file describing the backend applications.
    #[arg(short, long, env = "GATEWAY_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Where to write the generated configuration.
    #[arg(short, long, env = "GATEWAY_OUTPUT", default_value = "nginx.conf")]
    output: PathBuf,

    /// Print the configuration to stdout instead of writing it.
    #[arg(long)]
    stdout: bool,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let (apps, settings) = match load_gateway(&cli.env_file) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_config_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let config = render_config(&apps, &settings, Utc::now());

    if cli.stdout {
        print!("{}", config);
        return ExitCode::SUCCESS;
    }

    print_summary(&apps, &settings);

    if let Err(e) = write_config(&cli.output, &config) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    println!();
    println!("nginx configuration generated");
    println!("File location: {}", cli.output.display());
    ExitCode::SUCCESS
}

fn print_summary(apps: &[AppConfig], settings: &GatewaySettings) {
    println!("Applications found:");
    for app in apps {
        println!("  * {}", app.name);
        println!("    Host:     {}", app.host);
        println!("    Protocol: {}", app.protocol());
        if app.routes.is_empty() {
            println!("    Routes:   default (catch-all)");
        } else {
            println!("    Routes:   {}", app.routes.join(", "));
        }
        println!("    Priority: {}", app.priority);
    }

    println!();
    if settings.path_rewrite {
        println!("Path rewrite: ENABLED (strip base path and fix redirects)");
    } else {
        println!("Path rewrite: DISABLED (backend must handle the full path)");
    }
}

fn print_config_error(e: &ConfigError) {
    eprintln!("Error: {}", e);
    match e {
        ConfigError::ConfigNotFound { .. } => {
            eprintln!("Create it from the template first:");
            eprintln!("  cp .env.example .env");
        }
        ConfigError::NoApplicationsFound => {
            eprintln!("Add at least one application, for example:");
            eprintln!("  MY_APP_HOST=192.168.1.100:3000");
            eprintln!("  MY_APP_ROUTES=/api,/admin");
        }
        ConfigError::Io { .. } => {}
    }
}
