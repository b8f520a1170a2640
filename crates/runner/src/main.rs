use fixgate_runner::{RunnerConfig, build_paper_gateway};
use log::info;

fn print_help() {
    eprintln!(
        r#"Fixgate Runner - FIX trading gateway over an in-process paper exchange

USAGE:
    fixgate-runner [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run with defaults
    fixgate-runner

    # Run with config file
    fixgate-runner --config fixgate.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = if let Some(path) = config_path {
        info!("Loading configuration from: {}", path);
        RunnerConfig::from_file(&path)?
    } else {
        info!("Using default configuration");
        RunnerConfig::default()
    };
    info!("Sessions: {}", config.sessions.len());
    info!("Instrument: {}", config.strategy.instrument());
    info!("Journal: {}", config.strategy.journal_path.display());

    let gateway = build_paper_gateway(&config)?;
    gateway.start().await?;

    info!("Gateway ready, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    gateway.stop();
    Ok(())
}
