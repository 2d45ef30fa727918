//! Loopwalk terminal host entry point.

use std::error::Error;

use loopwalk_cli::config::{Config, LogFormat};
use loopwalk_cli::host::{Flow, Host};
use loopwalk_cli::state::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("Starting Loopwalk terminal host");

    let state = AppState::from_config(&config).await?;
    let mut host = Host::new(state);
    print_lines(host.start().await);

    let mut keys = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("{}", host.prompt());
        let Some(key) = keys.next_line().await? else {
            break;
        };
        let (flow, lines) = host.press(&key).await;
        print_lines(lines);
        if flow == Flow::Quit {
            break;
        }
    }

    tracing::info!("Loopwalk terminal host stopped");
    Ok(())
}
