//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use narr_core::Settings;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides the config file)
    #[arg(long, env = "NARR_PORT")]
    pub port: Option<u16>,

    /// Host to bind to (overrides the config file)
    #[arg(long, env = "NARR_HOST")]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (default: ./narr-serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, mut settings: Settings) -> Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    let host = settings.server.host.clone();
    let port = settings.server.port;

    println!();
    println!(
        "  {} {}",
        "Narrative Structure Analyzer".cyan().bold(),
        "Web Server".bold()
    );
    println!();
    println!("  {}      http://{}:{}", "Page".green(), host, port);
    println!("  {}   http://{}:{}/analyze", "Analyze".green(), host, port);
    println!("  {}       http://{}:{}/api/structures", "API".green(), host, port);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    narr_web::run_server(settings).await?;

    Ok(())
}
