use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use proxy_probe::proxy::{CheckerConfig, LivenessChecker, ProxyParser, ProxyRecord};
use std::path::PathBuf;
use std::time::Duration;

/// A proxy string parser and liveness checker
#[derive(Parser)]
#[command(name = "proxy-probe")]
#[command(about = "A proxy string parser and liveness checker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse proxies and print their canonical form
    Parse {
        /// Proxies in protocol://[user:pass@]host:port form
        proxies: Vec<String>,
        /// File containing proxies (one per line)
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,
    },
    /// Check proxies one at a time by sending a test request through each
    Check {
        /// Proxies in protocol://[user:pass@]host:port form
        proxies: Vec<String>,
        /// File containing proxies (one per line)
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,
        /// Timeout in seconds
        #[arg(long, default_value = "15")]
        timeout: u64,
        /// URL to test proxies against
        #[arg(long, default_value = "https://httpbin.org/get")]
        test_url: String,
        /// User agent sent with the test request
        #[arg(long)]
        user_agent: Option<String>,
        /// Do not follow redirects
        #[arg(long)]
        no_redirects: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let parser = ProxyParser::default();

    match cli.command {
        Commands::Parse { proxies, file } => {
            let records = load_records(&parser, &proxies, file)?;

            for record in records.iter().filter(|r| r.is_usable()) {
                println!("{}", record);
            }
            println!(
                "Parsed {} usable of {} proxies",
                records.iter().filter(|r| r.is_usable()).count(),
                records.len()
            );
        }
        Commands::Check {
            proxies,
            file,
            timeout,
            test_url,
            user_agent,
            no_redirects,
        } => {
            let records = load_records(&parser, &proxies, file)?;
            if records.is_empty() {
                bail!("No proxies given. Pass them as arguments or with --file");
            }

            let mut config = CheckerConfig::new()
                .with_timeout(Duration::from_secs(timeout))
                .with_test_url(test_url)
                .with_follow_redirects(!no_redirects);
            if let Some(user_agent) = user_agent {
                config = config.with_user_agent(user_agent);
            }

            println!("Checking {} proxies, timeout: {}s", records.len(), timeout);
            println!("Test URL: {}", config.test_url);
            println!();

            let checker = LivenessChecker::with_config(config);
            let mut working = Vec::new();
            let mut failed = 0;
            for record in &records {
                let report = checker.check(record).await;
                if report.is_working() {
                    working.push(report);
                } else {
                    failed += 1;
                }
            }

            println!("Results: {} good, {} bad", working.len(), failed);

            if !working.is_empty() {
                println!("\nWorking proxies:");
                for report in &working {
                    if let Some(time) = report.response_time_ms {
                        println!("  {} ({}ms)", report.proxy, time);
                    }
                }
            }

            if working.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Proxies given on the command line, followed by those read from `file`
fn load_records(
    parser: &ProxyParser,
    proxies: &[String],
    file: Option<PathBuf>,
) -> Result<Vec<ProxyRecord>> {
    let mut records: Vec<ProxyRecord> = proxies.iter().map(|p| parser.parse(p)).collect();

    if let Some(path) = file {
        let from_file = parser.parse_file(&path)?;
        log::info!("Loaded {} proxies from {:?}", from_file.len(), path);
        records.extend(from_file);
    }

    Ok(records)
}
