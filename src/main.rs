use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use humanflow::config::{Credentials, DelayRange, ProxyConfig, RunConfig};
use humanflow::driver::{BrowserDriver, WebDriver, WebDriverConfig};
use humanflow::journey::{DriverFactory, JourneyRunner, RunOutcome};

#[derive(Parser)]
#[command(name = "humanflow")]
#[command(version = "0.1.0")]
#[command(about = "Human-paced browser journey runner for the SauceDemo shop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted shopping journey
    Run {
        /// Run the browser headless
        #[arg(long, default_value = "true")]
        headless: bool,

        /// Number of products to browse (1-6). Random 1-3 if omitted.
        #[arg(short, long)]
        products: Option<u8>,

        /// Login username (defaults to SAUCE_USERNAME or the demo account)
        #[arg(long)]
        username: Option<String>,

        /// Login password (defaults to SAUCE_PASSWORD or the demo account)
        #[arg(long)]
        password: Option<String>,

        /// Proxy server URL (defaults to PROXY_SERVER_URL)
        #[arg(long)]
        proxy: Option<String>,

        /// Proxy username
        #[arg(long)]
        proxy_username: Option<String>,

        /// Proxy password
        #[arg(long)]
        proxy_password: Option<String>,

        /// Output directory for screenshots and reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Fixed RNG seed for reproducible pacing and item picks
        #[arg(long)]
        seed: Option<u64>,

        /// Minimum pause between actions (seconds)
        #[arg(long, default_value = "1.0")]
        action_delay_min: f64,

        /// Maximum pause between actions (seconds)
        #[arg(long, default_value = "3.0")]
        action_delay_max: f64,

        /// Minimum pause between keystrokes (seconds)
        #[arg(long, default_value = "0.1")]
        typing_delay_min: f64,

        /// Maximum pause between keystrokes (seconds)
        #[arg(long, default_value = "0.3")]
        typing_delay_max: f64,

        /// Target site base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Write JSON/JUnit reports to the output directory
        #[arg(long, default_value = "true")]
        report: bool,
    },

    /// Generate report from a saved run JSON
    Report {
        /// Path to run results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            headless,
            products,
            username,
            password,
            proxy,
            proxy_username,
            proxy_password,
            output,
            seed,
            action_delay_min,
            action_delay_max,
            typing_delay_min,
            typing_delay_max,
            base_url,
            report,
        } => {
            let defaults = RunConfig::default();
            let config = RunConfig {
                credentials: Credentials {
                    username: username.unwrap_or(defaults.credentials.username),
                    password: password.unwrap_or(defaults.credentials.password),
                },
                headless,
                product_count: products,
                action_delay: DelayRange::new(action_delay_min, action_delay_max),
                typing_delay: DelayRange::new(typing_delay_min, typing_delay_max),
                proxy: match proxy {
                    Some(server) => Some(ProxyConfig {
                        server,
                        username: proxy_username,
                        password: proxy_password,
                    }),
                    None => defaults.proxy,
                },
                seed,
                output_dir: output.clone(),
                base_url: base_url.unwrap_or(defaults.base_url),
            };

            if let Err(err) = config.validate() {
                eprintln!("{} {}", "✗".red().bold(), err);
                std::process::exit(1);
            }

            println!(
                "{} Starting shopping journey on {}",
                "▶".green().bold(),
                config.base_url.cyan()
            );
            println!("  User: {}", config.credentials.username.cyan());
            match config.product_count {
                Some(count) => println!("  Products: {}", count.to_string().cyan()),
                None => println!("  Products: {}", "random (1-3)".cyan()),
            }
            if config.headless {
                println!("  Headless: {}", "Enabled".green());
            }
            if let Some(ref proxy) = config.proxy {
                println!("  Proxy: {}", proxy.server.yellow());
            }
            if let Some(seed) = config.seed {
                println!("  Seed: {}", seed.to_string().yellow());
            }
            println!("  Output: {}", output.display().to_string().cyan());

            // Ctrl+C finishes the current step, then the summary is emitted.
            let stop = Arc::new(AtomicBool::new(false));
            let stop_handler = stop.clone();
            ctrlc::set_handler(move || {
                println!(
                    "\n{} Interrupt received, finishing current step...",
                    "⏹".yellow()
                );
                stop_handler.store(true, Ordering::SeqCst);
            })?;

            let driver_config = WebDriverConfig {
                headless: config.headless,
                proxy: config.proxy.clone(),
                ..WebDriverConfig::default()
            };
            let factory: DriverFactory = Box::new(move || {
                let config = driver_config.clone();
                Box::pin(async move {
                    Ok(Box::new(WebDriver::new(config).await?) as Box<dyn BrowserDriver>)
                })
            });

            let runner = JourneyRunner::new(factory, config, stop);
            let run_report = runner.run().await?;

            if report {
                humanflow::report::write_run_artifacts(&run_report, &output)?;
            }

            let exit_code = match run_report.summary.outcome {
                RunOutcome::Completed => 0,
                RunOutcome::CompletedWithPartialFailures { .. } => 2,
                _ => 1,
            };
            std::process::exit(exit_code);
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            humanflow::report::generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
