//! Speedtest Exporter - Main CLI Application
//!
//! Periodically measures internet bandwidth and latency via a speed test tool
//! and exposes the results as Prometheus metrics over HTTP.

use clap::Parser;
use speedtest_exporter::{
    cli::Cli,
    config::{display_config_summary, load_config},
    logging::Logger,
    metrics::MetricsRegistry,
    output::SummaryFormatter,
    runner::MeasurementRunner,
    scheduler::Scheduler,
    server,
    AppError, Result, PKG_NAME, VERSION,
};
use std::process;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Debug mode enabled");
        println!();
    }

    // Load and validate configuration
    let config = load_config(cli)?;

    if config.debug {
        println!("{}", display_config_summary(&config));
        println!();
    }

    let logger = Arc::new(Logger::new(PKG_NAME, &config)?);
    let registry = Arc::new(MetricsRegistry::new());
    let runner = MeasurementRunner::new(&config, Arc::clone(&logger));

    // Fail fast if the measurement tool is missing, before any socket work
    runner.check_tool().await?;

    if config.serve_metrics {
        let listener = server::bind(config.port).await?;
        println!(
            "Prometheus metrics available at: http://localhost:{}/metrics",
            config.port
        );
        logger.info(&format!("Metrics server listening on port {}", config.port));

        let server_registry = Arc::clone(&registry);
        let server_logger = Arc::clone(&logger);
        tokio::spawn(async move {
            if let Err(e) = server::serve(listener, server_registry).await {
                server_logger.error(&format!("Metrics server stopped: {}", e));
            }
        });
    } else {
        logger.info("Metrics server disabled (--no-prometheus)");
    }

    let scheduler = Scheduler::new(
        runner,
        registry,
        SummaryFormatter::new(config.enable_color),
        Arc::clone(&logger),
        config.interval(),
    );

    if config.single_shot {
        logger.info("Running in single-shot mode");
        return scheduler.run_single().await;
    }

    logger.info(&format!(
        "Starting measurement loop (every {} seconds)",
        config.interval_seconds
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    scheduler.run_continuous(shutdown_rx).await?;
    println!("Shutting down...");
    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Startup(_) => {
            eprintln!();
            eprintln!("The speed test tool could not be run:");
            eprintln!("  - Install it with 'pip install speedtest-cli'");
            eprintln!("  - Or point --command at an alternative binary");
            eprintln!("  - Verify it works by hand: 'speedtest-cli --version'");
        }
        AppError::ServerBind(_) => {
            eprintln!();
            eprintln!("Metrics server troubleshooting:");
            eprintln!("  - Another process may already be using the port");
            eprintln!("  - Pick a different port with --port");
            eprintln!("  - Check permissions for ports below 1024");
        }
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format (SPEEDTEST_* variables)");
            eprintln!("  - Interval must be a positive number of seconds");
            eprintln!("  - Run with --help to see all options");
        }
        _ => {}
    }
}
