//! File logging example
//!
//! Demonstrates writing colored records to an append-only file, and handler
//! configuration loaded from JSON.
//!
//! Run with: cargo run --example file_logging
//! Then view with: less -R application.log

use rust_color_handler::prelude::*;
use rust_color_handler::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Color Handler - File Logging Example ===\n");

    let config = HandlerConfig::from_json(
        r#"{"timestamp_format":"Iso8601","min_level":"Debug"}"#,
    )?;
    println!("1. Loaded config: {}", config.to_json()?);

    let handler = ColorHandler::from_config(SharedSink::file("application.log")?, &config)?;
    let logger = Logger::new(handler.clone());

    println!("2. Writing records to application.log");
    info!(logger, "Application started")?;
    logger.debug("Loading configuration...", [])?;

    for i in 1..=5 {
        info!(logger, "Processing item {}/5", i; "item" => i)?;
        if i == 3 {
            warn!(logger, "Item took longer than expected"; "item" => i)?;
        }
    }

    logger.flush()?;

    let metrics = handler.metrics();
    println!(
        "3. Wrote {} records ({} bytes), {} failed",
        metrics.records_handled(),
        metrics.bytes_written(),
        metrics.records_failed()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
