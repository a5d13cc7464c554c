//! Basic handler usage example
//!
//! Demonstrates colored console output at each level, bound attributes and
//! groups, and changing the minimum level at runtime.
//!
//! Run with: cargo run --example basic_usage

use rust_color_handler::prelude::*;
use rust_color_handler::{attrs, debug, error, info, warn};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Color Handler - Basic Usage Example ===\n");

    let handler = ColorHandler::builder()
        .sink(SharedSink::stdout())
        .min_level(LogLevel::Debug)
        .build()?;
    let level = handler.level_var().clone();
    let logger = Logger::new(handler);

    println!("1. Logging at different levels:");
    debug!(logger, "This is a debug message")?;
    info!(logger, "This is an info message")?;
    warn!(logger, "This is a warning message")?;
    error!(logger, "This is an error message")?;

    println!("\n2. Attributes and groups:");
    info!(logger, "Request handled"; "status" => 200, "took" => Duration::from_millis(42))?;

    let http = logger.with_group("http").with(attrs!["method" => "GET"]);
    http.info("Served", [Attr::string("path", "/index.html"), Attr::bool("cached", true)])?;

    println!("\n3. Raising the minimum level to WARN:");
    level.set(LogLevel::Warn);
    debug!(logger, "Debug message (hidden)")?;
    info!(logger, "Info message (hidden)")?;
    warn!(logger, "Warning message (visible)")?;

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
