//! Nested values example
//!
//! Demonstrates how structs, sequences, maps, channels, functions, complex
//! numbers and lazy values flatten into dotted key paths.
//!
//! Run with: cargo run --example nested_values

use rust_color_handler::core::{Complex, LazyValue};
use rust_color_handler::loggable_struct;
use rust_color_handler::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;

struct Limits {
    cpu: u32,
    memory_mb: u32,
}

loggable_struct!(Limits { cpu, memory_mb });

struct Service {
    name: String,
    replicas: Vec<String>,
    limits: Limits,
    token: String,
}

impl Loggable for Service {
    fn shape(&self) -> Shape {
        Shape::structure()
            .field("Name", &self.name)
            .field("Replicas", &self.replicas)
            .field("Limits", &self.limits)
            .private_field("token", &self.token)
            .build()
    }
}

fn backoff(attempt: u32) -> u64 {
    100 << attempt.min(10)
}

fn main() -> Result<()> {
    let handler = ColorHandler::builder().min_level(LogLevel::Debug).build()?;
    let logger = Logger::new(handler);

    let service = Service {
        name: "api".to_string(),
        replicas: vec!["api-0".to_string(), "api-1".to_string()],
        limits: Limits {
            cpu: 2,
            memory_mb: 512,
        },
        token: "never printed".to_string(),
    };
    logger.info("Deployed", [Attr::any("svc", &service)])?;

    let mut status = BTreeMap::new();
    status.insert("api-0", "ready");
    status.insert("api-1", "starting");
    logger.info("Rollout", [Attr::any("status", &status)])?;

    let (tx, rx) = crossbeam_channel::bounded::<String>(16);
    let channel = (tx, rx);
    let retry: fn(u32) -> u64 = backoff;
    logger.debug(
        "Plumbing",
        [
            Attr::any("queue", &channel),
            Attr::any("retry", &retry),
            Attr::any("impedance", &Complex::new(13.0, 256.0)),
        ],
    )?;

    logger.info(
        "Request",
        [Attr::group(
            "req",
            [
                Attr::string("method", "POST"),
                Attr::duration("took", Duration::from_micros(3250)),
                Attr::new("digest", LazyValue::new(|| Value::from(format!("{:08x}", 0xdead_beef_u32)))),
            ],
        )],
    )?;

    logger.flush()
}
