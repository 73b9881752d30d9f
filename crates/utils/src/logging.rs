use tracing_subscriber::{EnvFilter, prelude::*};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` is read as a bare level and applied to every workspace crate,
/// everything else stays at `warn`.
pub fn init(default_level: &str) {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    let filter_string = format!(
        "warn,server={level},agent={level},db={level},reasoning_client={level},agentctl={level},utils={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(&filter_string)
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,server={default_level}")));

    // A second init (tests, embedded use) is harmless.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .try_init();
}
