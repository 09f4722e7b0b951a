//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Crates whose diagnostics the CLI surfaces.
const CRATES: &[&str] = &["rocket_cli", "rocket_cart", "rocket_storage", "rocket_data"];

/// Default filter directive for a verbosity level.
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    let mut directive = String::from("warn");
    for name in CRATES {
        directive.push_str(&format!(",{}={}", name, level));
    }
    directive
}

/// Install the global subscriber. Logs go to stderr, as JSON lines when
/// `json` is set. `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose);

    // A second init (tests) keeps the first subscriber.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
