use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or unparsable. Lookup failures are already
/// shown to the user, so only internal errors are logged by default.
const DEFAULT_DIRECTIVES: &str = "error";

/// Install the global subscriber. Diagnostics go to stderr; `RUST_LOG` overrides
/// the default level, e.g. `RUST_LOG=weather_core=debug`.
pub fn init() {
    let env_filter = filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
