use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr `fmt` subscriber once.
///
/// `RUST_LOG` wins when set; otherwise finsight crates log at `info`, or
/// `debug` with `--verbose`.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let default = if verbose { "finsight=debug" } else { "finsight=info" };
        let filter = match std::env::var("RUST_LOG") {
            Ok(spec) if !spec.trim().is_empty() => EnvFilter::new(spec),
            _ => EnvFilter::new(default),
        };

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
