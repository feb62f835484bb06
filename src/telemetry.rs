use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a compact `tracing` subscriber for the embedding application.
///
/// `RUST_LOG` wins over the built-in filter. Fails when a global subscriber
/// is already set.
pub fn init_logger(verbose: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let default_filter = if verbose {
        "whs_index=debug,info"
    } else {
        "whs_index=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init()
}
