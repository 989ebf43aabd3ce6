//! Logging setup for the console binary.

/// Installs a stderr `fmt` subscriber; `RUST_LOG` overrides the `info`
/// default.
pub fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
