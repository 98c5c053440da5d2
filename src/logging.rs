//! Tracing setup for the `tftpeer` binary. The codec itself never logs.

/// Installs a stderr subscriber. Logs at INFO and above unless `RUST_LOG`
/// says otherwise, e.g. `RUST_LOG=tftpeer=debug`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
