use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, plus the
/// library's debug output with `verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "warn,radio_dl=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}
