use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// `levels` is an env-filter directive such as `info` or `gelf_udp=debug`. Initializing
/// more than once is a no-op, since tests may do it repeatedly.
pub fn init(color: bool, json: bool, levels: &str) {
    let filter = EnvFilter::try_new(levels).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.with_ansi(color).try_init()
    };
}
