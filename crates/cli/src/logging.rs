//! Console logging for one-shot commands.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn default_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the `-v` default.
/// Also forwards `log` records emitted by the engine crate.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbosity).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
