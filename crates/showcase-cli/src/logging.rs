use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise `--quiet` selects `error`,
/// `--verbose` selects `debug` and the default is `info`.
pub fn init(verbose: bool, quiet: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    // A subscriber may already be installed (e.g. in tests); keep it.
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}

fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false, false), "info");
        assert_eq!(default_level(true, false), "debug");
        assert_eq!(default_level(false, true), "error");
        assert_eq!(default_level(true, true), "error");
    }

    #[test]
    fn test_init_twice() {
        init(false, false);
        init(true, false);
        tracing::info!("logging initialised");
    }
}
