use std::fs::File;
use std::sync::{Mutex, Once};

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

pub(crate) enum LogTarget {
    /// One-shot commands: warnings and errors on stderr.
    Stderr,
    /// Full-screen mode: anything on stderr would draw over the UI.
    File(File),
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub(crate) fn init_tracing(target: LogTarget) {
    TRACING_INIT.call_once(|| {
        let default_directive = match target {
            LogTarget::Stderr => "happypocket=warn",
            LogTarget::File(_) => "happypocket=info",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // A subscriber may already be set (tests); keep it.
        let _ = match target {
            LogTarget::Stderr => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .without_time()
                .try_init(),
            LogTarget::File(file) => fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init(),
        };
    });
}
