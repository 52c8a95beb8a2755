pub mod paths;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` directives are honored; `budget_cadence=info` is always added.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env();
        let filter = match "budget_cadence=info".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        };

        // A subscriber installed by the host application wins.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
