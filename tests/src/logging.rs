use std::sync::OnceLock;

use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INSTALL_GUARD: OnceLock<()> = OnceLock::new();

/// Install a global tracing subscriber filtered by `RUST_LOG`, once per
/// process.
pub fn init_tracing() {
    INSTALL_GUARD.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer()
            .with_timer(SystemTime)
            .with_target(false)
            .with_test_writer()
            .with_ansi(false)
            .compact();

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer);

        if subscriber.try_init().is_err() {
            // Global subscriber already installed elsewhere; ignore.
        }
    });
}
