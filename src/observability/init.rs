//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a global subscriber that writes formatted events to stderr.
///
/// `trace_level` accepts any `EnvFilter` directive (`"debug"`,
/// `"zosconnect_fslogger=trace"`, ...) and is ignored when `RUST_LOG` is set.
/// An invalid directive falls back to `"info"`.
///
/// Idempotent: only the first call in a process installs a subscriber, and a
/// subscriber installed by the host is left in place.
///
/// # Example
///
/// ```rust
/// use zosconnect_fslogger::observability::init_tracing;
/// use zosconnect_fslogger::InterceptorConfig;
///
/// let config = InterceptorConfig::new("api1", "/var/log/zosconnect");
/// init_tracing(config.trace_level.as_deref());
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(trace_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(trace_level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true));

    let _ = subscriber.try_init();
}
