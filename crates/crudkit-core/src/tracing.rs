use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Output format for [`init_tracing`]. Env var: `CRUD_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" | "pretty" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("CRUD_LOG_FORMAT")
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize stdout tracing for a service. `RUST_LOG` filters (default
/// `info`), `CRUD_LOG_FORMAT` picks JSON or text lines.
///
/// Calls after the first are ignored.
pub fn init_tracing() {
    let registry = tracing_subscriber::registry().with(env_filter());
    let _ = match LogFormat::from_env() {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    };
}

/// Text tracing routed through the test harness so output is captured per
/// test. Calls after the first are ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_test_writer())
        .try_init();
}
