//! Log subscriber setup for binaries.

use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_output: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Install the global log subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Output always goes to
/// stderr, leaving stdout to the program. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) {
    if subscriber(config, std::io::stderr).try_init().is_err() {
        tracing::debug!("Log subscriber already installed");
    }
}

fn subscriber<W>(config: &LogConfig, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let output: Box<dyn Layer<Registry> + Send + Sync> = if config.json_output {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_writer(writer).boxed()
    };

    tracing_subscriber::registry().with(output).with(filter)
}
