//! Logging setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEFAULT_FILTER: &str = "sso=info,migrator=info,auth=info,tower_http=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// `local` writes human-readable lines, `prod` writes one JSON object per event.
pub fn init_tracing(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match environment {
        Environment::Local => registry.with(tracing_subscriber::fmt::layer()).init(),
        Environment::Prod => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init(),
    }
}
