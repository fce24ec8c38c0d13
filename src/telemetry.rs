use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

/// Install the global tracing subscriber.
///
/// The filter is picked from the explicit argument, then `RUST_LOG`, then
/// `info`, keeping the first one that parses.
///
/// # Errors
///
/// Returns an error if no filter candidate is valid, if JSON output is
/// requested from a build without the `json-logs` feature, or if a global
/// subscriber is already installed.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let filter = pick_filter(explicit_filter, std::env::var("RUST_LOG").ok())?;

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .json()
                .flatten_event(true),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()))?;
        return Ok(());
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true),
    );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}

fn pick_filter(explicit: Option<&str>, env: Option<String>) -> Result<EnvFilter> {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(env)
        .chain(std::iter::once("info".to_string()))
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}

#[cfg(test)]
mod tests {
    use super::pick_filter;

    #[test]
    fn explicit_filter_wins_over_env() {
        let filter = match pick_filter(Some("panelkit=trace"), Some("warn".to_string())) {
            Ok(filter) => filter,
            Err(err) => panic!("filter should parse: {err}"),
        };
        assert_eq!(filter.to_string(), "panelkit=trace");
    }

    #[test]
    fn falls_back_to_info() {
        let filter = match pick_filter(None, None) {
            Ok(filter) => filter,
            Err(err) => panic!("filter should parse: {err}"),
        };
        assert_eq!(filter.to_string(), "info");
    }
}
