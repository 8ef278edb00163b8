//! Logging setup shared by the Roomcast binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the calling crate and the binary itself. `RUST_LOG`
/// takes precedence when it is set.
///
/// # Arguments
///
/// * `crate_name` - The library crate name of the caller (e.g., "roomcast_server")
/// * `binary_name` - The name of the binary (e.g., "roomcast-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use roomcast_shared::logger::setup_logger;
///
/// setup_logger("roomcast_server", "roomcast-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            default_filter(crate_name, binary_name, default_log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the fallback filter directive used when `RUST_LOG` is not set.
fn default_filter(crate_name: &str, binary_name: &str, level: &str) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        crate_name.replace('-', "_"),
        level,
        binary_name.replace('-', "_"),
        level,
        level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_hyphens() {
        // テスト項目: クレート名・バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let crate_name = "roomcast-server";
        let binary_name = "roomcast-server";

        // when (操作):
        let filter = default_filter(crate_name, binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            filter,
            "roomcast_server=debug,roomcast_server=debug,tower_http=debug"
        );
    }
}
