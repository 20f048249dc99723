//! Logger setup

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialise `env_logger`
///
/// `RUST_LOG` takes precedence over `default_level`. Calls after the first are
/// ignored.
pub fn init_logging(default_level: &str) {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp(None)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging("warn");
        init_logging("trace");
        log::warn!("logger initialised twice without panicking");
    }
}
