use env_logger::{Builder, Env};

/// Filter used when `RUST_LOG` is unset; an explicit level beats the debug flag.
pub fn default_filter(debug: bool, level: Option<&str>) -> &str {
    match level {
        Some(level) if !level.trim().is_empty() => level.trim(),
        _ if debug => "debug",
        _ => "info",
    }
}

/// Initialize env_logger; `RUST_LOG` wins over the CLI settings.
pub fn init_logging(debug: bool, level: Option<&str>) {
    Builder::from_env(Env::default().default_filter_or(default_filter(debug, level)))
        .format_timestamp_millis()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(default_filter(false, Some("trace")), "trace");
        assert_eq!(default_filter(true, Some("warn")), "warn");
    }

    #[test]
    fn test_debug_flag_without_level() {
        assert_eq!(default_filter(true, None), "debug");
        assert_eq!(default_filter(false, None), "info");
        assert_eq!(default_filter(true, Some("  ")), "debug");
    }
}
