//! Logging setup.
//!
//! The engine emits `tracing` events (generation transitions at info,
//! species removals at debug); embeddings that want them on stderr can call
//! [`init_logging`] once at startup, or install their own subscriber.

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
