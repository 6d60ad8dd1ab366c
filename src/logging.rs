//! Request-scoped logging and subscriber setup.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Request-scoped logger.
///
/// Every event it writes carries the request id, so the lines of one
/// request can be correlated across gate, sanitizer and store. Borrowed
/// from the request it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
}

impl<'a> RequestLog<'a> {
    /// Creates a logger for `request_id`.
    pub fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message with request ID.
    ///
    /// ```no_run
    /// # use blog_policy::{RequestLog, Secret};
    /// let log = RequestLog::new("req-1");
    /// let key = Secret::new("hush");
    /// log.info(format_args!("signing with {}", key)); // signing with [REDACTED]
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (for example the
/// `log_filter` from [`Config`](crate::Config)) applies. Calling it twice is
/// harmless: the second call leaves the first subscriber in place.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_log_keeps_request_id() {
        let log = RequestLog::new("req-42");
        assert_eq!(log.request_id(), "req-42");
        log.info(format_args!("hello"));
        log.debug(format_args!("details"));
        log.warn(format_args!("careful"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        init("debug");
        init("info");
    }
}
