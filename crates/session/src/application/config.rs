//! Application Configuration
//!
//! Configuration for the session application layer.

use std::time::Duration;

/// Default bound on a single profile lookup
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity resolution configuration
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// Upper bound on a single profile lookup. Resolution treats an
    /// elapsed bound as "no profile row yet"; profile writes report
    /// it to the caller.
    pub lookup_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl ResolverConfig {
    /// Create a config with a custom lookup bound
    pub fn with_lookup_timeout(lookup_timeout: Duration) -> Self {
        Self { lookup_timeout }
    }

    /// Get the lookup bound in milliseconds
    pub fn lookup_timeout_ms(&self) -> u64 {
        self.lookup_timeout.as_millis() as u64
    }
}
