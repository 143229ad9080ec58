use std::sync::Arc;

use crate::logger::{Logger, TracingLogger};

/// Options accepted by [`RecordStore::open`](crate::RecordStore::open).
#[derive(Clone)]
pub struct StoreOptions {
    /// Log sink. `None` uses [`TracingLogger`].
    pub logger: Option<Arc<dyn Logger>>,
    /// `fsync` each temporary file before it replaces the record
    /// (default: `true`). Turning this off keeps atomicity but a crash may
    /// lose the most recent writes.
    pub sync_writes: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            logger: None,
            sync_writes: true,
        }
    }
}

impl StoreOptions {
    /// Route the store's log messages to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable or disable `fsync` before each record replace.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// The configured logger, or the default one.
    pub(crate) fn logger_or_default(&self) -> Arc<dyn Logger> {
        match &self.logger {
            Some(logger) => Arc::clone(logger),
            None => Arc::new(TracingLogger),
        }
    }
}

impl std::fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOptions")
            .field("custom_logger", &self.logger.is_some())
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;

    #[test]
    fn default_options() {
        let opts = StoreOptions::default();
        assert!(opts.logger.is_none());
        assert!(opts.sync_writes);
    }

    #[test]
    fn builder_sets_fields() {
        let opts = StoreOptions::default()
            .with_logger(Arc::new(NullLogger))
            .with_sync_writes(false);
        assert!(opts.logger.is_some());
        assert!(!opts.sync_writes);
    }

    #[test]
    fn debug_hides_logger() {
        let debug = format!("{:?}", StoreOptions::default());
        assert!(debug.contains("custom_logger: false"));
        assert!(debug.contains("sync_writes: true"));
    }
}
