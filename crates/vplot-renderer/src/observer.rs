//! Backend error reporting.
//!
//! Errors raised while rendering are not returned to plotting code. They are
//! handed to the observer installed on the scene and the render window.

use std::sync::Arc;

/// Receives errors and warnings raised inside the backend
pub trait ErrorObserver: Send + Sync {
    fn on_error(&self, origin: &str, message: &str);

    fn on_warning(&self, origin: &str, message: &str) {
        tracing::warn!(origin, "{message}");
    }
}

/// Shared observer handle
pub type SharedObserver = Arc<dyn ErrorObserver>;

/// Default observer writing to the diagnostic log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ErrorObserver for TracingObserver {
    fn on_error(&self, origin: &str, message: &str) {
        tracing::error!(origin, "{message}");
    }
}

pub(crate) fn default_observer() -> SharedObserver {
    Arc::new(TracingObserver)
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::ErrorObserver;

    /// Observer collecting messages for assertions
    #[derive(Default)]
    pub struct RecordingObserver {
        pub errors: Mutex<Vec<String>>,
    }

    impl ErrorObserver for RecordingObserver {
        fn on_error(&self, origin: &str, message: &str) {
            self.errors.lock().push(format!("{origin}: {message}"));
        }
    }
}
