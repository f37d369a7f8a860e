use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::ProfileKind;

use super::{ProfileError, ProfileSession};

/// Execution trace: every span and event at TRACE level on the current
/// thread goes to a log file while the session is active.
///
/// The subscriber is installed as the thread default, so the regular stderr
/// logger is silent until the session stops.
pub struct TraceSession {
    guard: DefaultGuard,
    path: PathBuf,
}

impl TraceSession {
    pub fn start(path: PathBuf) -> Result<Self, ProfileError> {
        let file = File::create(&path).map_err(|e| ProfileError::io(&path, e))?;
        let subscriber = tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .with_span_events(FmtSpan::CLOSE)
            .with_thread_names(true)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Ok(TraceSession { guard, path })
    }
}

impl ProfileSession for TraceSession {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Trace
    }

    fn stop(self: Box<Self>) -> Result<Option<PathBuf>, ProfileError> {
        let TraceSession { guard, path } = *self;
        // Restores the previous subscriber and drops ours, closing the file.
        drop(guard);
        Ok(Some(path))
    }
}
