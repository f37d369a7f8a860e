//! Profiling sessions around a benchmark run.
//!
//! A [`ProfileScope`] starts a session on acquisition and stops it exactly
//! once: either through [`ProfileScope::release`] or, if the scope is dropped
//! on an error path, from `Drop`. `ProfileKind::None` yields a no-op session so
//! callers never branch on whether profiling is enabled.

pub mod cpu;
pub mod mem;
pub mod trace;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ProfileKind;

pub use cpu::CpuSession;
pub use mem::{MemReport, MemSample, MemSession};
pub use trace::TraceSession;

pub const CPU_PROFILE_FILE: &str = "cpu.svg";
pub const MEM_PROFILE_FILE: &str = "mem.json";
pub const TRACE_PROFILE_FILE: &str = "trace.log";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to start {kind} profile: {reason}")]
    Start { kind: ProfileKind, reason: String },
    #[error("failed to stop {kind} profile: {reason}")]
    Stop { kind: ProfileKind, reason: String },
    #[error("profile output {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProfileError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ProfileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A running capture.
pub trait ProfileSession {
    fn kind(&self) -> ProfileKind;

    /// Stops capture and flushes the artifact, returning where it was written.
    fn stop(self: Box<Self>) -> Result<Option<PathBuf>, ProfileError>;
}

/// Starts sessions for a profile kind.
pub trait ProfileBackend {
    fn start(&self, kind: ProfileKind) -> Result<Box<dyn ProfileSession>, ProfileError>;
}

/// Session for `ProfileKind::None`.
#[derive(Debug, Default)]
pub struct NoopSession;

impl ProfileSession for NoopSession {
    fn kind(&self) -> ProfileKind {
        ProfileKind::None
    }

    fn stop(self: Box<Self>) -> Result<Option<PathBuf>, ProfileError> {
        Ok(None)
    }
}

/// Production profiles, writing artifacts into `dir`.
#[derive(Debug, Clone)]
pub struct SystemProfiles {
    dir: PathBuf,
}

impl SystemProfiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SystemProfiles { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn output(&self, file: &str) -> Result<PathBuf, ProfileError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ProfileError::io(&self.dir, e))?;
        Ok(self.dir.join(file))
    }
}

impl ProfileBackend for SystemProfiles {
    fn start(&self, kind: ProfileKind) -> Result<Box<dyn ProfileSession>, ProfileError> {
        let session: Box<dyn ProfileSession> = match kind {
            ProfileKind::None => Box::new(NoopSession),
            ProfileKind::Cpu => Box::new(CpuSession::start(self.output(CPU_PROFILE_FILE)?)?),
            ProfileKind::Mem => Box::new(MemSession::start(self.output(MEM_PROFILE_FILE)?)?),
            ProfileKind::Trace => Box::new(TraceSession::start(self.output(TRACE_PROFILE_FILE)?)?),
        };
        Ok(session)
    }
}

/// Scoped profiling session.
#[must_use = "dropping the scope stops profiling immediately"]
pub struct ProfileScope {
    session: Option<Box<dyn ProfileSession>>,
}

impl ProfileScope {
    pub fn acquire(profiles: &dyn ProfileBackend, kind: ProfileKind) -> Result<Self, ProfileError> {
        let session = profiles.start(kind)?;
        debug!(profile = %kind, "profile session started");
        Ok(ProfileScope {
            session: Some(session),
        })
    }

    /// Stops the session and returns the artifact path, if the kind writes one.
    pub fn release(mut self) -> Result<Option<PathBuf>, ProfileError> {
        match self.session.take() {
            Some(session) => stop(session),
            None => Ok(None),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let kind = session.kind();
            if let Err(e) = stop(session) {
                warn!(profile = %kind, error = %e, "failed to stop profile during unwind");
            }
        }
    }
}

fn stop(session: Box<dyn ProfileSession>) -> Result<Option<PathBuf>, ProfileError> {
    let kind = session.kind();
    let artifact = session.stop()?;
    match &artifact {
        Some(path) => info!(profile = %kind, path = %path.display(), "profile written"),
        None => debug!(profile = %kind, "profile session stopped"),
    }
    Ok(artifact)
}
