use std::fs::File;
use std::path::PathBuf;

use pprof::{ProfilerGuard, ProfilerGuardBuilder};

use crate::config::ProfileKind;

use super::{ProfileError, ProfileSession};

/// Sampling frequency of the CPU profiler.
pub const CPU_FREQUENCY_HZ: i32 = 1000;

/// Sampling CPU profile rendered as a flamegraph SVG.
pub struct CpuSession {
    guard: ProfilerGuard<'static>,
    path: PathBuf,
}

impl CpuSession {
    pub fn start(path: PathBuf) -> Result<Self, ProfileError> {
        let guard = ProfilerGuardBuilder::default()
            .frequency(CPU_FREQUENCY_HZ)
            .blocklist(&["libc", "libgcc", "pthread", "vdso"])
            .build()
            .map_err(|e| ProfileError::Start {
                kind: ProfileKind::Cpu,
                reason: e.to_string(),
            })?;
        Ok(CpuSession { guard, path })
    }
}

impl ProfileSession for CpuSession {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Cpu
    }

    fn stop(self: Box<Self>) -> Result<Option<PathBuf>, ProfileError> {
        let stop_err = |e: pprof::Error| ProfileError::Stop {
            kind: ProfileKind::Cpu,
            reason: e.to_string(),
        };
        let report = self.guard.report().build().map_err(stop_err)?;
        let file = File::create(&self.path).map_err(|e| ProfileError::io(&self.path, e))?;
        report.flamegraph(file).map_err(stop_err)?;
        Ok(Some(self.path))
    }
}
