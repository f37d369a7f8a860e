use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, System};

use crate::config::ProfileKind;

use super::{ProfileError, ProfileSession};

/// Interval between two RSS samples.
pub const MEM_SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemSample {
    pub elapsed_ms: u64,
    pub rss_bytes: u64,
}

/// Written to `mem.json` when the session stops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemReport {
    pub interval_ms: u64,
    pub peak_rss_bytes: u64,
    pub samples: Vec<MemSample>,
}

/// Samples the resident set size of this process on a background thread.
pub struct MemSession {
    path: PathBuf,
    done: Arc<AtomicBool>,
    sampler: JoinHandle<MemReport>,
}

impl MemSession {
    pub fn start(path: PathBuf) -> Result<Self, ProfileError> {
        let pid = sysinfo::get_current_pid().map_err(|e| ProfileError::Start {
            kind: ProfileKind::Mem,
            reason: e.to_string(),
        })?;
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        let sampler = thread::Builder::new()
            .name("zk-bench-mem".into())
            .spawn(move || sample(pid, MEM_SAMPLE_INTERVAL, &flag))
            .map_err(|e| ProfileError::Start {
                kind: ProfileKind::Mem,
                reason: e.to_string(),
            })?;
        Ok(MemSession { path, done, sampler })
    }
}

impl ProfileSession for MemSession {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Mem
    }

    fn stop(self: Box<Self>) -> Result<Option<PathBuf>, ProfileError> {
        let MemSession { path, done, sampler } = *self;
        done.store(true, Ordering::Release);
        sampler.thread().unpark();
        let report = sampler.join().map_err(|_| ProfileError::Stop {
            kind: ProfileKind::Mem,
            reason: "sampler thread panicked".into(),
        })?;
        let json = serde_json::to_vec_pretty(&report).map_err(|e| ProfileError::Stop {
            kind: ProfileKind::Mem,
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| ProfileError::io(&path, e))?;
        Ok(Some(path))
    }
}

fn sample(pid: Pid, interval: Duration, done: &AtomicBool) -> MemReport {
    let mut sys = System::new();
    let start = Instant::now();
    let mut report = MemReport {
        interval_ms: interval.as_millis() as u64,
        ..Default::default()
    };
    loop {
        // Take one last sample after the stop request.
        let stopping = done.load(Ordering::Acquire);
        sys.refresh_process(pid);
        if let Some(p) = sys.process(pid) {
            let rss_bytes = p.memory();
            report.peak_rss_bytes = report.peak_rss_bytes.max(rss_bytes);
            report.samples.push(MemSample {
                elapsed_ms: start.elapsed().as_millis() as u64,
                rss_bytes,
            });
        }
        if stopping {
            return report;
        }
        thread::park_timeout(interval);
    }
}
