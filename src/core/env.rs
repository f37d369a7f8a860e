//! Where and with what a benchmark ran.
//!
//! Records are compared across machines and commits, so every record carries
//! the host it ran on, the harness build and the proof stack it measured.

use std::process::Command;

use serde::{Deserialize, Serialize};
use sysinfo::System;

use crate::config::ProfileKind;
use crate::curve::CurveId;

/// Proof system measured by [`crate::backend::Groth16Backend`].
pub const PROOF_SYSTEM: &str = "arkworks-groth16";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Logical CPUs, which bounds arkworks' parallel MSM/FFT
    pub threads: usize,
    pub memory_bytes: u64,
}

/// Commit of the working tree the harness was run from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitState {
    pub sha: String,
    pub dirty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub harness_version: String,
    pub proof_system: String,
    /// Curves this build can benchmark
    pub curves: Vec<CurveId>,
    /// Profile kinds available on this platform
    pub profiles: Vec<ProfileKind>,
    pub host: HostInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitState>,
}

impl Default for EnvironmentInfo {
    /// Build-time facts only; nothing is probed.
    fn default() -> Self {
        EnvironmentInfo {
            harness_version: env!("CARGO_PKG_VERSION").to_string(),
            proof_system: PROOF_SYSTEM.to_string(),
            curves: CurveId::implemented().to_vec(),
            profiles: available_profiles(),
            host: HostInfo {
                os: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
                hostname: None,
                cpu: None,
                threads: 0,
                memory_bytes: 0,
            },
            git: None,
        }
    }
}

impl EnvironmentInfo {
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        let defaults = EnvironmentInfo::default();
        EnvironmentInfo {
            host: HostInfo {
                os: System::long_os_version().unwrap_or(defaults.host.os.clone()),
                hostname: System::host_name(),
                cpu: sys.cpus().first().map(|c| c.brand().trim().to_string()),
                threads: sys.cpus().len(),
                memory_bytes: sys.total_memory(),
                ..defaults.host.clone()
            },
            git: git_state(),
            ..defaults
        }
    }
}

/// Sampling CPU profiles need pprof's signal-based sampler, which is unix-only.
fn available_profiles() -> Vec<ProfileKind> {
    ProfileKind::ALL
        .into_iter()
        .filter(|kind| *kind != ProfileKind::Cpu || cfg!(unix))
        .collect()
}

fn git_state() -> Option<GitState> {
    let sha = git(&["rev-parse", "HEAD"]).filter(|s| !s.is_empty())?;
    let dirty = git(&["status", "--porcelain"]).is_some_and(|s| !s.is_empty());
    Some(GitState { sha, dirty })
}

fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout).ok().map(|s| s.trim().to_string())
}
