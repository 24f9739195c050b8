// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Subprocess execution for the 3D viewer

use crate::args::ViewerArgs;
use crate::discovery::ModelFile;
use crate::error::BenchError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Grace period between SIGTERM and SIGKILL for a streaming viewer
const TERM_GRACE: Duration = Duration::from_millis(250);

/// Launches the viewer in benchmark mode
#[derive(Debug, Clone)]
pub struct Runner {
    viewer: PathBuf,
    working_dir: PathBuf,
}

impl Runner {
    pub fn new(viewer: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            viewer: viewer.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn viewer(&self) -> &Path {
        &self.viewer
    }

    /// Check the viewer executable exists
    pub fn is_viewer_available(&self) -> bool {
        self.viewer.is_file()
    }

    pub fn ensure_viewer(&self) -> Result<()> {
        if !self.is_viewer_available() {
            return Err(BenchError::ViewerNotFound(self.viewer.clone()).into());
        }
        Ok(())
    }

    /// Build `<viewer> -b [args] -i <model>`
    pub fn command(&self, args: &ViewerArgs, model: &ModelFile) -> Result<Command> {
        let viewer = std::path::absolute(&self.viewer)
            .with_context(|| format!("Failed to resolve viewer path {:?}", self.viewer))?;
        let input = std::path::absolute(&model.path)
            .with_context(|| format!("Failed to resolve model path {:?}", model.path))?;

        let mut command = Command::new(viewer);
        command
            .arg("-b")
            .args(args.to_argv())
            .arg("-i")
            .arg(input)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null());
        Ok(command)
    }

    /// Run the viewer to completion and require a clean exit
    pub fn run_to_completion(&self, args: &ViewerArgs, model: &ModelFile) -> Result<ExitStatus> {
        let status = self
            .command(args, model)?
            .status()
            .map_err(|source| BenchError::Launch {
                model: model.name.clone(),
                source,
            })?;

        if !status.success() {
            return Err(BenchError::ViewerFailed {
                model: model.name.clone(),
                status: status.to_string(),
            }
            .into());
        }

        Ok(status)
    }

    /// Start the viewer in its own process group with stdout piped.
    ///
    /// The returned guard terminates the whole group when dropped.
    pub fn spawn_streaming(&self, args: &ViewerArgs, model: &ModelFile) -> Result<ChildGuard> {
        let mut command = self.command(args, model)?;
        command.stdout(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|source| BenchError::Launch {
            model: model.name.clone(),
            source,
        })?;

        Ok(ChildGuard { child: Some(child) })
    }
}

/// Owns a running viewer; the process group is signalled on drop
pub struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.as_mut().and_then(|c| c.stdout.take())
    }

    /// Stop the viewer's whole process group and reap the viewer.
    ///
    /// The group is signalled even when the viewer itself already exited,
    /// so anything it forked goes down with it.
    pub fn terminate(&mut self) -> Option<ExitStatus> {
        let mut child = self.child.take()?;
        let pid = child.id();

        signal_process_group(pid, "-TERM");
        let status = child.wait_timeout(TERM_GRACE).ok().flatten();
        signal_process_group(pid, "-KILL");

        match status {
            Some(status) => Some(status),
            None => {
                let _ = child.kill();
                child.wait().ok()
            }
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(unix)]
fn signal_process_group(group_leader_pid: u32, signal: &str) {
    if group_leader_pid == 0 {
        return;
    }

    let _ = Command::new("kill")
        .arg(signal)
        .arg("--")
        .arg(format!("-{group_leader_pid}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(not(unix))]
fn signal_process_group(_group_leader_pid: u32, _signal: &str) {}
