// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Slurm CLI integration: node and job feeds via sinfo and squeue.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// sinfo output format: name;alloc/idle/other/total;memory;load;state;partition
pub const SINFO_FORMAT: &str = "%N;%C;%m;%O;%T;%P";

/// squeue output format: jobid;state;user;memory;nodelist;partition
pub const SQUEUE_FORMAT: &str = "%i;%t;%u;%m;%N;%P";

/// Job state as reported by Slurm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Suspended,
    Completing,
    Completed,
    Cancelled,
    Failed,
    Timeout,
    NodeFail,
    Unknown(String),
}

impl From<&str> for JobState {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PENDING" | "PD" => JobState::Pending,
            "RUNNING" | "R" => JobState::Running,
            "SUSPENDED" | "S" => JobState::Suspended,
            "COMPLETING" | "CG" => JobState::Completing,
            "COMPLETED" | "CD" => JobState::Completed,
            "CANCELLED" | "CA" => JobState::Cancelled,
            "FAILED" | "F" => JobState::Failed,
            "TIMEOUT" | "TO" => JobState::Timeout,
            "NODE_FAIL" | "NF" => JobState::NodeFail,
            other => JobState::Unknown(other.to_string()),
        }
    }
}

impl JobState {
    /// Only running jobs count towards a node's usage
    pub fn is_running(&self) -> bool {
        matches!(self, JobState::Running)
    }
}

/// Where a feed's lines come from
#[derive(Debug, Clone)]
pub enum FeedSource {
    /// Spawn a command and read its stdout
    Command { program: String, args: Vec<String> },
    /// Read a previously captured feed from disk
    File(PathBuf),
}

impl FeedSource {
    pub fn sinfo() -> Self {
        FeedSource::Command {
            program: "sinfo".to_string(),
            args: vec![
                "--noheader".to_string(),
                "--Node".to_string(),
                format!("--format={}", SINFO_FORMAT),
            ],
        }
    }

    pub fn squeue() -> Self {
        FeedSource::Command {
            program: "squeue".to_string(),
            args: vec!["--noheader".to_string(), format!("--format={}", SQUEUE_FORMAT)],
        }
    }

    /// Use `path` if given, otherwise fall back to `default`
    pub fn file_or(path: Option<PathBuf>, default: fn() -> Self) -> Self {
        path.map(FeedSource::File).unwrap_or_else(default)
    }

    /// Start producing lines. Nothing is read until the stream is iterated.
    pub fn open(&self) -> Result<LineStream> {
        match self {
            FeedSource::Command { program, args } => {
                debug!(program = %program, ?args, "spawning feed");
                let mut child = Command::new(program)
                    .args(args)
                    .stdout(Stdio::piped())
                    .stderr(Stdio::inherit())
                    .spawn()
                    .with_context(|| format!("Failed to execute {}", program))?;
                let stdout = child
                    .stdout
                    .take()
                    .ok_or_else(|| anyhow!("{} has no stdout", program))?;
                let reader: Box<dyn BufRead> = Box::new(BufReader::new(stdout));
                Ok(LineStream {
                    lines: reader.lines(),
                    child: Some((child, program.clone())),
                })
            }
            FeedSource::File(path) => {
                debug!(path = %path.display(), "reading feed from file");
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                let reader: Box<dyn BufRead> = Box::new(BufReader::new(file));
                Ok(LineStream {
                    lines: reader.lines(),
                    child: None,
                })
            }
        }
    }
}

/// Lines of one feed, consumed exactly once.
///
/// For command feeds the child's exit status is checked once stdout is
/// exhausted; a failing command surfaces as a final `Err` item. A stream
/// dropped early kills and reaps its command.
pub struct LineStream {
    lines: Lines<Box<dyn BufRead>>,
    child: Option<(Child, String)>,
}

impl LineStream {
    /// Stream over in-memory text
    #[cfg(test)]
    pub fn from_text(text: &str) -> Self {
        let reader: Box<dyn BufRead> = Box::new(std::io::Cursor::new(text.to_string()));
        LineStream {
            lines: reader.lines(),
            child: None,
        }
    }
}

impl Iterator for LineStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.lines.next() {
            Some(Ok(line)) => Some(Ok(line)),
            Some(Err(e)) => Some(Err(anyhow::Error::new(e).context("Failed to read feed"))),
            None => {
                let (mut child, program) = self.child.take()?;
                match child.wait() {
                    Ok(status) if status.success() => None,
                    Ok(status) => Some(Err(anyhow!("{} failed: {}", program, status))),
                    Err(e) => Some(Err(anyhow::Error::new(e).context(format!("Failed to wait for {}", program)))),
                }
            }
        }
    }
}

impl Drop for LineStream {
    fn drop(&mut self) {
        if let Some((mut child, program)) = self.child.take() {
            // The reader stopped early, nobody drains stdout anymore
            let _ = child.kill();
            if let Err(e) = child.wait() {
                debug!(program = %program, error = %e, "failed to reap feed");
            }
        }
    }
}
