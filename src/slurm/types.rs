// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Typed records built from the node and job feeds.

use std::collections::BTreeSet;

use super::slurm::JobState;

/// Identity of a node record: a node may appear once per partition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    pub name: String,
    pub partition: String,
}

/// One line of the node feed.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub key: NodeKey,
    /// CPU load as reported, may be non-numeric (e.g. "N/A")
    pub load: String,
    /// Cores allocated to jobs
    pub allocated: i64,
    /// Cores idle
    pub idle: i64,
    /// Cores neither allocated nor idle (drained, down, ...)
    pub unavailable: i64,
    /// Total cores
    pub cores: i64,
    /// Real memory in bytes
    pub memory: u64,
    /// Scheduler state, e.g. "mixed", "idle", "down*"
    pub state: String,
}

impl NodeRecord {
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn partition(&self) -> &str {
        &self.key.partition
    }

    /// Parsed load, `None` when the scheduler reports no number
    pub fn load_value(&self) -> Option<f64> {
        self.load.trim().parse::<f64>().ok().filter(|l| l.is_finite())
    }
}

/// Node feed line result: the record plus whether its partition is the default.
#[derive(Debug, Clone)]
pub struct NodeLine {
    pub record: NodeRecord,
    pub default_partition: bool,
}

/// One line of the job feed.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job_id: String,
    pub state: JobState,
    pub user: String,
    /// Memory reservation in bytes
    pub memory: f64,
    /// Compact nodelist (e.g., "node[001-003]")
    pub nodelist: String,
    pub partition: String,
}

/// Running jobs accumulated on a single node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUsage {
    pub jobs: BTreeSet<String>,
    pub users: BTreeSet<String>,
    /// Per-job memory reservations in bytes
    pub memory: Vec<f64>,
}

impl JobUsage {
    pub fn add(&mut self, job: &JobRecord) {
        self.jobs.insert(job.job_id.clone());
        self.users.insert(job.user.clone());
        self.memory.push(job.memory);
    }

    pub fn reserved_memory(&self) -> f64 {
        self.memory.iter().sum()
    }

    /// True when running jobs have reserved all of `node_memory`
    pub fn memory_exhausted(&self, node_memory: u64) -> bool {
        !self.memory.is_empty() && self.reserved_memory() >= node_memory as f64
    }
}
