// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! One snapshot of the cluster: node records plus the running jobs mapped onto them.
//!
//! The node feed must be fully ingested before the job feed is read, since
//! jobs are accumulated onto the set of nodes it establishes.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::slurm::parser::{parse_job_line, parse_node_line};
use crate::slurm::{expand_hostlist, FeedSource, JobUsage, NodeKey, NodeRecord};

#[derive(Debug, Clone, Default)]
pub struct ClusterSnapshot {
    pub nodes: BTreeMap<NodeKey, NodeRecord>,
    /// Running jobs per node name, an entry exists for every known node
    pub usage: BTreeMap<String, JobUsage>,
    /// Partition flagged with `*` by sinfo
    pub default_partition: Option<String>,
}

impl ClusterSnapshot {
    /// Read both feeds, nodes first
    pub fn collect(nodes: &FeedSource, jobs: &FeedSource) -> Result<Self> {
        let mut snapshot = Self::from_node_lines(nodes.open()?).context("Failed to read node status")?;
        snapshot
            .add_job_lines(jobs.open()?)
            .context("Failed to read job status")?;
        Ok(snapshot)
    }

    /// Build the node map and an empty usage entry per node
    pub fn from_node_lines<I>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let mut snapshot = Self::default();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let node = parse_node_line(&line)?;
            if node.default_partition {
                snapshot.default_partition = Some(node.record.partition().to_string());
            }
            snapshot
                .usage
                .entry(node.record.name().to_string())
                .or_default();
            snapshot.nodes.insert(node.record.key.clone(), node.record);
        }
        debug!(
            records = snapshot.nodes.len(),
            nodes = snapshot.usage.len(),
            default_partition = ?snapshot.default_partition,
            "ingested node status"
        );
        Ok(snapshot)
    }

    /// Accumulate running jobs onto the already known nodes
    pub fn add_job_lines<I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let mut running = 0usize;
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let job = parse_job_line(&line)?;
            if !job.state.is_running() {
                continue;
            }
            running += 1;
            for host in expand_hostlist(&job.nodelist)? {
                match self.usage.get_mut(&host) {
                    Some(usage) => usage.add(&job),
                    None => warn!(
                        job = %job.job_id,
                        node = %host,
                        partition = %job.partition,
                        "job runs on a node missing from node status, skipping"
                    ),
                }
            }
        }
        debug!(running, "ingested job status");
        Ok(())
    }

    pub fn usage(&self, node: &str) -> Option<&JobUsage> {
        self.usage.get(node)
    }

    pub fn is_default_partition(&self, partition: &str) -> bool {
        self.default_partition.as_deref() == Some(partition)
    }
}
