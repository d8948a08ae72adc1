// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Line parsers for the sinfo and squeue feeds.

use anyhow::{bail, Context, Result};

use super::slurm::JobState;
use super::types::{JobRecord, NodeKey, NodeLine, NodeRecord};

/// Slurm reports memory in mebibytes
const BASE_UNIT: f64 = (1u64 << 20) as f64;

/// Binary exponent for a unit suffix
fn suffix_exponent(c: char) -> Option<i32> {
    match c.to_ascii_uppercase() {
        'K' => Some(10),
        'M' => Some(20),
        'G' => Some(30),
        'T' => Some(40),
        'P' => Some(50),
        'E' => Some(60),
        _ => None,
    }
}

/// Parse a Slurm memory magnitude ("4000", "4G", "512M") into bytes.
///
/// The numeric part is scaled by its suffix and then by the mebibyte base unit.
pub fn parse_memory(s: &str) -> Result<f64> {
    let s = s.trim();
    let (number, exponent) = match s.chars().last().and_then(suffix_exponent) {
        Some(exp) => (&s[..s.len() - 1], exp),
        None => (s, 0),
    };
    let value: f64 = number
        .parse()
        .with_context(|| format!("Invalid memory size '{}'", s))?;
    Ok(value * 2f64.powi(exponent) * BASE_UNIT)
}

fn split_fields<'a>(line: &'a str, expected: usize) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != expected {
        bail!(
            "expected {} fields but found {} in line: {}",
            expected,
            fields.len(),
            line
        );
    }
    Ok(fields)
}

fn parse_count(field: &str, what: &str, line: &str) -> Result<i64> {
    field
        .trim()
        .parse()
        .with_context(|| format!("invalid {} '{}' in line: {}", what, field, line))
}

/// Parse one sinfo line: `name;alloc/idle/other/total;memory;load;state;partition`
pub fn parse_node_line(line: &str) -> Result<NodeLine> {
    let fields = split_fields(line, 6)?;

    let cpus: Vec<&str> = fields[1].split('/').collect();
    if cpus.len() != 4 {
        bail!("invalid CPU field '{}' in line: {}", fields[1], line);
    }

    let memory = parse_memory(fields[2])
        .with_context(|| format!("invalid memory in line: {}", line))?;

    let partition = fields[5].trim();
    let (partition, default_partition) = match partition.strip_suffix('*') {
        Some(name) => (name, true),
        None => (partition, false),
    };

    let record = NodeRecord {
        key: NodeKey {
            name: fields[0].trim().to_string(),
            partition: partition.to_string(),
        },
        load: fields[3].trim().to_string(),
        allocated: parse_count(cpus[0], "allocated cores", line)?,
        idle: parse_count(cpus[1], "idle cores", line)?,
        unavailable: parse_count(cpus[2], "unavailable cores", line)?,
        cores: parse_count(cpus[3], "total cores", line)?,
        memory: memory as u64,
        state: fields[4].trim().to_string(),
    };

    Ok(NodeLine {
        record,
        default_partition,
    })
}

/// Parse one squeue line: `jobid;state;user;memory;nodelist;partition`
pub fn parse_job_line(line: &str) -> Result<JobRecord> {
    let fields = split_fields(line, 6)?;
    let state = JobState::from(fields[1].trim());

    // Memory is only needed for running jobs; pending ones may report odd values
    let memory = if state.is_running() {
        parse_memory(fields[3]).with_context(|| format!("invalid memory in line: {}", line))?
    } else {
        0.0
    };

    Ok(JobRecord {
        job_id: fields[0].trim().to_string(),
        state,
        user: fields[2].trim().to_string(),
        memory,
        nodelist: fields[4].trim().to_string(),
        partition: fields[5].trim().to_string(),
    })
}
