// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Usage bars: one symbol per core, from free to hot.

use crate::slurm::{JobUsage, NodeRecord};

pub const FREE: char = '.';
pub const ALLOCATED: char = '_';
pub const IN_USE: char = 'O';
pub const OVERUSED: char = '!';
pub const UNKNOWN: char = '?';

pub const UNKNOWN_NODE: &str = "UNKN";
pub const DOWN_NODE: &str = "DOWN";

/// Load above this multiple of the cores in use counts as overuse
const OVERUSE_FACTOR: f64 = 1.5;

/// Occupancy class of a node, evaluated in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    /// No cores reported or scheduler state unknown
    Unknown,
    /// Some cores unavailable
    Down,
    /// Unavailable count is non-zero yet not positive
    Unavailable,
    /// Cores allocated; `loaded` of `in_use` cores carry load drawn with `symbol`
    Busy { in_use: i64, loaded: i64, symbol: char },
    /// Nothing allocated
    Idle,
}

fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Classify a node. `usage` holds the running jobs on it, if any.
pub fn classify(node: &NodeRecord, usage: Option<&JobUsage>) -> Occupancy {
    if node.cores == 0 || node.state.to_lowercase().starts_with("unk") {
        return Occupancy::Unknown;
    }
    if node.unavailable > 0 {
        return Occupancy::Down;
    }
    if node.unavailable != 0 {
        return Occupancy::Unavailable;
    }
    if node.allocated <= 0 {
        return Occupancy::Idle;
    }

    // A node whose memory is fully reserved cannot take more work
    let in_use = match usage {
        Some(usage) if usage.memory_exhausted(node.memory) => node.cores,
        _ => node.allocated,
    };

    match node.load_value() {
        Some(load) => Occupancy::Busy {
            in_use,
            loaded: round_half_up(load).min(in_use).max(0),
            symbol: if load > OVERUSE_FACTOR * in_use as f64 { OVERUSED } else { IN_USE },
        },
        None => Occupancy::Busy {
            in_use,
            loaded: 0,
            symbol: UNKNOWN,
        },
    }
}

fn repeat(c: char, n: i64) -> String {
    std::iter::repeat(c).take(n.max(0) as usize).collect()
}

/// Draw an occupancy class for a node with `cores` cores
pub fn draw(cores: i64, occupancy: Occupancy) -> String {
    let (in_use, loaded, symbol) = match occupancy {
        Occupancy::Unknown => return UNKNOWN_NODE.to_string(),
        Occupancy::Down => return DOWN_NODE.to_string(),
        Occupancy::Unavailable => return repeat(UNKNOWN, cores),
        Occupancy::Busy { in_use, loaded, symbol } => (in_use, loaded, symbol),
        Occupancy::Idle => (0, 0, IN_USE),
    };

    let mut bar = repeat(FREE, cores.saturating_sub(in_use));
    bar.push_str(&repeat(ALLOCATED, in_use.saturating_sub(loaded)));
    bar.push_str(&repeat(symbol, loaded));
    bar
}

/// Usage bar for one node
pub fn usage_bar(node: &NodeRecord, usage: Option<&JobUsage>) -> String {
    draw(node.cores, classify(node, usage))
}
