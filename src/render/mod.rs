// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Text rendering of a cluster snapshot: one bordered block per capacity group.

pub mod bar;
pub mod grid;
pub mod group;
pub mod highlight;
pub mod json;

use std::io::{self, Write};

use tracing::debug;

use crate::cluster::ClusterSnapshot;
use bar::usage_bar;
use grid::{write_block, BlockTitle, Field, Styling};
use group::{group_by_capacity, CapacityGroup};
use highlight::Highlighter;

/// Width used when the terminal cannot be queried
pub const DEFAULT_WIDTH: usize = 80;

/// Everything the renderer needs besides the snapshot
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub highlighter: Highlighter,
    pub width: usize,
    pub styling: Styling,
    pub legend: bool,
}

/// Terminal width in columns, or [`DEFAULT_WIDTH`] if it cannot be determined
pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        Ok(_) => DEFAULT_WIDTH,
        Err(e) => {
            debug!(error = %e, "terminal size unavailable, using default width");
            DEFAULT_WIDTH
        }
    }
}

pub fn format_memory(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;
    const TIB: u64 = GIB * 1024;

    if bytes >= TIB {
        format!("{:.1}Ti", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1}Gi", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1}Mi", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.0}Ki", bytes as f64 / KIB as f64)
    } else {
        format!("{}B", bytes)
    }
}

fn block_title(group: &CapacityGroup, snapshot: &ClusterSnapshot) -> BlockTitle {
    BlockTitle {
        partition: group.key.partition.clone(),
        is_default: snapshot.is_default_partition(&group.key.partition),
        capacity: format!("{} cores, {}", group.key.cores, format_memory(group.key.memory)),
    }
}

/// One cell per member: name, then the bar centered within the group's core count
pub fn group_fields(group: &CapacityGroup, snapshot: &ClusterSnapshot, highlighter: &Highlighter) -> Vec<Field> {
    let name_width = group.members.iter().map(|n| n.name().chars().count()).max().unwrap_or(0);
    let bar_width = group.key.cores.max(0) as usize;

    group
        .members
        .iter()
        .map(|node| {
            let usage = snapshot.usage(node.name());
            let bar = usage_bar(node, usage);
            Field::new(
                format!("{:<nw$} {:^bw$}", node.name(), bar, nw = name_width, bw = bar_width),
                highlighter.highlight(node.name(), usage),
            )
        })
        .collect()
}

/// Symbol legend line
pub fn legend() -> String {
    format!(
        "{} free  {} allocated  {} in use  {} overused  {} unknown  {} unknown node  {} down",
        bar::FREE,
        bar::ALLOCATED,
        bar::IN_USE,
        bar::OVERUSED,
        bar::UNKNOWN,
        bar::UNKNOWN_NODE,
        bar::DOWN_NODE
    )
}

/// Write every capacity group as a block, in ascending group order
pub fn render_cluster<W: Write>(out: &mut W, snapshot: &ClusterSnapshot, options: &RenderOptions) -> io::Result<()> {
    let groups = group_by_capacity(snapshot.nodes.values());
    debug!(groups = groups.len(), width = options.width, "rendering");

    for group in &groups {
        let fields = group_fields(group, snapshot, &options.highlighter);
        write_block(out, &block_title(group, snapshot), fields, options.width, options.styling)?;
    }
    if options.legend {
        writeln!(out, "{}", legend())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::tests::sample;

    fn options(patterns: &[&str], width: usize) -> RenderOptions {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        RenderOptions {
            highlighter: Highlighter::new(&patterns).unwrap(),
            width,
            styling: Styling { ansi: false },
            legend: false,
        }
    }

    fn render(options: &RenderOptions) -> String {
        let mut out = Vec::new();
        render_cluster(&mut out, &sample(), options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory(0), "0B");
        assert_eq!(format_memory(1024), "1Ki");
        assert_eq!(format_memory(16000 * 1024 * 1024), "15.6Gi");
        assert_eq!(format_memory(2 * 1024 * 1024 * 1024 * 1024), "2.0Ti");
    }

    #[test]
    fn test_group_fields_center_bars() {
        let snapshot = sample();
        let groups = group_by_capacity(snapshot.nodes.values());
        let gpu = groups.iter().find(|g| g.key.partition == "gpu").unwrap();
        let fields = group_fields(gpu, &snapshot, &Highlighter::default());
        let expected = format!("gpu01 {:^32}", "DOWN");
        assert_eq!(fields[0].text, expected);
    }

    #[test]
    fn test_render_cluster_plain() {
        let out = render(&options(&[], 200));
        let expected = "\
compute* (8 cores, 15.6Gi)
+-----------------+-----------------+-----------------+
| node01 OOOOOOOO | node02 ....!!!! | node03 ........ |
+-----------------+-----------------+-----------------+
debug (8 cores, 15.6Gi)
+-----------------+
| node03 ........ |
+-----------------+
";
        assert!(out.starts_with(expected), "unexpected output:\n{}", out);
        assert!(out.contains("gpu (32 cores, 62.5Gi)"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_render_cluster_wraps_column_major() {
        // each compute cell is 15 wide: 40 / 18 = 2 per row
        let out = render(&options(&[], 40));
        assert!(out.contains("| node01 OOOOOOOO | node03 ........ |\n| node02 ....!!!! |                 |\n"));
    }

    #[test]
    fn test_render_cluster_highlights_matches() {
        let mut opts = options(&["bob"], 200);
        opts.styling = Styling { ansi: true };
        let out = render(&opts);
        let mut unmatched = options(&[], 200);
        unmatched.styling = Styling { ansi: true };
        assert_ne!(out, render(&unmatched));

        let plain = render(&options(&["bob"], 200));
        assert_eq!(plain, render(&options(&[], 200)));
    }

    #[test]
    fn test_legend() {
        let mut opts = options(&[], 80);
        opts.legend = true;
        let out = render(&opts);
        assert!(out.ends_with(&format!("{}\n", legend())));
        assert!(legend().starts_with(". free  _ allocated  O in use  ! overused  ? unknown"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let opts = options(&["alice"], 60);
        assert_eq!(render(&opts), render(&opts));
    }
}
