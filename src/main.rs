// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod cluster;
mod logging;
mod render;
mod slurm;

use cluster::ClusterSnapshot;
use render::grid::Styling;
use render::highlight::Highlighter;
use render::{render_cluster, terminal_width, RenderOptions};
use slurm::FeedSource;

#[derive(Parser, Debug)]
#[command(name = "nodemap")]
#[command(about = "Map of core occupancy on every Slurm node, grouped by partition and capacity")]
#[command(version)]
struct Args {
    /// Highlight nodes whose job IDs, users or name match any of these regexes
    patterns: Vec<String>,

    /// Output width in columns (default: terminal width)
    #[arg(short, long)]
    width: Option<usize>,

    /// Disable bold and reverse-video styling
    #[arg(long)]
    no_color: bool,

    /// Print the symbol legend after the map
    #[arg(short, long)]
    legend: bool,

    /// Print the grouped snapshot as JSON instead of the map
    #[arg(long)]
    json: bool,

    /// Read node status from a file with sinfo's output instead of running sinfo
    #[arg(long, value_name = "PATH")]
    nodes_file: Option<PathBuf>,

    /// Read job status from a file with squeue's output instead of running squeue
    #[arg(long, value_name = "PATH")]
    jobs_file: Option<PathBuf>,

    /// Log diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn render_options(&self, highlighter: Highlighter) -> RenderOptions {
        RenderOptions {
            highlighter,
            width: self.width.filter(|w| *w > 0).unwrap_or_else(terminal_width),
            styling: Styling {
                ansi: !self.no_color && io::stdout().is_terminal(),
            },
            legend: self.legend,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let highlighter = Highlighter::new(&args.patterns)?;
    debug!(searching = highlighter.is_searching(), patterns = ?args.patterns, "search");

    let node_feed = FeedSource::file_or(args.nodes_file.clone(), FeedSource::sinfo);
    let job_feed = FeedSource::file_or(args.jobs_file.clone(), FeedSource::squeue);
    let snapshot = ClusterSnapshot::collect(&node_feed, &job_feed)?;

    let mut stdout = io::stdout().lock();
    if args.json {
        render::json::write_json(&mut stdout, &snapshot, &highlighter)?;
    } else {
        let options = args.render_options(highlighter);
        render_cluster(&mut stdout, &snapshot, &options)?;
    }
    stdout.flush()?;
    Ok(())
}
