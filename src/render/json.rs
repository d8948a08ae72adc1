// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Machine-readable form of the grouped snapshot.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use super::bar::usage_bar;
use super::group::{group_by_capacity, GroupKey};
use super::highlight::{Highlight, Highlighter};
use crate::cluster::ClusterSnapshot;

#[derive(Debug, Serialize)]
pub struct GroupReport<'a> {
    #[serde(flatten)]
    pub key: GroupKey,
    pub default: bool,
    pub nodes: Vec<NodeReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NodeReport<'a> {
    pub name: &'a str,
    pub state: &'a str,
    pub load: &'a str,
    pub allocated: i64,
    pub idle: i64,
    pub unavailable: i64,
    pub bar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<&'a BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<&'a BTreeSet<String>>,
    pub highlight: Highlight,
}

pub fn build_report<'a>(snapshot: &'a ClusterSnapshot, highlighter: &Highlighter) -> Vec<GroupReport<'a>> {
    group_by_capacity(snapshot.nodes.values())
        .into_iter()
        .map(|group| GroupReport {
            default: snapshot.is_default_partition(&group.key.partition),
            nodes: group
                .members
                .iter()
                .map(|&node| {
                    let usage = snapshot.usage(node.name());
                    NodeReport {
                        name: node.name(),
                        state: &node.state,
                        load: &node.load,
                        allocated: node.allocated,
                        idle: node.idle,
                        unavailable: node.unavailable,
                        bar: usage_bar(node, usage),
                        jobs: usage.map(|u| &u.jobs),
                        users: usage.map(|u| &u.users),
                        highlight: highlighter.highlight(node.name(), usage),
                    }
                })
                .collect(),
            key: group.key,
        })
        .collect()
}

/// Pretty-printed JSON array of groups
pub fn write_json<W: Write>(out: &mut W, snapshot: &ClusterSnapshot, highlighter: &Highlighter) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &build_report(snapshot, highlighter))?;
    writeln!(out)?;
    Ok(())
}
