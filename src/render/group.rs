// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use serde::Serialize;

use crate::slurm::NodeRecord;

/// Nodes with identical capacity within a partition are drawn as one block
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    pub partition: String,
    pub cores: i64,
    pub memory: u64,
}

impl GroupKey {
    pub fn of(node: &NodeRecord) -> Self {
        Self {
            partition: node.partition().to_string(),
            cores: node.cores,
            memory: node.memory,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapacityGroup<'a> {
    pub key: GroupKey,
    /// Members ordered by node name
    pub members: Vec<&'a NodeRecord>,
}

/// Sort nodes by capacity key, then by (name, partition), and split into groups
pub fn group_by_capacity<'a, I>(nodes: I) -> Vec<CapacityGroup<'a>>
where
    I: IntoIterator<Item = &'a NodeRecord>,
{
    let mut sorted: Vec<(GroupKey, &NodeRecord)> =
        nodes.into_iter().map(|n| (GroupKey::of(n), n)).collect();
    sorted.sort_by(|(ka, a), (kb, b)| ka.cmp(kb).then_with(|| a.key.cmp(&b.key)));

    let mut groups: Vec<CapacityGroup> = Vec::new();
    for (key, node) in sorted {
        match groups.last_mut() {
            Some(group) if group.key == key => group.members.push(node),
            _ => groups.push(CapacityGroup {
                key,
                members: vec![node],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slurm::NodeKey;

    fn node(name: &str, partition: &str, cores: i64, memory: u64) -> NodeRecord {
        NodeRecord {
            key: NodeKey {
                name: name.to_string(),
                partition: partition.to_string(),
            },
            load: "0.00".to_string(),
            allocated: 0,
            idle: cores,
            unavailable: 0,
            cores,
            memory,
            state: "idle".to_string(),
        }
    }

    #[test]
    fn test_same_capacity_shares_a_group_sorted_by_name() {
        let nodes = vec![
            node("node03", "compute", 32, 1000),
            node("node01", "compute", 32, 1000),
            node("node02", "compute", 32, 1000),
        ];
        let groups = group_by_capacity(&nodes);

        assert_eq!(groups.len(), 1);
        let names: Vec<&str> = groups[0].members.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["node01", "node02", "node03"]);
    }

    #[test]
    fn test_groups_in_ascending_key_order() {
        let nodes = vec![
            node("big01", "compute", 64, 1000),
            node("gpu01", "gpu", 16, 1000),
            node("fat01", "compute", 32, 4000),
            node("std01", "compute", 32, 1000),
            node("dbg01", "debug", 32, 1000),
        ];
        let keys: Vec<(String, i64, u64)> = group_by_capacity(&nodes)
            .into_iter()
            .map(|g| (g.key.partition, g.key.cores, g.key.memory))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("compute".to_string(), 32, 1000),
                ("compute".to_string(), 32, 4000),
                ("compute".to_string(), 64, 1000),
                ("debug".to_string(), 32, 1000),
                ("gpu".to_string(), 16, 1000),
            ]
        );
    }

    #[test]
    fn test_node_in_two_partitions_appears_in_both() {
        let nodes = vec![node("node01", "compute", 8, 1000), node("node01", "debug", 8, 1000)];
        let groups = group_by_capacity(&nodes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members[0].partition(), "compute");
        assert_eq!(groups[1].members[0].partition(), "debug");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_capacity(&Vec::<NodeRecord>::new()).is_empty());
    }
}
