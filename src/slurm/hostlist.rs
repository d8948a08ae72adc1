// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Expansion of compressed Slurm host lists such as `node[01-03,05],login1`.

use anyhow::{anyhow, bail, Context, Result};

/// Expand a Slurm nodelist to individual hostnames, in listed order.
pub fn expand_hostlist(nodelist: &str) -> Result<Vec<String>> {
    let nodelist = nodelist.trim();
    if nodelist.is_empty() || nodelist == "(null)" {
        return Ok(Vec::new());
    }

    let mut hosts = Vec::new();
    for item in split_top_level(nodelist)? {
        if !item.is_empty() {
            hosts.extend(expand_item(item)?);
        }
    }
    Ok(hosts)
}

/// Split on commas that are not inside brackets
fn split_top_level(s: &str) -> Result<Vec<&str>> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("unbalanced ']' in host list '{}'", s))?;
            }
            ',' if depth == 0 => {
                items.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        bail!("unbalanced '[' in host list '{}'", s);
    }
    items.push(&s[start..]);
    Ok(items)
}

/// Expand one item; several bracket groups multiply out (`r[1-2]n[1-2]`).
fn expand_item(item: &str) -> Result<Vec<String>> {
    let Some(open) = item.find('[') else {
        return Ok(vec![item.to_string()]);
    };
    let close = item[open..]
        .find(']')
        .map(|i| open + i)
        .ok_or_else(|| anyhow!("unbalanced '[' in host '{}'", item))?;

    let prefix = &item[..open];
    let suffixes = expand_item(&item[close + 1..])?;

    let mut hosts = Vec::new();
    for part in item[open + 1..close].split(',') {
        for middle in expand_range(part).with_context(|| format!("invalid host list '{}'", item))? {
            for suffix in &suffixes {
                hosts.push(format!("{}{}{}", prefix, middle, suffix));
            }
        }
    }
    Ok(hosts)
}

/// Expand `a-b` (zero-padded to the width of `a`) or a literal
fn expand_range(part: &str) -> Result<Vec<String>> {
    let part = part.trim();
    let Some((lo, hi)) = part.split_once('-') else {
        if part.is_empty() {
            bail!("empty range element");
        }
        return Ok(vec![part.to_string()]);
    };

    let width = lo.len();
    let start: u64 = lo.parse().with_context(|| format!("invalid range start '{}'", lo))?;
    let end: u64 = hi.parse().with_context(|| format!("invalid range end '{}'", hi))?;
    if end < start {
        bail!("descending range '{}'", part);
    }
    Ok((start..=end).map(|n| format!("{:0width$}", n, width = width)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ranges_and_literals() {
        assert_eq!(
            expand_hostlist("node[01-03,05]").unwrap(),
            vec!["node01", "node02", "node03", "node05"]
        );
    }

    #[test]
    fn test_expand_plain_hosts() {
        assert_eq!(expand_hostlist("login1").unwrap(), vec!["login1"]);
        assert_eq!(
            expand_hostlist("login1,node[7-8],gpu2").unwrap(),
            vec!["login1", "node7", "node8", "gpu2"]
        );
    }

    #[test]
    fn test_expand_zero_padding_follows_start_width() {
        assert_eq!(
            expand_hostlist("n[098-101]").unwrap(),
            vec!["n098", "n099", "n100", "n101"]
        );
        assert_eq!(expand_hostlist("n[9-10]").unwrap(), vec!["n9", "n10"]);
    }

    #[test]
    fn test_expand_multiple_bracket_groups() {
        assert_eq!(
            expand_hostlist("r[1-2]-n[1-2]").unwrap(),
            vec!["r1-n1", "r1-n2", "r2-n1", "r2-n2"]
        );
        assert_eq!(expand_hostlist("gpu[1-2].ib").unwrap(), vec!["gpu1.ib", "gpu2.ib"]);
    }

    #[test]
    fn test_expand_empty() {
        assert!(expand_hostlist("").unwrap().is_empty());
        assert!(expand_hostlist("(null)").unwrap().is_empty());
    }

    #[test]
    fn test_expand_invalid() {
        assert!(expand_hostlist("node[01-03").is_err());
        assert!(expand_hostlist("node01-03]").is_err());
        assert!(expand_hostlist("node[a-c]").is_err());
        assert!(expand_hostlist("node[5-3]").is_err());
        assert!(expand_hostlist("node[]").is_err());
    }
}
