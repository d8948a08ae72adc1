// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Slurm integration: the sinfo node feed, the squeue job feed and host lists.

pub mod hostlist;
pub mod parser;
pub mod slurm;
pub mod types;

pub use hostlist::expand_hostlist;
pub use slurm::FeedSource;
pub use types::{JobUsage, NodeKey, NodeRecord};
