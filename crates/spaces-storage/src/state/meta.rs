// SPDX-License-Identifier: MIT

//! The fourth logical collection: schema version, the identity mapping,
//! and the legacy-bootstrap flag (`spec.md` §6 "Persisted state layout").

use serde::{Deserialize, Serialize};
use spaces_core::{WindowId, WorkspaceId};
use std::collections::HashMap;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub permanent_id_mappings: HashMap<WindowId, WorkspaceId>,
    #[serde(default)]
    pub bootstrap_done: bool,
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            permanent_id_mappings: HashMap::new(),
            bootstrap_done: false,
        }
    }
}
