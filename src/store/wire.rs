// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire structs for the persisted storage document.
//!
//! Domain snapshots carry a typed [`SnapshotId`]; the wire form is plain
//! strings, converted explicitly in both directions. Unknown-version or
//! partially-filled documents deserialize with defaults rather than erroring.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{IdError, SnapshotId};
use crate::state::SerializableState;

use super::{Snapshot, SNAPSHOT_VERSION};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotJson {
    pub id: String,
    pub name: String,
    pub timestamp: u64,
    #[serde(default = "default_snapshot_version")]
    pub version: u32,
    #[serde(default)]
    pub state: SerializableState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocJson {
    #[serde(default)]
    pub snapshots: Vec<SnapshotJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_auto_save: Option<SnapshotJson>,
    #[serde(default = "default_auto_save_enabled")]
    pub auto_save_enabled: bool,
}

fn default_snapshot_version() -> u32 {
    SNAPSHOT_VERSION
}

fn default_auto_save_enabled() -> bool {
    true
}

pub fn snapshot_to_json(snapshot: &Snapshot) -> SnapshotJson {
    SnapshotJson {
        id: snapshot.snapshot_id.to_string(),
        name: snapshot.name.clone(),
        timestamp: snapshot.saved_at_ms,
        version: snapshot.version,
        state: snapshot.state.clone(),
    }
}

pub fn snapshot_from_json(json: SnapshotJson) -> Result<Snapshot, IdError> {
    Ok(Snapshot {
        snapshot_id: SnapshotId::new(json.id)?,
        name: json.name,
        saved_at_ms: json.timestamp,
        version: json.version,
        state: json.state,
    })
}

#[cfg(test)]
mod tests {
    use super::{snapshot_from_json, PersistedDocJson, SnapshotJson};
    use crate::store::SNAPSHOT_VERSION;

    #[test]
    fn empty_doc_defaults_auto_save_on() {
        let doc: PersistedDocJson = serde_json::from_str("{}").unwrap();
        assert!(doc.snapshots.is_empty());
        assert!(doc.last_auto_save.is_none());
        assert!(doc.auto_save_enabled);
    }

    #[test]
    fn versionless_snapshot_gets_current_version() {
        let json: SnapshotJson = serde_json::from_str(
            r#"{"id": "snap-1", "name": "First", "timestamp": 12, "state": {}}"#,
        )
        .unwrap();
        assert_eq!(json.version, SNAPSHOT_VERSION);

        let snapshot = snapshot_from_json(json).unwrap();
        assert_eq!(snapshot.snapshot_id.as_str(), "snap-1");
        assert_eq!(snapshot.saved_at_ms, 12);
    }

    #[test]
    fn invalid_snapshot_id_is_rejected_at_conversion() {
        let json: SnapshotJson =
            serde_json::from_str(r#"{"id": "", "name": "Bad", "timestamp": 0, "state": {}}"#)
                .unwrap();
        assert!(snapshot_from_json(json).is_err());
    }
}
