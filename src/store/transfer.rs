// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Import/export file format.
//!
//! Two shapes, distinguished by a boolean marker field: a single-snapshot
//! document and a bulk document carrying the whole collection plus the
//! auto-save slot and flag. Payloads without a recognized marker are
//! rejected at the boundary, never partially applied.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::wire::SnapshotJson;

pub const TRANSFER_VERSION: u32 = 2;

pub const SINGLE_MARKER: &str = "erdVisualizerSnapshot";
pub const BULK_MARKER: &str = "erdVisualizerSnapshotsExport";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleExportJson {
    #[serde(rename = "erdVisualizerSnapshot")]
    pub marker: bool,
    pub version: u32,
    /// Export time in epoch milliseconds.
    pub exported: u64,
    pub snapshot: SnapshotJson,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkExportJson {
    #[serde(rename = "erdVisualizerSnapshotsExport")]
    pub marker: bool,
    pub version: u32,
    pub exported: u64,
    pub count: usize,
    pub snapshots: Vec<SnapshotJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_auto_save: Option<SnapshotJson>,
    #[serde(default = "default_auto_save_enabled")]
    pub auto_save_enabled: bool,
}

fn default_auto_save_enabled() -> bool {
    true
}

#[derive(Debug)]
pub enum ImportPayload {
    Single(SnapshotJson),
    Bulk(BulkExportJson),
}

#[derive(Debug)]
pub enum TransferError {
    Json(serde_json::Error),
    UnrecognizedFormat,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(source) => write!(f, "cannot parse snapshot file: {source}"),
            Self::UnrecognizedFormat => {
                f.write_str("file is not a recognized snapshot export")
            }
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(source) => Some(source),
            Self::UnrecognizedFormat => None,
        }
    }
}

/// Parses an already-read export file. The marker is checked on the raw
/// value first so a bulk file is never half-read as a single one.
pub fn parse_import(payload: &str) -> Result<ImportPayload, TransferError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(TransferError::Json)?;

    if marker_is_set(&value, SINGLE_MARKER) {
        let doc: SingleExportJson =
            serde_json::from_value(value).map_err(TransferError::Json)?;
        return Ok(ImportPayload::Single(doc.snapshot));
    }

    if marker_is_set(&value, BULK_MARKER) {
        let doc: BulkExportJson =
            serde_json::from_value(value).map_err(TransferError::Json)?;
        return Ok(ImportPayload::Bulk(doc));
    }

    Err(TransferError::UnrecognizedFormat)
}

fn marker_is_set(value: &serde_json::Value, marker: &str) -> bool {
    value.get(marker).and_then(serde_json::Value::as_bool) == Some(true)
}

pub fn export_single_document(snapshot: SnapshotJson, exported_ms: u64) -> String {
    let doc = SingleExportJson {
        marker: true,
        version: TRANSFER_VERSION,
        exported: exported_ms,
        snapshot,
    };
    to_pretty_document(&doc)
}

pub fn export_bulk_document(
    snapshots: Vec<SnapshotJson>,
    last_auto_save: Option<SnapshotJson>,
    auto_save_enabled: bool,
    exported_ms: u64,
) -> String {
    let doc = BulkExportJson {
        marker: true,
        version: TRANSFER_VERSION,
        exported: exported_ms,
        count: snapshots.len(),
        snapshots,
        last_auto_save,
        auto_save_enabled,
    };
    to_pretty_document(&doc)
}

fn to_pretty_document(doc: &impl Serialize) -> String {
    let json = serde_json::to_string_pretty(doc)
        .expect("export documents serialize without fallible map keys");
    format!("{json}\n")
}
