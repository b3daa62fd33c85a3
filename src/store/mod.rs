// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Snapshot persistence: the key-value collaborator, the snapshot manager,
//! schema validation, import/export, sharing, and auto-save.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::SnapshotId;
use crate::state::SerializableState;

pub mod autosave;
pub mod manager;
pub mod share;
pub mod transfer;
pub mod validate;
pub(crate) mod wire;

pub use autosave::{AutoSaver, AUTO_SAVE_DEBOUNCE};
pub use manager::{SnapshotManager, SnapshotSummary, AUTO_SAVE_ID, MAX_SNAPSHOTS};
pub use share::{
    build_share_url, decode_share_state, encode_share_state, share_state_from_url, Clipboard,
    ClipboardError, ShareDecodeError, ShareError, ShareState, ShareUrl, SHARE_FRAGMENT_PREFIX,
    SHARE_URL_HARD_LIMIT, SHARE_URL_SOFT_LIMIT,
};
pub use transfer::{ImportPayload, TransferError, TRANSFER_VERSION};
pub use validate::{filter_invalid_entries, validate_state, MissingField, SchemaReport};

/// The single storage key under which the whole snapshot collection lives.
/// Writes are last-writer-wins at this granularity; concurrent tabs are an
/// accepted limitation.
pub const STORAGE_KEY: &str = "galatea-erd-snapshots";

pub const SNAPSHOT_VERSION: u32 = 2;

/// A named, timestamped capture of the full diagram state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub snapshot_id: SnapshotId,
    pub name: String,
    pub saved_at_ms: u64,
    pub version: u32,
    pub state: SerializableState,
}

/// The persistence collaborator: a string key-value store in the shape of
/// web-local storage. `set` fails when the backend is out of quota.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    QuotaExceeded { key: String },
    Backend { key: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExceeded { key } => write!(f, "storage quota exceeded for key {key:?}"),
            Self::Backend { key, message } => {
                write!(f, "storage backend error for key {key:?}: {message}")
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// In-memory store used by tests and hosts without a durable backend. An
/// optional byte capacity simulates quota exhaustion.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    capacity_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bytes(capacity_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity_bytes: Some(capacity_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity_bytes {
            let other_bytes: usize = self
                .entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(_, existing)| existing.len())
                .sum();
            if other_bytes + value.len() > capacity {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                });
            }
        }

        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
