// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Compact URL-based state sharing.
//!
//! A deliberately minimal subset of the state (selection, positions,
//! viewport, layout mode, filters, dark mode) is encoded into the URL
//! fragment. Per-field and per-color data are excluded: they dominate the
//! payload size and the receiving side can re-derive sensible defaults.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::model::LayoutMode;
use crate::state::serial::EntityPosition;
use crate::state::viewport::{PanOffset, DEFAULT_ZOOM};
use crate::state::SerializableState;

pub const SHARE_FRAGMENT_PREFIX: &str = "#erd=";

/// Past this length some browsers and chat clients truncate URLs; sharing
/// proceeds with a warning.
pub const SHARE_URL_SOFT_LIMIT: usize = 2000;

/// Past this length the share is refused outright.
pub const SHARE_URL_HARD_LIMIT: usize = 8192;

/// The minimal shared subset. Single-letter field names keep the encoded
/// fragment short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareState {
    #[serde(rename = "s", default)]
    pub selected: Vec<String>,
    #[serde(rename = "p", default)]
    pub positions: BTreeMap<String, [f64; 2]>,
    #[serde(rename = "z", default = "default_zoom")]
    pub zoom: f64,
    #[serde(rename = "o", default)]
    pub pan: [f64; 2],
    #[serde(rename = "l", default)]
    pub layout_mode: LayoutMode,
    #[serde(rename = "q", default, skip_serializing_if = "String::is_empty")]
    pub search_filter: String,
    #[serde(rename = "pf", default, skip_serializing_if = "String::is_empty")]
    pub publisher_filter: String,
    #[serde(rename = "sf", default, skip_serializing_if = "String::is_empty")]
    pub solution_filter: String,
    #[serde(rename = "d", default)]
    pub dark_mode: bool,
}

impl Default for ShareState {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            positions: BTreeMap::new(),
            zoom: DEFAULT_ZOOM,
            pan: [0.0, 0.0],
            layout_mode: LayoutMode::default(),
            search_filter: String::new(),
            publisher_filter: String::new(),
            solution_filter: String::new(),
            dark_mode: false,
        }
    }
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

/// Coordinates are encoded at one-decimal precision.
fn round_coordinate(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl ShareState {
    pub fn from_state(state: &SerializableState) -> Self {
        Self {
            selected: state.selected_entities.clone(),
            positions: state
                .positions
                .iter()
                .map(|(name, position)| {
                    (
                        name.clone(),
                        [round_coordinate(position.x), round_coordinate(position.y)],
                    )
                })
                .collect(),
            zoom: state.zoom,
            pan: [round_coordinate(state.pan.x), round_coordinate(state.pan.y)],
            layout_mode: state.layout_mode,
            search_filter: state.search_filter.clone(),
            publisher_filter: state.publisher_filter.clone(),
            solution_filter: state.solution_filter.clone(),
            dark_mode: state.dark_mode,
        }
    }

    /// Expands back into a full state, defaulting everything the share link
    /// deliberately drops. The aggregate's restore rules then apply (stored
    /// positions force manual layout).
    pub fn into_state(self) -> SerializableState {
        SerializableState {
            selected_entities: self.selected,
            positions: self
                .positions
                .into_iter()
                .map(|(name, [x, y])| (name, EntityPosition::new(x, y)))
                .collect(),
            zoom: self.zoom,
            pan: PanOffset::new(self.pan[0], self.pan[1]),
            layout_mode: self.layout_mode,
            search_filter: self.search_filter,
            publisher_filter: self.publisher_filter,
            solution_filter: self.solution_filter,
            dark_mode: self.dark_mode,
            ..SerializableState::default()
        }
    }
}

/// Pure codec half: state -> URL-safe token.
pub fn encode_share_state(state: &ShareState) -> String {
    let json = serde_json::to_vec(state).expect("share state serializes without fallible keys");
    URL_SAFE_NO_PAD.encode(json)
}

/// Pure codec half: URL-safe token -> state.
pub fn decode_share_state(token: &str) -> Result<ShareState, ShareDecodeError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(ShareDecodeError::Base64)?;
    serde_json::from_slice(&bytes).map_err(ShareDecodeError::Json)
}

#[derive(Debug)]
pub enum ShareDecodeError {
    MissingFragment,
    Base64(base64::DecodeError),
    Json(serde_json::Error),
}

impl fmt::Display for ShareDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFragment => f.write_str("url carries no shared-state fragment"),
            Self::Base64(source) => write!(f, "cannot decode shared-state token: {source}"),
            Self::Json(source) => write!(f, "cannot parse shared-state payload: {source}"),
        }
    }
}

impl std::error::Error for ShareDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingFragment => None,
            Self::Base64(source) => Some(source),
            Self::Json(source) => Some(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareUrl {
    pub url: String,
    pub exceeds_soft_limit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    TooLong { length: usize, max: usize },
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { length, max } => {
                write!(f, "share url is {length} chars, above the {max} limit")
            }
        }
    }
}

impl std::error::Error for ShareError {}

/// Builds the share URL on top of the current page URL (any existing
/// fragment is replaced). Fails above the hard limit; flags the soft limit.
pub fn build_share_url(page_url: &str, state: &ShareState) -> Result<ShareUrl, ShareError> {
    let base = page_url.split('#').next().unwrap_or(page_url);
    let url = format!("{base}{SHARE_FRAGMENT_PREFIX}{}", encode_share_state(state));

    let length = url.len();
    if length > SHARE_URL_HARD_LIMIT {
        return Err(ShareError::TooLong {
            length,
            max: SHARE_URL_HARD_LIMIT,
        });
    }

    Ok(ShareUrl {
        url,
        exceeds_soft_limit: length > SHARE_URL_SOFT_LIMIT,
    })
}

/// Decodes the shared state out of a full page URL, for the receiving side.
pub fn share_state_from_url(url: &str) -> Result<ShareState, ShareDecodeError> {
    let Some((_, fragment)) = url.split_once(SHARE_FRAGMENT_PREFIX) else {
        return Err(ShareDecodeError::MissingFragment);
    };
    decode_share_state(fragment)
}

/// The clipboard collaborator. Writes may be denied by the host platform;
/// failures surface as toasts, never as panics, and sharing mutates no
/// snapshot state so a failed write leaves nothing inconsistent.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardError {
    message: String,
}

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clipboard write failed: {}", self.message)
    }
}

impl std::error::Error for ClipboardError {}

#[cfg(test)]
mod tests {
    use super::{
        build_share_url, decode_share_state, encode_share_state, share_state_from_url,
        ShareDecodeError, ShareError, ShareState, SHARE_URL_HARD_LIMIT,
    };
    use crate::model::LayoutMode;
    use crate::state::serial::EntityPosition;
    use crate::state::SerializableState;

    fn sample_state() -> SerializableState {
        let mut state = SerializableState::default();
        state.selected_entities = vec!["account".to_owned(), "contact".to_owned()];
        state
            .positions
            .insert("account".to_owned(), EntityPosition::new(120.04, 80.06));
        state.layout_mode = LayoutMode::Manual;
        state.dark_mode = true;
        state
    }

    #[test]
    fn codec_round_trips_minimal_state() {
        let share = ShareState::from_state(&sample_state());
        let decoded = decode_share_state(&encode_share_state(&share)).unwrap();
        assert_eq!(decoded, share);
        assert_eq!(decoded.positions["account"], [120.0, 80.1]);
    }

    #[test]
    fn share_excludes_field_and_color_data() {
        let mut state = sample_state();
        state
            .entity_colors
            .insert("account".to_owned(), "#ef4444".to_owned());
        state
            .field_selection
            .insert("account".to_owned(), vec!["name".to_owned()]);

        let expanded = ShareState::from_state(&state).into_state();
        assert!(expanded.entity_colors.is_empty());
        assert!(expanded.field_selection.is_empty());
        assert_eq!(expanded.selected_entities, state.selected_entities);
        assert!(expanded.dark_mode);
    }

    #[test]
    fn url_builder_replaces_existing_fragment_and_decodes_back() {
        let share = ShareState::from_state(&sample_state());
        let built = build_share_url("https://crm.example/app#old-fragment", &share).unwrap();
        assert!(built.url.starts_with("https://crm.example/app#erd="));
        assert!(!built.exceeds_soft_limit);

        let decoded = share_state_from_url(&built.url).unwrap();
        assert_eq!(decoded, share);
    }

    #[test]
    fn url_above_hard_limit_is_refused() {
        let mut share = ShareState::default();
        for index in 0..600 {
            share.selected.push(format!("very_long_entity_logical_name_{index}"));
        }

        match build_share_url("https://crm.example/app", &share) {
            Err(ShareError::TooLong { length, max }) => {
                assert!(length > max);
                assert_eq!(max, SHARE_URL_HARD_LIMIT);
            }
            other => panic!("expected TooLong, got: {other:?}"),
        }
    }

    #[test]
    fn url_without_fragment_is_reported_as_missing() {
        let err = share_state_from_url("https://crm.example/app").unwrap_err();
        assert!(matches!(err, ShareDecodeError::MissingFragment));
    }

    #[test]
    fn garbage_tokens_are_decode_errors() {
        assert!(matches!(
            decode_share_state("!!!not-base64!!!"),
            Err(ShareDecodeError::Base64(_))
        ));

        // Valid base64, invalid JSON inside.
        let token = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            b"not json",
        );
        assert!(matches!(
            decode_share_state(&token),
            Err(ShareDecodeError::Json(_))
        ));
    }
}
