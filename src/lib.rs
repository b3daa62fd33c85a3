// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galatea is an embeddable ER-diagram state core for CRM metadata.
//!
//! The host shell owns rendering, metadata fetching, and the event loop;
//! this crate owns the composed diagram state (selection, viewport, color
//! groups, field ordering), the snapshot manager (persistence, validation
//! against schema drift, import/export, URL sharing), and debounced
//! auto-save.

pub mod model;
pub mod query;
pub mod sched;
pub mod state;
pub mod store;
