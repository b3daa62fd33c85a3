// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Live state components and the composed diagram aggregate.

pub mod diagram;
pub mod grouping;
pub mod selection;
pub mod serial;
pub mod toast;
pub mod viewport;

pub use diagram::DiagramState;
pub use grouping::{
    derive_groups, normalize_color, preset_group_name, ColorGroups, DerivedGroup, GroupFilter,
};
pub use selection::SelectionState;
pub use serial::{EdgeOffset, EntityPosition, SerializableState};
pub use toast::{Toast, ToastKind, ToastNotifier, TOAST_DURATION};
pub use viewport::{
    PanOffset, ViewportState, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
