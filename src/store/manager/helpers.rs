// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Snapshot manager helpers: id/name generation, timestamps, eviction.

static SNAPSHOT_SEQ: AtomicU64 = AtomicU64::new(0);

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Ids are `snap-<epoch ms>-<seq>`; the process-local sequence keeps ids
/// distinct even when several snapshots land in the same millisecond.
fn generate_snapshot_id(now_ms: u64) -> SnapshotId {
    let seq = SNAPSHOT_SEQ.fetch_add(1, Ordering::Relaxed);
    SnapshotId::new(format!("snap-{now_ms}-{seq}"))
        .expect("generated snapshot id is valid")
}

fn default_snapshot_name(now_ms: u64) -> String {
    format!("Snapshot {}", format_timestamp_utc(now_ms))
}

/// `YYYY-MM-DD HH:MM`, UTC, minute precision.
fn format_timestamp_utc(epoch_ms: u64) -> String {
    let secs = epoch_ms / 1000;
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let rem = secs % 86_400;
    let hour = rem / 3600;
    let minute = (rem % 3600) / 60;
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")
}

/// Gregorian date from days since the epoch (Howard Hinnant's civil
/// calendar algorithm).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

/// Appends ` (2)`, ` (3)`, ... until the candidate is unique among `taken`.
fn disambiguate_name(candidate: &str, taken: &BTreeSet<String>) -> String {
    if !taken.contains(candidate) {
        return candidate.to_owned();
    }

    let mut suffix = 2u64;
    loop {
        let name = format!("{candidate} ({suffix})");
        if !taken.contains(&name) {
            return name;
        }
        suffix = suffix.saturating_add(1);
    }
}

/// Index of the oldest snapshot by timestamp; ties keep insertion order by
/// returning the first.
fn oldest_snapshot_index(snapshots: &[Snapshot]) -> Option<usize> {
    let mut oldest: Option<(usize, u64)> = None;
    for (index, snapshot) in snapshots.iter().enumerate() {
        let is_older = oldest.map_or(true, |(_, ts)| snapshot.saved_at_ms < ts);
        if is_older {
            oldest = Some((index, snapshot.saved_at_ms));
        }
    }
    oldest.map(|(index, _)| index)
}

fn skip_summary(name: &str, report: &SchemaReport) -> String {
    format!(
        "Restored snapshot \"{name}\": skipped {} missing entities and {} missing fields",
        report.skipped_entity_count(),
        report.skipped_field_count()
    )
}
