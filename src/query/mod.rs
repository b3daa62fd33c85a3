// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the entity catalog for the browse panel.

use regex::RegexBuilder;

use crate::model::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySearchMode {
    Substring,
    Regex,
    Fuzzy,
}

/// Searches logical and display names.
///
/// Substring and regex modes preserve catalog order; fuzzy mode returns
/// matches ranked best-first. An empty needle matches everything.
pub fn search_entities<'a>(
    entities: &'a [Entity],
    needle: &str,
    mode: EntitySearchMode,
    case_insensitive: bool,
) -> Result<Vec<&'a Entity>, regex::Error> {
    if needle.trim().is_empty() {
        return Ok(entities.iter().collect());
    }

    match mode {
        EntitySearchMode::Substring => {
            if case_insensitive {
                let needle_lower = needle.to_lowercase();
                Ok(entities
                    .iter()
                    .filter(|entity| {
                        entity.logical_name().as_str().to_lowercase().contains(&needle_lower)
                            || entity.display_name().to_lowercase().contains(&needle_lower)
                    })
                    .collect())
            } else {
                Ok(entities
                    .iter()
                    .filter(|entity| {
                        entity.logical_name().as_str().contains(needle)
                            || entity.display_name().contains(needle)
                    })
                    .collect())
            }
        }
        EntitySearchMode::Regex => {
            let regex = RegexBuilder::new(needle)
                .case_insensitive(case_insensitive)
                .build()?;
            Ok(entities
                .iter()
                .filter(|entity| {
                    regex.is_match(entity.logical_name().as_str())
                        || regex.is_match(entity.display_name())
                })
                .collect())
        }
        EntitySearchMode::Fuzzy => {
            let mut scored = entities
                .iter()
                .filter_map(|entity| {
                    let logical = fuzzy_score(needle, entity.logical_name().as_str());
                    let display = fuzzy_score(needle, entity.display_name());
                    let score = match (logical, display) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        (a, b) => a.or(b),
                    };
                    score.map(|score| (score, entity))
                })
                .collect::<Vec<_>>();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            Ok(scored.into_iter().map(|(_, entity)| entity).collect())
        }
    }
}

/// The browse-panel filter: case-insensitive substring search combined with
/// a publisher customization-prefix filter on the logical name. Empty
/// filters pass everything through.
pub fn filter_catalog<'a>(
    entities: &'a [Entity],
    search: &str,
    publisher_prefix: &str,
) -> Vec<&'a Entity> {
    let search_lower = search.trim().to_lowercase();
    entities
        .iter()
        .filter(|entity| {
            publisher_prefix.is_empty()
                || entity.logical_name().as_str().starts_with(publisher_prefix)
        })
        .filter(|entity| {
            search_lower.is_empty()
                || entity.logical_name().as_str().to_lowercase().contains(&search_lower)
                || entity.display_name().to_lowercase().contains(&search_lower)
        })
        .collect()
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }

    let needle_lower = needle.to_lowercase();
    let haystack_lower = haystack.to_lowercase();

    let subseq = subsequence_stats(&needle_lower, &haystack_lower)?;
    let ratio = rapidfuzz::fuzz::ratio(needle_lower.chars(), haystack_lower.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack_lower.contains(&needle_lower) {
        score += 2000;
    }

    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last: Option<usize> = None;
    let mut previous: Option<usize> = None;
    let mut consecutive = 0usize;

    for (index, ch) in haystack.chars().enumerate() {
        let Some(&wanted) = needle_iter.peek() else {
            break;
        };
        if ch != wanted {
            continue;
        }

        needle_iter.next();
        if first.is_none() {
            first = Some(index);
        }
        if previous.is_some_and(|prev| prev + 1 == index) {
            consecutive += 1;
        }
        previous = Some(index);
        last = Some(index);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    let last = last?;
    Some(SubsequenceStats {
        first,
        span: last - first + 1,
        consecutive,
        start_boundary: first == 0,
    })
}
