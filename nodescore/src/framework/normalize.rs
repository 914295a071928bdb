/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Min–max rescaling of raw strategy scores into the canonical range.
//!
//! Every strategy shares this one implementation:
//!
//! ```text
//! normalized = (raw - lowest) * (MAX_NODE_SCORE - MIN_NODE_SCORE) / (highest - lowest) + MIN_NODE_SCORE
//! ```
//!
//! Integer arithmetic, truncating toward zero.  The numerator is never
//! negative, so truncation and flooring agree.  Intermediates are `i128` so
//! the product cannot overflow for any `i64` input.
//!
//! # Degenerate range
//! When every raw score is equal (`highest == lowest`, which includes the
//! single-candidate case) the strategy cannot tell the nodes apart, and every
//! node receives [`MIN_NODE_SCORE`].  The strategy then contributes nothing
//! to the aggregated ranking instead of inflating every node to the top.

use tracing::debug;

use super::error::MalformedReason;
use crate::task::{NodeScoreList, RawScore, MAX_NODE_SCORE, MIN_NODE_SCORE};

/// Rescale `raw` into `[MIN_NODE_SCORE, MAX_NODE_SCORE]`, preserving order.
///
/// # Errors
/// [`MalformedReason::Empty`] if `raw` has no entries.
pub fn rescale(raw: &[RawScore]) -> Result<Vec<i64>, MalformedReason> {
    let Some((lowest, highest)) = bounds(raw) else {
        return Err(MalformedReason::Empty);
    };

    if highest == lowest {
        return Ok(vec![MIN_NODE_SCORE; raw.len()]);
    }

    let old_range = i128::from(highest) - i128::from(lowest);
    let new_range = i128::from(MAX_NODE_SCORE - MIN_NODE_SCORE);

    Ok(raw
        .iter()
        .map(|&r| {
            let scaled = (i128::from(r) - i128::from(lowest)) * new_range / old_range;
            // scaled ∈ [0, new_range], always fits
            scaled as i64 + MIN_NODE_SCORE
        })
        .collect())
}

/// Normalize a full [`NodeScoreList`] in one go.
///
/// Consumes the list and returns it with each entry's score replaced by its
/// canonical value.  Length, order and node names are unchanged.
pub fn normalize_scores(mut scores: NodeScoreList) -> Result<NodeScoreList, MalformedReason> {
    let raw: Vec<RawScore> = scores.iter().map(|s| s.score).collect();
    let normalized = rescale(&raw)?;

    for (entry, value) in scores.iter_mut().zip(normalized) {
        debug!(node = %entry.name, raw = entry.score, normalized = value, "normalized");
        entry.score = value;
    }
    Ok(scores)
}

/// `(lowest, highest)` in a single pass, `None` for an empty slice.
fn bounds(raw: &[RawScore]) -> Option<(RawScore, RawScore)> {
    let first = *raw.first()?;
    Some(
        raw.iter()
            .fold((first, first), |(lo, hi), &r| (lo.min(r), hi.max(r))),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
