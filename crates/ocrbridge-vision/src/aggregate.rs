// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result aggregation — observations to the single string returned to callers.

use ocrbridge_core::{NormalizedRegion, TextObservation};

use crate::region::filter_observations;

/// Join observation texts with `\n`, in order. No trailing newline; an empty
/// list gives an empty string. Text is never trimmed or rewritten.
pub fn join_observations(observations: &[TextObservation]) -> String {
    observations
        .iter()
        .map(|obs| obs.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Filter by the optional region, then join.
pub fn collect_text(
    observations: Vec<TextObservation>,
    region: Option<&NormalizedRegion>,
) -> String {
    join_observations(&filter_observations(observations, region))
}
