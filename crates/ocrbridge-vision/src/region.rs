// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region filter — keeps the observations whose bounding box overlaps a
// caller-supplied region of interest.
//
// This runs after every recognition call, whether or not the engine already
// honoured the region natively, so results never depend on which backend ran.

use ocrbridge_core::{NormalizedRegion, TextObservation};
use tracing::debug;

/// Apply an optional region to a list of observations.
///
/// - `None` returns the observations unchanged.
/// - `Some(region)` clamps the region into the unit square, then keeps the
///   observations whose box has a positive-area overlap with it, in their
///   original order. Observations without a box are dropped.
pub fn filter_observations(
    observations: Vec<TextObservation>,
    region: Option<&NormalizedRegion>,
) -> Vec<TextObservation> {
    let Some(region) = region else {
        return observations;
    };
    let region = region.clamped();
    let total = observations.len();

    let retained: Vec<TextObservation> = observations
        .into_iter()
        .filter(|obs| {
            obs.bounding_box
                .as_ref()
                .is_some_and(|bbox| region.intersects(bbox))
        })
        .collect();

    debug!(total, retained = retained.len(), "Region filter applied");
    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrbridge_core::NormalizedRect;

    fn obs(text: &str, x: f64, y: f64, w: f64, h: f64) -> TextObservation {
        TextObservation::new(text, NormalizedRect::new(x, y, w, h))
    }

    fn texts(observations: &[TextObservation]) -> Vec<&str> {
        observations.iter().map(|o| o.text.as_str()).collect()
    }

    #[test]
    fn no_region_passes_everything_through() {
        let input = vec![
            obs("a", 0.0, 0.0, 0.1, 0.1),
            TextObservation {
                text: "boxless".into(),
                bounding_box: None,
                confidence: None,
            },
        ];
        let out = filter_observations(input.clone(), None);
        assert_eq!(out, input);
    }

    #[test]
    fn keeps_inside_drops_disjoint() {
        let region = NormalizedRect::new(0.1, 0.3, 0.8, 0.2);
        let input = vec![
            obs("inside", 0.15, 0.32, 0.2, 0.05),
            obs("corner", 0.0, 0.0, 0.05, 0.05),
        ];
        let out = filter_observations(input, Some(&region));
        assert_eq!(texts(&out), ["inside"]);
    }

    #[test]
    fn preserves_engine_order() {
        let region = NormalizedRect::new(0.0, 0.0, 1.0, 0.5);
        let input = vec![
            obs("third line", 0.1, 0.4, 0.5, 0.05),
            obs("below", 0.1, 0.8, 0.5, 0.05),
            obs("first line", 0.1, 0.1, 0.5, 0.05),
            obs("partial", 0.1, 0.45, 0.5, 0.2),
        ];
        let out = filter_observations(input, Some(&region));
        assert_eq!(texts(&out), ["third line", "first line", "partial"]);
    }

    #[test]
    fn boxless_observations_dropped_under_region() {
        let input = vec![TextObservation {
            text: "floating".into(),
            bounding_box: None,
            confidence: Some(0.9),
        }];
        assert!(filter_observations(input, Some(&NormalizedRect::UNIT)).is_empty());
    }

    #[test]
    fn touching_region_matches_nothing() {
        let region = NormalizedRect::new(0.5, 0.0, 0.5, 1.0);
        let input = vec![obs("left half", 0.0, 0.0, 0.5, 1.0)];
        assert!(filter_observations(input, Some(&region)).is_empty());
    }

    #[test]
    fn out_of_range_region_is_clamped() {
        // Extends past every edge; clamped to the whole image.
        let region = NormalizedRect::new(-1.0, -1.0, 3.0, 3.0);
        let input = vec![obs("a", 0.9, 0.9, 0.1, 0.1), obs("b", 0.0, 0.0, 0.1, 0.1)];
        assert_eq!(texts(&filter_observations(input, Some(&region))), ["a", "b"]);

        // Entirely off-image; collapses to nothing.
        let region = NormalizedRect::new(1.5, 0.0, 1.0, 1.0);
        let input = vec![obs("edge", 0.95, 0.0, 0.05, 1.0)];
        assert!(filter_observations(input, Some(&region)).is_empty());
    }

    #[test]
    fn non_finite_region_matches_nothing() {
        let regions = [
            NormalizedRect::new(f64::NAN, 0.0, 0.5, 1.0),
            NormalizedRect::new(0.0, 0.0, f64::NAN, f64::NAN),
            NormalizedRect::new(f64::NEG_INFINITY, 0.0, f64::INFINITY, 1.0),
            NormalizedRect::new(0.0, 0.0, 1.0, f64::INFINITY),
        ];
        for region in &regions {
            let input = vec![obs("a", 0.1, 0.1, 0.2, 0.2), obs("b", 0.0, 0.0, 1.0, 1.0)];
            assert!(
                filter_observations(input, Some(region)).is_empty(),
                "{region:?} should match nothing"
            );
        }
    }

    #[test]
    fn filtered_set_is_subset_of_unfiltered() {
        let input: Vec<TextObservation> = (0..20)
            .map(|i| {
                let f = f64::from(i) / 20.0;
                obs(&format!("line {i}"), f, f, 0.04, 0.04)
            })
            .collect();
        let region = NormalizedRect::new(0.25, 0.25, 0.3, 0.3);
        let all = filter_observations(input.clone(), None);
        let some = filter_observations(input, Some(&region));
        assert!(some.len() <= all.len());
        assert!(some.iter().all(|o| all.contains(o)));
        assert!(!some.is_empty());
    }
}
