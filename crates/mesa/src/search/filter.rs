//! Client-side result filtering
//!
//! The gateway has no rating or price parameters, so both predicates run over
//! the fetched array. Filtering is stable: kept places stay in gateway order.

use std::cmp::Ordering;

use mesa_api::{FilterSet, LatLng, Place};
use mesa_core::distance_between;

/// Rating at least `min_rating` (a missing rating counts as 0) and, when price
/// levels are given, a defined price level among them.
pub fn matches(place: &Place, filters: &FilterSet) -> bool {
    let rating_ok = filters
        .min_rating
        .is_none_or(|min| place.rating.unwrap_or(0.0) >= min);

    let price_ok = filters.price_levels.is_empty()
        || place
            .price_level
            .is_some_and(|level| filters.price_levels.contains(&level));

    rating_ok && price_ok
}

pub fn apply(results: &[Place], filters: &FilterSet) -> Vec<Place> {
    results
        .iter()
        .filter(|place| matches(place, filters))
        .cloned()
        .collect()
}

/// Stable sort by great-circle distance from `origin`, nearest first.
pub fn sort_by_distance(places: &mut [Place], origin: LatLng) {
    places.sort_by(|a, b| {
        let da = distance_between(origin, a.location());
        let db = distance_between(origin, b.location());
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn place(id: &str, rating: Option<f64>, price: Option<u8>) -> Place {
        let mut place = Place::new(id, id, "Centro", LatLng::new(19.43, -99.13));
        place.rating = rating;
        place.price_level = price;
        place
    }

    #[test]
    fn test_min_rating_treats_missing_as_zero() {
        let results = vec![
            place("a", Some(4.5), None),
            place("b", None, None),
            place("c", Some(3.9), None),
            place("d", Some(4.0), None),
        ];
        let kept = apply(&results, &FilterSet::default().with_min_rating(4.0));
        let ids: Vec<&str> = kept.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_price_filter_excludes_undefined_price() {
        let results = vec![
            place("cheap", None, Some(1)),
            place("unknown", None, None),
            place("fancy", None, Some(4)),
            place("mid", None, Some(2)),
        ];
        let kept = apply(&results, &FilterSet::default().with_price_levels([1, 2]));
        let ids: Vec<&str> = kept.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, vec!["cheap", "mid"]);
    }

    #[test]
    fn test_sort_by_distance_is_nearest_first_and_stable() {
        let origin = LatLng::new(19.4326, -99.1332);
        let mut far = place("far", None, None);
        far.geometry.location = LatLng::new(20.6597, -103.3496);
        let mut near = place("near", None, None);
        near.geometry.location = LatLng::new(19.4330, -99.1330);
        let mut near_twin = place("near-twin", None, None);
        near_twin.geometry.location = LatLng::new(19.4330, -99.1330);

        let mut places = vec![far, near, near_twin];
        sort_by_distance(&mut places, origin);
        let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "near-twin", "far"]);
    }

    fn arb_place() -> impl Strategy<Value = Place> {
        (
            "[a-z]{1,8}",
            proptest::option::of(0.0f64..=5.0),
            proptest::option::of(0u8..=4),
        )
            .prop_map(|(id, rating, price)| place(&id, rating, price))
    }

    proptest! {
        #[test]
        fn prop_empty_filter_is_identity(results in prop::collection::vec(arb_place(), 0..30)) {
            prop_assert_eq!(apply(&results, &FilterSet::default()), results);
        }

        #[test]
        fn prop_min_rating_keeps_only_rated_at_least(
            results in prop::collection::vec(arb_place(), 0..30),
            min in 0.0f64..=5.0,
        ) {
            let kept = apply(&results, &FilterSet::default().with_min_rating(min));
            for place in &kept {
                prop_assert!(place.rating.unwrap_or(0.0) >= min);
            }
            let expected = results.iter().filter(|p| p.rating.unwrap_or(0.0) >= min).count();
            prop_assert_eq!(kept.len(), expected);
        }

        #[test]
        fn prop_filtered_is_ordered_subsequence(
            results in prop::collection::vec(arb_place(), 0..30),
            min in 0.0f64..=5.0,
            levels in prop::collection::vec(0u8..=4, 0..3),
        ) {
            let filters = FilterSet::default().with_min_rating(min).with_price_levels(levels);
            let kept = apply(&results, &filters);
            let mut remaining = results.iter();
            for place in &kept {
                prop_assert!(remaining.any(|p| p == place));
            }
        }
    }
}
