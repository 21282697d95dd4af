//! Property tests for the selection, distance and relevance invariants

use proptest::prelude::*;

use visual_search::core::config::{DistanceCost, ModelConfig};
use visual_search::core::types::ItemId;
use visual_search::search::item::{SearchTemplate, VisualItem};
use visual_search::search::relevance::Relevance;
use visual_search::search::selection::{assign_subranges, pick};

fn feature_vector(len: usize) -> impl Strategy<Value = Vec<i8>> {
    prop::collection::vec(-1i8..=1, len)
}

proptest! {
    #[test]
    fn subranges_cover_unit_interval(masses in prop::collection::vec(0.0f64..10.0, 1..40)) {
        match assign_subranges(&masses) {
            None => prop_assert!(masses.iter().all(|&m| m == 0.0)),
            Some(ranges) => {
                prop_assert_eq!(ranges.len(), masses.len());
                prop_assert_eq!(ranges[0].0, 0.0);
                prop_assert!((ranges.last().unwrap().1 - 1.0).abs() < 1e-9);
                for pair in ranges.windows(2) {
                    prop_assert!(pair[0].0 <= pair[0].1);
                    prop_assert!((pair[0].1 - pair[1].0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn every_draw_picks_a_positive_mass(
        masses in prop::collection::vec(0.0f64..10.0, 1..40),
        draw in 0.0f64..1.0,
    ) {
        if let Some(ranges) = assign_subranges(&masses) {
            let chosen = pick(&ranges, draw);
            prop_assert!(chosen.is_some());
            prop_assert!(masses[chosen.unwrap()] > 0.0);
        }
    }

    #[test]
    fn linear_weight_bounded(distance in 0.0f64..5000.0, at_zero in 1.0f64..2000.0) {
        let weight = DistanceCost::Linear { distance_at_zero: at_zero }.weight(distance, 200.0);
        prop_assert!((0.0..=1.0).contains(&weight));
        if distance >= at_zero {
            prop_assert_eq!(weight, 0.0);
        }
    }

    #[test]
    fn asymptotic_weight_bounded(distance in 0.0f64..5000.0, rate in 0.0f64..20.0, radius in 1.0f64..500.0) {
        let weight = DistanceCost::Asymptotic { falloff_rate: rate }.weight(distance, radius);
        prop_assert!(weight > 0.0 && weight <= 1.0);
    }

    #[test]
    fn relevance_sets_are_disjoint(
        template in feature_vector(12),
        items in prop::collection::vec(feature_vector(12), 1..8),
    ) {
        let template = SearchTemplate::new(vec![template], vec![]);
        let items: Vec<VisualItem> = items
            .into_iter()
            .enumerate()
            .map(|(i, parts)| VisualItem::new(ItemId(i as u32), String::new(), false, vec![parts], vec![]))
            .collect();
        let relevance = Relevance::compute(&template, &items, 12);

        prop_assert!(relevance.relevant.is_disjoint(&relevance.irrelevant));
        for dim in 0..12 {
            let all_zero = template.parts[0][dim] == 0 && items.iter().all(|i| i.parts[0][dim] == 0);
            if all_zero {
                prop_assert!(!relevance.is_relevant(dim) && !relevance.is_irrelevant(dim));
            }
        }
    }

    #[test]
    fn invalid_sampling_leaves_config_untouched(p in -2.0f64..3.0) {
        let mut config = ModelConfig::default();
        let result = config.set_sampling(p, 0.15);
        if (0.0..=1.0).contains(&p) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(config.p_relevant_sampling, p);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(config, ModelConfig::default());
        }
    }
}
