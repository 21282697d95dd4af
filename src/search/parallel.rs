//! Cheap, noisy, parallel comparison of every viable item to the template
//!
//! Each iteration a random subset of dimensions is sampled per template
//! part: relevant dimensions with `p_relevant_sampling`, irrelevant ones
//! with `p_irrelevant_sampling`. The signed, salience-weighted agreement is
//! accumulated into the item's integrator.

use rand::Rng;

use crate::core::config::ModelConfig;
use crate::core::types::FeatureVector;
use crate::search::item::{SearchTemplate, VisualItem};
use crate::search::relevance::Relevance;

/// Everything the match score depends on besides the item itself
pub struct MatchContext<'a> {
    pub template: &'a SearchTemplate,
    pub relevance: &'a Relevance,
    pub salience: &'a [f64],
    pub config: &'a ModelConfig,
}

impl MatchContext<'_> {
    /// Contribution of one sampled dimension of one template part against
    /// every item part
    fn score_dimension(&self, template_value: i8, item_parts: &[FeatureVector], dim: usize) -> f64 {
        let salience = self.salience.get(dim).copied().unwrap_or(0.0);
        let in_weight = self.config.in_template_weight * salience;
        let out_weight = self.config.out_of_template_weight * salience;

        item_parts
            .iter()
            .filter_map(|part| part.get(dim).copied())
            .map(|value| {
                if template_value == 0 {
                    if value != 0 {
                        -out_weight
                    } else {
                        0.0
                    }
                } else if template_value == value {
                    in_weight
                } else {
                    -in_weight
                }
            })
            .sum()
    }

    /// Sampled, normalised match of `item_parts` to the template
    pub fn sample_match<R: Rng + ?Sized>(&self, item_parts: &[FeatureVector], rng: &mut R) -> f64 {
        let mut score = 0.0;

        for template_part in &self.template.parts {
            for (dim, &template_value) in template_part.iter().enumerate() {
                let sampled = if self.relevance.is_relevant(dim) {
                    rng.gen::<f64>() < self.config.p_relevant_sampling
                } else if self.relevance.is_irrelevant(dim) {
                    rng.gen::<f64>() < self.config.p_irrelevant_sampling
                } else {
                    false
                };

                if sampled {
                    score += self.score_dimension(template_value, item_parts, dim);
                }
            }
        }

        score *= self.config.match_weight;
        let normaliser = self.relevance.relevant_salience(self.salience);
        if !self.relevance.relevant.is_empty() && normaliser > 0.0 {
            score /= normaliser;
        }
        score
    }
}

/// Fold one noisy match into an item's integrator
///
/// `noise` is a uniform draw in [0, 1). Returns true if the item crossed the
/// rejection threshold on this update.
pub fn accumulate(item: &mut VisualItem, similarity: f64, noise: f64, config: &ModelConfig) -> bool {
    item.integrator += similarity * noise * item.distance_weight;
    if item.integrator < config.min_selection_priority {
        item.integrator = config.min_selection_priority;
    }
    item.priority = item.integrator;

    if item.integrator < config.rejection_threshold {
        item.reject();
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ItemId;
    use crate::search::features::{FeatureTables, PartSpec};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn always_sample() -> ModelConfig {
        let mut config = ModelConfig::default();
        config.set_sampling(1.0, 1.0).unwrap();
        config
    }

    fn item_with(parts: Vec<FeatureVector>) -> VisualItem {
        VisualItem::new(ItemId(0), String::new(), false, parts, vec![])
    }

    #[test]
    fn test_identical_item_scores_positive() {
        let template = SearchTemplate::new(vec![vec![1, -1, 0]], vec![]);
        let relevance = Relevance {
            relevant: [0].into_iter().collect(),
            irrelevant: [1].into_iter().collect(),
        };
        let config = always_sample();
        let salience = [1.0, 1.0, 1.0];
        let ctx = MatchContext { template: &template, relevance: &relevance, salience: &salience, config: &config };

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        // two in-template agreements at weight 3, times match weight 3, over relevant salience 1
        let score = ctx.sample_match(&[vec![1, -1, 0]], &mut rng);
        assert!((score - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_mismatch_and_out_of_template_penalties() {
        let template = SearchTemplate::new(vec![vec![1, 0]], vec![]);
        let relevance = Relevance {
            relevant: [0, 1].into_iter().collect(),
            irrelevant: Default::default(),
        };
        let config = always_sample();
        let salience = [1.0, 1.0];
        let ctx = MatchContext { template: &template, relevance: &relevance, salience: &salience, config: &config };

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        // dim 0: -3, dim 1: -0.1; sum -3.1 * 3 / 2
        let score = ctx.sample_match(&[vec![-1, 1]], &mut rng);
        assert!((score - (-3.1 * 3.0 / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_no_sampling_scores_zero() {
        let template = SearchTemplate::new(vec![vec![1, 1]], vec![]);
        let relevance = Relevance {
            relevant: [0, 1].into_iter().collect(),
            irrelevant: Default::default(),
        };
        let mut config = ModelConfig::default();
        config.set_sampling(0.0, 0.0).unwrap();
        let salience = [1.0, 1.0];
        let ctx = MatchContext { template: &template, relevance: &relevance, salience: &salience, config: &config };

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(ctx.sample_match(&[vec![-1, -1]], &mut rng), 0.0);
    }

    #[test]
    fn test_target_outscores_feature_distractor() {
        let tables = FeatureTables::standard();
        let target = tables.encode_parts(&[PartSpec::plain("red", "vertical")]).unwrap();
        let lure = tables.encode_parts(&[PartSpec::plain("green", "vertical")]).unwrap();
        let template = SearchTemplate::new(target.clone(), vec![]);
        let items = vec![item_with(target.clone()), item_with(lure.clone())];
        let relevance = Relevance::compute(&template, &items, 45);
        let config = always_sample();
        let salience = vec![1.0; 49];
        let ctx = MatchContext { template: &template, relevance: &relevance, salience: &salience, config: &config };

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let target_score = ctx.sample_match(&target, &mut rng);
        let lure_score = ctx.sample_match(&lure, &mut rng);
        assert!(target_score > 0.0);
        assert!(lure_score < target_score);
    }

    #[test]
    fn test_accumulate_floors_and_rejects() {
        let config = ModelConfig::default();
        let mut item = item_with(vec![vec![0]]);
        item.integrator = 0.0;
        item.distance_weight = 0.0;

        let rejected = accumulate(&mut item, 10.0, 0.9, &config);
        assert!(rejected);
        assert!(item.rejected);
        assert_eq!(item.priority, 0.0);
        assert_eq!(item.integrator, config.min_selection_priority);
    }

    #[test]
    fn test_threshold_below_floor_never_rejects() {
        let mut config = ModelConfig::default();
        config.set_rejection_threshold(config.min_selection_priority / 2.0).unwrap();
        let mut item = item_with(vec![vec![0]]);
        item.integrator = 0.0;
        item.distance_weight = 1.0;

        let rejected = accumulate(&mut item, -100.0, 0.9, &config);
        assert!(!rejected);
        assert!(!item.rejected);
        assert_eq!(item.integrator, config.min_selection_priority);
    }

    #[test]
    fn test_accumulate_tracks_priority() {
        let config = ModelConfig::default();
        let mut item = item_with(vec![vec![0]]);
        item.integrator = 1.0;
        item.distance_weight = 0.5;

        let rejected = accumulate(&mut item, 2.0, 0.5, &config);
        assert!(!rejected);
        assert!((item.integrator - 1.5).abs() < 1e-12);
        assert_eq!(item.priority, item.integrator);
    }
}
