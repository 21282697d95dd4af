//! Which feature dimensions discriminate the target in the current display
//!
//! A dimension is relevant when the template disagrees with some item on it
//! (parts compared index-aligned), irrelevant when it never discriminates
//! but is nonzero somewhere in the template, and excluded otherwise. Only
//! the color and shape bands are classified.

use std::collections::BTreeSet;

use crate::core::error::{Result, SearchError};
use crate::search::item::{SearchTemplate, VisualItem};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relevance {
    pub relevant: BTreeSet<usize>,
    pub irrelevant: BTreeSet<usize>,
}

impl Relevance {
    /// Classify dimensions `0..non_relation` for this template and display
    pub fn compute(template: &SearchTemplate, items: &[VisualItem], non_relation: usize) -> Self {
        let mut relevance = Relevance::default();

        for dim in 0..non_relation {
            let discriminates = items.iter().any(|item| {
                template
                    .parts
                    .iter()
                    .zip(item.parts.iter())
                    .any(|(t, p)| t.get(dim) != p.get(dim))
            });

            if discriminates {
                relevance.relevant.insert(dim);
            } else if template_nonzero(template, dim) {
                relevance.irrelevant.insert(dim);
            }
        }

        relevance
    }

    /// Use a caller-chosen relevant set; every other template-nonzero
    /// dimension becomes irrelevant
    pub fn with_relevant(
        template: &SearchTemplate,
        relevant: &[usize],
        non_relation: usize,
    ) -> Result<Self> {
        let mut relevance = Relevance::default();
        for &dim in relevant {
            if dim >= non_relation {
                return Err(SearchError::InvalidRelevantDimension(dim));
            }
            relevance.relevant.insert(dim);
        }
        for dim in 0..non_relation {
            if !relevance.relevant.contains(&dim) && template_nonzero(template, dim) {
                relevance.irrelevant.insert(dim);
            }
        }
        Ok(relevance)
    }

    pub fn is_relevant(&self, dim: usize) -> bool {
        self.relevant.contains(&dim)
    }

    pub fn is_irrelevant(&self, dim: usize) -> bool {
        self.irrelevant.contains(&dim)
    }

    /// Normaliser for the parallel match score
    pub fn relevant_salience(&self, salience: &[f64]) -> f64 {
        self.relevant
            .iter()
            .map(|&d| salience.get(d).copied().unwrap_or(0.0))
            .sum()
    }
}

fn template_nonzero(template: &SearchTemplate, dim: usize) -> bool {
    template
        .parts
        .iter()
        .any(|part| part.get(dim).is_some_and(|&v| v != 0))
}
