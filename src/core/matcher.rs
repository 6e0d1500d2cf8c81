use crate::core::{filters::is_matchable, scoring::calculate_match_score};
use crate::models::{Customer, CustomerMatch, MatchBreakdown, Property, PropertyMatch, ScoringWeights};

/// Result of the ranking process
#[derive(Debug)]
pub struct MatchResult<T> {
    pub matches: Vec<T>,
    pub total_candidates: usize,
}

/// Ranks properties for a customer and customers for a property
///
/// # Pipeline Stages
/// 1. Availability filter (customer -> properties only)
/// 2. Scoring
/// 3. Descending sort, stable on ties
/// 4. Truncation to the requested limit
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single customer/property pair
    pub fn score(&self, customer: &Customer, property: &Property) -> MatchBreakdown {
        calculate_match_score(customer, property, &self.weights)
    }

    /// Find the best available properties for a customer
    ///
    /// Sold and on-hold listings are dropped before scoring. Equal scores keep
    /// the order in which `properties` were supplied.
    pub fn top_properties(
        &self,
        customer: &Customer,
        properties: Vec<Property>,
        limit: usize,
    ) -> MatchResult<PropertyMatch> {
        let total_candidates = properties.len();

        let mut matches: Vec<PropertyMatch> = properties
            .into_iter()
            .filter(is_matchable)
            .map(|property| {
                let breakdown = self.score(customer, &property);
                PropertyMatch { property, breakdown }
            })
            .collect();

        matches.sort_by(|a, b| b.breakdown.score.total_cmp(&a.breakdown.score));
        matches.truncate(limit);

        MatchResult {
            matches,
            total_candidates,
        }
    }

    /// Find the best customers for a property
    ///
    /// Every customer is a candidate; the property's own status is not
    /// checked.
    pub fn top_customers(
        &self,
        property: &Property,
        customers: Vec<Customer>,
        limit: usize,
    ) -> MatchResult<CustomerMatch> {
        let total_candidates = customers.len();

        let mut matches: Vec<CustomerMatch> = customers
            .iter()
            .map(|customer| CustomerMatch {
                customer: customer.summary(),
                breakdown: self.score(customer, property),
            })
            .collect();

        matches.sort_by(|a, b| b.breakdown.score.total_cmp(&a.breakdown.score));
        matches.truncate(limit);

        MatchResult {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
