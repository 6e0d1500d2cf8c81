use crate::models::{Customer, MatchBreakdown, PreferredLocations, Property, PropertyLocation, ScoringWeights};

/// Location tiers, best first. Only one tier applies per pair.
pub const LOCALITY_SCORE: f64 = 1.0;
pub const CITY_SCORE: f64 = 0.7;
pub const DISTRICT_SCORE: f64 = 0.4;

/// Relative distance from the budget midpoint that still decays gently
const PRICE_FUZZY_BAND: f64 = 0.2;

const CURRENCY_SYMBOL: &str = "₹";

/// Calculate a match score (0-100) for a property against a buyer profile
///
/// Scoring formula:
/// score = 100 * (
///     price_score * 0.5 +        # Within budget = 1, decays away from midpoint
///     location_score * 0.3 +     # locality 1.0 > city 0.7 > district 0.4
///     type_match * 0.2           # Preferred type, or no preference
/// )
/// rounded to two decimals.
pub fn calculate_match_score(
    customer: &Customer,
    property: &Property,
    weights: &ScoringWeights,
) -> MatchBreakdown {
    let type_match = calculate_type_match(&customer.preferred_types, &property.property_type);
    let location_score =
        calculate_location_score(&customer.preferred_locations, &property.location);
    let price_score =
        calculate_price_score(property.price, customer.budget_min, customer.budget_max);

    let total = (price_score * weights.price
        + location_score * weights.location
        + f64::from(type_match) * weights.type_match)
        * 100.0;

    let reasons = build_reasons(property, type_match, location_score, price_score);

    MatchBreakdown {
        score: round_to_cents(total.clamp(0.0, 100.0)),
        type_match,
        location_score,
        price_score,
        reasons,
    }
}

/// 1 when the buyer has no type preference or the listing's type is preferred
#[inline]
pub fn calculate_type_match(preferred_types: &[String], property_type: &str) -> u8 {
    if preferred_types.is_empty() || preferred_types.iter().any(|t| t == property_type) {
        1
    } else {
        0
    }
}

/// Best single location tier shared by the buyer preference and the listing
pub fn calculate_location_score(
    preferred: &PreferredLocations,
    location: &PropertyLocation,
) -> f64 {
    if same_place(preferred.locality.as_deref(), location.locality.as_deref()) {
        LOCALITY_SCORE
    } else if same_place(preferred.city.as_deref(), Some(location.city.as_str())) {
        CITY_SCORE
    } else if same_place(preferred.district.as_deref(), location.district.as_deref()) {
        DISTRICT_SCORE
    } else {
        0.0
    }
}

/// Price affinity (0-1)
///
/// Anything inside `[budget_min, budget_max]` scores 1.0. Outside the range
/// the score is anchored on the budget midpoint: within 20% it is
/// `1 - diff`, beyond that it falls twice as fast and bottoms out at 0 once
/// the price is 70% away. A non-positive midpoint scores 0.
pub fn calculate_price_score(price: f64, budget_min: f64, budget_max: f64) -> f64 {
    if price >= budget_min && price <= budget_max {
        return 1.0;
    }

    let midpoint = (budget_min + budget_max) / 2.0;
    if midpoint <= 0.0 {
        return 0.0;
    }

    let percent_diff = (price - midpoint).abs() / midpoint;
    if percent_diff <= PRICE_FUZZY_BAND {
        1.0 - percent_diff
    } else {
        (1.0 - (percent_diff - PRICE_FUZZY_BAND) * 2.0).max(0.0)
    }
}

fn build_reasons(
    property: &Property,
    type_match: u8,
    location_score: f64,
    price_score: f64,
) -> Vec<String> {
    let mut reasons = Vec::new();
    let location = &property.location;

    if type_match == 1 {
        reasons.push(format!("Matches preferred type: {}", property.property_type));
    }

    if location_score >= CITY_SCORE {
        let place = non_empty(location.locality.as_deref()).unwrap_or(&location.city);
        reasons.push(format!("Location match: {}", place));
    } else if location_score >= DISTRICT_SCORE {
        let place = non_empty(location.district.as_deref()).unwrap_or(&location.city);
        reasons.push(format!("Nearby location: {}", place));
    }

    if price_score >= 0.8 {
        reasons.push(format!(
            "Price within budget: {}{}",
            CURRENCY_SYMBOL,
            format_price(property.price)
        ));
    } else if price_score >= 0.5 {
        reasons.push(format!(
            "Price close to budget: {}{}",
            CURRENCY_SYMBOL,
            format_price(property.price)
        ));
    }

    reasons
}

/// Case-insensitive equality; missing or empty on either side never matches
#[inline]
fn same_place(a: Option<&str>, b: Option<&str>) -> bool {
    match (non_empty(a), non_empty(b)) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

#[inline]
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[inline]
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a price with thousands separators and at most three decimals,
/// e.g. `3500000.0` -> `3,500,000`
pub fn format_price(price: f64) -> String {
    let rounded = (price.abs() * 1000.0).round() / 1000.0;
    let whole = rounded.trunc() as u64;
    let fraction = ((rounded - rounded.trunc()) * 1000.0).round() as u64;

    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if price < 0.0 && (whole > 0 || fraction > 0) {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if fraction > 0 {
        let fraction = format!("{:03}", fraction);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out
}
