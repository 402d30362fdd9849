use crate::models::{Restroom, SearchFilters};

/// Conjunction of the search filters over a venue list. Venues without a
/// parseable `distance_label` pass the distance check; venues without hours
/// are treated as not open for `open_now`.
pub fn filter_restrooms(restrooms: &[Restroom], filters: &SearchFilters) -> Vec<Restroom> {
    restrooms
        .iter()
        .filter(|restroom| matches_filters(restroom, filters))
        .cloned()
        .collect()
}

fn matches_filters(restroom: &Restroom, filters: &SearchFilters) -> bool {
    if !filters.kinds.is_empty() && !filters.kinds.contains(&restroom.kind) {
        return false;
    }

    if let Some(min_cleanliness) = filters.min_cleanliness {
        if restroom.cleanliness < min_cleanliness {
            return false;
        }
    }

    if let Some(max_distance) = filters.max_distance {
        if let Some(distance) = restroom
            .distance_label
            .as_deref()
            .and_then(labelled_distance_value)
        {
            if distance > max_distance {
                return false;
            }
        }
    }

    if !filters.amenity_ids.is_empty() {
        let available: Vec<&str> = restroom
            .amenities
            .iter()
            .map(|amenity| amenity.id.as_str())
            .collect();
        if !filters
            .amenity_ids
            .iter()
            .all(|id| available.contains(&id.as_str()))
        {
            return false;
        }
    }

    if filters.open_now && !restroom.hours.as_ref().is_some_and(|hours| hours.is_open) {
        return false;
    }

    true
}

/// Numeric prefix of a label like "0.3 km" or "1.2 mi".
fn labelled_distance_value(label: &str) -> Option<f64> {
    label.split_whitespace().next()?.parse().ok()
}
