use std::cmp::Ordering;

use crate::geo::{distance_km, format_distance, UnitSystem};
use crate::models::{
    Coordinates, Preferences, Restroom, AMENITY_ACCESSIBLE, AMENITY_BABY_CHANGING,
    AMENITY_GENDER_NEUTRAL,
};

const MAX_RECOMMENDATIONS: usize = 5;

const DISTANCE_WEIGHT: f64 = 2.0;
const CLEANLINESS_WEIGHT: f64 = 3.0;
const PREFERENCE_BONUS: f64 = 2.0;
const PARTNER_BONUS: f64 = 1.0;

/// Score and sort venues for the recommendation surface. Closer and cleaner
/// venues rank higher; each enabled preference satisfied by the venue's
/// amenities adds a bonus, partners get a small boost on top. Returns at
/// most five entries, each with a freshly attached `distance_label`.
///
/// The sort is stable, so equally scored venues keep their input order.
pub fn recommend(
    restrooms: &[Restroom],
    user_location: Coordinates,
    preferences: &Preferences,
    units: UnitSystem,
) -> Vec<Restroom> {
    let mut scored = restrooms
        .iter()
        .map(|restroom| {
            let distance = distance_km(user_location, restroom.location);
            let mut venue = restroom.clone();
            venue.distance_label = Some(format_distance(distance, units));
            (score(&venue, distance, preferences), venue)
        })
        .collect::<Vec<_>>();

    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(_, venue)| venue)
        .collect()
}

fn score(restroom: &Restroom, distance_km: f64, preferences: &Preferences) -> f64 {
    let mut total = CLEANLINESS_WEIGHT * restroom.cleanliness - DISTANCE_WEIGHT * distance_km;

    if preferences.accessibility && restroom.has_amenity(AMENITY_ACCESSIBLE) {
        total += PREFERENCE_BONUS;
    }
    if preferences.baby_changing && restroom.has_amenity(AMENITY_BABY_CHANGING) {
        total += PREFERENCE_BONUS;
    }
    if preferences.gender_neutral && restroom.has_amenity(AMENITY_GENDER_NEUTRAL) {
        total += PREFERENCE_BONUS;
    }
    if restroom.partner {
        total += PARTNER_BONUS;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amenity, RestroomType};

    const HERE: Coordinates = Coordinates { lat: 11.0168, lng: 76.9558 };

    fn venue(id: &str, cleanliness: f64, amenity_names: &[&str]) -> Restroom {
        Restroom {
            id: id.to_string(),
            name: format!("Restroom {id}"),
            address: "Gandipuram, Coimbatore".to_string(),
            location: HERE,
            kind: RestroomType::Public,
            cleanliness,
            last_reported: "Just now".to_string(),
            amenities: amenity_names
                .iter()
                .enumerate()
                .map(|(index, name)| Amenity {
                    id: format!("{id}-amenity-{index}"),
                    name: (*name).to_string(),
                    icon: "circle".to_string(),
                })
                .collect(),
            reviews: Vec::new(),
            hours: None,
            distance_label: None,
            partner: false,
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let ranked = recommend(&[], HERE, &Preferences::default(), UnitSystem::Metric);
        assert!(ranked.is_empty());
    }

    #[test]
    fn caps_results_at_five() {
        let venues: Vec<Restroom> = (0..8).map(|i| venue(&i.to_string(), 3.0, &[])).collect();
        let ranked = recommend(&venues, HERE, &Preferences::default(), UnitSystem::Metric);
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn accessible_venue_outranks_identical_twin_when_preferred() {
        let venues = vec![
            venue("plain", 4.0, &[]),
            venue("accessible", 4.0, &[AMENITY_ACCESSIBLE]),
        ];
        let preferences = Preferences {
            accessibility: true,
            ..Preferences::default()
        };

        let ranked = recommend(&venues, HERE, &preferences, UnitSystem::Metric);
        assert_eq!(ranked[0].id, "accessible");
        assert_eq!(ranked[1].id, "plain");
    }

    #[test]
    fn disabled_preference_does_not_boost() {
        let venues = vec![
            venue("plain", 4.0, &[]),
            venue("accessible", 4.0, &[AMENITY_ACCESSIBLE]),
        ];

        let ranked = recommend(&venues, HERE, &Preferences::default(), UnitSystem::Metric);
        // Equal scores: stable sort keeps the input order.
        assert_eq!(ranked[0].id, "plain");
    }

    #[test]
    fn partner_breaks_ties() {
        let mut partner = venue("partner", 4.0, &[]);
        partner.partner = true;
        let venues = vec![venue("plain", 4.0, &[]), partner];

        let ranked = recommend(&venues, HERE, &Preferences::default(), UnitSystem::Metric);
        assert_eq!(ranked[0].id, "partner");
    }

    #[test]
    fn closer_venue_outranks_farther_one() {
        let mut far = venue("far", 4.0, &[]);
        far.location = Coordinates { lat: 11.1168, lng: 76.9558 };
        let venues = vec![far, venue("near", 4.0, &[])];

        let ranked = recommend(&venues, HERE, &Preferences::default(), UnitSystem::Metric);
        assert_eq!(ranked[0].id, "near");
    }

    #[test]
    fn attaches_distance_labels() {
        let ranked = recommend(
            &[venue("a", 4.0, &[])],
            HERE,
            &Preferences::default(),
            UnitSystem::Metric,
        );
        assert_eq!(ranked[0].distance_label.as_deref(), Some("0.0 km"));
    }
}
