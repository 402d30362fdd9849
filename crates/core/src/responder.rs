use std::cmp::Ordering;

use rand::Rng;

use crate::intent::{
    area_lookup, classify, first_location_match, named_venue, Utterance,
};
use crate::models::{
    IntentKind, Restroom, AMENITY_ACCESSIBLE, AMENITY_BABY_CHANGING,
};

const SHOWN_AREA_MATCHES: usize = 4;
const SHOWN_SUGGESTIONS: usize = 3;

pub const THANKS_RESPONSES: &[&str] = &[
    "You're welcome! Happy to help you find what you need. Safe travels!",
    "Glad I could assist! Feel free to ask if you need anything else.",
    "My pleasure! That's what I'm here for. Anything else I can help with?",
];

/// Prompts surfaced to users as things worth trying.
pub const EXAMPLE_QUERIES: &[&str] = &[
    "Where is the nearest restroom?",
    "Find restrooms in Gandipuram",
    "R.S. Puram",
    "Are there clean restrooms in Saibaba Colony?",
    "Show restrooms with baby changing facilities",
    "Find restrooms in Peelamedu",
    "Is there a restroom open now?",
];

#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub intent: IntentKind,
    pub text: String,
}

/// Answer an utterance against the venue list. Deterministic except for the
/// thanks acknowledgement, which draws from the process rng.
pub fn respond(utterance: &str, restrooms: &[Restroom]) -> String {
    respond_with_rng(utterance, restrooms, &mut rand::rng())
}

/// Same as [`respond`] but with an injected random source so callers and
/// tests can pin the randomized reply variants.
pub fn respond_with_rng<R: Rng>(utterance: &str, restrooms: &[Restroom], rng: &mut R) -> String {
    evaluate(utterance, restrooms, rng).text
}

/// Run the cascade and keep the matched rule alongside the reply text.
pub fn evaluate<R: Rng>(utterance: &str, restrooms: &[Restroom], rng: &mut R) -> RuleMatch {
    let parsed = Utterance::new(utterance);
    let intent = classify(&parsed, restrooms);

    let text = match intent {
        IntentKind::NoData => no_data_reply(),
        IntentKind::Greeting => greeting_reply(),
        IntentKind::AreaLookup => area_lookup_reply(&parsed, restrooms),
        IntentKind::LocationSearch => location_search_reply(&parsed, restrooms),
        IntentKind::SelfLocation => self_location_reply(restrooms),
        IntentKind::BareFacility => bare_facility_reply(restrooms),
        IntentKind::Cleanliness => cleanliness_reply(restrooms),
        IntentKind::Accessibility => accessibility_reply(restrooms),
        IntentKind::BabyChanging => baby_changing_reply(restrooms),
        IntentKind::OpeningHours => opening_hours_reply(restrooms),
        IntentKind::Help => help_reply(),
        IntentKind::VenueDetail => venue_detail_reply(&parsed, restrooms),
        IntentKind::Thanks => thanks_reply(rng),
        IntentKind::Fallback => fallback_reply(),
    };

    RuleMatch { intent, text }
}

/// Two example queries to suggest alongside a reply.
pub fn suggested_queries<R: Rng>(rng: &mut R) -> Vec<&'static str> {
    let first = rng.random_range(0..EXAMPLE_QUERIES.len());
    let mut second = rng.random_range(0..EXAMPLE_QUERIES.len() - 1);
    if second >= first {
        second += 1;
    }
    vec![EXAMPLE_QUERIES[first], EXAMPLE_QUERIES[second]]
}

fn no_data_reply() -> String {
    "I apologize, but I don't have access to restroom data at the moment. \
     Please try refreshing the page."
        .to_string()
}

fn greeting_reply() -> String {
    "Hello! I'm your RestStop assistant. I can help you find restrooms in Coimbatore. \
     Try asking about specific areas like 'Gandipuram' or 'R.S. Puram'."
        .to_string()
}

fn area_lookup_reply(utterance: &Utterance, restrooms: &[Restroom]) -> String {
    let Some((term, matches)) = area_lookup(utterance, restrooms) else {
        return fallback_reply();
    };

    let lines = matches
        .iter()
        .take(SHOWN_AREA_MATCHES)
        .map(|restroom| {
            format!(
                "• {} ({}, Rating: {:.1}/5.0)",
                restroom.name,
                restroom.distance_text(),
                restroom.cleanliness
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "I found {} restrooms in {}. Here are the closest ones:\n{}\n\
         Would you like more details about any of these locations?",
        matches.len(),
        term,
        lines
    )
}

fn location_search_reply(utterance: &Utterance, restrooms: &[Restroom]) -> String {
    if let Some((term, matches)) = first_location_match(utterance, restrooms) {
        let lines = matches
            .iter()
            .take(SHOWN_SUGGESTIONS)
            .map(|restroom| {
                format!(
                    "• {} (Cleanliness: {:.1}/5.0, Distance: {})",
                    restroom.name,
                    restroom.cleanliness,
                    restroom.distance_text()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        return format!(
            "I found {} restrooms in {}:\n{}\nWould you like more details about any of these?",
            matches.len(),
            term,
            lines
        );
    }

    // No recognizable place name: the list is already in proximity order,
    // so the head of it is the best available answer.
    let lines = restrooms
        .iter()
        .take(SHOWN_SUGGESTIONS)
        .map(|restroom| {
            format!(
                "• {} at {} ({})",
                restroom.name,
                restroom.area(),
                restroom.distance_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Based on your current location, here are the closest restrooms:\n{}\n\
         Would you like directions to any of these locations?",
        lines
    )
}

fn self_location_reply(restrooms: &[Restroom]) -> String {
    format!(
        "Based on your current location data, you appear to be near Coimbatore. \
         Here are the closest restrooms:\n{}\n\
         Would you like directions to any of these locations?",
        name_and_distance_lines(restrooms)
    )
}

fn bare_facility_reply(restrooms: &[Restroom]) -> String {
    format!(
        "Here are the closest restrooms to your current location:\n{}\n\
         Would you like more details about any of these locations?",
        name_and_distance_lines(restrooms)
    )
}

fn cleanliness_reply(restrooms: &[Restroom]) -> String {
    let mut ranked: Vec<&Restroom> = restrooms.iter().collect();
    ranked.sort_by(|a, b| {
        b.cleanliness
            .partial_cmp(&a.cleanliness)
            .unwrap_or(Ordering::Equal)
    });

    let lines = ranked
        .iter()
        .take(SHOWN_SUGGESTIONS)
        .map(|restroom| {
            format!(
                "• {} - {:.1}/5.0 ({})",
                restroom.name,
                restroom.cleanliness,
                restroom.distance_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Here are the cleanest restrooms in the area:\n{}\n\n\
         All of these have been highly rated for cleanliness by our users.",
        lines
    )
}

fn accessibility_reply(restrooms: &[Restroom]) -> String {
    let accessible: Vec<&Restroom> = restrooms
        .iter()
        .filter(|restroom| restroom.has_amenity(AMENITY_ACCESSIBLE))
        .take(SHOWN_SUGGESTIONS)
        .collect();

    if accessible.is_empty() {
        return "I'm sorry, I couldn't find accessible restrooms in your immediate area. \
                Would you like me to expand the search radius?"
            .to_string();
    }

    format!(
        "I found {} wheelchair-accessible restrooms nearby:\n{}",
        accessible.len(),
        bullet_lines(&accessible)
    )
}

fn baby_changing_reply(restrooms: &[Restroom]) -> String {
    let changing: Vec<&Restroom> = restrooms
        .iter()
        .filter(|restroom| restroom.has_amenity(AMENITY_BABY_CHANGING))
        .take(SHOWN_SUGGESTIONS)
        .collect();

    if changing.is_empty() {
        return "I'm sorry, I couldn't find restrooms with baby changing facilities in your \
                immediate area. Would you like me to suggest alternatives?"
            .to_string();
    }

    format!(
        "I found {} restrooms with baby changing facilities nearby:\n{}",
        changing.len(),
        bullet_lines(&changing)
    )
}

fn opening_hours_reply(restrooms: &[Restroom]) -> String {
    let open: Vec<&Restroom> = restrooms
        .iter()
        .filter(|restroom| restroom.hours.as_ref().is_some_and(|hours| hours.is_open))
        .collect();

    if open.is_empty() {
        return "I'm checking for open restrooms... It appears many facilities in your area \
                might be closed now. Would you like me to find the ones that open earliest \
                tomorrow?"
            .to_string();
    }

    let lines = open
        .iter()
        .take(SHOWN_SUGGESTIONS)
        .map(|restroom| {
            let close = restroom
                .hours
                .as_ref()
                .map(|hours| hours.close.as_str())
                .unwrap_or("late");
            format!(
                "• {} - Open until {} ({})",
                restroom.name,
                close,
                restroom.distance_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "There are {} restrooms currently open near you. The closest ones are:\n{}",
        open.len(),
        lines
    )
}

fn help_reply() -> String {
    "RestStop helps you find clean restrooms nearby. You can:\n\
     • Search for restrooms by location\n\
     • Filter by cleanliness, accessibility, or amenities\n\
     • Get real-time information about opening hours\n\
     • Read and leave reviews\n\
     • Use voice commands for hands-free operation\n\n\
     What would you like help with today?"
        .to_string()
}

fn venue_detail_reply(utterance: &Utterance, restrooms: &[Restroom]) -> String {
    let Some(venue) = named_venue(utterance, restrooms) else {
        return fallback_reply();
    };

    let hours_part = match &venue.hours {
        Some(hours) if hours.is_open => format!("It's currently open until {}.", hours.close),
        _ => "It's currently closed.".to_string(),
    };
    let review_part = match venue.reviews.first() {
        Some(review) => format!("Recent review: \"{}\"", review.comment),
        None => "No reviews available yet.".to_string(),
    };

    format!(
        "{} has a cleanliness rating of {:.1}/5.0. It's located at {} ({} away). {} {}",
        venue.name,
        venue.cleanliness,
        venue.address,
        venue.distance_text(),
        hours_part,
        review_part
    )
}

fn thanks_reply<R: Rng>(rng: &mut R) -> String {
    THANKS_RESPONSES[rng.random_range(0..THANKS_RESPONSES.len())].to_string()
}

fn fallback_reply() -> String {
    "I'm not sure I understand what you're looking for. You can ask me about:\n\
     • Finding restrooms near you\n\
     • Your current location\n\
     • Restrooms with specific amenities (accessible, baby changing)\n\
     • Clean restrooms in the area\n\
     • Opening hours for nearby facilities\n\n\
     Could you try rephrasing your question?"
        .to_string()
}

fn name_and_distance_lines(restrooms: &[Restroom]) -> String {
    let shown: Vec<&Restroom> = restrooms.iter().take(SHOWN_SUGGESTIONS).collect();
    bullet_lines(&shown)
}

fn bullet_lines(restrooms: &[&Restroom]) -> String {
    restrooms
        .iter()
        .map(|restroom| format!("• {} ({})", restroom.name, restroom.distance_text()))
        .collect::<Vec<_>>()
        .join("\n")
}
