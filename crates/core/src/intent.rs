use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{IntentKind, Restroom};

/// Greetings must anchor at the start of the utterance; a "hi" buried in a
/// longer sentence is not a greeting.
static GREETING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(hi|hello|hey|howdy|greetings|can you hear me)")
        .expect("valid greeting pattern")
});

const LOCATION_KEYWORDS: &[&str] = &[
    "where", "find", "near", "located", "closest", "nearest", "around", "in", "at", "show me",
];
const FACILITY_NOUNS: &[&str] = &[
    "restroom", "toilet", "bathroom", "washroom", "lavatory", "facilities",
];
const SELF_LOCATION_PHRASES: &[&str] = &[
    "location",
    "send my location",
    "where am i",
    "my current location",
    "current position",
    "my position",
];
const BARE_FACILITY_WORDS: &[&str] = &[
    "restroom", "restrooms", "toilet", "toilets", "bathroom", "bathrooms",
];
const CLEANLINESS_KEYWORDS: &[&str] = &["clean", "cleanest"];
const ACCESSIBILITY_KEYWORDS: &[&str] = &["accessible", "wheelchair", "disability"];
const BABY_CHANGING_KEYWORDS: &[&str] = &["baby", "changing", "diaper"];
const HOURS_KEYWORDS: &[&str] = &["open", "hours", "time"];

/// Words too generic to be treated as a place name when extracting location
/// candidates from a facility-seeking query.
const LOCATION_TERM_STOPLIST: &[&str] = &[
    "restroom", "toilet", "bathroom", "where", "find", "show", "closest", "nearest",
];

/// Maximum token count for a message to be read as a bare area name.
const BARE_AREA_MAX_TOKENS: usize = 2;
const BARE_AREA_MIN_TOKEN_CHARS: usize = 4;
const LOCATION_CANDIDATE_MIN_CHARS: usize = 5;

/// A user message, whitespace-normalized once with a case-folded shadow so
/// the rule predicates never re-lowercase. All matching is substring-based
/// and not token-boundary aware, matching the behavior users see.
#[derive(Debug, Clone)]
pub struct Utterance {
    raw: String,
    folded: String,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        let raw = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.folded.contains(needle)
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.folded.contains(needle))
    }

    /// Whitespace tokens in original casing, trimmed of surrounding
    /// punctuation so "Gandipuram?" still matches an address.
    pub fn tokens(&self) -> Vec<&str> {
        self.raw
            .split_whitespace()
            .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// One rule of the response cascade: a name and a predicate. Rules are
/// evaluated in the order returned by [`intent_rules`]; the first predicate
/// that fires decides the reply.
pub struct IntentRule {
    pub kind: IntentKind,
    pub matches: fn(&Utterance, &[Restroom]) -> bool,
}

/// The full cascade in priority order. The final fallback rule always
/// matches, so [`classify`] is total.
pub fn intent_rules() -> &'static [IntentRule] {
    static RULES: &[IntentRule] = &[
        IntentRule { kind: IntentKind::NoData, matches: no_data },
        IntentRule { kind: IntentKind::Greeting, matches: greeting },
        IntentRule { kind: IntentKind::AreaLookup, matches: bare_area },
        IntentRule { kind: IntentKind::LocationSearch, matches: location_search },
        IntentRule { kind: IntentKind::SelfLocation, matches: self_location },
        IntentRule { kind: IntentKind::BareFacility, matches: bare_facility },
        IntentRule { kind: IntentKind::Cleanliness, matches: cleanliness },
        IntentRule { kind: IntentKind::Accessibility, matches: accessibility },
        IntentRule { kind: IntentKind::BabyChanging, matches: baby_changing },
        IntentRule { kind: IntentKind::OpeningHours, matches: opening_hours },
        IntentRule { kind: IntentKind::Help, matches: help },
        IntentRule { kind: IntentKind::VenueDetail, matches: venue_detail },
        IntentRule { kind: IntentKind::Thanks, matches: thanks },
        IntentRule { kind: IntentKind::Fallback, matches: fallback },
    ];
    RULES
}

pub fn classify(utterance: &Utterance, restrooms: &[Restroom]) -> IntentKind {
    intent_rules()
        .iter()
        .find(|rule| (rule.matches)(utterance, restrooms))
        .map(|rule| rule.kind)
        .unwrap_or(IntentKind::Fallback)
}

fn no_data(_utterance: &Utterance, restrooms: &[Restroom]) -> bool {
    restrooms.is_empty()
}

fn greeting(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    GREETING_PATTERN.is_match(utterance.folded())
}

fn bare_area(utterance: &Utterance, restrooms: &[Restroom]) -> bool {
    area_lookup(utterance, restrooms).is_some()
}

fn location_search(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    utterance.contains_any(LOCATION_KEYWORDS) && utterance.contains_any(FACILITY_NOUNS)
}

fn self_location(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    utterance.contains_any(SELF_LOCATION_PHRASES)
}

fn bare_facility(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    BARE_FACILITY_WORDS.contains(&utterance.folded())
}

fn cleanliness(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    utterance.contains_any(CLEANLINESS_KEYWORDS)
}

fn accessibility(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    utterance.contains_any(ACCESSIBILITY_KEYWORDS)
}

fn baby_changing(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    utterance.contains_any(BABY_CHANGING_KEYWORDS)
}

fn opening_hours(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    utterance.contains_any(HOURS_KEYWORDS)
}

fn help(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    (utterance.contains("how") && utterance.contains("work"))
        || (utterance.contains("what") && utterance.contains("do"))
        || utterance.contains("help me")
        || utterance.folded() == "help"
}

fn venue_detail(utterance: &Utterance, restrooms: &[Restroom]) -> bool {
    named_venue(utterance, restrooms).is_some()
}

fn thanks(utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    utterance.contains("thank")
}

fn fallback(_utterance: &Utterance, _restrooms: &[Restroom]) -> bool {
    true
}

/// Venues whose address contains the term, case-insensitively, in list order.
pub(crate) fn address_matches<'r>(restrooms: &'r [Restroom], term: &str) -> Vec<&'r Restroom> {
    let folded = term.to_lowercase();
    restrooms
        .iter()
        .filter(|restroom| restroom.address.to_lowercase().contains(&folded))
        .collect()
}

/// A short message read as a bare area name: at most two tokens, and the
/// first sufficiently long token that matches any venue address wins. The
/// returned term keeps the user's original casing for display.
pub(crate) fn area_lookup<'u, 'r>(
    utterance: &'u Utterance,
    restrooms: &'r [Restroom],
) -> Option<(&'u str, Vec<&'r Restroom>)> {
    let tokens = utterance.tokens();
    if tokens.len() > BARE_AREA_MAX_TOKENS {
        return None;
    }

    for token in tokens {
        if token.chars().count() < BARE_AREA_MIN_TOKEN_CHARS {
            continue;
        }
        let matches = address_matches(restrooms, token);
        if !matches.is_empty() {
            return Some((token, matches));
        }
    }

    None
}

/// Location-candidate tokens of a facility-seeking query: long enough to be
/// a place name and not one of the generic facility/search words.
pub(crate) fn location_candidates<'u>(utterance: &'u Utterance) -> Vec<&'u str> {
    utterance
        .tokens()
        .into_iter()
        .filter(|token| token.chars().count() >= LOCATION_CANDIDATE_MIN_CHARS)
        .filter(|token| {
            let folded = token.to_lowercase();
            !LOCATION_TERM_STOPLIST.contains(&folded.as_str())
        })
        .collect()
}

pub(crate) fn first_location_match<'u, 'r>(
    utterance: &'u Utterance,
    restrooms: &'r [Restroom],
) -> Option<(&'u str, Vec<&'r Restroom>)> {
    for candidate in location_candidates(utterance) {
        let matches = address_matches(restrooms, candidate);
        if !matches.is_empty() {
            return Some((candidate, matches));
        }
    }
    None
}

/// First venue (in list order) whose name appears in the utterance.
pub(crate) fn named_venue<'r>(
    utterance: &Utterance,
    restrooms: &'r [Restroom],
) -> Option<&'r Restroom> {
    restrooms
        .iter()
        .find(|restroom| utterance.contains(&restroom.name.to_lowercase()))
}
