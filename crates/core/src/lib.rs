pub mod filters;
pub mod geo;
pub mod intent;
pub mod models;
pub mod ranking;
pub mod responder;

pub use filters::filter_restrooms;
pub use geo::{distance_km, format_distance, ParseUnitError, UnitSystem};
pub use intent::{classify, intent_rules, IntentRule, Utterance};
pub use models::*;
pub use ranking::recommend;
pub use responder::{
    evaluate, respond, respond_with_rng, suggested_queries, RuleMatch, EXAMPLE_QUERIES,
    THANKS_RESPONSES,
};
