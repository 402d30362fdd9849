use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use reststop_core::{
    filter_restrooms, recommend, responder, AssistantReply, ChatInput, Coordinates, IntentKind,
    Preferences, Restroom, SearchFilters, UnitSystem,
};
use reststop_observability::AppMetrics;
use reststop_storage::VenueRepository;
use tracing::{info, instrument};

/// Orchestrates the venue store and the rule-based response engine for every
/// assistant-facing operation. The agent owns no dialogue state; each call
/// is a pure function of the current store contents and the input.
#[derive(Clone)]
pub struct AssistantAgent<S>
where
    S: VenueRepository,
{
    store: Arc<S>,
    metrics: Arc<AppMetrics>,
    units: UnitSystem,
}

impl<S> AssistantAgent<S>
where
    S: VenueRepository,
{
    pub fn new(store: Arc<S>, metrics: Arc<AppMetrics>, units: UnitSystem) -> Self {
        Self {
            store,
            metrics,
            units,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn handle_chat(&self, input: ChatInput) -> Result<AssistantReply> {
        let started = Instant::now();
        self.metrics.inc_chat_request();

        let restrooms = self.store.load_all().await?;

        let mut rng = rand::rng();
        let outcome = responder::evaluate(&input.text, &restrooms, &mut rng);
        if outcome.intent == IntentKind::Fallback {
            self.metrics.inc_fallback();
        }

        let suggested_queries = responder::suggested_queries(&mut rng)
            .into_iter()
            .map(str::to_string)
            .collect();

        self.metrics.observe_chat_latency(started.elapsed());
        info!(
            intent = outcome.intent.name(),
            restrooms = restrooms.len(),
            "chat handled"
        );

        Ok(AssistantReply {
            reply_text: outcome.text,
            intent: outcome.intent,
            suggested_queries,
            generated_at: Utc::now(),
        })
    }

    #[instrument(skip(self, preferences))]
    pub async fn recommend(
        &self,
        user_location: Coordinates,
        preferences: &Preferences,
    ) -> Result<Vec<Restroom>> {
        self.metrics.inc_recommendation();
        let restrooms = self.store.load_all().await?;
        let ranked = recommend(&restrooms, user_location, preferences, self.units);
        info!(candidates = restrooms.len(), returned = ranked.len(), "recommendations built");
        Ok(ranked)
    }

    #[instrument(skip(self, filters))]
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Restroom>> {
        self.metrics.inc_search();
        let restrooms = self.store.load_all().await?;
        let matched = filter_restrooms(&restrooms, filters);
        info!(candidates = restrooms.len(), matched = matched.len(), "search filtered");
        Ok(matched)
    }

    pub async fn restroom(&self, id: &str) -> Result<Option<Restroom>> {
        self.store.get(id).await
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }
}
