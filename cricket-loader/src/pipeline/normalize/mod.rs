pub mod defaults;

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use cricket_core::common::error::{CricketError, Result};
use cricket_core::domain::{DeliveryRecord, InningsRecord, MatchRecord, Player};

use crate::observability::metrics;
use crate::pipeline::identity::IdentityResolver;

/// A delivery actor as the source represents it: either a bare name string
/// or an object carrying a `name` field. Resolved to a plain name once,
/// before identifier resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorRef {
    Bare(String),
    Named { name: String },
}

impl ActorRef {
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(ActorRef::Bare(name.clone())),
            Value::Object(fields) => fields.get("name").and_then(Value::as_str).map(|name| {
                ActorRef::Named {
                    name: name.to_string(),
                }
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ActorRef::Bare(name) => name,
            ActorRef::Named { name } => name,
        }
    }
}

/// One normalized source document: the match row plus its innings and
/// delivery rows, plus the registry players the document carried. Generated
/// keys are not assigned here; the batch loader threads them in at persist
/// time.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    pub players: Vec<Player>,
    pub match_record: MatchRecord,
    pub innings: Vec<NormalizedInnings>,
}

#[derive(Debug, Clone)]
pub struct NormalizedInnings {
    pub record: InningsRecord,
    pub deliveries: Vec<DeliveryRecord>,
}

impl NormalizedDocument {
    pub fn delivery_count(&self) -> usize {
        self.innings.iter().map(|i| i.deliveries.len()).sum()
    }
}

/// Transforms one source match document into flat relational records,
/// resolving player identifiers inline and substituting defined defaults
/// for every absent optional field.
pub struct DocumentNormalizer {
    resolver: Arc<IdentityResolver>,
}

impl DocumentNormalizer {
    pub fn new(resolver: Arc<IdentityResolver>) -> Self {
        Self { resolver }
    }

    /// Normalize one document. Only an unusable top-level shape (not an
    /// object, or no innings array) is an error; anything missing below
    /// that degrades to the defaults in [`defaults`].
    pub fn normalize(&self, document: &Value) -> Result<NormalizedDocument> {
        if !document.is_object() {
            metrics::normalize::malformed_document();
            return Err(CricketError::MalformedDocument(
                "top-level value is not an object".to_string(),
            ));
        }
        let innings_blocks = document
            .get("innings")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                metrics::normalize::malformed_document();
                CricketError::MalformedDocument("missing innings array".to_string())
            })?;

        // Deliveries reference names that must already be resolvable, so the
        // embedded registry is registered before any delivery is touched.
        let players = extract_registry(document);
        for player in &players {
            self.resolver.register(&player.name, &player.id);
        }

        let match_record = build_match_record(document);
        let innings = innings_blocks
            .iter()
            .map(|block| self.normalize_innings(block))
            .collect();

        metrics::normalize::document_normalized();
        Ok(NormalizedDocument {
            players,
            match_record,
            innings,
        })
    }

    fn normalize_innings(&self, block: &Value) -> NormalizedInnings {
        let record = InningsRecord {
            team: defaults::text_at(block, &["team"]),
            // Zero when the innings sets no chase target
            target_overs: defaults::count_at(block, &["target", "overs"]),
            target_runs: defaults::count_at(block, &["target", "runs"]),
        };

        let mut deliveries = Vec::new();
        if let Some(overs) = block.get("overs").and_then(Value::as_array) {
            for over_block in overs {
                let over_number = defaults::count_at(over_block, &["over"]);
                if let Some(balls) = over_block.get("deliveries").and_then(Value::as_array) {
                    for (index, ball) in balls.iter().enumerate() {
                        deliveries.push(self.normalize_delivery(ball, over_number, index as i64 + 1));
                    }
                }
            }
        }

        NormalizedInnings { record, deliveries }
    }

    fn normalize_delivery(&self, ball: &Value, over_number: i64, ball_in_over: i64) -> DeliveryRecord {
        let batter_id = self.resolve_actor(ball.get("batter"), "batter");
        let bowler_id = self.resolve_actor(ball.get("bowler"), "bowler");
        let non_striker_id = self.resolve_actor(ball.get("non_striker"), "non_striker");

        let wides = defaults::count_at(ball, &["extras", "wides"]);
        let no_balls = defaults::count_at(ball, &["extras", "noballs"]);
        let byes = defaults::count_at(ball, &["extras", "byes"]);
        let leg_byes = defaults::count_at(ball, &["extras", "legbyes"]);

        let mut wicket = false;
        let mut wicket_kind = None;
        let mut player_out_id = None;
        let mut fielder_id = None;
        // Only the first dismissal counts when several are attached to one ball
        if let Some(event) = ball.get("wickets").and_then(Value::as_array).and_then(|w| w.first()) {
            wicket = true;
            wicket_kind = Some(defaults::text_at(event, &["kind"]));
            player_out_id = self.resolve_actor(event.get("player_out"), "player_out");
            fielder_id = self.resolve_actor(
                event
                    .get("fielders")
                    .and_then(Value::as_array)
                    .and_then(|fielders| fielders.first()),
                "fielder",
            );
        }

        DeliveryRecord {
            batter_id,
            bowler_id,
            non_striker_id,
            over_number,
            ball_in_over,
            runs_batter: defaults::count_at(ball, &["runs", "batter"]),
            wides,
            no_balls,
            byes,
            leg_byes,
            runs_extra: wides + no_balls + byes + leg_byes,
            // Document-declared, not recomputed, to tolerate source inconsistency
            runs_total: defaults::count_at(ball, &["runs", "total"]),
            wicket,
            wicket_kind,
            player_out_id,
            fielder_id,
        }
    }

    fn resolve_actor(&self, value: Option<&Value>, role: &str) -> Option<String> {
        let actor = value.and_then(ActorRef::parse)?;
        match self.resolver.resolve(actor.name()) {
            Some(id) => Some(id),
            None => {
                debug!("No registry entry for {} '{}'", role, actor.name());
                metrics::normalize::unresolved_name(role);
                None
            }
        }
    }
}

/// The embedded registry table (`info.registry.people`), name→id pairs.
/// Entries whose id is not a string are dropped.
fn extract_registry(document: &Value) -> Vec<Player> {
    defaults::nested(document, &["info", "registry", "people"])
        .and_then(Value::as_object)
        .map(|people| {
            people
                .iter()
                .filter_map(|(name, id)| {
                    id.as_str().map(|id| Player {
                        name: name.clone(),
                        id: id.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_match_record(document: &Value) -> MatchRecord {
    MatchRecord {
        city: defaults::text_at(document, &["info", "city"]),
        date: defaults::list_slot(document, &["info", "dates"], 0),
        event_name: defaults::text_at(document, &["info", "event", "name"]),
        match_number: defaults::count_at(document, &["info", "event", "match_number"]),
        gender: defaults::text_at(document, &["info", "gender"]),
        match_type: defaults::text_at(document, &["info", "match_type"]),
        match_type_number: defaults::count_at(document, &["info", "match_type_number"]),
        match_referee: defaults::list_slot(document, &["info", "officials", "match_referees"], 0),
        reserve_umpire: defaults::list_slot(document, &["info", "officials", "reserve_umpires"], 0),
        tv_umpire: defaults::list_slot(document, &["info", "officials", "tv_umpires"], 0),
        umpire_1: defaults::list_slot(document, &["info", "officials", "umpires"], 0),
        umpire_2: defaults::list_slot(document, &["info", "officials", "umpires"], 1),
        winner: defaults::text_at(document, &["info", "outcome", "winner"]),
        win_by_wickets: defaults::count_at(document, &["info", "outcome", "by", "wickets"]),
        overs: defaults::count_at(document, &["info", "overs"]),
        player_of_match: defaults::list_slot(document, &["info", "player_of_match"], 0),
        season: defaults::text_at(document, &["info", "season"]),
        team_type: defaults::text_at(document, &["info", "team_type"]),
        venue: defaults::text_at(document, &["info", "venue"]),
        toss_decision: defaults::text_at(document, &["info", "toss", "decision"]),
        toss_winner: defaults::text_at(document, &["info", "toss", "winner"]),
    }
}
