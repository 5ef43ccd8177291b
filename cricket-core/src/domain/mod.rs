use serde::{Deserialize, Serialize};

/// A player as it appears in a document's embedded registry: a display name
/// mapped to a stable external identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub id: String,
}

/// One match, flattened from the `info` block of a source document.
///
/// Text fields default to the empty string and counts to zero when the
/// source path is absent. The generated row key is assigned by the store at
/// insert time and is the join target for innings and deliveries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    pub city: String,
    pub date: String,
    pub event_name: String,
    pub match_number: i64,
    pub gender: String,
    pub match_type: String,
    pub match_type_number: i64,
    pub match_referee: String,
    pub reserve_umpire: String,
    pub tv_umpire: String,
    pub umpire_1: String,
    pub umpire_2: String,
    pub winner: String,
    pub win_by_wickets: i64,
    pub overs: i64,
    pub player_of_match: String,
    pub season: String,
    pub team_type: String,
    pub venue: String,
    pub toss_decision: String,
    pub toss_winner: String,
}

/// One batting innings. Target overs/runs are zero when the innings sets no
/// chase target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InningsRecord {
    pub team: String,
    pub target_overs: i64,
    pub target_runs: i64,
}

/// One bowled ball and its full outcome.
///
/// Ball position is two integers (over number plus 1-based ball within the
/// over), never the source's fractional form. Actor identifiers are `None`
/// when the name has no registry entry. The wicket fields are all unset
/// together when no dismissal occurred on the ball.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub batter_id: Option<String>,
    pub bowler_id: Option<String>,
    pub non_striker_id: Option<String>,
    pub over_number: i64,
    pub ball_in_over: i64,
    pub runs_batter: i64,
    pub wides: i64,
    pub no_balls: i64,
    pub byes: i64,
    pub leg_byes: i64,
    pub runs_extra: i64,
    pub runs_total: i64,
    pub wicket: bool,
    pub wicket_kind: Option<String>,
    pub player_out_id: Option<String>,
    pub fielder_id: Option<String>,
}

/// Row counts per table, for the summary command and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCounts {
    pub players: i64,
    pub matches: i64,
    pub innings: i64,
    pub deliveries: i64,
}

/// Wins per team, grouped by season and gender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonWinSummary {
    pub season: String,
    pub gender: String,
    pub team: String,
    pub wins: i64,
}

/// A batter's strike rate over all recorded deliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeRate {
    pub player: String,
    pub balls: i64,
    pub runs: i64,
    pub strike_rate: f64,
}
