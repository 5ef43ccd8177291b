use crate::common::error::Result;
use crate::domain::{
    DeliveryRecord, InningsRecord, MatchRecord, SeasonWinSummary, StrikeRate, TableCounts,
};
use async_trait::async_trait;

/// Storage trait for persisting normalized match data.
///
/// Insert methods return the generated row key so the caller can thread it
/// explicitly into subordinate inserts; there is no ambient "last id"
/// channel. Every method fails with a storage error that the batch loader
/// treats as fatal for the current document only.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a player if the id is not already present; re-upserting an
    /// existing player changes nothing.
    async fn upsert_player(&self, name: &str, id: &str) -> Result<()>;

    async fn insert_match(&self, record: &MatchRecord) -> Result<i64>;

    async fn insert_innings(&self, record: &InningsRecord, match_id: i64) -> Result<i64>;

    /// Bulk-insert one innings' deliveries under both parent keys, in a
    /// single transaction.
    async fn insert_deliveries(
        &self,
        records: &[DeliveryRecord],
        innings_id: i64,
        match_id: i64,
    ) -> Result<()>;

    // Query methods for the summary command and tests
    async fn player_id_by_name(&self, name: &str) -> Result<Option<String>>;
    async fn table_counts(&self) -> Result<TableCounts>;
    async fn season_win_summary(&self) -> Result<Vec<SeasonWinSummary>>;
    async fn top_strike_rates(&self, limit: usize) -> Result<Vec<StrikeRate>>;
}
