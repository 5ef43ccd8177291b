use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tracing::info;

use crate::common::error::{CricketError, Result};
use crate::domain::{
    DeliveryRecord, InningsRecord, MatchRecord, SeasonWinSummary, StrikeRate, TableCounts,
};
use crate::storage::traits::Storage;

/// SQLite-backed storage.
///
/// The connection is `Send` but not `Sync`, so it sits behind a mutex; no
/// lock is held across an await point.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref()).map_err(|e| CricketError::Database {
            message: format!("Failed to open database at {}: {e}", path.as_ref().display()),
        })?;
        info!("Opened database at {}", path.as_ref().display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Drop and recreate all tables. Each load run is a full rebuild of the
    /// normalized store.
    pub fn reset_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(include_str!("../../migrations/001_create_tables.sql"))
            .map_err(|e| CricketError::Database {
                message: format!("Failed to create tables: {e}"),
            })?;
        conn.execute_batch(include_str!("../../migrations/002_indexes_and_pragmas.sql"))
            .map_err(|e| CricketError::Database {
                message: format!("Failed to create indexes: {e}"),
            })?;
        info!("Database schema reset");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CricketError::Database {
            message: "Storage mutex poisoned".to_string(),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn upsert_player(&self, name: &str, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO players (id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .map_err(|e| CricketError::Database {
            message: format!("Failed to upsert player {name}: {e}"),
        })?;
        Ok(())
    }

    async fn insert_match(&self, record: &MatchRecord) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO matches (
                city, date, event_name, match_number, gender, match_type, match_type_number,
                match_referee, reserve_umpire, tv_umpire, umpire_1, umpire_2,
                winner, win_by_wickets, overs, player_of_match, season, team_type,
                venue, toss_decision, toss_winner
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
            params![
                record.city,
                record.date,
                record.event_name,
                record.match_number,
                record.gender,
                record.match_type,
                record.match_type_number,
                record.match_referee,
                record.reserve_umpire,
                record.tv_umpire,
                record.umpire_1,
                record.umpire_2,
                record.winner,
                record.win_by_wickets,
                record.overs,
                record.player_of_match,
                record.season,
                record.team_type,
                record.venue,
                record.toss_decision,
                record.toss_winner,
            ],
        )
        .map_err(|e| CricketError::Database {
            message: format!("Failed to insert match: {e}"),
        })?;
        Ok(conn.last_insert_rowid())
    }

    async fn insert_innings(&self, record: &InningsRecord, match_id: i64) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO innings (team, target_overs, target_runs, match_id) VALUES (?1, ?2, ?3, ?4)",
            params![record.team, record.target_overs, record.target_runs, match_id],
        )
        .map_err(|e| CricketError::Database {
            message: format!("Failed to insert innings for match {match_id}: {e}"),
        })?;
        Ok(conn.last_insert_rowid())
    }

    async fn insert_deliveries(
        &self,
        records: &[DeliveryRecord],
        innings_id: i64,
        match_id: i64,
    ) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(|e| CricketError::Database {
            message: format!("Failed to begin transaction: {e}"),
        })?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO deliveries (
                        batter_id, bowler_id, non_striker_id, over_number, ball_in_over,
                        runs_batter, wides, no_balls, byes, leg_byes, runs_extra, runs_total,
                        wicket, wicket_kind, player_out_id, fielder_id, innings_id, match_id
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                )
                .map_err(|e| CricketError::Database {
                    message: format!("Failed to prepare delivery insert: {e}"),
                })?;
            for record in records {
                stmt.execute(params![
                    record.batter_id,
                    record.bowler_id,
                    record.non_striker_id,
                    record.over_number,
                    record.ball_in_over,
                    record.runs_batter,
                    record.wides,
                    record.no_balls,
                    record.byes,
                    record.leg_byes,
                    record.runs_extra,
                    record.runs_total,
                    record.wicket,
                    record.wicket_kind,
                    record.player_out_id,
                    record.fielder_id,
                    innings_id,
                    match_id,
                ])
                .map_err(|e| CricketError::Database {
                    message: format!("Failed to insert delivery for innings {innings_id}: {e}"),
                })?;
            }
        }
        tx.commit().map_err(|e| CricketError::Database {
            message: format!("Failed to commit deliveries for innings {innings_id}: {e}"),
        })?;
        Ok(())
    }

    async fn player_id_by_name(&self, name: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id FROM players WHERE name = ?1")
            .map_err(|e| CricketError::Database {
                message: format!("Failed to prepare player lookup: {e}"),
            })?;
        let mut rows = stmt.query(params![name]).map_err(|e| CricketError::Database {
            message: format!("Failed to query player {name}: {e}"),
        })?;
        if let Some(row) = rows.next().map_err(|e| CricketError::Database {
            message: format!("Failed to read row: {e}"),
        })? {
            let id: String = row.get(0).map_err(|e| CricketError::Database {
                message: format!("Failed to get id: {e}"),
            })?;
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }

    async fn table_counts(&self) -> Result<TableCounts> {
        let conn = self.lock()?;
        let count = |table: &str| -> Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .map_err(|e| CricketError::Database {
                    message: format!("Failed to count {table}: {e}"),
                })
        };
        Ok(TableCounts {
            players: count("players")?,
            matches: count("matches")?,
            innings: count("innings")?,
            deliveries: count("deliveries")?,
        })
    }

    async fn season_win_summary(&self) -> Result<Vec<SeasonWinSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT season, gender, winner, COUNT(*) AS wins
                 FROM matches
                 WHERE winner <> ''
                 GROUP BY season, gender, winner
                 ORDER BY season DESC, gender, wins DESC",
            )
            .map_err(|e| CricketError::Database {
                message: format!("Failed to prepare win summary: {e}"),
            })?;
        let mut rows = stmt.query([]).map_err(|e| CricketError::Database {
            message: format!("Failed to query win summary: {e}"),
        })?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().map_err(|e| CricketError::Database {
            message: format!("Failed to read row: {e}"),
        })? {
            results.push(SeasonWinSummary {
                season: row.get(0).map_err(|e| CricketError::Database {
                    message: format!("Failed to get season: {e}"),
                })?,
                gender: row.get(1).map_err(|e| CricketError::Database {
                    message: format!("Failed to get gender: {e}"),
                })?,
                team: row.get(2).map_err(|e| CricketError::Database {
                    message: format!("Failed to get team: {e}"),
                })?,
                wins: row.get(3).map_err(|e| CricketError::Database {
                    message: format!("Failed to get wins: {e}"),
                })?,
            });
        }
        Ok(results)
    }

    async fn top_strike_rates(&self, limit: usize) -> Result<Vec<StrikeRate>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT p.name, COUNT(*) AS balls, SUM(d.runs_batter) AS runs,
                        SUM(d.runs_batter) * 100.0 / COUNT(*) AS strike_rate
                 FROM deliveries d
                 JOIN players p ON p.id = d.batter_id
                 GROUP BY d.batter_id
                 ORDER BY strike_rate DESC
                 LIMIT ?1",
            )
            .map_err(|e| CricketError::Database {
                message: format!("Failed to prepare strike rates: {e}"),
            })?;
        let mut rows = stmt
            .query(params![limit as i64])
            .map_err(|e| CricketError::Database {
                message: format!("Failed to query strike rates: {e}"),
            })?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().map_err(|e| CricketError::Database {
            message: format!("Failed to read row: {e}"),
        })? {
            results.push(StrikeRate {
                player: row.get(0).map_err(|e| CricketError::Database {
                    message: format!("Failed to get player: {e}"),
                })?,
                balls: row.get(1).map_err(|e| CricketError::Database {
                    message: format!("Failed to get balls: {e}"),
                })?,
                runs: row.get(2).map_err(|e| CricketError::Database {
                    message: format!("Failed to get runs: {e}"),
                })?,
                strike_rate: row.get(3).map_err(|e| CricketError::Database {
                    message: format!("Failed to get strike rate: {e}"),
                })?,
            });
        }
        Ok(results)
    }
}
