use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tempfile::tempdir;

use cricket_core::storage::{SqliteStorage, Storage};
use cricket_loader::ingest::FileDocumentSource;
use cricket_loader::pipeline::BatchLoader;

fn write_document(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string(value).unwrap()).unwrap();
}

fn match_document(city: &str, winner: &str) -> Value {
    json!({
        "info": {
            "registry": {"people": {
                "V Kohli": "p-kohli",
                "R Sharma": "p-sharma",
                "T Boult": "p-boult"
            }},
            "city": city,
            "dates": ["2019-07-09"],
            "gender": "male",
            "match_type": "T20",
            "outcome": {"winner": winner},
            "season": "2019",
            "toss": {"decision": "bat", "winner": winner}
        },
        "innings": [
            {
                "team": "India",
                "overs": [{"over": 0, "deliveries": [
                    {
                        "batter": "V Kohli",
                        "bowler": "T Boult",
                        "non_striker": "R Sharma",
                        "runs": {"batter": 4, "total": 4}
                    },
                    {
                        "batter": {"name": "V Kohli"},
                        "bowler": "T Boult",
                        "non_striker": "R Sharma",
                        "runs": {"batter": 0, "total": 1},
                        "extras": {"wides": 1}
                    }
                ]}]
            },
            {
                "team": "New Zealand",
                "target": {"overs": 20, "runs": 180},
                "overs": [{"over": 0, "deliveries": [
                    {
                        "batter": "T Boult",
                        "bowler": "V Kohli",
                        "non_striker": "R Sharma",
                        "runs": {"batter": 0, "total": 0},
                        "wickets": [{
                            "kind": "caught",
                            "player_out": "T Boult",
                            "fielders": [{"name": "R Sharma"}]
                        }]
                    }
                ]}]
            }
        ]
    })
}

fn open_storage(dir: &Path) -> Arc<SqliteStorage> {
    let storage = SqliteStorage::open(dir.join("cricket.db")).unwrap();
    storage.reset_schema().unwrap();
    Arc::new(storage)
}

#[tokio::test]
async fn loads_a_directory_of_documents_end_to_end() -> Result<()> {
    let data_dir = tempdir()?;
    let db_dir = tempdir()?;
    write_document(data_dir.path(), "match_1.json", &match_document("Mumbai", "India"));
    write_document(data_dir.path(), "match_2.json", &match_document("Leeds", "New Zealand"));

    let storage = open_storage(db_dir.path());
    let loader = BatchLoader::new(storage.clone());
    let report = loader
        .load_dir(&FileDocumentSource::new(data_dir.path()))
        .await?;

    assert_eq!(report.documents_processed, 2);
    assert_eq!(report.documents_failed(), 0);
    assert_eq!(report.matches_inserted, 2);
    assert_eq!(report.innings_inserted, 4);
    assert_eq!(report.deliveries_inserted, 6);

    let counts = storage.table_counts().await?;
    assert_eq!(counts.players, 3);
    assert_eq!(counts.matches, 2);
    assert_eq!(counts.innings, 4);
    assert_eq!(counts.deliveries, 6);

    assert_eq!(
        storage.player_id_by_name("V Kohli").await?,
        Some("p-kohli".to_string())
    );

    // Kohli faced four deliveries for eight runs across the two documents
    let rates = storage.top_strike_rates(10).await?;
    let kohli = rates.iter().find(|r| r.player == "V Kohli").unwrap();
    assert_eq!(kohli.balls, 4);
    assert_eq!(kohli.runs, 8);

    Ok(())
}

#[tokio::test]
async fn delivery_foreign_keys_are_mutually_consistent() -> Result<()> {
    let data_dir = tempdir()?;
    let db_dir = tempdir()?;
    write_document(data_dir.path(), "match_1.json", &match_document("Mumbai", "India"));
    write_document(data_dir.path(), "match_2.json", &match_document("Leeds", "New Zealand"));

    let storage = open_storage(db_dir.path());
    let loader = BatchLoader::new(storage.clone());
    loader
        .load_dir(&FileDocumentSource::new(data_dir.path()))
        .await?;

    let conn = rusqlite::Connection::open(db_dir.path().join("cricket.db"))?;
    let orphaned_innings: i64 = conn.query_row(
        "SELECT COUNT(*) FROM innings i LEFT JOIN matches m ON i.match_id = m.id WHERE m.id IS NULL",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(orphaned_innings, 0);

    let inconsistent_deliveries: i64 = conn.query_row(
        "SELECT COUNT(*) FROM deliveries d JOIN innings i ON d.innings_id = i.id
         WHERE d.match_id != i.match_id",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(inconsistent_deliveries, 0);

    Ok(())
}

#[tokio::test]
async fn malformed_and_unparsable_documents_do_not_block_the_batch() -> Result<()> {
    let data_dir = tempdir()?;
    let db_dir = tempdir()?;
    write_document(data_dir.path(), "match_1.json", &match_document("Mumbai", "India"));
    // Parses as JSON but has an unusable top-level shape
    write_document(data_dir.path(), "match_2.json", &json!([1, 2, 3]));
    write_document(data_dir.path(), "match_3.json", &match_document("Leeds", "New Zealand"));
    // Does not parse at all
    fs::write(data_dir.path().join("match_4.json"), "{broken").unwrap();

    let storage = open_storage(db_dir.path());
    let loader = BatchLoader::new(storage.clone());
    let report = loader
        .load_dir(&FileDocumentSource::new(data_dir.path()))
        .await?;

    assert_eq!(report.documents_processed, 2);
    assert_eq!(report.documents_failed(), 2);
    assert!(report
        .failures
        .iter()
        .any(|f| f.document_ref == "match_2.json" && f.reason.contains("Malformed document")));
    assert!(report.failures.iter().any(|f| f.document_ref.contains("match_4.json")));

    // Rows from the healthy documents are present
    let counts = storage.table_counts().await?;
    assert_eq!(counts.matches, 2);

    Ok(())
}

#[tokio::test]
async fn each_run_is_a_full_rebuild() -> Result<()> {
    let data_dir = tempdir()?;
    let db_dir = tempdir()?;
    write_document(data_dir.path(), "match_1.json", &match_document("Mumbai", "India"));

    let storage = open_storage(db_dir.path());
    let loader = BatchLoader::new(storage.clone());
    loader
        .load_dir(&FileDocumentSource::new(data_dir.path()))
        .await?;

    // Second run resets the schema first, as the load command does
    storage.reset_schema()?;
    let loader = BatchLoader::new(storage.clone());
    loader
        .load_dir(&FileDocumentSource::new(data_dir.path()))
        .await?;

    let counts = storage.table_counts().await?;
    assert_eq!(counts.matches, 1);
    assert_eq!(counts.innings, 2);
    assert_eq!(counts.deliveries, 3);

    Ok(())
}
