use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use crate::core::errors::ApiError;

/// A taught question with its accumulated answers.
///
/// There is deliberately no uniqueness constraint on `question`: concurrent
/// teach calls for a brand-new question can race and create two rows, and
/// the ask path copes by selecting among all rows with the matching text.
#[derive(Debug, Clone, PartialEq)]
pub struct QaEntry {
    pub id: i64,
    pub question: String,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SimStore {
    pool: SqlitePool,
}

impl SimStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, ApiError> {
        let connect_options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(connect_options)
            .await
            .map_err(ApiError::internal)?;

        let store = Self { pool };
        store.init_db().await?;
        Ok(store)
    }

    async fn init_db(&self) -> Result<(), ApiError> {
        sqlx::query(
            "\
            CREATE TABLE IF NOT EXISTS data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ask TEXT,
                ans TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(())
    }

    /// Every known question, one per row, in storage order. Duplicate rows
    /// for the same text show up more than once.
    pub async fn list_questions(&self) -> Result<Vec<String>, ApiError> {
        let rows = sqlx::query("SELECT ask FROM data")
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        rows.into_iter()
            .map(|row| row.try_get("ask"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::internal)
    }

    /// Exact-match lookup returning the first matching row, if any.
    pub async fn find_by_question(&self, question: &str) -> Result<Option<QaEntry>, ApiError> {
        let row = sqlx::query("SELECT id, ask, ans FROM data WHERE ask = ?1")
            .bind(question)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        row.map(entry_from_row).transpose()
    }

    /// All rows whose question matches exactly.
    pub async fn find_all_by_question(&self, question: &str) -> Result<Vec<QaEntry>, ApiError> {
        let rows = sqlx::query("SELECT id, ask, ans FROM data WHERE ask = ?1")
            .bind(question)
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        rows.into_iter().map(entry_from_row).collect()
    }

    /// Inserts a fresh entry holding a single answer. The caller is
    /// responsible for checking the question does not already exist.
    pub async fn create_entry(&self, question: &str, answer: &str) -> Result<(), ApiError> {
        let encoded = encode_answers(&[answer.to_string()])?;

        sqlx::query("INSERT INTO data (ask, ans) VALUES (?1, ?2)")
            .bind(question)
            .bind(encoded)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }

    /// Rewrites the answer list for `question` as the stored list plus
    /// `answer`. Lookup and update are two statements, not a transaction,
    /// so an interleaved append can be lost.
    pub async fn append_answer(&self, question: &str, answer: &str) -> Result<(), ApiError> {
        let entry = self
            .find_by_question(question)
            .await?
            .ok_or_else(|| ApiError::internal(format!("no entry for question: {question}")))?;

        let mut answers = entry.answers;
        answers.push(answer.to_string());
        let encoded = encode_answers(&answers)?;

        sqlx::query("UPDATE data SET ans = ?1 WHERE ask = ?2")
            .bind(encoded)
            .bind(question)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }
}

fn entry_from_row(row: sqlx::sqlite::SqliteRow) -> Result<QaEntry, ApiError> {
    let raw_answers: String = row.try_get("ans").map_err(ApiError::internal)?;

    Ok(QaEntry {
        id: row.try_get("id").map_err(ApiError::internal)?,
        question: row.try_get("ask").map_err(ApiError::internal)?,
        answers: decode_answers(&raw_answers)?,
    })
}

// The answers column holds a JSON array of strings. Order and multiplicity
// survive the round trip, which the append path relies on.
fn encode_answers(answers: &[String]) -> Result<String, ApiError> {
    serde_json::to_string(answers).map_err(ApiError::internal)
}

fn decode_answers(raw: &str) -> Result<Vec<String>, ApiError> {
    serde_json::from_str(raw).map_err(ApiError::internal)
}
