use sqlx::{sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions}, Row};
use chrono::{DateTime, Utc};
use std::env;
use std::str::FromStr;
use crate::models::{AwardResult, Nominee, NomineeInfo};

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        // Get database URL from environment or use a default
        let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:awards.db".to_string());
        Self::connect(&db_url).await
    }

    pub async fn connect(db_url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        // Connect to the database, creating the file if it doesn't exist
        // Rows are loaded out of band and may reference nominees that are not
        // present; keep SQLite's default of not enforcing foreign keys (sqlx
        // turns enforcement on by default).
        let connect_options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .foreign_keys(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;

        // Initialize schema
        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    // Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // Initialize the database schema. Tables are created if missing; the
    // service itself never writes rows — results and nominees are loaded
    // out of band by the awards admins.
    async fn init_schema(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS nominees (
                id INTEGER PRIMARY KEY,
                category TEXT NOT NULL,
                title TEXT NOT NULL,
                anime_name TEXT,
                image_url TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY,
                nominee_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                "rank" INTEGER NOT NULL,
                public_votes INTEGER NOT NULL DEFAULT 0,
                jury_votes INTEGER NOT NULL DEFAULT 0,
                final_score REAL,
                FOREIGN KEY (nominee_id) REFERENCES nominees(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Get all finalized results, joined with the display fields of the
    // nominee each one points at, ordered by category then rank
    pub async fn get_results(&self) -> Result<Vec<AwardResult>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.nominee_id, r.category, r."rank",
                   r.public_votes, r.jury_votes, r.final_score,
                   n.title AS nominee_title, n.anime_name, n.image_url
            FROM results r
            LEFT JOIN nominees n ON n.id = r.nominee_id
            ORDER BY r.category, r."rank"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let results = rows
            .into_iter()
            .map(|row| {
                // A dangling nominee_id leaves the joined columns NULL; the
                // result still renders, just without nominee metadata
                let nominee = row
                    .get::<Option<String>, _>("nominee_title")
                    .map(|title| NomineeInfo {
                        title,
                        anime_name: row.get("anime_name"),
                        image_url: row.get("image_url"),
                    });

                AwardResult {
                    id: row.get::<i64, _>("id"),
                    nominee_id: row.get::<i64, _>("nominee_id"),
                    category: row.get::<String, _>("category"),
                    rank: row.get::<i64, _>("rank"),
                    public_votes: row.get::<i64, _>("public_votes"),
                    jury_votes: row.get::<i64, _>("jury_votes"),
                    final_score: row.get::<Option<f64>, _>("final_score"),
                    nominee,
                }
            })
            .collect();

        Ok(results)
    }

    // Get the full nominee roster in submission order
    pub async fn get_nominees(&self) -> Result<Vec<Nominee>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category, title, anime_name, image_url, created_at
            FROM nominees
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut nominees = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at_str = row.get::<String, _>("created_at");
            let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                .map_err(|e| format!("Failed to parse created_at: {}", e))?
                .with_timezone(&Utc);

            nominees.push(Nominee {
                id: row.get::<i64, _>("id"),
                category: row.get::<String, _>("category"),
                title: row.get::<String, _>("title"),
                anime_name: row.get::<Option<String>, _>("anime_name"),
                image_url: row.get::<Option<String>, _>("image_url"),
                created_at,
            });
        }

        Ok(nominees)
    }
}
