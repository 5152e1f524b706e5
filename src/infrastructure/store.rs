//! SQLite-backed price log and alert ledger.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

use crate::shared::errors::StoreError;
use crate::shared::types::{AlertRecord, PricePoint};

/// Durable store owning the append-only price log and the alert ledger.
/// Everything else sees copies or read-only views.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn append_price(&self, point: &PricePoint) -> Result<(), StoreError>;

    /// Prices for `url` observed within the trailing `since_days`, ordered
    /// by observation time then insertion order, ascending.
    async fn window_for(&self, url: &str, since_days: i64) -> Result<Vec<f64>, StoreError>;

    /// Whether an alert for `url` was raised within the last `within_hours`.
    async fn has_recent_alert(&self, url: &str, within_hours: i64) -> Result<bool, StoreError>;

    async fn append_alert(&self, record: &AlertRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: PriceStore + ?Sized> PriceStore for Arc<T> {
    async fn append_price(&self, point: &PricePoint) -> Result<(), StoreError> {
        (**self).append_price(point).await
    }

    async fn window_for(&self, url: &str, since_days: i64) -> Result<Vec<f64>, StoreError> {
        (**self).window_for(url, since_days).await
    }

    async fn has_recent_alert(&self, url: &str, within_hours: i64) -> Result<bool, StoreError> {
        (**self).has_recent_alert(url, within_hours).await
    }

    async fn append_alert(&self, record: &AlertRecord) -> Result<(), StoreError> {
        (**self).append_alert(record).await
    }
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database (creating it if missing) and ensures the schema.
    /// A single connection is enough: the run is one sequential writer.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS prices(
                url   TEXT NOT NULL,
                name  TEXT NOT NULL,
                ts    INTEGER NOT NULL,
                price REAL NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_prices ON prices(url, ts)")
            .execute(&pool)
            .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS alerts(
                url   TEXT NOT NULL,
                ts    INTEGER NOT NULL,
                price REAL NOT NULL,
                msg   TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PriceStore for SqliteStore {
    async fn append_price(&self, point: &PricePoint) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO prices(url, name, ts, price) VALUES (?, ?, ?, ?)")
            .bind(&point.url)
            .bind(&point.name)
            .bind(point.observed_at)
            .bind(point.price)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn window_for(&self, url: &str, since_days: i64) -> Result<Vec<f64>, StoreError> {
        let cutoff = Utc::now().timestamp() - since_days * 86_400;
        let rows =
            sqlx::query("SELECT price FROM prices WHERE url = ? AND ts >= ? ORDER BY ts, rowid")
                .bind(url)
                .bind(cutoff)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.iter().map(|r| r.get::<f64, _>("price")).collect())
    }

    async fn has_recent_alert(&self, url: &str, within_hours: i64) -> Result<bool, StoreError> {
        let cutoff = Utc::now().timestamp() - within_hours * 3_600;
        let row = sqlx::query("SELECT 1 FROM alerts WHERE url = ? AND ts >= ? LIMIT 1")
            .bind(url)
            .bind(cutoff)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn append_alert(&self, record: &AlertRecord) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO alerts(url, ts, price, msg) VALUES (?, ?, ?, ?)")
            .bind(&record.url)
            .bind(record.raised_at)
            .bind(record.price)
            .bind(&record.message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.fnac.com/a/123";

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    fn point(price: f64, observed_at: i64) -> PricePoint {
        PricePoint {
            url: URL.to_string(),
            name: "Casque".to_string(),
            observed_at,
            price,
        }
    }

    #[tokio::test]
    async fn window_round_trips_in_insertion_time_order() {
        let store = store().await;
        let now = Utc::now().timestamp();
        for (i, price) in [30.0, 10.0, 20.0].iter().enumerate() {
            store.append_price(&point(*price, now - 30 + i as i64)).await.unwrap();
        }

        let window = store.window_for(URL, 90).await.unwrap();
        assert_eq!(window, vec![30.0, 10.0, 20.0]);
    }

    #[tokio::test]
    async fn same_second_observations_keep_insertion_order() {
        let store = store().await;
        let now = Utc::now().timestamp();
        for price in [1.0, 2.0, 3.0] {
            store.append_price(&point(price, now)).await.unwrap();
        }

        let window = store.window_for(URL, 90).await.unwrap();
        assert_eq!(window, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn window_excludes_points_past_the_cutoff() {
        let store = store().await;
        let now = Utc::now().timestamp();
        store.append_price(&point(99.0, now - 200 * 86_400)).await.unwrap();
        store.append_price(&point(89.0, now - 10)).await.unwrap();

        let window = store.window_for(URL, 90).await.unwrap();
        assert_eq!(window, vec![89.0]);
    }

    #[tokio::test]
    async fn window_is_scoped_per_url() {
        let store = store().await;
        let now = Utc::now().timestamp();
        store.append_price(&point(12.0, now)).await.unwrap();
        store
            .append_price(&PricePoint {
                url: "https://www.ikea.com/p/456".to_string(),
                name: "Lampe".to_string(),
                observed_at: now,
                price: 7.0,
            })
            .await
            .unwrap();

        assert_eq!(store.window_for(URL, 90).await.unwrap(), vec![12.0]);
    }

    #[tokio::test]
    async fn alert_ledger_answers_the_cooldown_question() {
        let store = store().await;
        let now = Utc::now().timestamp();

        assert!(!store.has_recent_alert(URL, 12).await.unwrap());

        store
            .append_alert(&AlertRecord {
                url: URL.to_string(),
                raised_at: now,
                price: 0.49,
                message: "ANOMALY".to_string(),
            })
            .await
            .unwrap();

        assert!(store.has_recent_alert(URL, 12).await.unwrap());
        assert!(!store.has_recent_alert("https://other", 12).await.unwrap());
    }

    #[tokio::test]
    async fn stale_alerts_fall_out_of_the_cooldown() {
        let store = store().await;
        let now = Utc::now().timestamp();
        store
            .append_alert(&AlertRecord {
                url: URL.to_string(),
                raised_at: now - 48 * 3_600,
                price: 0.49,
                message: "ANOMALY".to_string(),
            })
            .await
            .unwrap();

        assert!(!store.has_recent_alert(URL, 12).await.unwrap());
        assert!(store.has_recent_alert(URL, 72).await.unwrap());
    }
}
