use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use backend_domain::ports::SpinHistoryRepository;
use backend_domain::{
    DbConfig, GeoAnnotation, HistoryQuery, NewSpinRecord, Outcome, SpinRecord, StoreError,
};

use crate::utils::{millis_to_utc, utc_to_millis};

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct SpinHistoryRow {
    pub id: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub spin_time: OffsetDateTime,
    pub spin_date: String,
    pub location: String,
    pub location_name: String,
    pub result: u8,
    pub geo_name: Option<String>,
    pub geo_latitude: Option<f64>,
    pub geo_longitude: Option<f64>,
    pub geo_accuracy: Option<f64>,
    pub geo_timestamp_ms: Option<i64>,
}

impl SpinHistoryRow {
    fn from_record(id: String, record: NewSpinRecord) -> Self {
        let geo = record.actual_location;
        Self {
            id,
            spin_time: millis_to_utc(record.timestamp_ms),
            spin_date: record.date,
            location: record.location,
            location_name: record.location_name,
            result: record.result.number(),
            geo_name: geo.as_ref().map(|geo| geo.name.clone()),
            geo_latitude: geo.as_ref().and_then(|geo| geo.latitude),
            geo_longitude: geo.as_ref().and_then(|geo| geo.longitude),
            geo_accuracy: geo.as_ref().and_then(|geo| geo.accuracy),
            geo_timestamp_ms: geo.as_ref().and_then(|geo| geo.timestamp_ms),
        }
    }

    fn into_record(self) -> Result<SpinRecord> {
        let result = Outcome::new(self.result)
            .ok_or_else(|| anyhow!("spin {} has out of range result {}", self.id, self.result))?;
        let actual_location = self.geo_name.map(|name| GeoAnnotation {
            name,
            latitude: self.geo_latitude,
            longitude: self.geo_longitude,
            accuracy: self.geo_accuracy,
            timestamp_ms: self.geo_timestamp_ms,
        });
        Ok(SpinRecord {
            id: self.id,
            location: self.location,
            location_name: self.location_name,
            result,
            timestamp_ms: utc_to_millis(self.spin_time),
            date: self.spin_date,
            actual_location,
        })
    }
}

#[derive(Clone)]
pub struct ClickhouseHistoryRepository {
    client: Client,
    database: String,
}

impl ClickhouseHistoryRepository {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn from_config(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_history = r#"
CREATE TABLE IF NOT EXISTS spin_history (
    id String,
    spin_time DateTime64(3, 'UTC'),
    spin_date String,
    location LowCardinality(String),
    location_name String,
    result UInt8,
    geo_name Nullable(String),
    geo_latitude Nullable(Float64),
    geo_longitude Nullable(Float64),
    geo_accuracy Nullable(Float64),
    geo_timestamp_ms Nullable(Int64)
) ENGINE = MergeTree
PARTITION BY spin_date
ORDER BY (spin_date, location, spin_time)
"#;
        self.client.query(create_history).execute().await?;
        Ok(())
    }

    async fn insert_row(&self, row: &SpinHistoryRow) -> Result<()> {
        let mut insert = self.client.insert("spin_history")?;
        insert.write(row).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_by_date(&self, date: &str) -> Result<Vec<SpinRecord>> {
        let rows = self
            .client
            .query("SELECT ?fields FROM spin_history WHERE spin_date = ? ORDER BY spin_time ASC")
            .bind(date)
            .fetch_all::<SpinHistoryRow>()
            .await?;
        rows.into_iter().map(SpinHistoryRow::into_record).collect()
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<SpinRecord>> {
        let mut sql = String::from("SELECT ?fields FROM spin_history WHERE 1 = 1");
        let mut binds = Vec::new();
        if let Some(start) = &query.start_date {
            sql.push_str(" AND spin_date >= ?");
            binds.push(start.clone());
        }
        if let Some(end) = &query.end_date {
            sql.push_str(" AND spin_date <= ?");
            binds.push(end.clone());
        }
        if let Some(location) = &query.location {
            sql.push_str(" AND location = ?");
            binds.push(location.clone());
        }
        sql.push_str(" ORDER BY spin_time DESC");
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut statement = self.client.query(&sql);
        for value in binds {
            statement = statement.bind(value);
        }
        let rows = statement.fetch_all::<SpinHistoryRow>().await?;
        rows.into_iter().map(SpinHistoryRow::into_record).collect()
    }

    async fn select_one(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl SpinHistoryRepository for ClickhouseHistoryRepository {
    async fn append_spin_record(&self, record: NewSpinRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let row = SpinHistoryRow::from_record(id.clone(), record);
        self.insert_row(&row).await?;
        Ok(id)
    }

    async fn query_records_by_date(&self, date: &str) -> Result<Vec<SpinRecord>, StoreError> {
        Ok(self.fetch_by_date(date).await?)
    }

    async fn query_history(&self, query: &HistoryQuery) -> Result<Vec<SpinRecord>, StoreError> {
        Ok(self.fetch_history(query).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(self.select_one().await?)
    }
}
