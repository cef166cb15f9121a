//! PostgreSQL implementation of the persistence layer.
//!
//! Each category has its own table (see `migrations/`). Table and instant
//! column names come from the exhaustive matches below and are the only
//! values ever interpolated into SQL; everything else is bound.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{NewPhotoAttachment, PhotoAttachment};
use super::{ChildStore, EventFilter, EventQuery, EventStore, PhotoStore, StoreError};
use crate::config::GatewayConfig;
use crate::domain::{
    Category, Child, ChildId, ChildProfile, EventId, EventPayload, EventRecord, ItemKey,
    NewChild, NewEvent,
};

const EVENT_COLUMNS: &str = "id, seq, child_id, recorded_by, notes, details, created_at";

type EventRow = (
    Uuid,
    i64,
    Uuid,
    Option<Uuid>,
    Option<String>,
    serde_json::Value,
    DateTime<Utc>,
);

type PhotoRow = (Uuid, Uuid, String, String, DateTime<Utc>);

const CHILD_COLUMNS: &str = "id, owner_id, name, birth_date, gender, photo_url, created_at";

type ChildRow = (
    Uuid,
    Option<Uuid>,
    String,
    DateTime<Utc>,
    String,
    Option<String>,
    DateTime<Utc>,
);

fn child_from_row(row: ChildRow) -> Child {
    let (id, owner_id, name, birth_date, gender, photo_url, created_at) = row;
    Child {
        id: ChildId::from_uuid(id),
        owner_id,
        name,
        birth_date,
        gender,
        photo_url,
        created_at,
    }
}

/// Table holding events of `category`.
pub(crate) const fn table_name(category: Category) -> &'static str {
    match category {
        Category::Diaper => "diaper_change",
        Category::Feeding => "feeding",
        Category::Nursing => "nursing",
        Category::Sleep => "sleep",
        Category::Medication => "medication",
        Category::Milestone => "milestone",
        Category::Measurement => "measurement",
        Category::Photo => "photo",
    }
}

/// Column holding the instant of `category`, quoted where needed.
pub(crate) const fn instant_column(category: Category) -> &'static str {
    match category {
        Category::Sleep => "start_time",
        Category::Medication => "administered_at",
        Category::Milestone => "achieved_at",
        Category::Diaper
        | Category::Feeding
        | Category::Nursing
        | Category::Measurement
        | Category::Photo => "\"timestamp\"",
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn decode(category: Category, row: EventRow) -> Result<EventRecord, StoreError> {
    let (id, seq, child_id, recorded_by, notes, details, created_at) = row;
    let payload = EventPayload::from_details(category, details)
        .map_err(|e| StoreError::Corrupt(format!("{category}/{id}: {e}")))?;
    Ok(EventRecord {
        id: EventId::from_uuid(id),
        child_id: ChildId::from_uuid(child_id),
        seq,
        recorded_by,
        notes,
        payload,
        created_at,
    })
}

fn encode(payload: &EventPayload) -> Result<serde_json::Value, StoreError> {
    payload
        .to_details()
        .map_err(|e| StoreError::Corrupt(format!("{}: {e}", payload.category())))
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    let column = instant_column(filter.category);
    qb.push(" WHERE child_id = ").push_bind(*filter.child_id.as_uuid());
    if let Some(start) = filter.window.start() {
        qb.push(format!(" AND {column} >= ")).push_bind(start);
    }
    if let Some(end) = filter.window.end() {
        qb.push(format!(" AND {column} <= ")).push_bind(end);
    }
}

/// Builds the `find` statement: newest first by the category's instant,
/// insertion order on ties, then the optional page bounds.
fn find_query(query: &EventQuery) -> QueryBuilder<'static, Postgres> {
    let category = query.filter.category;
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {EVENT_COLUMNS} FROM {}",
        table_name(category)
    ));
    push_filter(&mut qb, &query.filter);
    qb.push(format!(" ORDER BY {} DESC, seq ASC", instant_column(category)));
    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(to_i64(limit));
    }
    if query.offset > 0 {
        qb.push(" OFFSET ").push_bind(to_i64(query.offset));
    }
    qb
}

fn count_query(filter: &EventFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT COUNT(*) FROM {}",
        table_name(filter.category)
    ));
    push_filter(&mut qb, filter);
    qb
}

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Database`] if the database is unreachable.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn find(&self, query: &EventQuery) -> Result<Vec<EventRecord>, StoreError> {
        let mut qb = find_query(query);
        let rows: Vec<EventRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| decode(query.filter.category, row))
            .collect()
    }

    async fn count(&self, filter: &EventFilter) -> Result<u64, StoreError> {
        let mut qb = count_query(filter);
        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn get(&self, key: ItemKey) -> Result<Option<EventRecord>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM {} WHERE id = $1",
            table_name(key.category)
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(*key.id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| decode(key.category, r)).transpose()
    }

    async fn insert(&self, event: NewEvent) -> Result<EventRecord, StoreError> {
        let payload = event.payload.at_storage_precision();
        let category = payload.category();
        let details = encode(&payload)?;
        let sql = format!(
            "INSERT INTO {} (id, child_id, recorded_by, {}, notes, details) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING seq, created_at",
            table_name(category),
            instant_column(category)
        );
        let (seq, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(&sql)
            .bind(*event.id.as_uuid())
            .bind(*event.child_id.as_uuid())
            .bind(event.recorded_by)
            .bind(payload.occurred_at())
            .bind(event.notes.as_deref())
            .bind(&details)
            .fetch_one(&self.pool)
            .await?;

        Ok(EventRecord {
            id: event.id,
            child_id: event.child_id,
            seq,
            recorded_by: event.recorded_by,
            notes: event.notes,
            payload,
            created_at,
        })
    }

    async fn update(
        &self,
        key: ItemKey,
        payload: EventPayload,
        notes: Option<String>,
    ) -> Result<Option<EventRecord>, StoreError> {
        let payload = payload.at_storage_precision();
        let details = encode(&payload)?;
        let sql = format!(
            "UPDATE {} SET {} = $2, notes = $3, details = $4 WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}",
            table_name(key.category),
            instant_column(key.category)
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(*key.id.as_uuid())
            .bind(payload.occurred_at())
            .bind(notes.as_deref())
            .bind(&details)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| decode(key.category, r)).transpose()
    }

    async fn delete(&self, key: ItemKey) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM item_photo WHERE item_id = $1 AND item_type = $2")
            .bind(*key.id.as_uuid())
            .bind(key.category.as_str())
            .execute(&mut *tx)
            .await?;

        let sql = format!("DELETE FROM {} WHERE id = $1", table_name(key.category));
        let result = sqlx::query(&sql)
            .bind(*key.id.as_uuid())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl ChildStore for PostgresStore {
    async fn list_children(&self, owner: Option<Uuid>) -> Result<Vec<Child>, StoreError> {
        let sql = format!(
            "SELECT {CHILD_COLUMNS} FROM child \
             WHERE $1::uuid IS NULL OR owner_id = $1 ORDER BY seq ASC"
        );
        let rows = sqlx::query_as::<_, ChildRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(child_from_row).collect())
    }

    async fn get_child(&self, id: ChildId) -> Result<Option<Child>, StoreError> {
        let sql = format!("SELECT {CHILD_COLUMNS} FROM child WHERE id = $1");
        let row = sqlx::query_as::<_, ChildRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(child_from_row))
    }

    async fn insert_child(&self, child: NewChild) -> Result<Child, StoreError> {
        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO child (id, owner_id, name, birth_date, gender, photo_url) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING created_at",
        )
        .bind(*child.id.as_uuid())
        .bind(child.owner_id)
        .bind(&child.profile.name)
        .bind(child.profile.birth_date)
        .bind(&child.profile.gender)
        .bind(child.profile.photo_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(Child::from_parts(
            child.id,
            child.owner_id,
            child.profile,
            created_at,
        ))
    }

    async fn update_child(
        &self,
        id: ChildId,
        profile: ChildProfile,
    ) -> Result<Option<Child>, StoreError> {
        let sql = format!(
            "UPDATE child SET name = $2, birth_date = $3, gender = $4, photo_url = $5 \
             WHERE id = $1 RETURNING {CHILD_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ChildRow>(&sql)
            .bind(*id.as_uuid())
            .bind(&profile.name)
            .bind(profile.birth_date)
            .bind(&profile.gender)
            .bind(profile.photo_url.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(child_from_row))
    }

    async fn delete_child(&self, id: ChildId) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM child WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for category in Category::ALL {
            sqlx::query(&cascade_photos_sql(category))
                .bind(category.as_str())
                .bind(*id.as_uuid())
                .execute(&mut *tx)
                .await?;
            let sql = format!("DELETE FROM {} WHERE child_id = $1", table_name(category));
            sqlx::query(&sql).bind(*id.as_uuid()).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

/// Removes the photo attachments of one child's events in `category`.
fn cascade_photos_sql(category: Category) -> String {
    format!(
        "DELETE FROM item_photo WHERE item_type = $1 \
         AND item_id IN (SELECT id FROM {} WHERE child_id = $2)",
        table_name(category)
    )
}

#[async_trait]
impl PhotoStore for PostgresStore {
    async fn find_by_item(
        &self,
        item_id: EventId,
        item_type: &str,
    ) -> Result<Vec<PhotoAttachment>, StoreError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            "SELECT id, item_id, item_type, photo_url, \"timestamp\" FROM item_photo \
             WHERE item_id = $1 AND item_type = $2 ORDER BY \"timestamp\" DESC, seq DESC",
        )
        .bind(*item_id.as_uuid())
        .bind(item_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, item_id, item_type, photo_url, timestamp)| PhotoAttachment {
                    id,
                    item_id: EventId::from_uuid(item_id),
                    item_type,
                    photo_url,
                    timestamp,
                },
            )
            .collect())
    }

    async fn insert_photo(
        &self,
        photo: NewPhotoAttachment,
    ) -> Result<PhotoAttachment, StoreError> {
        let id = Uuid::new_v4();
        let timestamp = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO item_photo (id, item_id, item_type, photo_url, \"timestamp\") \
             VALUES ($1, $2, $3, $4, COALESCE($5, now())) RETURNING \"timestamp\"",
        )
        .bind(id)
        .bind(*photo.item_id.as_uuid())
        .bind(&photo.item_type)
        .bind(&photo.photo_url)
        .bind(photo.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(PhotoAttachment {
            id,
            item_id: photo.item_id,
            item_type: photo.item_type,
            photo_url: photo.photo_url,
            timestamp,
        })
    }
}
