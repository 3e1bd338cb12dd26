//! Postgres-backed product store.
//!
//! Schema lives in `migrations/0001_products.sql` and can be applied with
//! [`PostgresProductStore::ensure_schema`].
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Another product already has the name |
//! | Database (check violation) | `23514` | `Conflict` | Negative stock reached the database |
//! | Database (other) | Any other | `Unavailable` | Other database errors |
//! | (no row matched a stock update) | N/A | `Conflict` | Stock changed since it was read |
//! | PoolClosed / Io / Tls / other | N/A | `Unavailable` | Connectivity failures |
//!
//! ## Runtime
//!
//! `ProductStore` is synchronous; the trait methods bridge to the async queries through
//! the current tokio runtime, which must be multi-threaded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::instrument;

use stockledger_core::{Money, MovementId, ProductId};
use stockledger_inventory::{Movement, MovementKind};
use stockledger_products::{Product, ValidatedProduct};

use super::r#trait::{ProductStore, ProductUpdate, StoreError};

const SCHEMA: &str = include_str!("../../migrations/0001_products.sql");

const PRODUCT_COLUMNS: &str = "id, name, stock, price_cents, cost_cents, updated_at";

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and safe to share across
/// request handlers. Name uniqueness and non-negative stock are enforced by the schema,
/// so a write racing past the ledger's validation still cannot corrupt the catalog.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a small connection pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(|row| product_from_row("list", row)).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?
            .ok_or_else(|| StoreError::not_found(id))?;

        product_from_row("get", &row)
    }

    #[instrument(skip(self, new_product), fields(name = new_product.name()), err)]
    pub async fn insert_product(&self, new_product: &ValidatedProduct) -> Result<Product, StoreError> {
        let id = ProductId::new();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (id, name, stock, price_cents, cost_cents, updated_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(new_product.name())
        .bind(new_product.stock())
        .bind(new_product.price().cents())
        .bind(new_product.cost().cents())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        product_from_row("create", &row)
    }

    #[instrument(skip(self, update), fields(product_id = %id), err)]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, StoreError> {
        let expected_stock = match &update {
            ProductUpdate::Stock { expected, .. } => Some(*expected),
            ProductUpdate::Replace(_) => None,
        };

        let row = match update {
            ProductUpdate::Replace(fields) => sqlx::query(&format!(
                r#"
                UPDATE products
                SET name = $2, stock = $3, price_cents = $4, cost_cents = $5, updated_at = now()
                WHERE id = $1
                RETURNING {PRODUCT_COLUMNS}
                "#
            ))
            .bind(id.as_uuid())
            .bind(fields.name().to_string())
            .bind(fields.stock())
            .bind(fields.price().cents())
            .bind(fields.cost().cents())
            .fetch_optional(&*self.pool)
            .await,
            ProductUpdate::Stock { expected, new } => sqlx::query(&format!(
                r#"
                UPDATE products
                SET stock = $2, updated_at = now()
                WHERE id = $1 AND stock = $3
                RETURNING {PRODUCT_COLUMNS}
                "#
            ))
            .bind(id.as_uuid())
            .bind(new)
            .bind(expected)
            .fetch_optional(&*self.pool)
            .await,
        }
        .map_err(|e| map_sqlx_error("update", e))?;

        match (row, expected_stock) {
            (Some(row), _) => product_from_row("update", &row),
            (None, None) => Err(StoreError::not_found(id)),
            (None, Some(expected)) => Err(self.stale_stock(id, expected).await),
        }
    }

    /// Explain why a conditional stock update matched no row.
    async fn stale_stock(&self, id: ProductId, expected: i64) -> StoreError {
        let current = sqlx::query("SELECT stock FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await;

        match current {
            Ok(None) => StoreError::not_found(id),
            Ok(Some(row)) => match row.try_get::<i64, _>("stock") {
                Ok(stock) => StoreError::conflict(
                    "update",
                    format!("stock of {id} is {stock} (expected {expected})"),
                ),
                Err(e) => map_sqlx_error("update", e),
            },
            Err(e) => map_sqlx_error("update", e),
        }
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(self, movement), fields(product_id = %movement.product_id, kind = %movement.kind), err)]
    pub async fn insert_movement(&self, movement: &Movement) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO movements (id, product_id, kind, quantity, note, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(movement.id.as_uuid())
        .bind(movement.product_id.as_uuid())
        .bind(movement.kind.as_str())
        .bind(movement.quantity)
        .bind(movement.note.as_deref())
        .bind(movement.occurred_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("append_movement", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id), err)]
    pub async fn load_movements(&self, product_id: ProductId) -> Result<Vec<Movement>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, kind, quantity, note, occurred_at
            FROM movements
            WHERE product_id = $1
            ORDER BY occurred_at ASC, id ASC
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("movements", e))?;

        rows.iter().map(movement_from_row).collect()
    }

    fn block_on<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            StoreError::unavailable(operation, "PostgresProductStore requires a tokio runtime")
        })?;
        tokio::task::block_in_place(|| handle.block_on(fut))
    }
}

impl ProductStore for PostgresProductStore {
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.block_on("list", self.list_products())
    }

    fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        self.block_on("get", self.get_product(id))
    }

    fn create(&self, fields: &ValidatedProduct) -> Result<Product, StoreError> {
        self.block_on("create", self.insert_product(fields))
    }

    fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product, StoreError> {
        self.block_on("update", self.update_product(id, update))
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        self.block_on("delete", self.delete_product(id))
    }

    fn append_movement(&self, movement: &Movement) -> Result<(), StoreError> {
        self.block_on("append_movement", self.insert_movement(movement))
    }

    fn movements(&self, product_id: ProductId) -> Result<Vec<Movement>, StoreError> {
        self.block_on("movements", self.load_movements(product_id))
    }
}

fn product_from_row(operation: &'static str, row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| StoreError::unavailable(operation, format!("failed to decode product row: {e}"));

    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        stock: row.try_get("stock").map_err(decode)?,
        price: Money::from_cents(row.try_get("price_cents").map_err(decode)?),
        cost: Money::from_cents(row.try_get("cost_cents").map_err(decode)?),
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(decode)?,
    })
}

fn movement_from_row(row: &PgRow) -> Result<Movement, StoreError> {
    let decode = |e: sqlx::Error| StoreError::unavailable("movements", format!("failed to decode movement row: {e}"));

    let kind: String = row.try_get("kind").map_err(decode)?;
    let kind = MovementKind::parse(&kind)
        .ok_or_else(|| StoreError::unavailable("movements", format!("unknown movement kind '{kind}'")))?;

    Ok(Movement {
        id: MovementId::from_uuid(row.try_get("id").map_err(decode)?),
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(decode)?),
        kind,
        quantity: row.try_get("quantity").map_err(decode)?,
        note: row.try_get("note").map_err(decode)?,
        occurred_at: row.try_get("occurred_at").map_err(decode)?,
    })
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23514") => StoreError::conflict(operation, msg),
                _ => StoreError::unavailable(operation, msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::unavailable(operation, "connection pool closed"),
        sqlx::Error::PoolTimedOut => StoreError::unavailable(operation, "timed out waiting for a connection"),
        other => StoreError::unavailable(operation, format!("sqlx error: {other}")),
    }
}
