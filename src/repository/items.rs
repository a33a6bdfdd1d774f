//! Items repository for database operations.
//!
//! The stock invariant `0 <= in_stock <= total` is enforced here on every
//! write, backed by CHECK constraints in the schema.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::StockStatus,
        item::{CreateItem, Item, ItemQuery, UpdateItem},
    },
};

/// Per-category stock aggregates
#[derive(Debug, Clone)]
pub struct CategoryStockRow {
    pub category: String,
    pub item_count: i64,
    pub total_quantity: i64,
    pub available_quantity: i64,
}

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// List items with keyword, category and stock-status filters
    pub async fn list(&self, query: &ItemQuery) -> AppResult<Vec<Item>> {
        let keyword = query.keyword.as_deref().map(|k| format!("%{}%", k));

        let status_filter = match query.status {
            Some(StockStatus::InStock) => "AND in_stock > 0",
            Some(StockStatus::OutOfStock) => "AND in_stock = 0",
            Some(StockStatus::PartialInStock) => "AND in_stock > 0 AND in_stock < total",
            None => "",
        };

        let sql = format!(
            r#"
            SELECT * FROM items
            WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
              {}
            ORDER BY name
            "#,
            status_filter
        );

        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(keyword)
            .bind(query.category.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Create an item. The category name must already exist (the service
    /// upserts it first).
    pub async fn create(&self, item: &CreateItem, category: &str) -> AppResult<Item> {
        if item.in_stock > item.total {
            return Err(AppError::InvalidArgument(
                "In-stock count cannot exceed total".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, category, total, in_stock, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&item.name)
        .bind(category)
        .bind(item.total)
        .bind(item.in_stock)
        .bind(item.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Apply a partial update, validating the resulting stock counts
    pub async fn update(&self, id: i32, changes: &UpdateItem) -> AppResult<Item> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))?;

        let total = changes.total.unwrap_or(item.total);
        let in_stock = changes.in_stock.unwrap_or(item.in_stock);

        if total < 0 || in_stock < 0 {
            return Err(AppError::InvalidArgument(
                "Stock counts must not be negative".to_string(),
            ));
        }
        if in_stock > total {
            return Err(AppError::InvalidArgument(
                "In-stock count cannot exceed total".to_string(),
            ));
        }

        if let Some(ref name) = changes.name {
            if name.is_empty() {
                return Err(AppError::InvalidArgument(
                    "Item name must not be empty".to_string(),
                ));
            }
        }

        let updated = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = COALESCE($1, name),
                category = COALESCE($2, category),
                total = $3,
                in_stock = $4,
                description = COALESCE($5, description),
                updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.category.as_deref())
        .bind(total)
        .bind(in_stock)
        .bind(changes.description.as_deref())
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Delete an item. The caller is responsible for checking that no
    /// approved or partially returned request still references it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }

        Ok(())
    }

    /// Move all items from one category name to another (category rename)
    pub async fn rename_category(&self, old_name: &str, new_name: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE items SET category = $1, updated_at = $2 WHERE category = $3",
        )
        .bind(new_name)
        .bind(Utc::now())
        .bind(old_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count items in a category
    pub async fn count_by_category(&self, category: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE category = $1")
            .bind(category)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count all items
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Sum of total and in-stock units across all items
    pub async fn stock_totals(&self) -> AppResult<(i64, i64)> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(total), 0)::bigint as total, COALESCE(SUM(in_stock), 0)::bigint as in_stock FROM items",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((row.get("total"), row.get("in_stock")))
    }

    /// Per-category item counts and stock aggregates
    pub async fn stock_by_category(&self) -> AppResult<Vec<CategoryStockRow>> {
        let rows = sqlx::query(
            r#"
            SELECT category,
                   COUNT(*) as item_count,
                   COALESCE(SUM(total), 0)::bigint as total_quantity,
                   COALESCE(SUM(in_stock), 0)::bigint as available_quantity
            FROM items
            GROUP BY category
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| CategoryStockRow {
                category: r.get("category"),
                item_count: r.get("item_count"),
                total_quantity: r.get("total_quantity"),
                available_quantity: r.get("available_quantity"),
            })
            .collect())
    }

    /// All items, for data export
    pub async fn list_all(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
