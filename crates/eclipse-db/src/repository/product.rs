//! # Product Repository
//!
//! Database operations for consumable products.
//!
//! ## Stock Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Stock Is Decremented                             │
//! │                                                                         │
//! │  ❌ WRONG: read, check, write (races between desks)                    │
//! │     let p = get(id); if p.stock >= qty { set stock = p.stock - qty }   │
//! │                                                                         │
//! │  ✅ CORRECT: conditional decrement in one statement                    │
//! │     UPDATE products SET stock = stock - ?qty                           │
//! │     WHERE id = ? AND stock >= ?qty                                     │
//! │                                                                         │
//! │  rows_affected = 0 means someone else took the stock first.            │
//! │  The caller rolls back and surfaces InsufficientStock.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use eclipse_core::validation::{validate_price, validate_product_name};
use eclipse_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let products = repo.list_active().await?;
/// let water = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products sorted by name, for the sale picker.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, sale_price, stock, is_active,
                   created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists active products with stock remaining.
    ///
    /// The sale picker only offers what can actually be sold; zero-stock
    /// products stay in the catalog but drop out of this list.
    pub async fn list_in_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, sale_price, stock, is_active,
                   created_at, updated_at
            FROM products
            WHERE is_active = 1 AND stock > 0
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, sale_price, stock, is_active,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// Field rules are checked first: non-empty name, non-negative price.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name).map_err(DbError::invalid_input)?;
        validate_price(product.sale_price).map_err(DbError::invalid_input)?;

        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, sale_price, stock, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.sale_price)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's editable fields.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name).map_err(DbError::invalid_input)?;
        validate_price(product.sale_price).map_err(DbError::invalid_input)?;

        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                sale_price = ?4,
                stock = ?5,
                is_active = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.sale_price)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adds stock (receiving a delivery). Delta must be positive.
    pub async fn restock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Restocking product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Refused while consumption entries reference the product: a product
    /// with sales history belongs on past bills and reports, so it must be
    /// retired from the picker by zeroing stock, not removed.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Product has recorded sales
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let references: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM consumption_entries WHERE product_id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if references > 0 {
            return Err(DbError::ForeignKeyViolation {
                message: format!(
                    "product {} is referenced by {} consumption entries",
                    id, references
                ),
            });
        }

        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Fetches a product inside a transaction, failing if it doesn't exist.
pub async fn fetch_product(conn: &mut SqliteConnection, product_id: &str) -> DbResult<Product> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, category, sale_price, stock, is_active,
               created_at, updated_at
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Product", product_id))
}

/// Atomically takes `quantity` units out of stock.
///
/// The decrement only applies if enough stock remains and the product is
/// active; concurrent sales cannot drive stock negative.
///
/// ## Returns
/// * `Ok(true)` - stock reserved
/// * `Ok(false)` - not enough stock (caller rolls back)
pub async fn reserve_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<bool> {
    debug!(product_id = %product_id, quantity = %quantity, "Reserving stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND is_active = 1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

// =============================================================================
// Unit Tests
// =============================================================================
