//! Product, image, comment and collection queries.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::product::{
    next_quantity, Collection, Comment, Image, NewComment, NewProduct, Product, StockAdjustment,
};

#[derive(Clone)]
pub struct CatalogRepo {
    pool: PgPool,
}

impl CatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_product(
        &self,
        product_no: &str,
        new: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (id, product_no, name, description, collection_name,
                                   actual_price, normal_price, offer_price, quantity,
                                   material, size, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW())
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(product_no)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.collection_name)
        .bind(new.actual_price)
        .bind(new.normal_price)
        .bind(new.offer_price)
        .bind(new.quantity)
        .bind(&new.material)
        .bind(&new.size)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn product_exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn all_products(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn random_products(&self, count: i64) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY random() LIMIT $1")
            .bind(count)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn products_in_collection(&self, name: &str) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE collection_name = $1 ORDER BY created_at DESC",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn collection_by_id(&self, id: Uuid) -> Result<Option<Collection>, sqlx::Error> {
        sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Appends an image to a product's gallery. Additive: existing images are
    /// never replaced.
    pub async fn insert_image(&self, owner_id: Uuid, url: &str) -> Result<Image, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "INSERT INTO images (id, owner_id, source, url, created_at)
             VALUES ($1, $2, 'PRDIMG', $3, NOW())
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn images_for(&self, owner_id: Uuid) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT * FROM images WHERE owner_id = $1 ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    /// First image per owner, used as the representative image in listings.
    pub async fn representative_images(
        &self,
        owner_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, String>, sqlx::Error> {
        let rows: Vec<(Uuid, String)> = sqlx::query_as(
            "SELECT DISTINCT ON (owner_id) owner_id, url
             FROM images WHERE owner_id = ANY($1)
             ORDER BY owner_id, created_at",
        )
        .bind(owner_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn insert_comment(&self, new: &NewComment) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (id, product_id, user_id, rating, likes, body, avatar, created_at)
             VALUES ($1, $2, $3, $4, 0, $5, $6, NOW())
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(new.product_id)
        .bind(&new.user_id)
        .bind(new.rating)
        .bind(&new.body)
        .bind(&new.avatar)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn comments_for(&self, product_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE product_id = $1 ORDER BY created_at DESC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Moves stock in response to an order event, clamping at zero. A missing
    /// product is logged and skipped rather than failing the order path.
    ///
    /// Read and write are two statements with no lock between them, so
    /// concurrent adjustments to the same product can lose an update.
    pub async fn adjust_quantity(
        &self,
        product_id: Uuid,
        adjustment: StockAdjustment,
        qty: i32,
    ) -> Result<(), sqlx::Error> {
        let Some(product) = self.product_by_id(product_id).await? else {
            tracing::error!(%product_id, "stock adjustment for unknown product");
            return Ok(());
        };
        let new_qty = next_quantity(product.quantity, adjustment, qty);
        sqlx::query("UPDATE products SET quantity = $2, updated_at = NOW() WHERE id = $1")
            .bind(product_id)
            .bind(new_qty)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
