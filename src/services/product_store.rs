use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    error::Result,
    models::{NewProduct, Product},
    queries::product_queries,
};

/// Source of per-row units of work for catalog imports.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}

/// Writes made through a unit of work become visible only after `commit`.
/// Dropping it without committing discards them.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_by_sku(&mut self, sku: &str) -> Result<Option<Product>>;

    async fn insert(&mut self, product: &NewProduct) -> Result<Product>;

    /// Overwrites the catalog fields of product `id` and reactivates it.
    async fn update(&mut self, id: i32, product: &NewProduct) -> Result<Product>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_by_sku(&mut self, sku: &str) -> Result<Option<Product>> {
        product_queries::find_by_sku(&mut self.tx, sku).await
    }

    async fn insert(&mut self, product: &NewProduct) -> Result<Product> {
        product_queries::insert_product(&mut self.tx, product).await
    }

    async fn update(&mut self, id: i32, product: &NewProduct) -> Result<Product> {
        product_queries::update_product(&mut self.tx, id, product).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
