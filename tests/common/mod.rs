#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use colchoneria_back::{
    error::{AppError, Result},
    models::{ImportRow, NewProduct, Product},
    services::product_store::{ProductStore, UnitOfWork},
};

#[derive(Default)]
struct Inner {
    products: Vec<Product>,
    next_id: i32,
    rejected_skus: HashSet<String>,
    commits: usize,
    rollbacks: usize,
}

/// In-memory `ProductStore`. Each unit of work edits a private copy of the
/// catalog that replaces the shared one on commit.
#[derive(Clone, Default)]
pub struct MemoryProductStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every insert or update of `sku` fail like a unique constraint would.
    pub fn reject_writes_for(&self, sku: &str) {
        self.inner
            .lock()
            .unwrap()
            .rejected_skus
            .insert(sku.to_string());
    }

    pub fn seed(&self, sku: &str, name: &str, price: rust_decimal::Decimal, active: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let now = Utc::now();
        let product = Product {
            id: inner.next_id,
            sku: sku.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: "General".to_string(),
            price,
            stock: 0,
            image_url: None,
            active,
            created_at: now,
            updated_at: now,
        };
        inner.products.push(product);
    }

    pub fn products(&self) -> Vec<Product> {
        self.inner.lock().unwrap().products.clone()
    }

    pub fn product(&self, sku: &str) -> Option<Product> {
        self.products().into_iter().find(|p| p.sku == sku)
    }

    pub fn commits(&self) -> usize {
        self.inner.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.inner.lock().unwrap().rollbacks
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let inner = self.inner.lock().unwrap();
        Ok(Box::new(MemoryUnitOfWork {
            store: self.inner.clone(),
            products: inner.products.clone(),
            next_id: inner.next_id,
            rejected_skus: inner.rejected_skus.clone(),
        }))
    }
}

struct MemoryUnitOfWork {
    store: Arc<Mutex<Inner>>,
    products: Vec<Product>,
    next_id: i32,
    rejected_skus: HashSet<String>,
}

impl MemoryUnitOfWork {
    fn check_constraints(&self, sku: &str) -> Result<()> {
        if self.rejected_skus.contains(sku) {
            return Err(AppError::Conflict(format!(
                "duplicate key value violates unique constraint \"products_sku_key\" ({})",
                sku
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_by_sku(&mut self, sku: &str) -> Result<Option<Product>> {
        Ok(self.products.iter().find(|p| p.sku == sku).cloned())
    }

    async fn insert(&mut self, product: &NewProduct) -> Result<Product> {
        self.check_constraints(&product.sku)?;

        self.next_id += 1;
        let now = Utc::now();
        let created = Product {
            id: self.next_id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            image_url: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.products.push(created.clone());
        Ok(created)
    }

    async fn update(&mut self, id: i32, product: &NewProduct) -> Result<Product> {
        self.check_constraints(&product.sku)?;

        let existing = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("no product with id {}", id)))?;

        existing.name = product.name.clone();
        existing.description = product.description.clone();
        existing.category = product.category.clone();
        existing.price = product.price;
        existing.stock = product.stock;
        existing.active = true;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryUnitOfWork {
            store,
            products,
            next_id,
            ..
        } = *self;
        let mut inner = store.lock().unwrap();
        inner.products = products;
        inner.next_id = next_id;
        inner.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.store.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}

/// Store whose units of work cannot even be opened.
pub struct UnavailableStore;

#[async_trait]
impl ProductStore for UnavailableStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        Err(AppError::InternalError("connection pool timed out".to_string()))
    }
}

pub fn row(sku: &str, name: &str, price: &str, stock: &str) -> ImportRow {
    ImportRow {
        sku: sku.to_string(),
        name: name.to_string(),
        price: price.to_string(),
        stock: stock.to_string(),
        ..ImportRow::default()
    }
}
