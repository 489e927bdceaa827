use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{NewProduct, Product},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Active products, optionally narrowed to categories containing `category`
/// (case-insensitive).
pub async fn list_active(pool: &PgPool, category: Option<&str>) -> Result<Vec<Product>> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM products WHERE active = TRUE");

    if let Some(term) = category.map(str::trim).filter(|t| !t.is_empty()) {
        query.push(" AND category ILIKE ");
        query.push_bind(format!("%{}%", escape_like(term)));
    }

    query.push(" ORDER BY id ASC");

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

pub async fn distinct_categories(pool: &PgPool) -> Result<Vec<String>> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM products
         WHERE active = TRUE AND TRIM(category) <> ''
         ORDER BY category ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn deactivate_all(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE products SET active = FALSE, updated_at = NOW() WHERE active = TRUE",
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_sku(conn: &mut PgConnection, sku: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE sku = $1")
        .bind(sku)
        .fetch_optional(conn)
        .await?;

    Ok(product)
}

pub async fn insert_product(conn: &mut PgConnection, product: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (sku, name, description, category, price, stock, active)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE)
        RETURNING *
        "#,
    )
    .bind(&product.sku)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(product.stock)
    .fetch_one(conn)
    .await?;

    Ok(product)
}

pub async fn update_product(
    conn: &mut PgConnection,
    id: i32,
    product: &NewProduct,
) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = $1,
            description = $2,
            category = $3,
            price = $4,
            stock = $5,
            active = TRUE,
            updated_at = NOW()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(product.stock)
    .bind(id)
    .fetch_one(conn)
    .await?;

    Ok(product)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
