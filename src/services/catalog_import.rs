//! Spreadsheet-to-catalog reconciliation: validates each imported row and
//! upserts it by SKU, one unit of work per row.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{
    error::{AppError, Result},
    models::{ImportReport, ImportRow, NewProduct, DEFAULT_CATEGORY},
    services::product_store::{ProductStore, UnitOfWork},
};

/// Why a single row was skipped. Never escapes `reconcile`; it only ends up
/// as a line in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    InvalidNumbers { row: usize, sku: String },
    Incomplete { row: usize, sku: String },
    Persistence { row: usize, sku: String, detail: String },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::InvalidNumbers { row, sku } => {
                write!(f, "Row {}: invalid Price or Stock. SKU: {}", row, sku)
            }
            RowError::Incomplete { row, sku } => write!(
                f,
                "Row {}: incomplete or invalid data (SKU, Name, Price must be > 0). SKU: {}",
                row, sku
            ),
            RowError::Persistence { row, sku, detail } => {
                write!(f, "Row {}: database error: {}. SKU: {}", row, detail, sku)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Spreadsheet line of the data row at `index`; line 1 is the header.
pub fn row_number(index: usize) -> usize {
    index + 2
}

pub async fn reconcile<S>(rows: &[ImportRow], store: &S) -> ImportReport
where
    S: ProductStore + ?Sized,
{
    let started_at = Instant::now();
    let mut report = ImportReport::default();

    for (index, row) in rows.iter().enumerate() {
        let outcome = match validate_row(index, row) {
            Ok(product) => upsert(store, &product)
                .await
                .map_err(|err| RowError::Persistence {
                    row: row_number(index),
                    sku: product.sku.clone(),
                    detail: persistence_detail(&err),
                }),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(UpsertOutcome::Inserted) => report.inserted_count += 1,
            Ok(UpsertOutcome::Updated) => report.updated_count += 1,
            Err(err) => {
                tracing::warn!("Import row rejected: {}", err);
                report.errors.push(err.to_string());
            }
        }
    }

    tracing::info!(
        "Catalog import finished: rows={}, inserted={}, updated={}, errors={}, elapsed_ms={}",
        rows.len(),
        report.inserted_count,
        report.updated_count,
        report.errors.len(),
        started_at.elapsed().as_millis()
    );

    report
}

/// Trims the text fields, parses Price and Stock and checks that the row is
/// complete enough to be written.
pub fn validate_row(index: usize, row: &ImportRow) -> std::result::Result<NewProduct, RowError> {
    let sku = row.sku.trim().to_string();
    let name = row.name.trim().to_string();
    let description = row.description.trim().to_string();
    let category = match row.category.trim() {
        "" => DEFAULT_CATEGORY.to_string(),
        category => category.to_string(),
    };

    let (Some(price), Some(stock)) = (parse_price(&row.price), parse_stock(&row.stock)) else {
        return Err(RowError::InvalidNumbers {
            row: row_number(index),
            sku,
        });
    };

    if sku.is_empty() || name.is_empty() || price <= Decimal::ZERO {
        return Err(RowError::Incomplete {
            row: row_number(index),
            sku,
        });
    }

    Ok(NewProduct {
        sku,
        name,
        description,
        category,
        price,
        stock,
    })
}

/// Empty cells count as zero. A comma is accepted as the decimal separator.
fn parse_price(raw: &str) -> Option<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Some(Decimal::ZERO);
    }

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Whole, non-negative quantities only; `"5.0"` is accepted as 5.
fn parse_stock(raw: &str) -> Option<i32> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Some(0);
    }

    let stock = match normalized.parse::<i32>() {
        Ok(stock) => stock,
        Err(_) => {
            let value = Decimal::from_str(&normalized).ok()?;
            if !value.fract().is_zero() {
                return None;
            }
            value.to_i32()?
        }
    };

    (stock >= 0).then_some(stock)
}

async fn upsert<S>(store: &S, product: &NewProduct) -> Result<UpsertOutcome>
where
    S: ProductStore + ?Sized,
{
    let mut uow = store.begin().await?;

    match write(uow.as_mut(), product).await {
        Ok(outcome) => {
            uow.commit().await?;
            Ok(outcome)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::error!(
                    "Rollback failed for SKU {}: {}",
                    product.sku,
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

async fn write(uow: &mut dyn UnitOfWork, product: &NewProduct) -> Result<UpsertOutcome> {
    match uow.find_by_sku(&product.sku).await? {
        Some(existing) => {
            uow.update(existing.id, product).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            uow.insert(product).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

fn persistence_detail(err: &AppError) -> String {
    match err {
        AppError::DatabaseError(e) => e.to_string(),
        AppError::ConfigError(msg)
        | AppError::InternalError(msg)
        | AppError::SpreadsheetError(msg)
        | AppError::NotFound(msg)
        | AppError::BadRequest(msg)
        | AppError::Conflict(msg)
        | AppError::Unauthorized(msg)
        | AppError::Forbidden(msg) => msg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn row(sku: &str, name: &str, price: &str, stock: &str) -> ImportRow {
        ImportRow {
            sku: sku.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
            ..ImportRow::default()
        }
    }

    #[test]
    fn trims_fields_and_defaults_category() {
        let mut input = row("  M1 ", " Colchón ", "1000", "5");
        input.description = "  Resortes  ".to_string();
        input.category = "   ".to_string();

        let product = validate_row(0, &input).unwrap();

        assert_eq!(
            product,
            NewProduct {
                sku: "M1".to_string(),
                name: "Colchón".to_string(),
                description: "Resortes".to_string(),
                category: "General".to_string(),
                price: dec!(1000),
                stock: 5,
            }
        );
    }

    #[test]
    fn non_numeric_price_is_a_parse_error() {
        let err = validate_row(3, &row("M2", "Sommier", "abc", "1")).unwrap_err();
        assert_eq!(err.to_string(), "Row 5: invalid Price or Stock. SKU: M2");
    }

    #[test]
    fn parse_errors_win_over_completeness() {
        // empty SKU and name would fail completeness, but the price check runs first
        let err = validate_row(0, &row("", "", "1", "x")).unwrap_err();
        assert!(matches!(err, RowError::InvalidNumbers { row: 2, .. }));
    }

    #[test]
    fn zero_and_negative_prices_are_incomplete() {
        for price in ["0", "-10", ""] {
            let err = validate_row(0, &row("M3", "Almohada", price, "1")).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Row 2: incomplete or invalid data (SKU, Name, Price must be > 0). SKU: M3"
            );
        }
    }

    #[test]
    fn missing_name_is_incomplete() {
        let err = validate_row(1, &row("M4", "  ", "10", "")).unwrap_err();
        assert!(matches!(err, RowError::Incomplete { row: 3, ref sku } if sku == "M4"));
    }

    #[test]
    fn price_accepts_comma_decimal_separator() {
        assert_eq!(parse_price("5309,50"), Some(dec!(5309.50)));
        assert_eq!(parse_price(" 19.99 "), Some(dec!(19.99)));
        assert_eq!(parse_price("1e3"), Some(dec!(1000)));
        assert_eq!(parse_price("12 USD"), None);
    }

    #[test]
    fn stock_must_be_a_whole_non_negative_number() {
        assert_eq!(parse_stock(""), Some(0));
        assert_eq!(parse_stock("7"), Some(7));
        assert_eq!(parse_stock("7.0"), Some(7));
        assert_eq!(parse_stock("7.5"), None);
        assert_eq!(parse_stock("-1"), None);
        assert_eq!(parse_stock("muchos"), None);
    }

    #[test]
    fn persistence_errors_name_row_and_sku() {
        let err = RowError::Persistence {
            row: 4,
            sku: "M9".to_string(),
            detail: "duplicate key value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Row 4: database error: duplicate key value. SKU: M9"
        );
    }
}
