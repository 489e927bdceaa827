use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};

use crate::{
    error::{AppError, Result},
    models::ImportRow,
};

pub const SKU_COLUMN: &str = "SKU";
pub const NAME_COLUMN: &str = "Nombre";
pub const DESCRIPTION_COLUMN: &str = "Descripción";
pub const CATEGORY_COLUMN: &str = "Categoria";
pub const PRICE_COLUMN: &str = "Precio";
pub const STOCK_COLUMN: &str = "Stock";

const SUPPORTED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

pub fn is_supported_file_name(file_name: &str) -> bool {
    let lower = file_name.trim().to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Reads the first worksheet of an `.xlsx`/`.xls` payload. The first row is the
/// header; every following row of the used range becomes one `ImportRow`.
pub fn decode_rows(bytes: &[u8]) -> Result<Vec<ImportRow>> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::SpreadsheetError(format!("failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::SpreadsheetError("workbook contains no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        AppError::SpreadsheetError(format!("failed to read sheet '{}': {}", sheet_name, e))
    })?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let columns = ColumnIndex::from_header(header);
    let import_rows: Vec<ImportRow> = rows.map(|cells| columns.read_row(cells)).collect();

    tracing::info!(
        "Decoded {} data rows from sheet '{}'",
        import_rows.len(),
        sheet_name
    );

    Ok(import_rows)
}

#[derive(Debug, Default)]
struct ColumnIndex {
    sku: Option<usize>,
    name: Option<usize>,
    description: Option<usize>,
    category: Option<usize>,
    price: Option<usize>,
    stock: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &[Data]) -> Self {
        let mut index = Self::default();

        for (position, cell) in header.iter().enumerate() {
            let slot = match cell_text(cell).trim() {
                SKU_COLUMN => &mut index.sku,
                NAME_COLUMN => &mut index.name,
                DESCRIPTION_COLUMN => &mut index.description,
                CATEGORY_COLUMN => &mut index.category,
                PRICE_COLUMN => &mut index.price,
                STOCK_COLUMN => &mut index.stock,
                _ => continue,
            };
            // first matching header wins
            slot.get_or_insert(position);
        }

        index
    }

    fn read_row(&self, cells: &[Data]) -> ImportRow {
        let read = |column: Option<usize>| {
            column
                .and_then(|position| cells.get(position))
                .map(cell_text)
                .unwrap_or_default()
        };

        ImportRow {
            sku: read(self.sku),
            name: read(self.name),
            description: read(self.description),
            category: read(self.category),
            price: read(self.price),
            stock: read(self.stock),
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => dt.as_f64().to_string(),
    }
}
