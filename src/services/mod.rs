pub mod catalog_import;
pub mod product_store;
pub mod spreadsheet;
