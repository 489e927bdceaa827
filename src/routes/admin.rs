use axum::{
    extract::{Multipart, State},
    Extension, Json,
};

use crate::{
    error::{AppError, Result},
    models::{ImportResponse, MessageResponse},
    queries::product_queries,
    services::{
        catalog_import,
        product_store::PgProductStore,
        spreadsheet::{self, is_supported_file_name},
    },
    utils::jwt::Claims,
    AppState,
};

const FILE_FIELD: &str = "file";

pub async fn upload_spreadsheet(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read uploaded file: {}", e)))?;

        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("File not found in request".to_string()))?;

    if file_name.trim().is_empty() {
        return Err(AppError::BadRequest("No file selected".to_string()));
    }

    if !is_supported_file_name(&file_name) {
        return Err(AppError::BadRequest(
            "Unsupported file format. Please upload a .xlsx or .xls file".to_string(),
        ));
    }

    tracing::info!(
        "User {} uploaded {} ({} bytes)",
        claims.username,
        file_name,
        bytes.len()
    );

    let rows = tokio::task::spawn_blocking(move || spreadsheet::decode_rows(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("Spreadsheet decoding task failed: {}", e)))??;

    let store = PgProductStore::new(state.db.clone());
    let report = catalog_import::reconcile(&rows, &store).await;

    Ok(Json(report.into()))
}

pub async fn deactivate_all_products(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>> {
    let deactivated = product_queries::deactivate_all(&state.db).await?;

    tracing::info!(
        "User {} deactivated {} products",
        claims.username,
        deactivated
    );

    Ok(Json(MessageResponse::new(format!(
        "All products have been removed from the catalog ({} deactivated).",
        deactivated
    ))))
}
