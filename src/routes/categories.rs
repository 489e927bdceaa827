use axum::{extract::State, Json};

use crate::{error::Result, queries::product_queries, AppState};

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let categories = product_queries::distinct_categories(&state.db).await?;

    Ok(Json(categories))
}
