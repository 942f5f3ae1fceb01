use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::repo::{self, Cabin};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cabins", get(list_cabins))
        .route("/cabins/:id", get(get_cabin))
}

#[instrument(skip(state))]
pub async fn list_cabins(State(state): State<AppState>) -> AppResult<Json<Vec<Cabin>>> {
    let cabins = repo::list(&state.db).await?;
    Ok(Json(cabins))
}

#[instrument(skip(state))]
pub async fn get_cabin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Cabin>> {
    let cabin = repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cabin not found".into()))?;
    Ok(Json(cabin))
}
