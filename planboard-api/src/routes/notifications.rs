/// Notification endpoints

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use planboard_shared::{auth::middleware::CurrentUser, models::Notification};
use serde_json::{json, Value};

use super::plans::Pagination;

/// Lists the caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Notification>>> {
    let limit = page.limit.clamp(1, 500);
    let skip = page.skip.max(0);

    let notifications = Notification::list_for_user(&state.db, current.0.id, limit, skip).await?;
    Ok(Json(notifications))
}

/// Marks one of the caller's notifications as read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(notification_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if Notification::mark_read(&state.db, notification_id, current.0.id).await? {
        Ok(Json(json!({ "message": "Notification marked as read" })))
    } else {
        Err(ApiError::NotFound("Notification not found".to_string()))
    }
}
