//! Donor points API handler
//!
//! A best-effort counter, looser than the swipe-count update: missing UNIs
//! are skipped silently instead of reported.

use crate::api::MessageResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::Store;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use tracing::{debug, info};

/// Request body for the delayed points update
#[derive(Debug, Deserialize)]
pub struct PointsUpdate {
    /// Target account
    #[serde(rename = "UNI")]
    pub uni: String,
    /// Amount added to the account's point total
    pub delta: i64,
}

/// PUT /user_points/update_async - Delayed, best-effort points update
///
/// Waits the configured artificial latency, then adds to the stored point
/// total only if an entry for the UNI already exists. A UNI with no entry
/// is left untouched and still acknowledged with success.
pub async fn update_points_async(
    State(state): State<AppState>,
    Json(request): Json<PointsUpdate>,
) -> Result<Json<MessageResponse>, AppError> {
    tokio::time::sleep(state.update_delay).await;

    match state.store.points(&request.uni).await? {
        Some(points) => {
            state
                .store
                .set_points(&request.uni, points + request.delta)
                .await?;
            info!("Adjusted points for {} by {}", request.uni, request.delta);
        }
        None => {
            debug!("No points entry for {}, skipping update", request.uni);
        }
    }

    Ok(Json(MessageResponse {
        message: format!("Points update processed for {}", request.uni),
        status: "ok".to_string(),
    }))
}
