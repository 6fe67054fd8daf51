//! Swipe transaction API handlers
//!
//! Creating a swipe moves one credit on the per-UNI swipe ledger: the
//! recipient's balance goes up by one and the donor's down by one, with
//! entries created at zero on first touch and no lower bound. The ledger is
//! separate from the counters stored on user records.

use crate::error::AppError;
use crate::models::Swipe;
use crate::state::AppState;
use crate::store::Store;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A ledger balance as rendered in swipe detail responses
///
/// UNIs never referenced by any swipe render as the literal sentinel
/// `"No data"`, not as zero.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LedgerValue {
    /// A recorded balance
    Balance(i64),
    /// No ledger entry for this UNI
    Missing(&'static str),
}

impl From<Option<i64>> for LedgerValue {
    fn from(balance: Option<i64>) -> Self {
        match balance {
            Some(value) => LedgerValue::Balance(value),
            None => LedgerValue::Missing("No data"),
        }
    }
}

/// Swipe response type, optionally carrying both sides' ledger balances
#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    /// The swipe record
    #[serde(flatten)]
    pub swipe: Swipe,
    /// Recipient-side ledger balance (only with `include_details=true`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_swipes: Option<LedgerValue>,
    /// Donor-side ledger balance (only with `include_details=true`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_swipes: Option<LedgerValue>,
}

impl From<Swipe> for SwipeResponse {
    fn from(swipe: Swipe) -> Self {
        Self {
            swipe,
            user_swipes: None,
            donor_swipes: None,
        }
    }
}

/// Query parameters for fetching a swipe
#[derive(Debug, Deserialize)]
pub struct GetSwipeParams {
    /// Attach both sides' ledger balances to the response
    #[serde(default)]
    pub include_details: bool,
}

/// POST /swipe/ - Record a swipe transfer
pub async fn create_swipe(
    State(state): State<AppState>,
    Json(swipe): Json<Swipe>,
) -> Result<(StatusCode, Json<SwipeResponse>), AppError> {
    if state.store.get_swipe(swipe.swipe_id).await?.is_some() {
        return Err(AppError::SwipeAlreadyExists(swipe.swipe_id));
    }

    state.store.put_swipe(&swipe).await?;

    // Two independent ledger writes; nothing makes them atomic together.
    let recipient_balance = state.store.adjust_swipe_balance(&swipe.user_uni, 1).await?;
    let donor_balance = state
        .store
        .adjust_swipe_balance(&swipe.donor_uni, -1)
        .await?;

    info!(
        "Recorded swipe {} from {} (balance {}) to {} (balance {})",
        swipe.swipe_id, swipe.donor_uni, donor_balance, swipe.user_uni, recipient_balance
    );

    Ok((StatusCode::CREATED, Json(SwipeResponse::from(swipe))))
}

/// GET /swipe/:swipe_id - Fetch a swipe, optionally with ledger balances
pub async fn get_swipe(
    State(state): State<AppState>,
    Path(swipe_id): Path<i64>,
    Query(params): Query<GetSwipeParams>,
) -> Result<Json<SwipeResponse>, AppError> {
    let swipe = state
        .store
        .get_swipe(swipe_id)
        .await?
        .ok_or(AppError::SwipeNotFound(swipe_id))?;

    let mut response = SwipeResponse::from(swipe);
    if params.include_details {
        let user_balance = state.store.swipe_balance(&response.swipe.user_uni).await?;
        let donor_balance = state.store.swipe_balance(&response.swipe.donor_uni).await?;
        response.user_swipes = Some(LedgerValue::from(user_balance));
        response.donor_swipes = Some(LedgerValue::from(donor_balance));
    }

    Ok(Json(response))
}

/// PUT /swipe/:swipe_id - Replace a swipe record
///
/// Full replace, id from the path. The ledger is not re-adjusted; only
/// creation moves balances.
pub async fn update_swipe(
    State(state): State<AppState>,
    Path(swipe_id): Path<i64>,
    Json(mut swipe): Json<Swipe>,
) -> Result<Json<SwipeResponse>, AppError> {
    if state.store.get_swipe(swipe_id).await?.is_none() {
        return Err(AppError::SwipeNotFound(swipe_id));
    }

    swipe.swipe_id = swipe_id;
    state.store.put_swipe(&swipe).await?;
    debug!("Replaced swipe: {}", swipe_id);

    Ok(Json(SwipeResponse::from(swipe)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_state() -> AppState {
        AppState::in_memory(Duration::from_millis(5))
    }

    fn sample_swipe(id: i64) -> Swipe {
        Swipe {
            swipe_id: id,
            donor_uni: "AAA1".to_string(),
            user_uni: "BBB2".to_string(),
            exchange_date: "2024-11-02".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_swipe_moves_one_credit() {
        let state = create_test_state();

        let (status, Json(body)) = create_swipe(State(state.clone()), Json(sample_swipe(1)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.swipe, sample_swipe(1));

        assert_eq!(state.store.swipe_balance("BBB2").await.unwrap(), Some(1));
        assert_eq!(state.store.swipe_balance("AAA1").await.unwrap(), Some(-1));
    }

    #[tokio::test]
    async fn test_create_swipe_accumulates_balances() {
        let state = create_test_state();
        create_swipe(State(state.clone()), Json(sample_swipe(1)))
            .await
            .unwrap();
        create_swipe(State(state.clone()), Json(sample_swipe(2)))
            .await
            .unwrap();

        assert_eq!(state.store.swipe_balance("BBB2").await.unwrap(), Some(2));
        assert_eq!(state.store.swipe_balance("AAA1").await.unwrap(), Some(-2));
    }

    #[tokio::test]
    async fn test_create_swipe_duplicate_id_rejected() {
        let state = create_test_state();
        create_swipe(State(state.clone()), Json(sample_swipe(1)))
            .await
            .unwrap();

        let result = create_swipe(State(state.clone()), Json(sample_swipe(1))).await;
        match result.unwrap_err() {
            AppError::SwipeAlreadyExists(id) => assert_eq!(id, 1),
            other => panic!("Expected SwipeAlreadyExists, got: {:?}", other),
        }

        // The failed create must not have touched the ledger
        assert_eq!(state.store.swipe_balance("BBB2").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_get_swipe_not_found() {
        let state = create_test_state();
        let result = get_swipe(
            State(state),
            Path(99),
            Query(GetSwipeParams {
                include_details: false,
            }),
        )
        .await;
        assert!(matches!(result.unwrap_err(), AppError::SwipeNotFound(99)));
    }

    #[tokio::test]
    async fn test_get_swipe_bare_has_no_details() {
        let state = create_test_state();
        create_swipe(State(state.clone()), Json(sample_swipe(1)))
            .await
            .unwrap();

        let Json(response) = get_swipe(
            State(state),
            Path(1),
            Query(GetSwipeParams {
                include_details: false,
            }),
        )
        .await
        .unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["swipe_id"], 1);
        assert!(value.get("user_swipes").is_none());
        assert!(value.get("donor_swipes").is_none());
    }

    #[tokio::test]
    async fn test_get_swipe_details_report_balances() {
        let state = create_test_state();
        create_swipe(State(state.clone()), Json(sample_swipe(1)))
            .await
            .unwrap();

        let Json(response) = get_swipe(
            State(state),
            Path(1),
            Query(GetSwipeParams {
                include_details: true,
            }),
        )
        .await
        .unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["user_swipes"], 1);
        assert_eq!(value["donor_swipes"], -1);
    }

    #[tokio::test]
    async fn test_get_swipe_details_sentinel_for_unreferenced_uni() {
        let state = create_test_state();
        // Stored directly: neither UNI has ever been through create_swipe,
        // so the ledger has no entries for them.
        state
            .store
            .put_swipe(&Swipe {
                swipe_id: 5,
                donor_uni: "CCC3".to_string(),
                user_uni: "DDD4".to_string(),
                exchange_date: "2024-11-03".to_string(),
            })
            .await
            .unwrap();

        let Json(response) = get_swipe(
            State(state),
            Path(5),
            Query(GetSwipeParams {
                include_details: true,
            }),
        )
        .await
        .unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["user_swipes"], "No data");
        assert_eq!(value["donor_swipes"], "No data");
    }

    #[tokio::test]
    async fn test_update_swipe_is_full_replace() {
        let state = create_test_state();
        create_swipe(State(state.clone()), Json(sample_swipe(1)))
            .await
            .unwrap();

        let replacement = Swipe {
            swipe_id: 1,
            donor_uni: "EEE5".to_string(),
            user_uni: "FFF6".to_string(),
            exchange_date: "2024-12-01".to_string(),
        };
        let Json(updated) = update_swipe(State(state.clone()), Path(1), Json(replacement.clone()))
            .await
            .unwrap();
        assert_eq!(updated.swipe, replacement);

        // Replacing does not move ledger balances
        assert_eq!(state.store.swipe_balance("EEE5").await.unwrap(), None);
        assert_eq!(state.store.swipe_balance("FFF6").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_swipe_not_found() {
        let state = create_test_state();
        let result = update_swipe(State(state), Path(42), Json(sample_swipe(42))).await;
        assert!(matches!(result.unwrap_err(), AppError::SwipeNotFound(42)));
    }
}
