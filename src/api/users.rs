//! User account API handlers
//!
//! CRUD over user records keyed by UNI, offset/limit listing, and the
//! delayed swipe-count update.

use crate::api::links::{user_links, Link};
use crate::api::MessageResponse;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;
use crate::store::Store;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// User response type: the record plus its navigation links
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The user record
    #[serde(flatten)]
    pub user: User,
    /// Links to related operations on this resource
    pub links: Vec<Link>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let links = user_links(&user.uni);
        Self { user, links }
    }
}

/// Query parameters for listing users
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Records per page (default 10)
    pub page_size: Option<u64>,
}

/// Request body for the delayed swipe-count update
#[derive(Debug, Deserialize)]
pub struct SwipeCountUpdate {
    /// Target account
    #[serde(rename = "UNI")]
    pub uni: String,
    /// Amount added to the account's received counter
    pub delta: i64,
}

/// POST /users/ - Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<UserResponse>), AppError> {
    if state.store.get_user(&user.uni).await?.is_some() {
        return Err(AppError::UserAlreadyExists(user.uni));
    }

    state.store.put_user(&user).await?;
    info!("Registered user: {}", user.uni);

    let location = format!("/users/{}", user.uni);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(user)),
    ))
}

/// GET /users/:uni - Get a specific user
pub async fn get_user(
    State(state): State<AppState>,
    Path(uni): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .store
        .get_user(&uni)
        .await?
        .ok_or(AppError::UserNotFound(uni))?;

    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/:uni - Replace a user record
///
/// Every field is overwritten from the payload; the UNI in the path is
/// authoritative.
pub async fn update_user(
    State(state): State<AppState>,
    Path(uni): Path<String>,
    Json(mut user): Json<User>,
) -> Result<Json<UserResponse>, AppError> {
    if state.store.get_user(&uni).await?.is_none() {
        return Err(AppError::UserNotFound(uni));
    }

    user.uni = uni;
    state.store.put_user(&user).await?;
    debug!("Replaced user: {}", user.uni);

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:uni - Remove a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(uni): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_user(&uni).await? {
        return Err(AppError::UserNotFound(uni));
    }

    info!("Deleted user: {}", uni);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/ - List users with offset/limit pagination
///
/// An empty page, including one past the end of the table, is a not-found
/// error rather than an empty list.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(10);
    let offset = page.saturating_sub(1).saturating_mul(page_size);

    let users = state.store.list_users(offset, page_size).await?;
    if users.is_empty() {
        return Err(AppError::EmptyPage { page, page_size });
    }

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /user_swipes/update_async - Delayed swipe-count update
///
/// Waits the configured artificial latency, then bumps the target user's
/// received counter. The response is sent only after the write lands, so a
/// missing UNI surfaces as a synchronous 404.
pub async fn update_swipes_async(
    State(state): State<AppState>,
    Json(request): Json<SwipeCountUpdate>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    tokio::time::sleep(state.update_delay).await;

    let mut user = state
        .store
        .get_user(&request.uni)
        .await?
        .ok_or(AppError::UserNotFound(request.uni.clone()))?;

    user.num_of_swipes_received += request.delta;
    state.store.put_user(&user).await?;
    info!(
        "Adjusted received swipes for {} by {}",
        user.uni, request.delta
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: format!("Swipe count update applied for {}", user.uni),
            status: "accepted".to_string(),
        }),
    ))
}
