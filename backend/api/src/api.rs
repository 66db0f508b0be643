//! Axum REST API handlers.
//!
//! Handlers stay thin: validate the session and the input, apply one
//! domain transition through the data layer, dispatch any post-commit
//! notification, and return the updated record as JSON.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use bountyboard_core::{valuation, ApplicationStatus, Compensation, SubmissionLabel};

use crate::auth::AuthUser;
use crate::db;
use crate::errors::{ApiError, Result};
use crate::models::{
    GrantApplicationResponse, GrantSummary, ListingRecord, SponsorDashboardEntry,
    SubmissionResponse,
};
use crate::notify::{self, Notification};
use crate::price::PriceSource;

pub struct AppState {
    pub pool: SqlitePool,
    pub price: Arc<dyn PriceSource>,
    pub http: Client,
    pub notify_webhook_url: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: String,
    pub slug: String,
    #[serde(default = "default_listing_type")]
    pub listing_type: String,
    pub compensation_type: String,
    pub reward_amount: Option<f64>,
    pub min_reward_ask: Option<f64>,
    pub max_reward_ask: Option<f64>,
    pub token: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

fn default_listing_type() -> String {
    "bounty".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantsQuery {
    pub take: Option<i64>,
}

#[derive(Serialize)]
pub struct GrantsResponse {
    pub count: usize,
    pub grants: Vec<GrantSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub search_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabelRequest {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub id: String,
    pub application_status: String,
    pub approved_amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentQuery {
    pub id: Option<String>,
    pub tranche_amount: Option<f64>,
    pub tx_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWinnerRequest {
    pub id: String,
    pub is_winner: bool,
    pub winner_position: Option<String>,
    pub ask: Option<f64>,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /listings`
///
/// Creates a listing for the caller's sponsor.  Publishing sets the
/// immutable `published_at` and caches the USD valuation from the token
/// price at that instant; a failed price lookup leaves `usd_value` at 0
/// and never blocks publishing.
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateListingRequest>,
) -> Result<Json<ListingRecord>> {
    debug!("Create listing request from user {}: {req:?}", auth.id);

    let sponsor_id = auth
        .current_sponsor_id
        .ok_or_else(|| ApiError::Forbidden("User does not have a current sponsor.".to_string()))?;

    let compensation = Compensation::from_parts(
        &req.compensation_type,
        req.reward_amount,
        req.min_reward_ask,
        req.max_reward_ask,
    )
    .map_err(|e| ApiError::Validation(e.to_string()))?;

    let mut usd_value = 0.0;
    let mut published_at = None;

    if req.is_published {
        let now = Utc::now().timestamp();
        published_at = Some(now);

        // Variable compensation is valued later, at winner selection.
        if let (Some(amount), Some(token)) = (compensation.publish_amount(), req.token.as_deref())
        {
            match state.price.usd_price_at(token, now).await {
                Ok(price) => usd_value = valuation::usd_value(amount, price),
                Err(e) => error!("Error calculating USD value: {e}"),
            }
        }
    }

    let listing = db::create_listing(
        &state.pool,
        &db::NewListing {
            slug: req.slug,
            listing_type: req.listing_type,
            title: req.title,
            sponsor_id,
            compensation_type: compensation.kind().to_string(),
            reward_amount: req.reward_amount,
            min_reward_ask: req.min_reward_ask,
            max_reward_ask: req.max_reward_ask,
            token: req.token,
            usd_value,
            is_published: req.is_published,
            published_at,
        },
    )
    .await?;

    info!("Listing created successfully with ID: {}", listing.id);

    if listing.is_published {
        notify::dispatch(
            state.http.clone(),
            state.notify_webhook_url.clone(),
            Notification::ListingPublished {
                listing_id: listing.id.clone(),
                slug: listing.slug.clone(),
            },
        );
    }

    Ok(Json(listing))
}

/// `GET /grants`
///
/// Published grants with approved-application counts, newest first.
pub async fn list_grants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GrantsQuery>,
) -> Result<Json<GrantsResponse>> {
    let take = query.take.unwrap_or(100);
    let grants = db::list_grants(&state.pool, take).await?;

    info!("Fetched {} grants successfully", grants.len());
    Ok(Json(GrantsResponse {
        count: grants.len(),
        grants,
    }))
}

/// `GET /sponsor-dashboard/listings`
///
/// The caller's sponsor's listings and grants in one feed, newest first,
/// optionally filtered by a title substring.  Each entity comes from its
/// own parameterized query; the merge happens in application code.
pub async fn sponsor_dashboard_listings(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<SponsorDashboardEntry>>> {
    let sponsor_id = auth
        .current_sponsor_id
        .ok_or_else(|| ApiError::Forbidden("User does not have a current sponsor.".to_string()))?;

    let entries = db::sponsor_dashboard_listings(
        &state.pool,
        &sponsor_id,
        query.search_text.as_deref(),
    )
    .await?;

    info!(
        "Successfully fetched {} dashboard entries for sponsor {sponsor_id}",
        entries.len()
    );
    Ok(Json(entries))
}

/// `POST /grantApplication/updateLabel`
///
/// Replaces the review label on an application.  Intended while the
/// application is Pending; repeating the same label is idempotent.
pub async fn update_label(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<UpdateLabelRequest>,
) -> Result<Json<GrantApplicationResponse>> {
    let label: SubmissionLabel = req
        .label
        .parse()
        .map_err(|e: bountyboard_core::ParseLabelError| ApiError::Validation(e.to_string()))?;

    let application =
        db::update_application_label(&state.pool, &req.id, label.as_str()).await?;

    info!("Label for application {} set to {label}", req.id);
    Ok(Json(application.into()))
}

/// `POST /sponsor-dashboard/grants/update-application-status`
///
/// Applies a reviewer decision.  Only a Pending application can move;
/// re-deciding is a 400.  The applicant notification goes out after the
/// commit, fire-and-forget.
pub async fn update_application_status(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<GrantApplicationResponse>> {
    debug!("Status update request: {req:?}");

    let to: ApplicationStatus = req
        .application_status
        .parse()
        .map_err(|e: bountyboard_core::ParseStatusError| ApiError::Validation(e.to_string()))?;

    if to == ApplicationStatus::Approved && req.approved_amount.is_none() {
        return Err(ApiError::Validation(
            "approvedAmount is required to approve an application".to_string(),
        ));
    }

    let application =
        db::decide_application(&state.pool, &req.id, to, req.approved_amount).await?;

    let notification = match to {
        ApplicationStatus::Approved => Notification::ApplicationApproved {
            application_id: application.id.clone(),
            user_id: application.user_id.clone(),
            approved_amount: application.approved_amount.unwrap_or_default(),
        },
        _ => Notification::ApplicationRejected {
            application_id: application.id.clone(),
            user_id: application.user_id.clone(),
        },
    };
    notify::dispatch(state.http.clone(), state.notify_webhook_url.clone(), notification);

    Ok(Json(application.into()))
}

/// `GET /sponsor-dashboard/grants/add-payment`
///
/// Records one payment tranche.  400 when `id` or `trancheAmount` is
/// missing, 404 when the application does not exist; the append and both
/// running-total updates are all-or-nothing.
pub async fn add_payment(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<AddPaymentQuery>,
) -> Result<Json<GrantApplicationResponse>> {
    debug!("Add payment request: {query:?}");

    let (Some(id), Some(tranche_amount)) = (query.id.as_deref(), query.tranche_amount) else {
        warn!("Missing required query parameters: id or trancheAmount");
        return Err(ApiError::Validation(
            "Missing required query parameters: id or trancheAmount".to_string(),
        ));
    };

    let tx_id = query.tx_id.as_deref().unwrap_or("");
    let note = query.note.as_deref().unwrap_or("");

    let application = db::record_payment(&state.pool, id, tranche_amount, tx_id, note).await?;

    info!("Payment details updated successfully for grant application ID: {id}");
    Ok(Json(application.into()))
}

/// `POST /sponsor-dashboard/submission/toggle-winner`
///
/// Marks or unmarks a submission as a winner.  Requires the caller's
/// sponsor to own the parent listing.  Only an actual state change moves
/// `total_winners_selected`; non-fixed listings additionally finalise
/// their reward from `ask` and the price at `published_at`.
pub async fn toggle_winner(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<ToggleWinnerRequest>,
) -> Result<Json<SubmissionResponse>> {
    debug!("Toggle winner request from user {}: {req:?}", auth.id);

    let submission = db::get_submission(&state.pool, &req.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Submission with ID {} not found.", req.id)))?;

    let listing = db::get_listing(&state.pool, &submission.listing_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Listing {} not found.", submission.listing_id))
        })?;

    if auth.current_sponsor_id.as_deref() != Some(listing.sponsor_id.as_str()) {
        warn!(
            "User {} unauthorized to update submission {}",
            auth.id, req.id
        );
        return Err(ApiError::Forbidden("Unauthorized".to_string()));
    }

    let changed = submission.is_winner != req.is_winner;

    // The valuation lookup must complete before the listing write that
    // carries its result.
    let variable_reward = if changed && listing.compensation_type != "fixed" {
        let ask = req.ask.ok_or_else(|| {
            ApiError::Validation("ask is required for non-fixed compensation".to_string())
        })?;
        let token = listing.token.as_deref().ok_or_else(|| {
            ApiError::Validation("listing has no token to price".to_string())
        })?;
        let published_at = listing.published_at.ok_or_else(|| {
            ApiError::Validation("listing has not been published".to_string())
        })?;

        let price = state.price.usd_price_at(token, published_at).await?;
        Some(db::VariableReward {
            ask,
            usd_value: valuation::usd_value(ask, price),
        })
    } else {
        None
    };

    let (updated_submission, updated_listing) = db::toggle_submission_winner(
        &state.pool,
        &submission,
        req.is_winner,
        req.winner_position.as_deref(),
        variable_reward,
    )
    .await?;

    info!("Successfully updated submission with ID: {}", req.id);
    Ok(Json(SubmissionResponse {
        submission: updated_submission,
        listing: updated_listing,
    }))
}
