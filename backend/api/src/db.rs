//! Database layer — migrations, queries, and the transactional updates
//! behind the review and payment workflows.
//!
//! Every multi-row update here (tranche appends, winner toggles, status
//! decisions) happens inside one transaction; the row is re-read inside
//! that transaction before derived values (tranche numbers, counters) are
//! computed, so the database serialises concurrent writers.

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use bountyboard_core::{reward_range_display, ApplicationStatus};

use crate::errors::{ApiError, Result};
use crate::models::{
    GrantApplicationRecord, GrantRecord, GrantSummary, ListingRecord, SponsorDashboardEntry,
    SubmissionRecord, UserRecord,
};

const APPLICATION_COLUMNS: &str = "id, grant_id, user_id, ask, application_status, label, \
     approved_amount, total_paid, total_tranches, payment_details, created_at, updated_at";

const LISTING_COLUMNS: &str = "id, slug, listing_type, title, sponsor_id, compensation_type, \
     reward_amount, min_reward_ask, max_reward_ask, token, rewards, usd_value, is_published, \
     published_at, total_winners_selected, created_at";

const SUBMISSION_COLUMNS: &str =
    "id, listing_id, user_id, ask, is_winner, winner_position, created_at";

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────

pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRecord>(
        "SELECT id, name, current_sponsor_id, created_at FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

// ─────────────────────────────────────────────────────────
// Grant applications
// ─────────────────────────────────────────────────────────

pub async fn get_application(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<GrantApplicationRecord>> {
    let row = sqlx::query_as::<_, GrantApplicationRecord>(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM grant_applications WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn fetch_application_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> Result<GrantApplicationRecord> {
    let row = sqlx::query_as::<_, GrantApplicationRecord>(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM grant_applications WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    row.ok_or_else(|| ApiError::NotFound(format!("Grant application {id} not found")))
}

/// Replace the review label of an application.  A plain single-row update;
/// repeating the same label is a no-op on the stored state.
pub async fn update_application_label(
    pool: &SqlitePool,
    id: &str,
    label: &str,
) -> Result<GrantApplicationRecord> {
    let updated = sqlx::query("UPDATE grant_applications SET label = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(label)
        .bind(Utc::now().timestamp())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(ApiError::NotFound(format!(
            "Grant application {id} not found"
        )));
    }

    get_application(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Grant application {id} not found")))
}

/// Apply a reviewer decision (`Approved` or `Rejected`).
///
/// The current status is re-read inside the transaction and validated
/// through the domain state machine, so a second decision on an already
/// decided application fails instead of silently re-applying.
pub async fn decide_application(
    pool: &SqlitePool,
    id: &str,
    to: ApplicationStatus,
    approved_amount: Option<f64>,
) -> Result<GrantApplicationRecord> {
    let mut tx = pool.begin().await?;

    let current = fetch_application_tx(&mut tx, id).await?;
    let from: ApplicationStatus = current
        .application_status
        .parse()
        .map_err(|e: bountyboard_core::ParseStatusError| ApiError::Validation(e.to_string()))?;
    let next = from
        .transition(to)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let approved = match next {
        ApplicationStatus::Approved => approved_amount,
        _ => None,
    };

    sqlx::query(
        "UPDATE grant_applications \
         SET application_status = ?1, approved_amount = ?2, updated_at = ?3 \
         WHERE id = ?4",
    )
    .bind(next.as_str())
    .bind(approved)
    .bind(Utc::now().timestamp())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let updated = fetch_application_tx(&mut tx, id).await?;
    tx.commit().await?;

    info!("Application {id} moved from {from} to {next}");
    Ok(updated)
}

/// Append a payment tranche and update both running totals atomically.
///
/// One transaction covers: the in-transaction read the tranche number is
/// derived from, the application's `total_paid`/`total_tranches`/
/// `payment_details` update, and the parent grant's `total_paid` increment.
/// A failure anywhere rolls back the whole operation.
pub async fn record_payment(
    pool: &SqlitePool,
    id: &str,
    tranche_amount: f64,
    tx_id: &str,
    note: &str,
) -> Result<GrantApplicationRecord> {
    let mut tx = pool.begin().await?;

    let current = fetch_application_tx(&mut tx, id).await?;

    let mut ledger = current.ledger();
    let tranche = ledger.record(tranche_amount, tx_id, note);
    let details = ledger.details_json()?;

    sqlx::query(
        "UPDATE grant_applications \
         SET total_paid = ?1, total_tranches = ?2, payment_details = ?3, updated_at = ?4 \
         WHERE id = ?5",
    )
    .bind(ledger.total_paid)
    .bind(ledger.total_tranches as i64)
    .bind(&details)
    .bind(Utc::now().timestamp())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE grants SET total_paid = total_paid + ?1 WHERE id = ?2")
        .bind(tranche_amount)
        .bind(&current.grant_id)
        .execute(&mut *tx)
        .await?;

    let updated = fetch_application_tx(&mut tx, id).await?;
    tx.commit().await?;

    info!(
        "Recorded tranche {} of {} for application {id}",
        tranche.tranche, tranche.amount
    );
    Ok(updated)
}

// ─────────────────────────────────────────────────────────
// Grants feed
// ─────────────────────────────────────────────────────────

/// Published grants with approved-application counts, newest first.
pub async fn list_grants(pool: &SqlitePool, take: i64) -> Result<Vec<GrantSummary>> {
    let mut rows = sqlx::query_as::<_, GrantSummary>(
        r#"
        SELECT g.id, g.slug, g.title, g.sponsor_id, g.token, g.min_reward,
               g.max_reward, g.total_paid, g.created_at,
               (SELECT COUNT(*) FROM grant_applications a
                WHERE  a.grant_id = g.id AND a.application_status = 'Approved')
                   AS approved_applications
        FROM   grants g
        WHERE  g.is_published = 1
        ORDER  BY g.created_at DESC
        LIMIT  ?1
        "#,
    )
    .bind(take)
    .fetch_all(pool)
    .await?;

    for grant in &mut rows {
        if let Some(max) = grant.max_reward {
            grant.reward_display = reward_range_display(grant.min_reward, max);
        }
    }
    Ok(rows)
}

/// Combined sponsor-dashboard feed: the sponsor's listings and grants,
/// newest first.
///
/// Two parameterized per-entity queries merged and sorted here, instead of
/// interpolating a search string into a UNION.
pub async fn sponsor_dashboard_listings(
    pool: &SqlitePool,
    sponsor_id: &str,
    search_text: Option<&str>,
) -> Result<Vec<SponsorDashboardEntry>> {
    let pattern = search_text.map(|s| format!("%{s}%"));

    let listings = sqlx::query_as::<_, ListingRecord>(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings \
         WHERE sponsor_id = ?1 AND (?2 IS NULL OR title LIKE ?2)"
    ))
    .bind(sponsor_id)
    .bind(pattern.as_deref())
    .fetch_all(pool)
    .await?;

    let grants = sqlx::query_as::<_, GrantRecord>(
        "SELECT id, slug, title, sponsor_id, token, min_reward, max_reward, total_paid, \
                is_published, created_at \
         FROM grants \
         WHERE sponsor_id = ?1 AND (?2 IS NULL OR title LIKE ?2)",
    )
    .bind(sponsor_id)
    .bind(pattern.as_deref())
    .fetch_all(pool)
    .await?;

    let mut entries: Vec<SponsorDashboardEntry> = listings
        .into_iter()
        .map(SponsorDashboardEntry::from)
        .chain(grants.into_iter().map(SponsorDashboardEntry::from))
        .collect();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(entries)
}

// ─────────────────────────────────────────────────────────
// Listings and submissions
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewListing {
    pub slug: String,
    pub listing_type: String,
    pub title: String,
    pub sponsor_id: String,
    pub compensation_type: String,
    pub reward_amount: Option<f64>,
    pub min_reward_ask: Option<f64>,
    pub max_reward_ask: Option<f64>,
    pub token: Option<String>,
    pub usd_value: f64,
    pub is_published: bool,
    pub published_at: Option<i64>,
}

pub async fn create_listing(pool: &SqlitePool, listing: &NewListing) -> Result<ListingRecord> {
    let row = sqlx::query_as::<_, ListingRecord>(&format!(
        "INSERT INTO listings \
             (slug, listing_type, title, sponsor_id, compensation_type, reward_amount, \
              min_reward_ask, max_reward_ask, token, usd_value, is_published, published_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
         RETURNING {LISTING_COLUMNS}"
    ))
    .bind(&listing.slug)
    .bind(&listing.listing_type)
    .bind(&listing.title)
    .bind(&listing.sponsor_id)
    .bind(&listing.compensation_type)
    .bind(listing.reward_amount)
    .bind(listing.min_reward_ask)
    .bind(listing.max_reward_ask)
    .bind(&listing.token)
    .bind(listing.usd_value)
    .bind(listing.is_published)
    .bind(listing.published_at)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn get_listing(pool: &SqlitePool, id: &str) -> Result<Option<ListingRecord>> {
    let row = sqlx::query_as::<_, ListingRecord>(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_submission(pool: &SqlitePool, id: &str) -> Result<Option<SubmissionRecord>> {
    let row = sqlx::query_as::<_, SubmissionRecord>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Lazily finalised reward for a variable-compensation listing: applied the
/// first time a winner is marked, using the price at the listing's
/// `published_at`.
#[derive(Debug, Clone, Copy)]
pub struct VariableReward {
    pub ask: f64,
    pub usd_value: f64,
}

/// Persist a winner toggle.
///
/// The submission row is always updated; the listing's
/// `total_winners_selected` moves by ±1 only when `is_winner` actually
/// changed, and `variable_reward` (when supplied for a non-fixed listing)
/// overwrites `rewards.first`, `reward_amount`, and `usd_value` in the same
/// transaction.
pub async fn toggle_submission_winner(
    pool: &SqlitePool,
    submission: &SubmissionRecord,
    is_winner: bool,
    winner_position: Option<&str>,
    variable_reward: Option<VariableReward>,
) -> Result<(SubmissionRecord, ListingRecord)> {
    let changed = submission.is_winner != is_winner;
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE submissions SET is_winner = ?1, winner_position = ?2 WHERE id = ?3")
        .bind(is_winner)
        .bind(winner_position)
        .bind(&submission.id)
        .execute(&mut *tx)
        .await?;

    if changed {
        let delta: i64 = if is_winner { 1 } else { -1 };
        match variable_reward {
            Some(reward) => {
                let rewards = serde_json::to_string(&serde_json::json!({ "first": reward.ask }))?;
                sqlx::query(
                    "UPDATE listings \
                     SET total_winners_selected = total_winners_selected + ?1, \
                         rewards = ?2, reward_amount = ?3, usd_value = ?4 \
                     WHERE id = ?5",
                )
                .bind(delta)
                .bind(&rewards)
                .bind(reward.ask)
                .bind(reward.usd_value)
                .bind(&submission.listing_id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "UPDATE listings \
                     SET total_winners_selected = total_winners_selected + ?1 \
                     WHERE id = ?2",
                )
                .bind(delta)
                .bind(&submission.listing_id)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    let updated_submission = sqlx::query_as::<_, SubmissionRecord>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?1"
    ))
    .bind(&submission.id)
    .fetch_one(&mut *tx)
    .await?;

    let updated_listing = sqlx::query_as::<_, ListingRecord>(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1"
    ))
    .bind(&submission.listing_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((updated_submission, updated_listing))
}
