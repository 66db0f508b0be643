//! Database row types and JSON response shapes.
//!
//! Rows keep `payment_details` as the raw JSON column; the response shape
//! decodes it into the typed tranche sequence from [`bountyboard_core`] so
//! clients never see an untyped array.

use serde::{Deserialize, Serialize};

use bountyboard_core::{PaymentLedger, Tranche};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub current_sponsor_id: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GrantRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub sponsor_id: String,
    pub token: String,
    pub min_reward: Option<f64>,
    pub max_reward: Option<f64>,
    pub total_paid: f64,
    pub is_published: bool,
    pub created_at: i64,
}

/// Grant plus the approved-application count, as served by the grants feed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GrantSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub sponsor_id: String,
    pub token: String,
    pub min_reward: Option<f64>,
    pub max_reward: Option<f64>,
    pub total_paid: f64,
    pub created_at: i64,
    pub approved_applications: i64,
    /// Display string for the reward range, e.g. "1.5K-5K" or "Upto 5K".
    /// Computed in the data layer, not stored.
    #[sqlx(default)]
    pub reward_display: String,
}

/// One row of the sponsor dashboard's combined feed: a listing or a grant
/// projected onto a common shape.  The two entities are fetched with
/// separate parameterized queries and merged in application code, never
/// through a string-built UNION.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorDashboardEntry {
    /// "grant", or the listing's type ("bounty", "project", ...).
    #[serde(rename = "type")]
    pub entry_type: String,
    pub id: String,
    pub title: String,
    pub slug: String,
    pub token: Option<String>,
    pub is_published: bool,
    pub rewards: Option<String>,
    pub reward_amount: Option<f64>,
    pub total_winners_selected: Option<i64>,
    /// Grants report their payment aggregate here; listings have none.
    pub total_payments_made: Option<f64>,
    pub min_reward_ask: Option<f64>,
    pub max_reward_ask: Option<f64>,
    pub compensation_type: Option<String>,
    pub created_at: i64,
}

impl From<ListingRecord> for SponsorDashboardEntry {
    fn from(listing: ListingRecord) -> Self {
        Self {
            entry_type: listing.listing_type,
            id: listing.id,
            title: listing.title,
            slug: listing.slug,
            token: listing.token,
            is_published: listing.is_published,
            rewards: listing.rewards,
            reward_amount: listing.reward_amount,
            total_winners_selected: Some(listing.total_winners_selected),
            total_payments_made: None,
            min_reward_ask: listing.min_reward_ask,
            max_reward_ask: listing.max_reward_ask,
            compensation_type: Some(listing.compensation_type),
            created_at: listing.created_at,
        }
    }
}

impl From<GrantRecord> for SponsorDashboardEntry {
    fn from(grant: GrantRecord) -> Self {
        Self {
            entry_type: "grant".to_string(),
            id: grant.id,
            title: grant.title,
            slug: grant.slug,
            token: Some(grant.token),
            is_published: grant.is_published,
            rewards: None,
            reward_amount: None,
            total_winners_selected: None,
            total_payments_made: Some(grant.total_paid),
            min_reward_ask: grant.min_reward,
            max_reward_ask: grant.max_reward,
            compensation_type: None,
            created_at: grant.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GrantApplicationRecord {
    pub id: String,
    pub grant_id: String,
    pub user_id: String,
    pub ask: f64,
    pub application_status: String,
    pub label: String,
    pub approved_amount: Option<f64>,
    pub total_paid: f64,
    pub total_tranches: i64,
    pub payment_details: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl GrantApplicationRecord {
    /// Rebuild the typed payment ledger from the persisted columns.
    pub fn ledger(&self) -> PaymentLedger {
        PaymentLedger::from_parts(
            self.total_paid,
            self.total_tranches as u32,
            self.payment_details.as_deref(),
        )
    }
}

/// Application as returned to the dashboard, with typed tranches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantApplicationResponse {
    pub id: String,
    pub grant_id: String,
    pub user_id: String,
    pub ask: f64,
    pub application_status: String,
    pub label: String,
    pub approved_amount: Option<f64>,
    pub total_paid: f64,
    pub total_tranches: i64,
    pub payment_details: Vec<Tranche>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<GrantApplicationRecord> for GrantApplicationResponse {
    fn from(rec: GrantApplicationRecord) -> Self {
        let payment_details = PaymentLedger::parse_details(rec.payment_details.as_deref());
        Self {
            id: rec.id,
            grant_id: rec.grant_id,
            user_id: rec.user_id,
            ask: rec.ask,
            application_status: rec.application_status,
            label: rec.label,
            approved_amount: rec.approved_amount,
            total_paid: rec.total_paid,
            total_tranches: rec.total_tranches,
            payment_details,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub id: String,
    pub slug: String,
    pub listing_type: String,
    pub title: String,
    pub sponsor_id: String,
    pub compensation_type: String,
    pub reward_amount: Option<f64>,
    pub min_reward_ask: Option<f64>,
    pub max_reward_ask: Option<f64>,
    pub token: Option<String>,
    pub rewards: Option<String>,
    pub usd_value: f64,
    pub is_published: bool,
    pub published_at: Option<i64>,
    pub total_winners_selected: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: String,
    pub listing_id: String,
    pub user_id: String,
    pub ask: Option<f64>,
    pub is_winner: bool,
    pub winner_position: Option<String>,
    pub created_at: i64,
}

/// Submission with its parent listing, as returned by the winner toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    #[serde(flatten)]
    pub submission: SubmissionRecord,
    pub listing: ListingRecord,
}
