//! Post-commit notification dispatch — fire-and-forget.
//!
//! Notifications run only after the primary transaction has committed, in
//! a spawned task with its own failure boundary.  A delivery failure is
//! logged and never propagated to the request that triggered it.

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    ApplicationApproved {
        application_id: String,
        user_id: String,
        approved_amount: f64,
    },
    ApplicationRejected {
        application_id: String,
        user_id: String,
    },
    ListingPublished {
        listing_id: String,
        slug: String,
    },
}

/// Dispatch a notification to the configured webhook.
///
/// Returns immediately; delivery happens on a background task.  With no
/// webhook configured the notification is logged and dropped.
pub fn dispatch(client: Client, webhook_url: Option<String>, notification: Notification) {
    tokio::spawn(async move {
        let Some(url) = webhook_url else {
            debug!("No notification webhook configured, dropping {notification:?}");
            return;
        };

        match client.post(&url).json(&notification).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Notification delivered: {notification:?}");
            }
            Ok(resp) => {
                warn!(
                    "Notification webhook returned {} for {notification:?}",
                    resp.status()
                );
            }
            Err(e) => {
                warn!("Notification dispatch failed: {e}");
            }
        }
    });
}
