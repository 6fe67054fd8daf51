//! Domain records for the swipe donation program
//!
//! Wire payloads use `UNI`, `donor_UNI`, and `user_UNI` keys; the Rust
//! fields are snake_case and map via serde renames. Database columns are
//! all lowercase.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// University ID, the primary key for a [`User`]
pub type Uni = String;

/// A registered account in the donation program
///
/// The swipe counters here are plain profile fields: they are set by the
/// account endpoints (create/update/async update) and are independent of the
/// per-UNI swipe ledger adjusted by swipe transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// University ID, unique per account
    #[serde(rename = "UNI")]
    #[sqlx(rename = "uni")]
    pub uni: Uni,
    /// Opaque password hash, stored verbatim
    pub password_hash: String,
    /// Swipes this account has given out
    #[serde(default)]
    pub num_of_swipes_given: i64,
    /// Swipes this account has received
    #[serde(default)]
    pub num_of_swipes_received: i64,
}

impl User {
    /// Create an account with zeroed counters
    pub fn new(uni: Uni, password_hash: String) -> Self {
        Self {
            uni,
            password_hash,
            num_of_swipes_given: 0,
            num_of_swipes_received: 0,
        }
    }
}

/// A single meal-credit transfer from a donor to a recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Swipe {
    /// Transaction id, chosen by the caller and unique across swipes
    pub swipe_id: i64,
    /// UNI of the donating account
    #[serde(rename = "donor_UNI")]
    #[sqlx(rename = "donor_uni")]
    pub donor_uni: Uni,
    /// UNI of the receiving account
    #[serde(rename = "user_UNI")]
    #[sqlx(rename = "user_uni")]
    pub user_uni: Uni,
    /// Date of the exchange, kept as the caller-supplied string
    pub exchange_date: String,
}
