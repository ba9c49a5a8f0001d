//! Authentication types for JWT tokens.
//!
//! Token issuance lives in the upstream identity service; this crate only
//! defines the claim set that the report engine consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// Besides the usual subject/expiry pair, the claims carry the caller's
/// role and home-node identifiers in the organizational hierarchy. These
/// are the only authorization inputs the report engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Display name, used as the "generated by" stamp on reports.
    pub name: String,
    /// The caller's role (e.g. "zone_admin", "kvk_staff").
    pub role: String,
    /// Home zone, if the role is bound to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<Uuid>,
    /// Home state, if the role is bound to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Uuid>,
    /// Home district, if the role is bound to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<Uuid>,
    /// Home host organization, if the role is bound to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<Uuid>,
    /// Home KVK, if the role is bound to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kvk: Option<Uuid>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, name: &str, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            name: name.to_string(),
            role: role.to_string(),
            zone: None,
            state: None,
            district: None,
            org: None,
            kvk: None,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Sets the home-hierarchy identifiers on the claims.
    #[must_use]
    pub const fn with_home(
        mut self,
        zone: Option<Uuid>,
        state: Option<Uuid>,
        district: Option<Uuid>,
        org: Option<Uuid>,
        kvk: Option<Uuid>,
    ) -> Self {
        self.zone = zone;
        self.state = state;
        self.district = district;
        self.org = org;
        self.kvk = kvk;
        self
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}
