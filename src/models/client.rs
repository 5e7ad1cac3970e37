//! Client profile model.

/// Client profile row, joined with the owning account's display name and
/// email at read time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientProfile {
    pub id: i64,
    /// Owning account (exactly one client profile per account)
    pub user_id: i64,
    /// Display name of the owning account (read-time join)
    pub name: String,
    /// Email of the owning account (read-time join)
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Comma-separated list, split into an array by the routes layer
    pub preferred_cuisines: Option<String>,
    /// Incremented when a booking reaches `completed`
    pub total_bookings: i64,
}
