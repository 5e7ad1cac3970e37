//! Chef profile model.

/// Chef profile row, joined with the owning account's display name at
/// read time (the name is never stored on this table).
///
/// `cuisines` is stored as a comma-separated list; the routes layer
/// splits it into an array for API responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefProfile {
    pub id: i64,
    /// Owning account (exactly one chef profile per account)
    pub user_id: i64,
    /// Display name of the owning account (read-time join)
    pub name: String,
    pub bio: Option<String>,
    pub cuisines: Option<String>,
    pub specialties: Option<String>,
    /// Charged per hour; snapshotted onto bookings at creation
    pub hourly_rate: f64,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub years_of_experience: i64,
    /// Derived; defaults to 0 (rating aggregation is out of scope)
    pub rating: f64,
    /// Incremented when a booking reaches `completed`
    pub total_bookings: i64,
    pub is_available: bool,
}

/// Splits a stored comma-separated cuisine list into API form.
pub fn split_cuisines(raw: &Option<String>) -> Vec<String> {
    match raw {
        Some(list) if !list.is_empty() => list.split(',').map(|c| c.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_cuisines() {
        assert_eq!(
            split_cuisines(&Some("Italian,French, Mediterranean".to_string())),
            vec!["Italian", "French", "Mediterranean"]
        );
        assert!(split_cuisines(&Some(String::new())).is_empty());
        assert!(split_cuisines(&None).is_empty());
    }
}
