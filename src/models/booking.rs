// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking model and lifecycle state machine.
//!
//! A booking freezes the chef's hourly rate at creation time; the stored
//! `total_price` is computed exactly once as `duration_hours * hourly_rate`
//! and neither field is ever recomputed, regardless of later edits to the
//! chef's profile.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking lifecycle states.
///
/// `declined`, `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Confirmed,
    Declined,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Declined => "declined",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a chef-initiated transition from `self` to `next` is allowed.
    ///
    /// Transition table:
    /// pending -> accepted | declined, accepted -> confirmed,
    /// confirmed -> completed | cancelled. Terminal states admit nothing,
    /// and self-transitions are rejected.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Declined)
                | (Accepted, Confirmed)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Declined | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "declined" => Ok(BookingStatus::Declined),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// Booking row with the chef and client display names joined in at read
/// time (names are a projection, never stored on the bookings table).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    /// Immutable after creation
    pub client_id: i64,
    pub client_name: String,
    /// Immutable after creation
    pub chef_id: i64,
    pub chef_name: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub duration_hours: f64,
    pub location: String,
    /// Rate snapshot, frozen at creation
    pub hourly_rate: f64,
    /// duration_hours * hourly_rate, computed once at creation
    pub total_price: f64,
    pub status: BookingStatus,
    /// Client-authored, set at creation
    pub special_requests: Option<String>,
    /// Chef-authored, set on status updates
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields needed to insert a booking. Price fields carry the snapshot
/// taken from the chef profile by the caller; the insert is a single
/// atomic write.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: i64,
    pub chef_id: i64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub duration_hours: f64,
    pub location: String,
    pub hourly_rate: f64,
    pub total_price: f64,
    pub special_requests: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::BookingStatus::*;
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Declined));
        assert!(Accepted.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_rejected_transitions() {
        // No skipping ahead
        assert!(!Pending.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Accepted.can_transition_to(Completed));
        // No self-transitions
        assert!(!Pending.can_transition_to(Pending));
        // Terminal states admit nothing
        for terminal in [Declined, Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Pending, Accepted, Confirmed, Declined, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
        assert!(!Pending.is_terminal());
        assert!(!Accepted.is_terminal());
        assert!(!Confirmed.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [Pending, Accepted, Confirmed, Declined, Completed, Cancelled] {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert!("paid".parse::<BookingStatus>().is_err());
    }
}
