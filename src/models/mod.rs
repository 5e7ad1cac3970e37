// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod account;
pub mod booking;
pub mod chef;
pub mod client;

pub use account::{Account, NewAccount, Role};
pub use booking::{Booking, BookingStatus, NewBooking};
pub use chef::ChefProfile;
pub use client::ClientProfile;
