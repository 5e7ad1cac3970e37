// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite store wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Accounts (registration, lookup by email/id)
//! - Chef and client profiles (ownership, search, partial patches)
//! - Bookings (creation with rate snapshot, listing, status transitions)
//!
//! Every mutating operation that touches more than one row runs inside a
//! single transaction; nothing here retries.

use crate::error::AppError;
use crate::models::{
    Account, Booking, BookingStatus, ChefProfile, ClientProfile, NewAccount, NewBooking, Role,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Schema, applied idempotently at startup. Foreign keys cascade so that
/// deleting an account removes its profile and the profile's bookings.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name          TEXT NOT NULL,
    role          TEXT NOT NULL CHECK (role IN ('chef', 'client')),
    firebase_uid  TEXT UNIQUE,
    created_at    TEXT NOT NULL,
    updated_at    TEXT
);

CREATE TABLE IF NOT EXISTS chefs (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id             INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    bio                 TEXT,
    cuisines            TEXT,
    specialties         TEXT,
    hourly_rate         REAL NOT NULL DEFAULT 0,
    location            TEXT,
    phone               TEXT,
    photo_url           TEXT,
    years_of_experience INTEGER NOT NULL DEFAULT 0,
    rating              REAL NOT NULL DEFAULT 0,
    total_bookings      INTEGER NOT NULL DEFAULT 0,
    is_available        INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS clients (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id            INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    phone              TEXT,
    address            TEXT,
    preferred_cuisines TEXT,
    total_bookings     INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS bookings (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id        INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    chef_id          INTEGER NOT NULL REFERENCES chefs(id) ON DELETE CASCADE,
    booking_date     TEXT NOT NULL,
    booking_time     TEXT NOT NULL,
    duration_hours   REAL NOT NULL,
    location         TEXT NOT NULL,
    hourly_rate      REAL NOT NULL,
    total_price      REAL NOT NULL,
    status           TEXT NOT NULL DEFAULT 'pending',
    special_requests TEXT,
    notes            TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT
);

CREATE INDEX IF NOT EXISTS idx_bookings_client ON bookings(client_id);
CREATE INDEX IF NOT EXISTS idx_bookings_chef ON bookings(chef_id);
";

/// Booking projection with chef/client display names joined in at read
/// time. The names are never persisted on the bookings table.
const BOOKING_SELECT: &str = "
SELECT b.id, b.client_id, cu.name AS client_name, b.chef_id, hu.name AS chef_name,
       b.booking_date, b.booking_time, b.duration_hours, b.location,
       b.hourly_rate, b.total_price, b.status, b.special_requests, b.notes,
       b.created_at, b.updated_at
FROM bookings b
JOIN clients cl ON cl.id = b.client_id
JOIN users cu   ON cu.id = cl.user_id
JOIN chefs ch   ON ch.id = b.chef_id
JOIN users hu   ON hu.id = ch.user_id
";

const CHEF_SELECT: &str = "
SELECT c.id, c.user_id, u.name AS name, c.bio, c.cuisines, c.specialties,
       c.hourly_rate, c.location, c.phone, c.photo_url, c.years_of_experience,
       c.rating, c.total_bookings, c.is_available
FROM chefs c
JOIN users u ON u.id = c.user_id
";

const CLIENT_SELECT: &str = "
SELECT c.id, c.user_id, u.name AS name, u.email AS email, c.phone, c.address,
       c.preferred_cuisines, c.total_bookings
FROM clients c
JOIN users u ON u.id = c.user_id
";

/// AND-combined chef search filters. All fields optional; `None` matches
/// everything.
#[derive(Debug, Default, Clone)]
pub struct ChefSearch {
    /// Exact cuisine membership in the comma-separated list (case-insensitive)
    pub cuisine: Option<String>,
    /// Location substring (case-insensitive)
    pub location: Option<String>,
    /// Maximum hourly rate (inclusive)
    pub max_price: Option<f64>,
    /// Account-name substring (case-insensitive)
    pub name: Option<String>,
}

/// Partial chef-profile patch; only `Some` fields are written.
#[derive(Debug, Default, Clone)]
pub struct ChefPatch {
    pub bio: Option<String>,
    pub cuisines: Option<String>,
    pub specialties: Option<String>,
    pub hourly_rate: Option<f64>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub years_of_experience: Option<i64>,
    pub is_available: Option<bool>,
}

/// Partial client-profile patch; only `Some` fields are written.
#[derive(Debug, Default, Clone)]
pub struct ClientPatch {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub preferred_cuisines: Option<String>,
}

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (creating if missing) the database at `database_url` and apply
    /// the schema.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::info!(url = database_url, "Connected to SQLite");
        Ok(db)
    }

    /// In-memory database for tests. A single connection is pinned open so
    /// the data outlives pool idling.
    pub async fn connect_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory db: {}", e)))?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Create an account and its role-matching (empty) profile in one
    /// transaction, so no account ever exists without its profile.
    pub async fn create_account_with_profile(
        &self,
        new: &NewAccount,
    ) -> Result<Account, AppError> {
        let now = chrono::Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, name, role, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(new.role)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let user_id = result.last_insert_rowid();

        match new.role {
            Role::Chef => {
                sqlx::query("INSERT INTO chefs (user_id) VALUES (?1)")
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            Role::Client => {
                sqlx::query("INSERT INTO clients (user_id) VALUES (?1)")
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.account_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Database("Account vanished after insert".to_string()))
    }

    pub async fn account_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Chef Profile Operations ─────────────────────────────────

    pub async fn chef_by_id(&self, id: i64) -> Result<Option<ChefProfile>, AppError> {
        let query = format!("{} WHERE c.id = ?1", CHEF_SELECT);
        sqlx::query_as::<_, ChefProfile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn chef_by_account(&self, user_id: i64) -> Result<Option<ChefProfile>, AppError> {
        let query = format!("{} WHERE c.user_id = ?1", CHEF_SELECT);
        sqlx::query_as::<_, ChefProfile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search chef profiles. Filters are combined with logical AND; no
    /// ranking, no pagination.
    pub async fn search_chefs(&self, search: &ChefSearch) -> Result<Vec<ChefProfile>, AppError> {
        let query = format!(
            "{} \
             WHERE (?1 IS NULL OR instr(',' || LOWER(IFNULL(c.cuisines, '')) || ',', ',' || LOWER(?1) || ',') > 0) \
             AND (?2 IS NULL OR instr(LOWER(IFNULL(c.location, '')), LOWER(?2)) > 0) \
             AND (?3 IS NULL OR c.hourly_rate <= ?3) \
             AND (?4 IS NULL OR instr(LOWER(u.name), LOWER(?4)) > 0) \
             ORDER BY c.id",
            CHEF_SELECT
        );

        sqlx::query_as::<_, ChefProfile>(&query)
            .bind(&search.cuisine)
            .bind(&search.location)
            .bind(search.max_price)
            .bind(&search.name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a partial patch to a chef profile; untouched fields keep
    /// their stored values. Returns the updated profile.
    pub async fn update_chef(&self, id: i64, patch: &ChefPatch) -> Result<ChefProfile, AppError> {
        sqlx::query(
            "UPDATE chefs SET \
                 bio = COALESCE(?2, bio), \
                 cuisines = COALESCE(?3, cuisines), \
                 specialties = COALESCE(?4, specialties), \
                 hourly_rate = COALESCE(?5, hourly_rate), \
                 location = COALESCE(?6, location), \
                 phone = COALESCE(?7, phone), \
                 photo_url = COALESCE(?8, photo_url), \
                 years_of_experience = COALESCE(?9, years_of_experience), \
                 is_available = COALESCE(?10, is_available) \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&patch.bio)
        .bind(&patch.cuisines)
        .bind(&patch.specialties)
        .bind(patch.hourly_rate)
        .bind(&patch.location)
        .bind(&patch.phone)
        .bind(&patch.photo_url)
        .bind(patch.years_of_experience)
        .bind(patch.is_available)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.chef_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chef {} not found", id)))
    }

    // ─── Client Profile Operations ───────────────────────────────

    pub async fn client_by_id(&self, id: i64) -> Result<Option<ClientProfile>, AppError> {
        let query = format!("{} WHERE c.id = ?1", CLIENT_SELECT);
        sqlx::query_as::<_, ClientProfile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn client_by_account(&self, user_id: i64) -> Result<Option<ClientProfile>, AppError> {
        let query = format!("{} WHERE c.user_id = ?1", CLIENT_SELECT);
        sqlx::query_as::<_, ClientProfile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update_client(
        &self,
        id: i64,
        patch: &ClientPatch,
    ) -> Result<ClientProfile, AppError> {
        sqlx::query(
            "UPDATE clients SET \
                 phone = COALESCE(?2, phone), \
                 address = COALESCE(?3, address), \
                 preferred_cuisines = COALESCE(?4, preferred_cuisines) \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&patch.phone)
        .bind(&patch.address)
        .bind(&patch.preferred_cuisines)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.client_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    // ─── Booking Operations ──────────────────────────────────────

    /// Insert a booking carrying its rate snapshot and precomputed total.
    /// The insert is a single atomic write: no reader can ever observe a
    /// booking row without its price.
    pub async fn create_booking(&self, new: &NewBooking) -> Result<Booking, AppError> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            "INSERT INTO bookings \
                 (client_id, chef_id, booking_date, booking_time, duration_hours, \
                  location, hourly_rate, total_price, status, special_requests, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(new.client_id)
        .bind(new.chef_id)
        .bind(new.booking_date)
        .bind(new.booking_time)
        .bind(new.duration_hours)
        .bind(&new.location)
        .bind(new.hourly_rate)
        .bind(new.total_price)
        .bind(BookingStatus::Pending)
        .bind(&new.special_requests)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.booking_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AppError::Database("Booking vanished after insert".to_string()))
    }

    pub async fn booking_by_id(&self, id: i64) -> Result<Option<Booking>, AppError> {
        let query = format!("{} WHERE b.id = ?1", BOOKING_SELECT);
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All bookings made by a client, in insertion order, optionally
    /// narrowed by exact status.
    pub async fn bookings_for_client(
        &self,
        client_id: i64,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, AppError> {
        let query = format!(
            "{} WHERE b.client_id = ?1 AND (?2 IS NULL OR b.status = ?2) ORDER BY b.id",
            BOOKING_SELECT
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(client_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All bookings assigned to a chef, in insertion order, optionally
    /// narrowed by exact status.
    pub async fn bookings_for_chef(
        &self,
        chef_id: i64,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, AppError> {
        let query = format!(
            "{} WHERE b.chef_id = ?1 AND (?2 IS NULL OR b.status = ?2) ORDER BY b.id",
            BOOKING_SELECT
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(chef_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Transition a booking's status (and optionally set the chef's
    /// notes). When the booking completes, both profiles' total-bookings
    /// counters are incremented in the same transaction as the status
    /// write.
    pub async fn update_booking_status(
        &self,
        booking: &Booking,
        next: BookingStatus,
        notes: Option<&str>,
    ) -> Result<Booking, AppError> {
        let now = chrono::Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            "UPDATE bookings SET status = ?2, notes = COALESCE(?3, notes), updated_at = ?4 \
             WHERE id = ?1",
        )
        .bind(booking.id)
        .bind(next)
        .bind(notes)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if next == BookingStatus::Completed {
            sqlx::query("UPDATE chefs SET total_bookings = total_bookings + 1 WHERE id = ?1")
                .bind(booking.chef_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            sqlx::query("UPDATE clients SET total_bookings = total_bookings + 1 WHERE id = ?1")
                .bind(booking.client_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.booking_by_id(booking.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking.id)))
    }
}
