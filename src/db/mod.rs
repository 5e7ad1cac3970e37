// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.

pub mod store;

pub use store::{ChefPatch, ChefSearch, ClientPatch, Db};
