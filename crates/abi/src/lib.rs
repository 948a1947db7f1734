// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! C ABI definitions for the SQLite R*Tree query callback interface
//!
//! SQLite's bundled headers do not cover `sqlite3rtree.h`, so the structure
//! handed to query callbacks and the registration entry point are declared
//! here. Layouts follow the header for builds without `SQLITE_RTREE_INT_ONLY`.

pub mod constants;
pub mod query;

pub use constants::{FULLY_WITHIN, NOT_WITHIN, PARTLY_WITHIN};
pub use query::{DestructorFFI, QueryFunctionFFI, QueryInfoFFI, RtreeDbl, sqlite3_rtree_query_callback};
