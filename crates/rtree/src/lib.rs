// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Rust predicates for SQLite R*Tree queries
//!
//! SQLite's R*Tree module drives the traversal and asks a registered query
//! function, once per visited node or entry, whether it is inside the query
//! region and how to score it. This crate answers those calls with Rust
//! closures:
//!
//! - the native per-call data is marshalled into a [`QueryCall`]
//! - the callback returns visibility, score and an optional per-query
//!   [`QueryContext`], validated into a [`QueryResponse`]
//! - the context of a query is owned by the bridge and released exactly once
//!   when SQLite tears the query down
//! - failures become SQLite result codes, with the error parked for the
//!   caller in [`pending`]
//!
//! ```no_run
//! use rtquery::{ConnectionExt, QueryCall, QueryCallback, QueryResponse, Visibility, BoxError};
//! use rusqlite::types::Value;
//!
//! let conn = rusqlite::Connection::open_in_memory()?;
//! conn.create_rtree_query_function(
//! 	"below",
//! 	Some(QueryCallback::new(|call: &mut QueryCall<'_>| {
//! 		let limit = match call.parameters.first() {
//! 			Some(Value::Real(limit)) => *limit,
//! 			Some(Value::Integer(limit)) => *limit as f64,
//! 			_ => return Err::<QueryResponse, BoxError>("expected a limit".into()),
//! 		};
//! 		let visibility = if call.coordinates[0] <= limit {
//! 			Visibility::PartlyWithin
//! 		} else {
//! 			Visibility::NotWithin
//! 		};
//! 		Ok(QueryResponse::new(visibility, call.coordinates[0]))
//! 	})),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bridge;
mod callback;
mod config;
mod context;
mod error;
mod ffi;
mod frame;
pub mod marshal;
pub mod pending;
mod register;
mod response;
mod signature;

pub use bridge::QueryFunction;
pub use callback::QueryCallback;
pub use config::{BridgeConfig, ParameterSource};
pub use context::QueryContext;
pub use error::{BoxError, BridgeError, MarshalError, Result};
pub use frame::{CallFrame, Verdict};
pub use pending::{clear_pending_error, resolve, take_pending_error};
pub use register::{ConnectionExt, create_query_function, create_query_function_with};
pub use response::{IntoResponse, IntoScore, IntoVisibility, QueryResponse, Visibility};
pub use rusqlite::types::Value;
pub use signature::QueryCall;
