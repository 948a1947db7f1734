// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Registering query callbacks on a connection

use std::{
	ffi::{CStr, CString},
	os::raw::c_void,
	ptr,
};

use rtquery_abi::{DestructorFFI, QueryFunctionFFI, sqlite3_rtree_query_callback};
use rusqlite::{Connection, ffi};
use tracing::debug;

use crate::{
	bridge::QueryFunction,
	callback::QueryCallback,
	config::BridgeConfig,
	error::{BridgeError, Result},
	ffi::trampoline::{query_trampoline, release_function},
};

/// Register `callback` as the R*Tree query function `name` on `conn`.
///
/// `None` clears the function: the previous callback is released and a query
/// still using `name` prunes every node without calling anything.
/// Registering again under the same name replaces and releases the previous
/// callback.
pub fn create_query_function(conn: &Connection, name: &str, callback: Option<QueryCallback>) -> Result<()> {
	create_query_function_with(conn, name, callback, BridgeConfig::default())
}

pub fn create_query_function_with(
	conn: &Connection,
	name: &str,
	callback: Option<QueryCallback>,
	config: BridgeConfig,
) -> Result<()> {
	let c_name = validate_name(name)?;

	let cleared = callback.is_none();
	let (context, destructor): (*mut c_void, Option<DestructorFFI>) = match callback {
		Some(callback) => (
			Box::into_raw(Box::new(QueryFunction::new(name, callback, config))).cast(),
			Some(release_function as DestructorFFI),
		),
		None => (ptr::null_mut(), None),
	};

	// SAFETY: the handle is valid while `conn` is borrowed. SQLite owns
	// `context` from here on, also when registration fails.
	let (rc, db) = unsafe {
		let db = conn.handle();
		let rc = sqlite3_rtree_query_callback(
			db,
			c_name.as_ptr(),
			Some(query_trampoline as QueryFunctionFFI),
			context,
			destructor,
		);
		(rc, db)
	};

	match rc {
		ffi::SQLITE_OK => {
			debug!(name, cleared, "registered rtree query function");
			Ok(())
		}
		ffi::SQLITE_NOMEM => Err(BridgeError::ResourceExhaustion),
		code => Err(BridgeError::Registration {
			name: name.to_string(),
			code,
			// SAFETY: `db` is still the open connection borrowed above
			message: unsafe { errmsg(db) },
		}),
	}
}

fn validate_name(name: &str) -> Result<CString> {
	if name.is_empty() {
		return Err(BridgeError::InvalidName {
			name: name.to_string(),
			reason: "name must not be empty",
		});
	}
	CString::new(name).map_err(|_| BridgeError::InvalidName {
		name: name.to_string(),
		reason: "embedded null character",
	})
}

unsafe fn errmsg(db: *mut ffi::sqlite3) -> String {
	let msg = unsafe { ffi::sqlite3_errmsg(db) };
	if msg.is_null() {
		return String::from("unknown error");
	}
	unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

/// Query function registration on [`rusqlite::Connection`]
pub trait ConnectionExt {
	fn create_rtree_query_function(&self, name: &str, callback: Option<QueryCallback>) -> Result<()>;

	fn create_rtree_query_function_with(
		&self,
		name: &str,
		callback: Option<QueryCallback>,
		config: BridgeConfig,
	) -> Result<()>;

	fn remove_rtree_query_function(&self, name: &str) -> Result<()> {
		self.create_rtree_query_function(name, None)
	}
}

impl ConnectionExt for Connection {
	fn create_rtree_query_function(&self, name: &str, callback: Option<QueryCallback>) -> Result<()> {
		create_query_function(self, name, callback)
	}

	fn create_rtree_query_function_with(
		&self,
		name: &str,
		callback: Option<QueryCallback>,
		config: BridgeConfig,
	) -> Result<()> {
		create_query_function_with(self, name, callback, config)
	}
}
