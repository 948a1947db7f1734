// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::{c_char, c_int, c_uint, c_void};

use rusqlite::ffi::{sqlite3, sqlite3_int64, sqlite3_value};

/// Coordinate type of the R*Tree (`sqlite3_rtree_dbl`)
pub type RtreeDbl = f64;

/// Query callback invoked once per visited node or entry
///
/// # Returns
/// - `SQLITE_OK` after writing `within` and `score`
/// - any other SQLite result code aborts the query
pub type QueryFunctionFFI = unsafe extern "C" fn(info: *mut QueryInfoFFI) -> c_int;

/// Destructor for a context pointer owned by SQLite
pub type DestructorFFI = unsafe extern "C" fn(ptr: *mut c_void);

/// Per-call data of an R*Tree query callback (`sqlite3_rtree_query_info`)
///
/// SQLite owns the structure. Everything except `user`, `del_user`,
/// `within` and `score` is read-only for the callback.
#[repr(C)]
pub struct QueryInfoFFI {
	/// `pContext` given at registration
	pub context: *mut c_void,
	/// Number of function parameters
	pub param_count: c_int,
	/// Parameters as doubles
	pub params: *mut RtreeDbl,
	/// Per-query user pointer, NULL until the callback sets it
	pub user: *mut c_void,
	/// Releases `user` when the query is torn down
	pub del_user: Option<DestructorFFI>,
	/// Coordinates of the node or entry under test
	pub coords: *mut RtreeDbl,
	/// Number of entries pending in the queue, per level `0..=max_level`
	pub queued: *mut c_uint,
	/// Number of coordinates
	pub coord_count: c_int,
	/// Level of the current node or entry
	pub level: c_int,
	/// Largest level value in the tree
	pub max_level: c_int,
	/// Rowid of the current entry
	pub rowid: sqlite3_int64,
	/// Score of the parent node
	pub parent_score: RtreeDbl,
	/// Visibility of the parent node
	pub parent_within: c_int,
	/// OUT: visibility
	pub within: c_int,
	/// OUT: score
	pub score: RtreeDbl,
	/// Original SQL values of the parameters (SQLite 3.8.11 and later)
	pub sql_params: *mut *mut sqlite3_value,
}

unsafe extern "C" {
	/// Register a query callback under `name` on `db`
	///
	/// Ownership of `context` passes to SQLite, which calls `destructor`
	/// exactly once: when the function is replaced, when the connection
	/// closes, or immediately if registration fails.
	pub fn sqlite3_rtree_query_callback(
		db: *mut sqlite3,
		name: *const c_char,
		query: Option<QueryFunctionFFI>,
		context: *mut c_void,
		destructor: Option<DestructorFFI>,
	) -> c_int;
}
