// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! `extern "C"` functions registered with the R*Tree module.
//!
//! Nothing here may unwind into SQLite: panics are caught and errors are
//! turned into result codes, with the error itself parked in
//! [`crate::pending`].

use std::{
	os::raw::{c_int, c_void},
	panic::{AssertUnwindSafe, catch_unwind},
	slice,
};

use rtquery_abi::{NOT_WITHIN, QueryInfoFFI};
use rusqlite::ffi;
use tracing::{debug, error, trace, warn};

use super::panic_message;
use crate::{
	bridge::QueryFunction,
	config::ParameterSource,
	context::QueryContext,
	error::{BridgeError, Result},
	frame::CallFrame,
	marshal::{NativeParams, SqlValues},
	pending,
};

/// Query callback for every function registered by this crate.
///
/// `info.context` is a `QueryFunction` owned by SQLite, or NULL for a
/// cleared registration.
pub(crate) unsafe extern "C" fn query_trampoline(info: *mut QueryInfoFFI) -> c_int {
	// SAFETY: SQLite hands over exclusive access to `info` for this call
	let Some(info) = (unsafe { info.as_mut() }) else {
		return ffi::SQLITE_MISUSE;
	};

	let result = catch_unwind(AssertUnwindSafe(|| unsafe { evaluate(info) }));

	let err = match result {
		Ok(Ok(())) => return ffi::SQLITE_OK,
		Ok(Err(err)) => err,
		Err(panic) => BridgeError::user(format!("query callback panicked: {}", panic_message(&*panic))),
	};

	warn!(code = err.code(), error = %err, rowid = info.rowid, "node evaluation failed");
	let rc = err.native_code();
	pending::raise(err);
	rc
}

unsafe fn evaluate(info: &mut QueryInfoFFI) -> Result<()> {
	// SAFETY: set at registration and kept alive by SQLite until `release_function`
	let Some(function) = (unsafe { info.context.cast_const().cast::<QueryFunction>().as_ref() }) else {
		info.within = NOT_WITHIN;
		return Ok(());
	};

	let verdict = {
		let frame = unsafe { call_frame(info, function.config().parameter_source) };
		function.evaluate_node(frame)?
	};

	info.within = verdict.visibility;
	info.score = verdict.score;

	if let Some(context) = verdict.bind {
		debug_assert!(info.user.is_null());
		info.user = Box::into_raw(Box::new(context)).cast();
		info.del_user = Some(release_context);
	}

	Ok(())
}

/// Borrow the native call data as a [`CallFrame`].
///
/// # Safety
/// All pointers in `info` must be valid for the counts SQLite gives with them.
unsafe fn call_frame<'a>(info: &'a mut QueryInfoFFI, source: ParameterSource) -> CallFrame<'a> {
	let param_count = count(info.param_count);
	let parameters = match source {
		ParameterSource::SqlValues if !info.sql_params.is_null() => {
			NativeParams::Sql(unsafe { SqlValues::new(borrow(info.sql_params.cast_const(), param_count)) })
		}
		_ => NativeParams::Doubles(unsafe { borrow(info.params.cast_const(), param_count) }),
	};

	CallFrame {
		coordinates: unsafe { borrow(info.coords.cast_const(), count(info.coord_count)) },
		parameters,
		queue_depths: unsafe { borrow(info.queued.cast_const(), count(info.max_level.saturating_add(1))) },
		context: unsafe { info.user.cast::<QueryContext>().as_mut() },
		level: info.level,
		max_level: info.max_level,
		row_id: info.rowid,
		parent_score: info.parent_score,
		parent_visibility: info.parent_within,
	}
}

fn count(n: c_int) -> usize {
	usize::try_from(n).unwrap_or(0)
}

unsafe fn borrow<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
	if ptr.is_null() || len == 0 {
		&[]
	} else {
		unsafe { slice::from_raw_parts(ptr, len) }
	}
}

/// Releases a query's context when SQLite tears the query down.
pub(crate) unsafe extern "C" fn release_context(ptr: *mut c_void) {
	if ptr.is_null() {
		return;
	}

	// SAFETY: `ptr` came from `Box::into_raw` in `evaluate` and SQLite calls this once
	let result = catch_unwind(AssertUnwindSafe(|| drop(unsafe { Box::from_raw(ptr.cast::<QueryContext>()) })));
	match result {
		Ok(()) => trace!("released query context"),
		Err(panic) => error!(panic = panic_message(&*panic), "query context destructor panicked"),
	}
}

/// Releases a registration when it is replaced, cleared or its connection closes.
pub(crate) unsafe extern "C" fn release_function(ptr: *mut c_void) {
	if ptr.is_null() {
		return;
	}

	// SAFETY: `ptr` came from `Box::into_raw` at registration and SQLite calls this once
	let function = unsafe { Box::from_raw(ptr.cast::<QueryFunction>()) };
	let name = function.name().to_string();
	match catch_unwind(AssertUnwindSafe(|| drop(function))) {
		Ok(()) => debug!(name, "released query function"),
		Err(panic) => error!(name, panic = panic_message(&*panic), "query function destructor panicked"),
	}
}
