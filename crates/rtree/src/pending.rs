// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Errors raised inside a node evaluation, kept for the statement's caller.
//!
//! SQLite only learns that a callback failed through its result code. The
//! error itself is parked on the thread that ran the callback, which is the
//! thread stepping the statement, together with that result code.

use std::{cell::RefCell, ffi::CStr, os::raw::c_int};

use rusqlite::ffi;
use tracing::debug;

use crate::error::{BridgeError, Result};

struct Pending {
	error: BridgeError,
	/// Result code the failed evaluation returned to SQLite
	rc: c_int,
}

thread_local! {
	static PENDING: RefCell<Option<Pending>> = const { RefCell::new(None) };
}

pub(crate) fn raise(error: BridgeError) {
	let rc = error.native_code();
	if let Some(previous) = PENDING.replace(Some(Pending {
		error,
		rc,
	})) {
		debug!(code = previous.error.code(), error = %previous.error, "discarding unobserved pending error");
	}
}

/// Take the error left by the last failed node evaluation on this thread.
pub fn take_pending_error() -> Option<BridgeError> {
	PENDING.take().map(|pending| pending.error)
}

pub fn has_pending_error() -> bool {
	PENDING.with_borrow(Option::is_some)
}

/// Drop the error left by the last failed node evaluation, if any.
pub fn clear_pending_error() {
	if let Some(stale) = PENDING.take() {
		debug!(code = stale.error.code(), error = %stale.error, "cleared pending error");
	}
}

/// Attach the pending bridge error to a statement result.
///
/// A failed statement reports the callback's error only when its SQLite error
/// is the one the callback produced: the same result code with SQLite's
/// generic message for it. Any other failure is reported as is. The pending
/// slot is cleared either way.
pub fn resolve<T>(result: rusqlite::Result<T>) -> Result<T> {
	let pending = PENDING.take();
	match result {
		Ok(value) => Ok(value),
		Err(err) => match pending {
			Some(pending) if explains(pending.rc, &err) => Err(pending.error),
			Some(stale) => {
				debug!(code = stale.error.code(), error = %stale.error, "pending error does not match statement failure");
				Err(BridgeError::Sqlite(err))
			}
			None => Err(BridgeError::Sqlite(err)),
		},
	}
}

fn explains(rc: c_int, err: &rusqlite::Error) -> bool {
	match err {
		rusqlite::Error::SqliteFailure(failure, message) => {
			failure.extended_code == rc && message.as_deref().is_none_or(|message| message == errstr(rc))
		}
		_ => false,
	}
}

fn errstr(rc: c_int) -> &'static str {
	// SAFETY: sqlite3_errstr returns a static string for every code
	let msg = unsafe { ffi::sqlite3_errstr(rc) };
	if msg.is_null() {
		return "";
	}
	unsafe { CStr::from_ptr(msg) }.to_str().unwrap_or("")
}

#[cfg(test)]
mod tests {
	use rusqlite::ffi;

	use super::{clear_pending_error, errstr, has_pending_error, raise, resolve, take_pending_error};
	use crate::error::BridgeError;

	fn failure(rc: i32, message: &str) -> rusqlite::Error {
		rusqlite::Error::SqliteFailure(ffi::Error::new(rc), Some(message.to_string()))
	}

	#[test]
	fn test_take_clears() {
		raise(BridgeError::Protocol {
			found: 1,
		});
		assert!(has_pending_error());
		assert!(matches!(
			take_pending_error(),
			Some(BridgeError::Protocol {
				found: 1
			})
		));
		assert!(!has_pending_error());
		assert!(take_pending_error().is_none());
	}

	#[test]
	fn test_latest_error_wins() {
		raise(BridgeError::user("first"));
		raise(BridgeError::user("second"));
		assert_eq!(take_pending_error().unwrap().to_string(), "second");
	}

	#[test]
	fn test_resolve_prefers_pending() {
		raise(BridgeError::user("callback failed"));
		let result: rusqlite::Result<()> = Err(failure(ffi::SQLITE_ERROR, errstr(ffi::SQLITE_ERROR)));
		assert_eq!(resolve(result).unwrap_err().to_string(), "callback failed");
	}

	#[test]
	fn test_resolve_matches_exhaustion_code() {
		raise(BridgeError::ResourceExhaustion);
		let result: rusqlite::Result<()> = Err(failure(ffi::SQLITE_NOMEM, errstr(ffi::SQLITE_NOMEM)));
		assert!(matches!(resolve(result), Err(BridgeError::ResourceExhaustion)));
	}

	#[test]
	fn test_resolve_ignores_unrelated_failure() {
		raise(BridgeError::user("old callback error"));
		let result: rusqlite::Result<()> = Err(failure(ffi::SQLITE_ERROR, "integer overflow"));
		assert!(matches!(resolve(result), Err(BridgeError::Sqlite(_))));
		assert!(!has_pending_error());
	}

	#[test]
	fn test_resolve_ignores_other_code() {
		raise(BridgeError::user("old callback error"));
		let result: rusqlite::Result<()> = Err(failure(ffi::SQLITE_CONSTRAINT, errstr(ffi::SQLITE_CONSTRAINT)));
		assert!(matches!(resolve(result), Err(BridgeError::Sqlite(_))));
	}

	#[test]
	fn test_resolve_ignores_non_sqlite_failure() {
		raise(BridgeError::user("old callback error"));
		let result: rusqlite::Result<()> = Err(rusqlite::Error::InvalidQuery);
		assert!(matches!(resolve(result), Err(BridgeError::Sqlite(rusqlite::Error::InvalidQuery))));
	}

	#[test]
	fn test_clear() {
		raise(BridgeError::user("stale"));
		clear_pending_error();
		assert!(!has_pending_error());
		clear_pending_error();
	}

	#[test]
	fn test_resolve_without_pending() {
		let result: rusqlite::Result<()> = Err(rusqlite::Error::InvalidQuery);
		assert!(matches!(resolve(result), Err(BridgeError::Sqlite(rusqlite::Error::InvalidQuery))));
	}

	#[test]
	fn test_resolve_success_drops_stale_error() {
		raise(BridgeError::user("stale"));
		assert_eq!(resolve(Ok(3)).unwrap(), 3);
		assert!(!has_pending_error());
	}

	#[test]
	fn test_pending_is_per_thread() {
		raise(BridgeError::user("here"));
		std::thread::spawn(|| assert!(!has_pending_error())).join().unwrap();
		assert!(take_pending_error().is_some());
	}
}
