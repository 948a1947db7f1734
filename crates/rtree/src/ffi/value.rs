// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{os::raw::c_int, slice};

use rusqlite::{ffi, types::ValueRef};

use crate::error::MarshalError;

/// Read a `sqlite3_value` using its declared type and byte length.
///
/// # Safety
/// `value` must be a valid protected `sqlite3_value` that outlives `'a`.
pub(crate) unsafe fn value_ref<'a>(value: *mut ffi::sqlite3_value) -> Result<ValueRef<'a>, MarshalError> {
	unsafe {
		Ok(match ffi::sqlite3_value_type(value) {
			ffi::SQLITE_INTEGER => ValueRef::Integer(ffi::sqlite3_value_int64(value)),
			ffi::SQLITE_FLOAT => ValueRef::Real(ffi::sqlite3_value_double(value)),
			ffi::SQLITE_TEXT => {
				// text before bytes, so the length is that of the UTF-8 form
				let text = ffi::sqlite3_value_text(value);
				let len = ffi::sqlite3_value_bytes(value);
				ValueRef::Text(bytes(text, len)?)
			}
			ffi::SQLITE_BLOB => {
				let blob = ffi::sqlite3_value_blob(value);
				let len = ffi::sqlite3_value_bytes(value);
				ValueRef::Blob(bytes(blob.cast(), len)?)
			}
			_ => ValueRef::Null,
		})
	}
}

/// NULL with a positive length means SQLite could not allocate the buffer.
unsafe fn bytes<'a>(ptr: *const u8, len: c_int) -> Result<&'a [u8], MarshalError> {
	let len = usize::try_from(len).unwrap_or(0);
	if len == 0 {
		Ok(&[])
	} else if ptr.is_null() {
		Err(MarshalError::OutOfMemory {
			bytes: len,
		})
	} else {
		Ok(unsafe { slice::from_raw_parts(ptr, len) })
	}
}
