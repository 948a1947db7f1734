// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::str;

use rusqlite::types::{Value, ValueRef};

use super::copy_slice;
use crate::error::MarshalError;

/// Convert one native SQL value into the equivalent host value.
///
/// Text and blobs are copied using their declared byte length, so embedded
/// NUL bytes are kept. Text must be valid UTF-8.
pub fn marshal_value(value: ValueRef<'_>) -> Result<Value, MarshalError> {
	match value {
		ValueRef::Null => Ok(Value::Null),
		ValueRef::Integer(i) => Ok(Value::Integer(i)),
		ValueRef::Real(f) => Ok(Value::Real(f)),
		ValueRef::Text(bytes) => {
			let text = str::from_utf8(bytes).map_err(|e| MarshalError::InvalidUtf8 {
				valid_up_to: e.valid_up_to(),
			})?;
			let mut out = String::new();
			out.try_reserve_exact(text.len()).map_err(|_| MarshalError::OutOfMemory {
				bytes: text.len(),
			})?;
			out.push_str(text);
			Ok(Value::Text(out))
		}
		ValueRef::Blob(bytes) => copy_slice(bytes).map(Value::Blob),
	}
}
