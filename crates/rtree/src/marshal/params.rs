// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rusqlite::{
	ffi,
	types::{Value, ValueRef},
};

use super::marshal_value;
use crate::{
	error::{BridgeError, MarshalError, Result},
	ffi::value::value_ref,
};

/// Original SQL values of the query parameters
#[derive(Debug, Clone, Copy)]
pub struct SqlValues<'a> {
	values: &'a [*mut ffi::sqlite3_value],
}

impl<'a> SqlValues<'a> {
	/// # Safety
	/// Every pointer must be a valid `sqlite3_value` that SQLite keeps alive for `'a`.
	pub unsafe fn new(values: &'a [*mut ffi::sqlite3_value]) -> Self {
		Self {
			values,
		}
	}

	fn get(&self, index: usize) -> std::result::Result<ValueRef<'a>, MarshalError> {
		// SAFETY: guaranteed by the contract of `SqlValues::new`
		unsafe { value_ref(self.values[index]) }
	}
}

/// The bind parameters of a query as supplied by the native engine
#[derive(Debug, Clone, Copy)]
pub enum NativeParams<'a> {
	/// Already decoded values
	Values(&'a [ValueRef<'a>]),
	/// Legacy parameter array: every parameter reduced to a double
	Doubles(&'a [f64]),
	/// Raw `sqlite3_value` handles
	Sql(SqlValues<'a>),
}

impl<'a> NativeParams<'a> {
	pub fn len(&self) -> usize {
		match self {
			NativeParams::Values(values) => values.len(),
			NativeParams::Doubles(values) => values.len(),
			NativeParams::Sql(values) => values.values.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn get(&self, index: usize) -> std::result::Result<ValueRef<'a>, MarshalError> {
		match self {
			NativeParams::Values(values) => Ok(values[index]),
			NativeParams::Doubles(values) => Ok(ValueRef::Real(values[index])),
			NativeParams::Sql(values) => values.get(index),
		}
	}
}

/// Build the positional parameter sequence handed to the callback.
///
/// Fails on the first value that cannot be marshalled; nothing converted
/// before it is returned.
pub fn build_parameters(params: &NativeParams<'_>) -> Result<Vec<Value>> {
	let len = params.len();
	let mut out = Vec::new();
	out.try_reserve_exact(len).map_err(|_| BridgeError::Marshal {
		what: "parameters",
		index: None,
		source: MarshalError::OutOfMemory {
			bytes: len * size_of::<Value>(),
		},
	})?;

	for index in 0..len {
		let value = params.get(index).and_then(marshal_value).map_err(|source| BridgeError::Marshal {
			what: "parameter",
			index: Some(index),
			source,
		})?;
		out.push(value);
	}

	Ok(out)
}
