// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conversion of native SQLite data into host values

mod params;
mod value;

pub use params::{NativeParams, SqlValues, build_parameters};
pub use value::marshal_value;

use crate::error::MarshalError;

/// Copy a native sequence into an owned vector without aborting on allocation failure.
pub(crate) fn copy_slice<T: Copy>(items: &[T]) -> Result<Vec<T>, MarshalError> {
	let mut out = Vec::new();
	out.try_reserve_exact(items.len()).map_err(|_| MarshalError::OutOfMemory {
		bytes: size_of_val(items),
	})?;
	out.extend_from_slice(items);
	Ok(out)
}
