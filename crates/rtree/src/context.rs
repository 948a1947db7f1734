// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-query user context

use std::{any::Any, fmt};

/// Opaque state created by the callback on the first node of a query.
///
/// The bridge owns it from the moment it is returned until SQLite tears the
/// query down. Later calls of the same query receive a mutable reference to
/// the same object.
pub struct QueryContext(Box<dyn Any + Send>);

impl QueryContext {
	/// Wrap a value. Wrapping a `QueryContext` returns it unchanged.
	pub fn new<T: Any + Send>(value: T) -> Self {
		let boxed: Box<dyn Any + Send> = Box::new(value);
		match boxed.downcast::<QueryContext>() {
			Ok(context) => *context,
			Err(boxed) => QueryContext(boxed),
		}
	}

	pub fn is<T: Any>(&self) -> bool {
		self.0.is::<T>()
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref::<T>()
	}

	pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
		self.0.downcast_mut::<T>()
	}

	pub fn into_inner<T: Any>(self) -> Result<T, Self> {
		self.0.downcast::<T>().map(|value| *value).map_err(QueryContext)
	}
}

impl fmt::Debug for QueryContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("QueryContext(..)")
	}
}
