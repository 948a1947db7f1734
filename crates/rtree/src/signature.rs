// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The argument list a query callback is invoked with

use std::fmt;

use rusqlite::types::Value;

use crate::{context::QueryContext, response::Visibility};

/// Arguments of one callback invocation, in wire order.
///
/// Field names are the names a callback binds them by; `coordinates` and
/// `parameters` are positional, the remaining seven are named.
pub struct QueryCall<'a> {
	/// Bounds of the node or entry, two values per dimension
	pub coordinates: Vec<f64>,
	/// Bind parameters of the query function
	pub parameters: Vec<Value>,
	/// Entries still pending per level, `max_level + 1` items
	pub num_queued: Vec<u32>,
	/// Context bound by the first call of this query
	pub context: Option<&'a mut QueryContext>,
	pub level: i32,
	pub max_level: i32,
	pub rowid: i64,
	/// Meaningless for children of the root
	pub parent_score: f64,
	pub parent_visibility: i32,
}

impl<'a> QueryCall<'a> {
	pub const POSITIONAL: [&'static str; 2] = ["coordinates", "parameters"];

	pub const NAMED: [&'static str; 7] =
		["num_queued", "context", "level", "max_level", "rowid", "parent_score", "parent_visibility"];

	pub const FIELDS: [&'static str; 9] = [
		Self::POSITIONAL[0],
		Self::POSITIONAL[1],
		Self::NAMED[0],
		Self::NAMED[1],
		Self::NAMED[2],
		Self::NAMED[3],
		Self::NAMED[4],
		Self::NAMED[5],
		Self::NAMED[6],
	];

	/// Whether this is the first call of its query
	pub fn is_first(&self) -> bool {
		self.context.is_none()
	}

	pub fn parent_within(&self) -> Option<Visibility> {
		Visibility::from_code(self.parent_visibility)
	}

	/// Typed access to the bound context
	pub fn context_mut<T: 'static>(&mut self) -> Option<&mut T> {
		self.context.as_deref_mut().and_then(|context| context.downcast_mut::<T>())
	}

	pub fn is_leaf(&self) -> bool {
		self.level == 0
	}
}

impl fmt::Debug for QueryCall<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let [coordinates, parameters] = Self::POSITIONAL;
		let [num_queued, context, level, max_level, rowid, parent_score, parent_visibility] = Self::NAMED;
		f.debug_struct("QueryCall")
			.field(coordinates, &self.coordinates)
			.field(parameters, &self.parameters)
			.field(num_queued, &self.num_queued)
			.field(context, &self.context.as_ref().map(|_| "bound"))
			.field(level, &self.level)
			.field(max_level, &self.max_level)
			.field(rowid, &self.rowid)
			.field(parent_score, &self.parent_score)
			.field(parent_visibility, &self.parent_visibility)
			.finish()
	}
}
