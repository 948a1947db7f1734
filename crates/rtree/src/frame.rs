// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{context::QueryContext, marshal::NativeParams};

/// Native data of one node visit, valid only for the duration of the call.
#[derive(Debug)]
pub struct CallFrame<'a> {
	pub coordinates: &'a [f64],
	pub parameters: NativeParams<'a>,
	pub queue_depths: &'a [u32],
	pub context: Option<&'a mut QueryContext>,
	pub level: i32,
	pub max_level: i32,
	pub row_id: i64,
	pub parent_score: f64,
	pub parent_visibility: i32,
}

/// What the engine is told after a successful evaluation
#[derive(Debug)]
pub struct Verdict {
	pub visibility: i32,
	pub score: f64,
	/// Context to bind to the query; only ever set on its first call
	pub bind: Option<QueryContext>,
}
