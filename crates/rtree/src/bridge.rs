// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-node evaluation: marshal the frame, invoke the callback, validate the answer.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
	callback::QueryCallback,
	config::BridgeConfig,
	error::{BridgeError, Result},
	frame::{CallFrame, Verdict},
	marshal::{build_parameters, copy_slice},
	signature::QueryCall,
};

/// A query callback as registered under a name on one connection
pub struct QueryFunction {
	name: String,
	config: BridgeConfig,
	/// Exclusive access to the callback for the whole evaluation of a node
	runtime: Mutex<QueryCallback>,
}

impl QueryFunction {
	pub fn new(name: impl Into<String>, callback: QueryCallback, config: BridgeConfig) -> Self {
		Self {
			name: name.into(),
			config,
			runtime: Mutex::new(callback),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn config(&self) -> &BridgeConfig {
		&self.config
	}

	#[cfg(test)]
	pub(crate) fn runtime_for_test(&self) -> parking_lot::MutexGuard<'_, QueryCallback> {
		self.runtime.lock()
	}

	/// Evaluate one visited node.
	///
	/// A context returned on the first call of a query (no context in the
	/// frame) is handed back in [`Verdict::bind`]; on later calls the
	/// returned context is dropped and the existing binding stays.
	pub fn evaluate_node(&self, frame: CallFrame<'_>) -> Result<Verdict> {
		let mut callback = self.runtime.try_lock().ok_or_else(|| BridgeError::Reentrant {
			name: self.name.clone(),
		})?;

		let coordinates = copy_slice(frame.coordinates).map_err(|source| BridgeError::Marshal {
			what: "coordinates",
			index: None,
			source,
		})?;
		let parameters = build_parameters(&frame.parameters)?;
		let num_queued = copy_slice(frame.queue_depths).map_err(|source| BridgeError::Marshal {
			what: "num_queued",
			index: None,
			source,
		})?;

		let first_call = frame.context.is_none();
		let mut call = QueryCall {
			coordinates,
			parameters,
			num_queued,
			context: frame.context,
			level: frame.level,
			max_level: frame.max_level,
			rowid: frame.row_id,
			parent_score: frame.parent_score,
			parent_visibility: frame.parent_visibility,
		};
		trace!(name = %self.name, rowid = call.rowid, level = call.level, first_call, "evaluating node");

		let response = callback.invoke(&mut call)?;

		let bind = if first_call {
			response.context
		} else {
			None
		};
		if bind.is_some() {
			debug!(name = %self.name, "bound query context");
		}

		Ok(Verdict {
			visibility: response.visibility,
			score: response.score,
			bind,
		})
	}
}
