// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Error taxonomy of the query callback bridge.

use std::{borrow::Borrow, error, os::raw::c_int};

use rusqlite::ffi;

/// Opaque error raised by user logic
pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// A single native value could not be converted into a host value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
	#[error("text value is not valid UTF-8 (valid up to byte {valid_up_to})")]
	InvalidUtf8 {
		valid_up_to: usize,
	},

	#[error("failed to allocate {bytes} bytes")]
	OutOfMemory {
		bytes: usize,
	},
}

fn at_index(index: impl Borrow<Option<usize>>) -> String {
	match index.borrow() {
		Some(index) => format!(" at index {index}"),
		None => String::new(),
	}
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
	/// A coordinate, parameter or queue depth could not be marshalled.
	#[error("failed to marshal {what}{}: {source}", at_index(.index))]
	Marshal {
		what: &'static str,
		index: Option<usize>,
		#[source]
		source: MarshalError,
	},

	/// The callback returned something that is not a three-part response.
	#[error("query callback must return (visibility, score, context); got {found} element(s)")]
	Protocol {
		found: usize,
	},

	/// The visibility or score could not be coerced to its native type.
	#[error("cannot coerce {field} from {found}")]
	Coercion {
		field: &'static str,
		found: String,
	},

	/// The callback itself failed.
	#[error(transparent)]
	User(BoxError),

	/// Allocation failed while registering a query function.
	#[error("out of memory")]
	ResourceExhaustion,

	/// SQLite rejected the registration.
	#[error("failed to register query function '{name}': {message}")]
	Registration {
		name: String,
		code: c_int,
		message: String,
	},

	#[error("invalid query function name {name:?}: {reason}")]
	InvalidName {
		name: String,
		reason: &'static str,
	},

	/// The callback was entered again while already running.
	#[error("query function '{name}' re-entered while evaluating a node")]
	Reentrant {
		name: String,
	},

	#[error(transparent)]
	Sqlite(#[from] rusqlite::Error),
}

impl BridgeError {
	/// Stable diagnostic code of the error kind
	pub fn code(&self) -> &'static str {
		match self {
			BridgeError::Marshal {
				..
			} => "RTREE_001",
			BridgeError::Protocol {
				..
			} => "RTREE_002",
			BridgeError::Coercion {
				..
			} => "RTREE_003",
			BridgeError::User(_) => "RTREE_004",
			BridgeError::ResourceExhaustion => "RTREE_005",
			BridgeError::Registration {
				..
			} => "RTREE_006",
			BridgeError::InvalidName {
				..
			} => "RTREE_007",
			BridgeError::Reentrant {
				..
			} => "RTREE_008",
			BridgeError::Sqlite(_) => "RTREE_009",
		}
	}

	/// Whether freeing memory and retrying could make the operation succeed
	pub fn is_resource_exhaustion(&self) -> bool {
		matches!(
			self,
			BridgeError::ResourceExhaustion
				| BridgeError::Marshal {
					source: MarshalError::OutOfMemory {
						..
					},
					..
				}
		)
	}

	/// Result code reported to SQLite when this error ends a node evaluation
	pub fn native_code(&self) -> c_int {
		if self.is_resource_exhaustion() {
			ffi::SQLITE_NOMEM
		} else {
			ffi::SQLITE_ERROR
		}
	}

	pub(crate) fn user(message: impl Into<String>) -> Self {
		BridgeError::User(message.into().into())
	}
}
