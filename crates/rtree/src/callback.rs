// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt;

use crate::{
	error::{BoxError, BridgeError, Result},
	response::{IntoResponse, QueryResponse},
	signature::QueryCall,
};

type Invoke = dyn FnMut(&mut QueryCall<'_>) -> Result<QueryResponse> + Send;

/// User predicate answering visibility and score for each visited node
pub struct QueryCallback {
	invoke: Box<Invoke>,
}

impl QueryCallback {
	/// Wrap a closure. Its error becomes [`BridgeError::User`] unchanged; its
	/// return value is validated through [`IntoResponse`].
	pub fn new<F, R, E>(mut f: F) -> Self
	where
		F: FnMut(&mut QueryCall<'_>) -> std::result::Result<R, E> + Send + 'static,
		R: IntoResponse,
		E: Into<BoxError>,
	{
		Self {
			invoke: Box::new(move |call: &mut QueryCall<'_>| {
				f(call).map_err(|e| BridgeError::User(e.into()))?.into_response()
			}),
		}
	}

	pub(crate) fn invoke(&mut self, call: &mut QueryCall<'_>) -> Result<QueryResponse> {
		(self.invoke)(call)
	}
}

impl fmt::Debug for QueryCallback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("QueryCallback(..)")
	}
}
