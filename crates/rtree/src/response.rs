// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The three-part answer of a query callback

use std::any::Any;

use rtquery_abi::{FULLY_WITHIN, NOT_WITHIN, PARTLY_WITHIN};
use rusqlite::types::Value;

use crate::{
	context::QueryContext,
	error::{BridgeError, Result},
};

/// Classification of a node or entry against the query region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Visibility {
	NotWithin = NOT_WITHIN,
	PartlyWithin = PARTLY_WITHIN,
	FullyWithin = FULLY_WITHIN,
}

impl Visibility {
	pub fn from_code(code: i32) -> Option<Self> {
		match code {
			NOT_WITHIN => Some(Visibility::NotWithin),
			PARTLY_WITHIN => Some(Visibility::PartlyWithin),
			FULLY_WITHIN => Some(Visibility::FullyWithin),
			_ => None,
		}
	}

	pub fn code(self) -> i32 {
		self as i32
	}
}

impl From<Visibility> for i32 {
	fn from(visibility: Visibility) -> Self {
		visibility.code()
	}
}

/// Validated response of a query callback
#[derive(Debug)]
pub struct QueryResponse {
	pub visibility: i32,
	pub score: f64,
	/// Only taken on the first call of a query, ignored afterwards
	pub context: Option<QueryContext>,
}

impl QueryResponse {
	pub fn new(visibility: Visibility, score: f64) -> Self {
		Self {
			visibility: visibility.code(),
			score,
			context: None,
		}
	}

	pub fn with_context<T: Any + Send>(mut self, context: T) -> Self {
		self.context = Some(QueryContext::new(context));
		self
	}
}

/// Anything a callback may return in place of a [`QueryResponse`]
pub trait IntoResponse {
	fn into_response(self) -> Result<QueryResponse>;
}

impl IntoResponse for QueryResponse {
	fn into_response(self) -> Result<QueryResponse> {
		Ok(self)
	}
}

impl<V, S, C> IntoResponse for (V, S, Option<C>)
where
	V: IntoVisibility,
	S: IntoScore,
	C: Any + Send,
{
	fn into_response(self) -> Result<QueryResponse> {
		let (visibility, score, context) = self;
		Ok(QueryResponse {
			visibility: visibility.into_visibility()?,
			score: score.into_score()?,
			context: context.map(QueryContext::new),
		})
	}
}

/// Dynamically shaped reply; must hold exactly `[visibility, score, context]`.
/// A `Null` context means none.
impl IntoResponse for Vec<Value> {
	fn into_response(self) -> Result<QueryResponse> {
		let [visibility, score, context]: [Value; 3] = self.try_into().map_err(|reply: Vec<Value>| {
			BridgeError::Protocol {
				found: reply.len(),
			}
		})?;

		Ok(QueryResponse {
			visibility: visibility.into_visibility()?,
			score: score.into_score()?,
			context: match context {
				Value::Null => None,
				value => Some(QueryContext::new(value)),
			},
		})
	}
}

/// Coercion into the native visibility code
pub trait IntoVisibility {
	fn into_visibility(self) -> Result<i32>;
}

impl IntoVisibility for Visibility {
	fn into_visibility(self) -> Result<i32> {
		Ok(self.code())
	}
}

impl IntoVisibility for i32 {
	fn into_visibility(self) -> Result<i32> {
		Ok(self)
	}
}

impl IntoVisibility for i64 {
	fn into_visibility(self) -> Result<i32> {
		i32::try_from(self).map_err(|_| BridgeError::Coercion {
			field: "visibility",
			found: format!("out of range integer {self}"),
		})
	}
}

impl IntoVisibility for Value {
	fn into_visibility(self) -> Result<i32> {
		match self {
			Value::Integer(i) => i.into_visibility(),
			other => Err(BridgeError::Coercion {
				field: "visibility",
				found: describe(&other),
			}),
		}
	}
}

/// Coercion into the native score type
pub trait IntoScore {
	fn into_score(self) -> Result<f64>;
}

impl IntoScore for f64 {
	fn into_score(self) -> Result<f64> {
		Ok(self)
	}
}

impl IntoScore for f32 {
	fn into_score(self) -> Result<f64> {
		Ok(f64::from(self))
	}
}

impl IntoScore for i32 {
	fn into_score(self) -> Result<f64> {
		Ok(f64::from(self))
	}
}

impl IntoScore for i64 {
	fn into_score(self) -> Result<f64> {
		Ok(self as f64)
	}
}

impl IntoScore for Value {
	fn into_score(self) -> Result<f64> {
		match self {
			Value::Integer(i) => i.into_score(),
			Value::Real(f) => Ok(f),
			other => Err(BridgeError::Coercion {
				field: "score",
				found: describe(&other),
			}),
		}
	}
}

fn describe(value: &Value) -> String {
	match value {
		Value::Null => "null".to_string(),
		Value::Integer(i) => format!("integer {i}"),
		Value::Real(f) => format!("real {f}"),
		Value::Text(_) => "text".to_string(),
		Value::Blob(b) => format!("blob of {} bytes", b.len()),
	}
}

#[cfg(test)]
mod tests {

	mod typed {
		use crate::response::{IntoResponse, Visibility};

		#[test]
		fn test_triple() {
			let response = (Visibility::PartlyWithin, 2.5, Some("ctx")).into_response().unwrap();
			assert_eq!(response.visibility, 1);
			assert_eq!(response.score, 2.5);
			assert_eq!(response.context.unwrap().downcast_ref::<&str>(), Some(&"ctx"));
		}

		#[test]
		fn test_no_context() {
			let response = (2i32, 0i64, None::<()>).into_response().unwrap();
			assert_eq!(response.visibility, 2);
			assert_eq!(response.score, 0.0);
			assert!(response.context.is_none());
		}

		#[test]
		fn test_visibility_out_of_range() {
			let err = (i64::MAX, 0.0, None::<()>).into_response().unwrap_err();
			assert_eq!(err.code(), "RTREE_003");
		}

		#[test]
		fn test_visibility_codes() {
			for visibility in [Visibility::NotWithin, Visibility::PartlyWithin, Visibility::FullyWithin] {
				assert_eq!(Visibility::from_code(visibility.code()), Some(visibility));
			}
			assert_eq!(Visibility::from_code(3), None);
		}
	}

	mod dynamic {
		use rusqlite::types::Value;

		use crate::{error::BridgeError, response::IntoResponse};

		#[test]
		fn test_three_elements() {
			let reply = vec![Value::Integer(2), Value::Real(0.5), Value::Text("state".to_string())];
			let response = reply.into_response().unwrap();
			assert_eq!(response.visibility, 2);
			assert_eq!(response.score, 0.5);
			let context = response.context.unwrap();
			assert_eq!(context.downcast_ref::<Value>(), Some(&Value::Text("state".to_string())));
		}

		#[test]
		fn test_null_context_is_absent() {
			let reply = vec![Value::Integer(0), Value::Integer(3), Value::Null];
			let response = reply.into_response().unwrap();
			assert_eq!(response.score, 3.0);
			assert!(response.context.is_none());
		}

		#[test]
		fn test_wrong_arity() {
			for reply in [vec![], vec![Value::Integer(1), Value::Real(0.0)], vec![Value::Null; 4]] {
				let len = reply.len();
				match reply.into_response() {
					Err(BridgeError::Protocol {
						found,
					}) => assert_eq!(found, len),
					other => panic!("expected protocol error, got {other:?}"),
				}
			}
		}

		#[test]
		fn test_visibility_must_be_integer() {
			let reply = vec![Value::Real(1.0), Value::Real(0.0), Value::Null];
			match reply.into_response() {
				Err(BridgeError::Coercion {
					field,
					..
				}) => assert_eq!(field, "visibility"),
				other => panic!("expected coercion error, got {other:?}"),
			}
		}

		#[test]
		fn test_score_must_be_numeric() {
			let reply = vec![Value::Integer(1), Value::Text("high".to_string()), Value::Null];
			match reply.into_response() {
				Err(BridgeError::Coercion {
					field,
					found,
				}) => {
					assert_eq!(field, "score");
					assert_eq!(found, "text");
				}
				other => panic!("expected coercion error, got {other:?}"),
			}
		}
	}
}
