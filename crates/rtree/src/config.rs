// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// Where the `parameters` argument of a call is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParameterSource {
	/// The original SQL values of the query function arguments
	#[default]
	SqlValues,
	/// The arguments as doubles, as SQLite before 3.8.11 supplied them
	Doubles,
}

/// Configuration of a registered query function.
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
	pub parameter_source: ParameterSource,
}

impl BridgeConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn parameter_source(mut self, source: ParameterSource) -> Self {
		self.parameter_source = source;
		self
	}
}
