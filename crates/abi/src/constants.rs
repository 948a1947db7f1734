// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Visibility codes written to `eWithin` by a query callback

/// The node or entry is entirely outside the query region and is pruned
pub const NOT_WITHIN: i32 = 0;

/// The node or entry overlaps the query region
pub const PARTLY_WITHIN: i32 = 1;

/// The node or entry is entirely inside the query region
pub const FULLY_WITHIN: i32 = 2;
