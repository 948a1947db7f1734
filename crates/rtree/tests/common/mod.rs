// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use rtquery::resolve;
use rusqlite::{Connection, Params};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_test_writer()
		.try_init();
}

/// Three unit squares along the diagonal, at 0, 5 and 10.
pub fn demo_connection() -> Connection {
	init_tracing();
	let conn = Connection::open_in_memory().unwrap();
	conn.execute_batch(
		"CREATE VIRTUAL TABLE demo USING rtree(id, min_x, max_x, min_y, max_y);
		 INSERT INTO demo VALUES (1, 0, 1, 0, 1), (2, 5, 6, 5, 6), (3, 10, 11, 10, 11);",
	)
	.unwrap();
	conn
}

/// Run a query returning ids; the statement is finalized before returning.
pub fn ids<P: Params>(conn: &Connection, sql: &str, params: P) -> rtquery::Result<Vec<i64>> {
	let mut stmt = conn.prepare(sql)?;
	let rows = stmt.query_map(params, |row| row.get(0))?;
	resolve(rows.collect::<rusqlite::Result<Vec<i64>>>())
}

/// Counts how often it is dropped
pub struct DropCounter(pub Arc<AtomicUsize>);

impl DropCounter {
	pub fn new() -> (Self, Arc<AtomicUsize>) {
		let count = Arc::new(AtomicUsize::new(0));
		(Self(count.clone()), count)
	}
}

impl Drop for DropCounter {
	fn drop(&mut self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}
