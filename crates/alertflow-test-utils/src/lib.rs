// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Alertflow integration tests.
//!
//! # Components
//!
//! - [`MemoryStorage`] - In-memory store with switchable failure injection
//! - [`MockCompletion`] - Scripted generative backend that counts its calls
//! - [`TempSqlite`] - A migrated SQLite store in a temp directory

pub mod memory_store;
pub mod mock_completion;
pub mod sqlite;

pub use memory_store::MemoryStorage;
pub use mock_completion::MockCompletion;
pub use sqlite::TempSqlite;
