//! JSONL trail writer and per-mutation change sets.
//!
//! The trail is an append-only history of every report mutation, one file
//! per report under `.analytica/trail/`.

pub mod changes;
pub mod writer;
