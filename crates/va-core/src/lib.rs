//! # va-core
//!
//! Core types, ID generation, and error types for Analytica.
//!
//! This crate provides the foundational types shared across all Analytica crates:
//! - Report and data source entities, plus the memo stage state
//! - Status enums with state machine transitions
//! - Stage navigation with gated forward moves and explicit generation effects
//! - Memo preferences with validated section weights
//! - Founder registration wizard, behavioural questionnaire, and voice interview reducers
//! - ID prefix constants and generation
//! - Cross-cutting error types
//! - Trail operation envelope for JSONL persistence
//! - CLI response types

pub mod assessment;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod interview;
pub mod preferences;
pub mod registration;
pub mod responses;
pub mod stage;
pub mod trail;
