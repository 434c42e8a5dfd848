//! # sam-core
//!
//! Core types and text rules for the SAM operations toolkit.
//!
//! This crate provides the foundational pieces shared across all `samops` crates:
//! - Entity structs mirroring the externally-owned tables the tool reads
//! - Status enums with lenient string parsing (unknown values are preserved)
//! - LinkedIn profile URL parsing
//! - Provider error-message classification
//! - Account display-name folding and owner matching
//! - Message template personalization and send pacing
//! - Issue/report types produced by consistency checks

pub mod classify;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod issues;
pub mod limits;
pub mod linkedin;
pub mod names;
pub mod pacing;
pub mod personalize;
