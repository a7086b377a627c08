//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - domain-level errors
//! - [`parse::ParseOutcome`] - tagged result of reading structured model output
//! - [`string`] - small text helpers used when logging model output

pub mod error;
pub mod parse;
pub mod string;
