//! # Wirebox Support
//!
//! Shared utilities for the Wirebox DI framework.
//!
//! This crate provides:
//! - Text rendering for error messages
//! - "Did you mean?" suggestions for misspelled provider names

pub mod rendering;
