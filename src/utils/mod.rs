//! Utility functions
//!
//! Pure helpers for formatting and pagination used by the views.

pub mod formatting;
pub mod pagination;
