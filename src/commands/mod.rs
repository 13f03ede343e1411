//! Command implementations for Prebake CLI

pub mod completions;
pub mod fetch;
pub mod version;
