//! Data models for HR document extraction.

pub mod config;
pub mod document;
pub mod record;
