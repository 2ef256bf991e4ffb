//! Data types for key-point datasets and their verification.

pub mod config;
pub mod credentials;
pub mod dataset;
pub mod verification;
