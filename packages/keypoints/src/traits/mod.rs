//! Core trait abstractions for the key-points library.
//!
//! These traits define the seams where applications plug in model
//! providers, content sources and storage.

pub mod ai;
pub mod fetcher;
pub mod store;
