//! xlf-sync - XLIFF catalogue synchronization
//!
//! Keeps per-locale XLIFF catalogues in step with a source catalogue, using a
//! machine-translation provider to fill in messages that are missing.

pub mod cli;
pub mod config;
pub mod error;
pub mod catalogue;
pub mod xliff;
pub mod repository;
pub mod reconcile;
pub mod translate;
pub mod workflow;
