#![doc(test(attr(deny(warnings))))]

//! Business Form collects a business record (identity, description,
//! categories, and branches with contacts and social links), drives category
//! autocomplete from a remote taxonomy, and hands completed records to a
//! submission sink.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod form;
pub mod submit;
pub mod suggestions;
pub mod taxonomy;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Business Form tracing initialized.");
    });
}
