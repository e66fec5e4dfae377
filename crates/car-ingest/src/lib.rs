//! CaR result ingestion.
//!
//! This crate discovers result files in a results directory, parses them
//! strictly into typed schema structs, validates every data-model invariant
//! and caches the resulting records for the lifetime of a [`ResultStore`].
//!
//! # Example
//!
//! ```ignore
//! use car_ingest::ResultStore;
//! use car_model::StoneId;
//!
//! let store = ResultStore::open("results")?;
//! for stone in store.discover()? {
//!     match store.get(&stone) {
//!         Ok(record) => println!("{stone}: {} levels", record.levels().len()),
//!         Err(error) => eprintln!("{error}"),
//!     }
//! }
//! ```

mod discovery;
mod error;
mod hash;
mod schema;
mod store;
mod validate;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{
    RESULT_SUFFIX, discover_stones, list_result_files, locate_result_file, stone_id_from_path,
};

// === Parsing & Validation ===
pub use hash::sha256_hex;
pub use schema::{CurveEntry, ResultFile};
pub use validate::build_record;

// === Record Store ===
pub use store::{RecordLookup, ResultStore};
