//! doimatch - exact-match DOI overlap scanning for DataCite dumps
//!
//! doimatch answers one question at corpus scale: which DOIs from a
//! funding-mapping table appear in a DataCite dump, either as a record's own
//! DOI or among its related identifiers? The mapping table contributes
//! several hundred thousand literal patterns; the dump side is gigabytes of
//! gzip-compressed, newline-delimited JSON.
//!
//! # Architecture
//!
//! ```text
//! mapping CSV ──► PatternSet (interned trie + failure links, built once)
//!                      │ read-only
//! corpus root ──► discover_archives ──► RecordReader (streaming gunzip,
//!                      │                 bounded chunks, line reassembly)
//!                      ▼
//!                extract_matches ──► MatchEvent ──► MatchReport (CSV)
//! ```
//!
//! Archives are processed sequentially; the pattern set is immutable after
//! construction and the decoder bounds memory per archive, so total corpus
//! size never affects peak memory. Malformed lines and unreadable archives
//! are logged and skipped; only setup problems (an empty pattern set, a
//! broken mapping table, an unwritable report) abort the run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoder;
pub mod driver;
pub mod error;
pub mod extract;
pub mod mapping;
pub mod patterns;
pub mod record;
pub mod report;

pub use decoder::{DEFAULT_CHUNK_SIZE, RecordReader};
pub use driver::{RunSummary, discover_archives, run};
pub use error::{Error, Result};
pub use extract::{MatchEvent, extract_matches};
pub use mapping::{MappingRow, load_mapping_rows};
pub use patterns::PatternSet;
pub use record::Record;
pub use report::MatchReport;
