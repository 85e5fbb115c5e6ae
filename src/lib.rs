//! # followers
//!
//! Reader, writer and graph tools for follower documents.
//!
//! A follower document is JSON-shaped text holding record blocks:
//!
//! ```text
//! { "elements": [
//! {"id": "f1", "label": "Seed", "aspects": {"growth": 3}, "description": "d",
//!  "xtriggers": {"grow": "f2"}, "uniquenessgroup": "g"}
//! ]}
//! ```
//!
//! Every block becomes a [`Follower`]. Triggers name other followers by id,
//! which makes the set a directed graph that can be walked from any start
//! node.
//!
//! File Layout
//!
//! ```text
//! src/
//!   ├── model        Follower, FollowerSet, ordered maps, named fields
//!   ├── lexing       logos tokens
//!   ├── matching     record matchers (regex pattern, token grammar)
//!   ├── building     captures -> Follower, field policy
//!   ├── ingest       concurrent and sequential document ingestion
//!   ├── formats      output formats and registry
//!   ├── loader       file reads, locked/atomic writes
//!   ├── graph        walk, tree printer, layout
//!   ├── query        filter and sort
//!   └── config       layered configuration
//! ```
//!
//! The pipeline is: text → matcher → captures → builder → [`FollowerSet`].
//! Malformed blocks are skipped and unparsable values dropped, unless the
//! strict field policy is configured.

pub mod building;
pub mod config;
pub mod error;
pub mod formats;
pub mod graph;
pub mod ingest;
pub mod lexing;
pub mod loader;
pub mod matching;
pub mod model;
pub mod query;

pub use error::{CodecError, FieldError, FormatError, IngestError, RecordError};
pub use model::{Field, FieldValue, Follower, FollowerSet};

use formats::Formatter;

/// Parse a document with the default matcher and lenient field policy
pub fn parse_document(source: &str) -> Result<FollowerSet, RecordError> {
    ingest::DocumentReader::default().parse(source)
}

/// Serialize a set in the `elements` layout
pub fn write_document(set: &FollowerSet) -> Result<String, FormatError> {
    formats::ElementsFormat.serialize(set)
}
