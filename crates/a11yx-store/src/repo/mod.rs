//! Repository layer persisting host documents to SQLite

pub mod document;

pub use document::{document_digest, load_document, save_document, stored_digest, SavedDocument};
