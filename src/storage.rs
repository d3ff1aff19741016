//! Durable key-value storage and the saved-playlist adapter built on it.
//!
//! Only remote tracks are saved, as one JSON array under a single key.
//! Reads and writes never fail the caller: the in-memory store stays
//! authoritative for the session.

mod error;
mod kv;
mod playlist;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use playlist::PlaylistStorage;

#[cfg(test)]
mod tests;
