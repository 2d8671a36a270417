#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

/// A byte-keyed map with pluggable key functions and ownership policies.
///
/// This module provides `ByteMap`, which wraps the `HashTable` and handles
/// key sizing, hashing, comparison and value release.
pub mod byte_map;

/// Error types for table operations.
pub mod error;

pub mod hash_table;

pub mod hasher;

pub mod settings;

pub mod shared;

pub use byte_map::ByteMap;
pub use byte_map::EntryRef;
pub use byte_map::Key;
pub use error::Error;
pub use error::Result;
pub use hash_table::HashTable;
pub use hash_table::MIN_CAPACITY;
pub use settings::Ownership;
pub use settings::Release;
pub use settings::ResizePolicy;
pub use settings::Settings;
pub use shared::SharedByteMap;
