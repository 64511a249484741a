#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A key-value map built on the chained hash table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a keyed interface with configurable hashers, bulk construction and
/// bucket introspection.
pub mod hash_map;

pub mod hash_table;

/// Error types shared by the map operations.
pub mod error;

/// Substitution ciphers backed by a `HashMap<char, char>`.
#[cfg(feature = "std")]
pub mod cipher;

pub use error::Error;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        ///
        /// Hashing is deterministic across maps and runs, so independently
        /// built maps holding the same pairs place them in the same buckets.
        pub type DefaultHashBuilder = foldhash::fast::FixedState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        ///
        /// Hashing is deterministic across maps and runs, so independently
        /// built maps holding the same pairs place them in the same buckets.
        pub type DefaultHashBuilder =
            core::hash::BuildHasherDefault<std::collections::hash_map::DefaultHasher>;
    } else {
        compile_error!("chain-hash needs either the `foldhash` or the `std` feature for its default hasher");
    }
}
