//! Core data types for central-publisher.
//!
//! This crate defines the immutable publisher configuration model and the
//! primitives every configuration source is expressed in: fill-blanks
//! merging, properties files, recognized property/environment keys, the
//! environment provider abstraction, the mtime-keyed file cache, and the
//! `central-publisher.toml` manifest.
//!
//! This crate performs no network I/O and spawns no processes.

pub mod cache;
pub mod environment;
pub mod keys;
pub mod manifest;
pub mod merge;
pub mod model;
pub mod project_kind;
pub mod properties;
