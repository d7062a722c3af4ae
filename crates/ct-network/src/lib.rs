//! `ct-network`: the artifacts handed from phase 1 to phase 2.
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`mutator`] | `block_lanes`: disallow all traffic on selected lanes          |
//! | [`rewrite`] | `point_at`: swap the network reference in a simulation config  |
//! | [`io`]      | gzip-aware network read/write, file-level helpers               |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                              |
//!
//! Both transforms are pure functions over text; the input documents are
//! never modified in place, so the phase-1 originals remain inspectable.

pub mod error;
pub mod io;
pub mod mutator;
pub mod rewrite;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use io::{block_lanes_file, read_network, rewrite_config_file, write_network};
pub use mutator::{BLOCK_ALL, block_lanes};
pub use rewrite::{count_references, point_at};
