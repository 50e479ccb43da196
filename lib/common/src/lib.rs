#![doc(test(attr(deny(warnings))))]

//! Configuration constants and the shared error taxonomy used across the
//! bound-join operator (`fedsparql-physical`), the graph interface
//! (`fedsparql-graph`), and the update consumer sink (`fedsparql-update`).

mod config;
mod error;

pub use config::{GraphOptions, DEFAULT_BIND_JOIN_BUFFER_SIZE};
pub use error::ErrorKind;
