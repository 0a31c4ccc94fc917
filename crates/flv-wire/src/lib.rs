#![warn(clippy::pedantic)]

pub mod bounded;
pub mod error;
pub mod header;
pub mod io;
pub mod pool;
pub mod tag_header;
pub mod tag_size;

pub use bounded::BoundedReader;
pub use error::WireError;
pub use header::{FlvHeader, HeaderFlags};
pub use io::TrackedReader;
pub use tag_header::{TagHeader, TagType};
pub use tag_size::{read_tag_size, skip_tag_size};
