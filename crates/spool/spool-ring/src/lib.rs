#![forbid(unsafe_code)]

mod error;
mod ring;

pub use error::RingError;
pub use ring::{ByteRing, InlineRing, RingCursor, send};
