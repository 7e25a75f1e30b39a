//! WWD level parser
//!
//! - `read` - Decoding WWD bytes into a [`Level`](crate::Level)
//! - `write` - Encoding a level back into WWD bytes
//! - `tests` - Decoder edge cases

mod read;
mod write;

#[cfg(test)]
mod tests;

pub use read::{decode_level, load_level};
pub use write::encode_level;
