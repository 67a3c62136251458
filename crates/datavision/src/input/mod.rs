//! File decoding: turning uploaded bytes into headers and typed rows.

mod parser;
mod source;

pub use parser::{Decoder, DecoderConfig, FileDecoder, FileFormat};
pub use source::{DecodedTable, SourceInfo};
