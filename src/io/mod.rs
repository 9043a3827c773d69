//! Endian-aware, bounds-checked reading & writing over byte slices.

mod input_stream;
pub use input_stream::*;

mod output_stream;
pub use output_stream::*;
