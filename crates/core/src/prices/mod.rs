//! Price history: the immutable (date, code) -> close lookup and its loader.

mod price_index;
mod price_loader;

pub use price_index::*;
pub use price_loader::*;
