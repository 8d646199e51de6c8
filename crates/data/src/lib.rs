//! Deck content and deck sources for the draw core.

pub mod load;
pub mod schema;
pub mod source;
pub mod tarot;

pub use load::*;
pub use schema::*;
pub use source::*;
pub use tarot::*;
