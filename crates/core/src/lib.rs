//! Card draw core: shuffle, fan layout, slot selection and the per-card
//! animation timeline. Keep this crate free of IO and platform concerns.

pub mod animation;
pub mod cards;
pub mod config;
pub mod error;
pub mod events;
pub mod layout;
pub mod rng;
pub mod selection;
pub mod session;
pub mod slots;
pub mod visual;

pub use animation::*;
pub use cards::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use layout::*;
pub use rng::*;
pub use selection::*;
pub use session::*;
pub use slots::*;
pub use visual::*;
