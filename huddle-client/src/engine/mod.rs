//! The media engine capability boundary. Everything that actually touches
//! capture hardware or moves RTP lives behind these traits; the
//! orchestration core works against any implementation of them.

mod traits;
mod types;

pub use traits::*;
pub use types::*;
