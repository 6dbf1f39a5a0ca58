mod room;
mod signaling;

pub use room::{Room, RoomRegistry};
pub use signaling::{RelayService, ws_handler};
