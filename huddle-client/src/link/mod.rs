mod peer_link;
mod sdp;
mod state;

pub use peer_link::*;
pub use sdp::*;
pub use state::*;
