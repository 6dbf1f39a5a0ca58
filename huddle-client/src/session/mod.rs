mod call_session;
mod roster;

pub use call_session::*;
pub use roster::*;
