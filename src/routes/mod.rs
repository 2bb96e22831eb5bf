pub(crate) mod health_check;
mod channel;
mod topics;
mod videos;

pub use channel::*;
pub use health_check::*;
pub use topics::*;
pub use videos::*;
