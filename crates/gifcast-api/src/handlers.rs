//! Request handlers.

pub mod convert;
pub mod health;
pub mod session;

pub use convert::*;
pub use health::*;
pub use session::*;
