//! Session, account, and identity models produced by the sign-in chain.

pub mod account;
pub mod identity;
pub mod session;

pub use account::*;
pub use identity::*;
pub use session::*;
