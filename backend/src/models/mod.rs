//! Domain types shared across the planning pipeline.

pub mod macros;
pub mod question;
pub mod request;
pub mod schedule;
pub mod topic;

pub use question::*;
pub use request::*;
pub use schedule::*;
pub use topic::*;
