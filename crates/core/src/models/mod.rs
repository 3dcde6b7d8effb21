//! Data models for hallkeep

mod announcement;
mod attendance;
mod audit;
mod cleaning;
mod facilities;
mod lecture;
mod request;
mod room;
mod schedule;

pub use announcement::*;
pub use attendance::*;
pub use audit::*;
pub use cleaning::*;
pub use facilities::*;
pub use lecture::*;
pub use request::*;
pub use room::*;
pub use schedule::*;
