mod lifecycle;
mod list;
mod merge;
mod sentinel;

pub use lifecycle::*;
pub use list::*;
pub use merge::*;
pub use sentinel::*;
