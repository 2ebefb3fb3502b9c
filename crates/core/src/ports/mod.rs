mod catalog;
mod fetcher;
mod notify;
mod pagination;
mod visibility;

pub use catalog::*;
pub use fetcher::*;
pub use notify::*;
pub use pagination::*;
pub use visibility::*;
