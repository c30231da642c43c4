//! EduFinance application core
//!
//! Storage, cross-page sync, identity and the page controllers that the
//! `edufinance` binary mounts. Pure aggregation lives in the `analytics`
//! crate and the domain types in `shared-types`.

pub mod chart;
pub mod clock;
pub mod config;
pub mod context;
pub mod controllers;
pub mod identity;
pub mod render;
pub mod storage;
pub mod sync;
pub mod toast;

#[cfg(test)]
mod test_support;

pub use context::{AppContext, PageSettings};
pub use controllers::{Mount, MountState, Page};
pub use storage::Store;
pub use sync::{PageKind, SyncBus, SyncEvent, SyncKind};
