//! Web module - Page composition and HTTP serving

mod page;
mod server;

pub use page::{Dashboard, Panel};
pub use server::serve;
