//! Search index store for verso fragments.

mod algolia;
mod error;
pub mod http;
mod memory;
mod settings;
mod store;

pub use algolia::AlgoliaIndex;
pub use error::IndexError;
pub use memory::InMemoryIndex;
pub use settings::IndexSettings;
pub use store::{BoxFuture, SearchIndex};
