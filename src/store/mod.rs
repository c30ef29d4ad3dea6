//! Persistence layer — where saved onboarding profiles go.

pub mod memory;
pub mod traits;

pub use memory::MemoryProfileStore;
pub use traits::{ProfileStore, SavedProfile};
