//! Document store adapters for the user and project repository ports.
//!
//! Two interchangeable stores implement both ports:
//!
//! - [`MongoStore`]: production adapter over the official MongoDB driver.
//! - [`MemoryStore`]: in-process adapter for local runs and tests.
//!
//! Both share the stored document shapes in `documents` so identifiers and
//! field names stay identical whichever store is selected.

mod documents;
mod memory;
mod mongo;

pub use documents::CorruptDocument;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
