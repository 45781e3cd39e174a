pub mod store;

pub use store::{PgRunStore, StoredRun, MAX_CLAIM_CHARS, MAX_EXPLANATION_CHARS, MAX_SOURCES};
