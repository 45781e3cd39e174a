pub mod brief;
pub mod claim;
pub mod content;
pub mod creator;
pub mod deps;
pub mod evidence;
pub mod guard;
pub mod link;
pub mod pipeline;
pub mod providers;
pub mod scoring;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use deps::PipelineDeps;
pub use pipeline::analyze;
pub use traits::{CreatorHistory, FactCheckIndex, RunStore, TrustedSearch, VideoSource};
