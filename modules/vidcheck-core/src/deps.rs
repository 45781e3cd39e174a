//! Everything one pipeline run needs, injected by the caller.

use std::sync::Arc;

use typed_builder::TypedBuilder;

use vidcheck_common::FileConfig;

use crate::guard::CallPolicy;
use crate::traits::{
    CreatorHistory, FactCheckIndex, RunStore, TextGenerator, TrustedSearch, VideoSource,
};

/// Shared, cloneable dependency container for `analyze`.
///
/// Production wiring lives in `providers::build_deps`; tests assemble one from
/// the mocks in `testing`. The pipeline never reads the environment itself.
#[derive(Clone, TypedBuilder)]
pub struct PipelineDeps {
    pub videos: Arc<dyn VideoSource>,
    pub creators: Arc<dyn CreatorHistory>,
    pub generator: Arc<dyn TextGenerator>,
    pub fact_checks: Arc<dyn FactCheckIndex>,
    pub search: Arc<dyn TrustedSearch>,
    pub store: Arc<dyn RunStore>,
    #[builder(default)]
    pub settings: Arc<FileConfig>,
}

impl PipelineDeps {
    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy::from_config(&self.settings.pipeline)
    }
}
