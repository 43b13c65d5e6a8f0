//! Pipeline Runner: chains stages through `bind` under an abort policy
use crate::incremental::Incremental;
use crate::policy::PipelineConfig;
use crate::stage::Stage;

pub struct Pipeline<T> {
    stages: Vec<Box<dyn Stage<T>>>,
    config: PipelineConfig,
    pipeline_id: String,
}

impl<T> Pipeline<T> {
    pub fn new(stages: Vec<Box<dyn Stage<T>>>, config: PipelineConfig) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.id().split('.').next().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("→");

        Self {
            stages,
            config,
            pipeline_id,
        }
    }

    /// Runs every stage in order. Stages after an abort are skipped, but their
    /// predecessors' diagnostics stay on the result.
    pub fn run(&self, seed: Incremental<T>) -> Incremental<T> {
        let _pipeline = tracing::debug_span!(
            "pipeline",
            id = %self.pipeline_id,
            profile = %self.config.name
        )
        .entered();

        let mut current = seed.apply_policy(self.config.abort_policy);
        for stage in &self.stages {
            let _stage = tracing::debug_span!("stage", id = stage.id()).entered();
            current = current
                .bind_optional(|input, emit| stage.run(input, emit))
                .apply_policy(self.config.abort_policy);
            tracing::trace!(
                diagnostics = current.diagnostics().len(),
                aborted = current.is_aborted(),
                "stage finished"
            );
        }
        current
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
