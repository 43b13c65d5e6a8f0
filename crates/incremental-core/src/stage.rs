//! Stage Trait: one named step of a pipeline
use crate::incremental::Emitter;

/// A single step of a [`Pipeline`](crate::Pipeline).
///
/// Stages of one pipeline share their payload type; a stage that needs to
/// change the type belongs in a hand-written `bind` chain instead.
pub trait Stage<T>: Send + Sync {
    /// Unique stage id (ex: "parse.resx.v1")
    fn id(&self) -> &'static str;

    /// Runs the stage. `input` is `None` when an earlier stage produced nothing.
    ///
    /// Returning `Err` aborts the pipeline with a `MONAD0` diagnostic.
    fn run(&self, input: Option<T>, emit: &mut Emitter<'_>) -> anyhow::Result<Option<T>>;
}
