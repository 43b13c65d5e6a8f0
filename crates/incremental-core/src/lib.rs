//! Incremental Core: diagnostic-accumulating results for incremental pipelines
//!
//! An [`Incremental<T>`] carries a possibly-absent value, every diagnostic
//! emitted so far and an abort flag through a chain of steps.
//!
//! ```text
//! new/with_diagnostics → bind → bind → … → sink
//!                          ↓ Err/panic
//!                       MONAD0 + abort  ──→ sink reports, skips consume
//! ```
//!
//! # Example
//!
//! ```
//! use incremental_core::{Diagnostic, DiagnosticBag, Incremental, SinkOutcome};
//!
//! let chain = Incremental::new("a=1;b=;c=3")
//!     .bind(|text, emit| {
//!         let mut pairs = Vec::new();
//!         for entry in text.unwrap_or_default().split(';') {
//!             match entry.split_once('=') {
//!                 Some((k, v)) if !v.is_empty() => pairs.push((k.to_string(), v.to_string())),
//!                 _ => emit.emit(Diagnostic::warning("KV001", format!("skipped `{}`", entry))),
//!             }
//!         }
//!         Ok::<_, std::convert::Infallible>(pairs)
//!     });
//!
//! let mut bag = DiagnosticBag::new();
//! let mut count = 0;
//! let outcome = chain.sink(bag.reporter(), |pairs| {
//!     count = pairs.map_or(0, |p| p.len());
//!     Ok::<_, std::convert::Infallible>(())
//! });
//!
//! assert_eq!(outcome, SinkOutcome::Consumed);
//! assert_eq!(count, 2);
//! assert_eq!(bag.len(), 1);
//! ```

pub mod diagnostic;
pub mod error;
pub mod incremental;
pub mod policy;
pub mod report;
pub mod runner;
pub mod stage;

pub use diagnostic::{
    Diagnostic, DiagnosticDescriptor, Location, Severity, SINK_FAILURE_ID, STEP_FAILURE_ID,
};
pub use error::{Fault, IncrementalError};
pub use incremental::{Emitter, Incremental, SinkOutcome};
pub use policy::{AbortPolicy, PipelineConfig};
pub use report::DiagnosticBag;
pub use runner::Pipeline;
pub use stage::Stage;
