//! Incremental: value + diagnostics + abort flag threaded through a chain
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};

use crate::diagnostic::Diagnostic;
use crate::error::Fault;

/// A possibly-absent value together with every diagnostic emitted on the way
/// to it.
///
/// Equality and hashing look at the value only, so two pipeline states with the
/// same payload compare equal whatever their diagnostic trail.
#[derive(Debug, Clone)]
pub struct Incremental<T> {
    value: Option<T>,
    diagnostics: Vec<Diagnostic>,
    aborted: bool,
}

/// Collects the diagnostics a step emits during one `bind` call.
///
/// Handed out as `&mut`, so a step cannot keep it past its own call.
#[derive(Debug)]
pub struct Emitter<'a> {
    emitted: &'a mut Vec<Diagnostic>,
}

impl Emitter<'_> {
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.emitted.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.emitted.extend(diagnostics);
    }
}

/// What `sink` did with the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// The consumer ran and returned normally.
    Consumed,
    /// The chain was aborted; the consumer never ran.
    Aborted,
    /// The consumer failed; a `MONAD1` diagnostic was reported.
    Failed,
}

impl<T> Incremental<T> {
    pub fn new(value: T) -> Self {
        Self::with_diagnostics(value, Vec::new())
    }

    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            value: None,
            diagnostics,
            aborted: false,
        }
    }

    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            value: Some(value),
            diagnostics,
            aborted: false,
        }
    }

    /// The current value; always `None` once aborted.
    pub fn value(&self) -> Option<&T> {
        if self.aborted {
            None
        } else {
            self.value.as_ref()
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Splits into (value, diagnostics, aborted). The value is dropped when aborted.
    pub fn into_parts(self) -> (Option<T>, Vec<Diagnostic>, bool) {
        let value = if self.aborted { None } else { self.value };
        (value, self.diagnostics, self.aborted)
    }

    /// Runs `step` on the current value, unless the chain is aborted.
    ///
    /// The step is invoked even when the value is absent. An `Err` or a panic
    /// from the step is turned into a `MONAD0` diagnostic appended after what
    /// the step already emitted, and the result is aborted.
    ///
    /// Contained panics still go through the process panic hook, so the default
    /// hook prints them to stderr. Hosts that want silence install their own hook.
    pub fn bind<U, E, F>(self, step: F) -> Incremental<U>
    where
        F: FnOnce(Option<T>, &mut Emitter<'_>) -> Result<U, E>,
        E: Display,
    {
        self.bind_optional(|value, emit| step(value, emit).map(Some))
    }

    /// Like [`bind`](Self::bind), but the step may produce no value.
    pub fn bind_optional<U, E, F>(self, step: F) -> Incremental<U>
    where
        F: FnOnce(Option<T>, &mut Emitter<'_>) -> Result<Option<U>, E>,
        E: Display,
    {
        let Incremental {
            value,
            mut diagnostics,
            aborted,
        } = self;

        if aborted {
            tracing::trace!(diagnostics = diagnostics.len(), "chain aborted, step skipped");
            return Incremental {
                value: None,
                diagnostics,
                aborted: true,
            };
        }

        let mut emitted = Vec::new();
        let outcome = {
            let mut emitter = Emitter {
                emitted: &mut emitted,
            };
            // The error is rendered inside the guard so a panicking `Display` is contained too.
            panic::catch_unwind(AssertUnwindSafe(|| {
                step(value, &mut emitter).map_err(Fault::failed)
            }))
        };
        diagnostics.append(&mut emitted);

        let fault = match outcome {
            Ok(Ok(next)) => {
                return Incremental {
                    value: next,
                    diagnostics,
                    aborted: false,
                };
            }
            Ok(Err(fault)) => fault,
            Err(payload) => Fault::from_panic(payload),
        };

        tracing::warn!(error = %fault, "step failed, aborting chain");
        diagnostics.push(Diagnostic::step_failure(&fault));
        Incremental {
            value: None,
            diagnostics,
            aborted: true,
        }
    }

    /// Marks the chain aborted; value and diagnostics are kept as they are.
    pub fn abort(mut self) -> Self {
        if !self.aborted {
            tracing::debug!(diagnostics = self.diagnostics.len(), "chain aborted");
        }
        self.aborted = true;
        self
    }

    /// Merges many results into one sequence, left to right.
    ///
    /// Diagnostics come from every input. Values come from non-aborted inputs
    /// only; aborted inputs leave no entry. The result is never aborted.
    pub fn collect<I>(items: I) -> Incremental<Vec<Option<T>>>
    where
        I: IntoIterator<Item = Incremental<T>>,
    {
        let mut values = Vec::new();
        let mut diagnostics = Vec::new();
        for item in items {
            diagnostics.extend(item.diagnostics);
            if !item.aborted {
                values.push(item.value);
            }
        }
        Incremental::with_diagnostics(values, diagnostics)
    }

    /// Terminal step: reports every diagnostic, then hands the value to
    /// `consume` unless the chain was aborted.
    ///
    /// A failing `consume` (`Err` or panic) is reported as one extra `MONAD1`
    /// diagnostic and never escapes. As with [`bind`](Self::bind), a contained
    /// panic is still seen by the panic hook.
    pub fn sink<R, C, E>(self, mut report: R, consume: C) -> SinkOutcome
    where
        R: FnMut(Diagnostic),
        C: FnOnce(Option<T>) -> Result<(), E>,
        E: Display,
    {
        tracing::debug!(
            diagnostics = self.diagnostics.len(),
            aborted = self.aborted,
            "sinking chain"
        );
        for diagnostic in self.diagnostics {
            report(diagnostic);
        }
        if self.aborted {
            return SinkOutcome::Aborted;
        }

        let value = self.value;
        let fault = match panic::catch_unwind(AssertUnwindSafe(|| {
            consume(value).map_err(Fault::failed)
        })) {
            Ok(Ok(())) => return SinkOutcome::Consumed,
            Ok(Err(fault)) => fault,
            Err(payload) => Fault::from_panic(payload),
        };

        tracing::warn!(error = %fault, "sink consumer failed");
        report(Diagnostic::sink_failure(&fault));
        SinkOutcome::Failed
    }
}

impl<T> FromIterator<Incremental<T>> for Incremental<Vec<Option<T>>> {
    fn from_iter<I: IntoIterator<Item = Incremental<T>>>(iter: I) -> Self {
        Incremental::collect(iter)
    }
}

impl<T> From<T> for Incremental<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PartialEq> PartialEq for Incremental<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Incremental<T> {}

impl<T: Hash> Hash for Incremental<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}
