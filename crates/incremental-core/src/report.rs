//! Diagnostic Bag: host-side collector for `sink`
use crate::diagnostic::Diagnostic;

/// Ordered collector of reported diagnostics.
///
/// ```
/// use incremental_core::{Diagnostic, DiagnosticBag, Incremental};
///
/// let mut bag = DiagnosticBag::new();
/// let mut out = None;
/// Incremental::with_diagnostics(3, vec![Diagnostic::warning("W1", "check me")])
///     .sink(bag.reporter(), |v| {
///         out = v;
///         Ok::<_, std::convert::Infallible>(())
///     });
///
/// assert_eq!(out, Some(3));
/// assert_eq!(bag.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// A `report` callback borrowing this bag.
    pub fn reporter(&mut self) -> impl FnMut(Diagnostic) + '_ {
        move |diagnostic| self.report(diagnostic)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Extend<Diagnostic> for DiagnosticBag {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}
