//! Integration tests for incremental-core.
//!
//! These tests drive whole chains from construction to `sink` and check what
//! a host sees: the reported diagnostics, their order, and whether the final
//! consumer ran.

use std::convert::Infallible;

use incremental_core::{
    AbortPolicy, Diagnostic, DiagnosticBag, Emitter, Incremental, Pipeline, PipelineConfig,
    SinkOutcome, Stage, SINK_FAILURE_ID, STEP_FAILURE_ID,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sinks a chain, returning (reported ids, consumed values, outcome).
fn drain<T>(chain: Incremental<T>) -> (Vec<String>, Vec<Option<T>>, SinkOutcome) {
    let mut reported = Vec::new();
    let mut consumed = Vec::new();
    let outcome = chain.sink(
        |d| reported.push(d.descriptor.id),
        |v| {
            consumed.push(v);
            Ok::<_, Infallible>(())
        },
    );
    (reported, consumed, outcome)
}

fn ok<T>(value: T) -> Result<T, Infallible> {
    Ok(value)
}

// =============================================================================
// Sink
// =============================================================================

#[test]
fn test_plain_value_is_consumed_once() {
    init_tracing();
    let (reported, consumed, outcome) = drain(Incremental::new("payload"));

    assert!(reported.is_empty());
    assert_eq!(consumed, vec![Some("payload")]);
    assert_eq!(outcome, SinkOutcome::Consumed);
}

#[test]
fn test_diagnostics_only_reports_all_and_consumes_none() {
    init_tracing();
    let chain = Incremental::<u32>::from_diagnostics(vec![
        Diagnostic::warning("W1", "first"),
        Diagnostic::error("E1", "second"),
        Diagnostic::info("I1", "third"),
    ]);
    let (reported, consumed, outcome) = drain(chain);

    assert_eq!(reported, ["W1", "E1", "I1"]);
    assert_eq!(consumed, vec![None]);
    assert_eq!(outcome, SinkOutcome::Consumed);
}

#[test]
fn test_aborted_chain_reports_but_never_consumes() {
    init_tracing();
    let chain = Incremental::with_diagnostics(1, vec![Diagnostic::info("I1", "kept")]).abort();
    let (reported, consumed, outcome) = drain(chain);

    assert_eq!(reported, ["I1"]);
    assert!(consumed.is_empty());
    assert_eq!(outcome, SinkOutcome::Aborted);
}

#[test]
fn test_panicking_consumer_is_contained() {
    init_tracing();
    let mut bag = DiagnosticBag::new();
    let outcome = Incremental::with_diagnostics(2, vec![Diagnostic::warning("W1", "w")])
        .sink(bag.reporter(), |_| -> Result<(), Infallible> {
            panic!("consumer exploded")
        });

    assert_eq!(outcome, SinkOutcome::Failed);
    let diagnostics = bag.into_vec();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].id(), "W1");
    assert_eq!(diagnostics[1].id(), SINK_FAILURE_ID);
    assert!(diagnostics[1].is_error());
    assert!(diagnostics[1].message.contains("consumer exploded"));
}

// =============================================================================
// Bind chains
// =============================================================================

#[test]
fn test_two_steps_concatenate_diagnostics() {
    init_tracing();
    let chain = Incremental::new(10)
        .bind(|v, emit| {
            emit.emit(Diagnostic::info("A1", "a1"));
            emit.emit(Diagnostic::info("A2", "a2"));
            ok(v.unwrap_or_default() + 1)
        })
        .bind(|v, emit| {
            emit.emit(Diagnostic::warning("B1", "b1"));
            ok(v.unwrap_or_default() * 2)
        });
    let (reported, consumed, _) = drain(chain);

    assert_eq!(reported, ["A1", "A2", "B1"]);
    assert_eq!(consumed, vec![Some(22)]);
}

#[test]
fn test_failed_step_skips_the_rest() {
    init_tracing();
    let mut second_ran = false;
    let chain = Incremental::new(10)
        .bind(|_, emit| {
            emit.emit(Diagnostic::info("A1", "before"));
            Err::<i32, _>("could not read resource file")
        })
        .bind(|v, _| {
            second_ran = true;
            ok(v)
        });
    let (reported, consumed, outcome) = drain(chain);

    assert!(!second_ran);
    assert_eq!(reported, ["A1", STEP_FAILURE_ID]);
    assert!(consumed.is_empty());
    assert_eq!(outcome, SinkOutcome::Aborted);
}

#[test]
fn test_soft_errors_do_not_abort() {
    init_tracing();
    let chain = Incremental::new("x").bind(|v, emit| {
        emit.emit(Diagnostic::error("GEN001", "duplicate key"));
        ok(v)
    });

    assert!(chain.has_errors());
    assert!(!chain.is_aborted());
    let (_, consumed, _) = drain(chain);
    assert_eq!(consumed, vec![Some(Some("x"))]);
}

#[test]
fn test_caller_side_error_policy() {
    init_tracing();
    let chain = Incremental::new(1)
        .bind(|v, emit| {
            emit.emit(Diagnostic::error("GEN001", "bad"));
            ok(v)
        })
        .apply_policy(AbortPolicy::OnErrors);
    let (reported, consumed, outcome) = drain(chain);

    assert_eq!(reported, ["GEN001"]);
    assert!(consumed.is_empty());
    assert_eq!(outcome, SinkOutcome::Aborted);
}

// =============================================================================
// Collect
// =============================================================================

#[test]
fn test_collect_drops_aborted_values_keeps_their_diagnostics() {
    init_tracing();
    let merged = Incremental::collect(vec![
        Incremental::with_diagnostics(1, vec![Diagnostic::info("D1", "one")]),
        Incremental::with_diagnostics(2, vec![Diagnostic::info("D2", "two")]).abort(),
        Incremental::with_diagnostics(3, vec![Diagnostic::info("D3", "three")]),
    ]);
    let (reported, consumed, outcome) = drain(merged);

    assert_eq!(reported, ["D1", "D2", "D3"]);
    assert_eq!(consumed, vec![Some(vec![Some(1), Some(3)])]);
    assert_eq!(outcome, SinkOutcome::Consumed);
}

#[test]
fn test_collect_then_bind() {
    init_tracing();
    let total = (1..=4)
        .map(|n| {
            Incremental::new(n).bind(|v, emit| {
                let n = v.unwrap_or_default();
                if n == 3 {
                    emit.emit(Diagnostic::warning("SKIP", "three is skipped"));
                    return Err("three");
                }
                Ok(n * 10)
            })
        })
        .collect::<Incremental<Vec<Option<i32>>>>()
        .bind(|values, _| ok(values.unwrap_or_default().into_iter().flatten().sum::<i32>()));
    let (reported, consumed, _) = drain(total);

    assert_eq!(reported, ["SKIP", STEP_FAILURE_ID]);
    assert_eq!(consumed, vec![Some(70)]);
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn test_equality_is_value_only() {
    assert_eq!(
        Incremental::with_diagnostics(5, vec![Diagnostic::error("E1", "e")]),
        Incremental::new(5)
    );
    assert_ne!(Incremental::new(5), Incremental::new(6));
}

#[test]
fn test_usable_as_memo_key() {
    let mut memo = std::collections::HashMap::new();
    memo.insert(Incremental::new("input".to_string()), 1);
    let hit = memo.get(&Incremental::with_diagnostics(
        "input".to_string(),
        vec![Diagnostic::warning("W1", "ignored for lookup")],
    ));
    assert_eq!(hit, Some(&1));
}

// =============================================================================
// Pipeline
// =============================================================================

struct Trim;

impl Stage<String> for Trim {
    fn id(&self) -> &'static str {
        "trim.v1"
    }

    fn run(&self, input: Option<String>, emit: &mut Emitter<'_>) -> anyhow::Result<Option<String>> {
        let Some(text) = input else {
            emit.emit(Diagnostic::warning("TRIM001", "nothing to trim"));
            return Ok(None);
        };
        Ok(Some(text.trim().to_string()))
    }
}

struct RequireNonEmpty;

impl Stage<String> for RequireNonEmpty {
    fn id(&self) -> &'static str {
        "require.v1"
    }

    fn run(&self, input: Option<String>, emit: &mut Emitter<'_>) -> anyhow::Result<Option<String>> {
        if input.as_deref().map_or(true, str::is_empty) {
            emit.emit(Diagnostic::error("REQ001", "value is empty"));
        }
        Ok(input)
    }
}

struct Upper;

impl Stage<String> for Upper {
    fn id(&self) -> &'static str {
        "upper.v1"
    }

    fn run(&self, input: Option<String>, _emit: &mut Emitter<'_>) -> anyhow::Result<Option<String>> {
        Ok(input.map(|s| s.to_uppercase()))
    }
}

fn text_pipeline(config: PipelineConfig) -> Pipeline<String> {
    Pipeline::new(
        vec![Box::new(Trim), Box::new(RequireNonEmpty), Box::new(Upper)],
        config,
    )
}

#[test]
fn test_pipeline_happy_path() {
    init_tracing();
    let p = text_pipeline(PipelineConfig::strict());
    assert_eq!(p.pipeline_id(), "trim→require→upper");

    let (reported, consumed, outcome) = drain(p.run(Incremental::new("  hello ".to_string())));
    assert!(reported.is_empty());
    assert_eq!(consumed, vec![Some("HELLO".to_string())]);
    assert_eq!(outcome, SinkOutcome::Consumed);
}

#[test]
fn test_pipeline_strict_vs_lenient() {
    init_tracing();
    let strict = text_pipeline(PipelineConfig::strict()).run(Incremental::new("   ".to_string()));
    assert!(strict.is_aborted());
    assert_eq!(strict.diagnostics().len(), 1);

    let lenient = text_pipeline(PipelineConfig::lenient()).run(Incremental::new("   ".to_string()));
    assert!(!lenient.is_aborted());
    assert_eq!(lenient.value(), Some(&String::new()));
}

#[test]
fn test_pipeline_from_yaml_config() {
    init_tracing();
    let config = PipelineConfig::from_yaml("name: text@1\nabort_policy: on_errors\n").unwrap();
    let result = text_pipeline(config).run(Incremental::from_diagnostics(Vec::new()));
    let (reported, consumed, outcome) = drain(result);

    assert_eq!(reported, ["TRIM001", "REQ001"]);
    assert!(consumed.is_empty());
    assert_eq!(outcome, SinkOutcome::Aborted);
}
