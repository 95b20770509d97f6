// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use paygw_pipeline::{ContextData, Pipeline, PipelineControl, PipelineError, PipelineResult, SkipCondition};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn runs_steps_in_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<FlowTrace, TestError>::new(&[("load", false, None), ("price", false, None), ("persist", false, None)]);
  pipeline.on_root("load", recording_handler("load", " L"));
  pipeline.on_root("price", recording_handler("price", " P"));
  pipeline.on_root("persist", recording_handler("persist", " S"));

  let ctx = ContextData::new(FlowTrace::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " L P S");
  assert_eq!(guard.steps_executed, vec!["load", "price", "persist"]);
}

#[tokio::test]
#[serial]
async fn stop_halts_remaining_steps() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<FlowTrace, TestError>::new(&[("a", false, None), ("halt", false, None), ("c", false, None)]);
  pipeline.on_root("a", recording_handler("a", "A"));
  pipeline.on_root("halt", |ctx: ContextData<FlowTrace>| {
    Box::pin(async move {
      ctx.write().steps_executed.push("halt".to_string());
      Ok::<_, PipelineError>(PipelineControl::Stop)
    })
  });
  pipeline.on_root("c", recording_handler("c", "C"));

  let ctx = ContextData::new(FlowTrace::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["a", "halt"]);
  assert_eq!(ctx.read().message, "A");
}

#[tokio::test]
#[serial]
async fn stop_in_before_phase_skips_on_and_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<FlowTrace, TestError>::new(&[("guarded", false, None)]);
  pipeline.before_root("guarded", recording_handler("before", "B"));
  pipeline.on_root("guarded", recording_handler("on", "O"));
  pipeline.after_root("guarded", recording_handler("after", "F"));

  let ctx = ContextData::new(FlowTrace {
    should_stop_at: Some("before".to_string()),
    ..Default::default()
  });
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["before"]);
}

#[tokio::test]
#[serial]
async fn handler_error_is_returned_unchanged() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<FlowTrace, TestError>::new(&[("good", false, None), ("bad", false, None), ("never", false, None)]);
  pipeline.on_root("good", recording_handler("good", "Good"));
  pipeline.on_root("bad", failing_handler("bad", "processor unreachable"));
  pipeline.on_root("never", recording_handler("never", "Never"));

  let ctx = ContextData::new(FlowTrace::default());
  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  assert_eq!(err, TestError::Handler("processor unreachable".to_string()));
  assert_eq!(ctx.read().steps_executed, vec!["good", "bad"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_is_evaluated_against_current_state() {
  setup_tracing();
  let mut pipeline = Pipeline::<FlowTrace, TestError>::new(&[
    ("first", false, None),
    ("skipped", false, Some(Arc::new(|ctx: ContextData<FlowTrace>| ctx.read().counter > 0))),
    ("last", false, None),
  ]);
  pipeline.on_root("first", recording_handler("first", " 1"));
  pipeline.on_root("skipped", recording_handler("skipped", " X"));
  pipeline.on_root("last", recording_handler("last", " 3"));

  let ctx = ContextData::new(FlowTrace::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["first", "last"]);
}

#[tokio::test]
#[serial]
async fn optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut pipeline = Pipeline::<FlowTrace, TestError>::new(&[("real", false, None), ("maybe", true, None)]);
  pipeline.on_root("real", recording_handler("real", "R"));

  let ctx = ContextData::new(FlowTrace::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["real"]);
}

#[tokio::test]
#[serial]
async fn phases_run_before_on_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<FlowTrace, TestError>::new(&[("step", false, None)]);
  pipeline.after_root("step", recording_handler("after", "3"));
  pipeline.on_root("step", recording_handler("on", "2"));
  pipeline.before_root("step", recording_handler("before", "1"));

  let ctx = ContextData::new(FlowTrace::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().message, "123");
}

#[tokio::test]
#[serial]
async fn step_editing_keeps_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<FlowTrace, TestError>::new(&[("a", false, None), ("c", false, None)]);
  pipeline.insert_before_step("c", "b", false, None).unwrap();
  pipeline.insert_after_step("c", "d", true, None).unwrap();
  assert_eq!(pipeline.step_names(), vec!["a", "b", "c", "d"]);

  pipeline.on_root("a", recording_handler("a", "a"));
  pipeline.on_root("b", recording_handler("b", "b"));
  pipeline.on_root("c", recording_handler("c", "c"));
  pipeline.remove_step("b");
  pipeline.remove_step("not-there");
  assert_eq!(pipeline.step_names(), vec!["a", "c", "d"]);

  let ctx = ContextData::new(FlowTrace::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().message, "ac");
}

#[tokio::test]
#[serial]
async fn optional_and_skip_flags_can_be_changed_after_construction() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<FlowTrace, TestError>::new(&[("a", false, None), ("unwired", false, None), ("c", false, None)]);
  pipeline.on_root("a", recording_handler("a", "a"));
  pipeline.on_root("c", recording_handler("c", "c"));

  let err = pipeline.run(ContextData::new(FlowTrace::default())).await.unwrap_err();
  assert!(matches!(err, TestError::Pipeline(ref msg) if msg.contains("HandlerMissing")));

  pipeline.set_optional("unwired", true).unwrap();
  let after_first: SkipCondition<FlowTrace> = Arc::new(|ctx: ContextData<FlowTrace>| ctx.read().counter > 0);
  pipeline.set_skip_condition("c", Some(after_first)).unwrap();
  let ctx = ContextData::new(FlowTrace::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["a"]);

  pipeline.set_skip_condition("c", None).unwrap();
  let ctx = ContextData::new(FlowTrace::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().steps_executed, vec!["a", "c"]);
}

#[test]
fn editing_an_unknown_step_reports_step_not_found() {
  let mut pipeline = Pipeline::<FlowTrace, TestError>::new(&[("a", false, None)]);

  let err = pipeline.insert_after_step("missing", "b", false, None).unwrap_err();
  assert!(matches!(err, PipelineError::StepNotFound { ref step_name } if step_name == "missing"));
  assert!(matches!(pipeline.set_optional("missing", true), Err(PipelineError::StepNotFound { .. })));
  assert!(matches!(pipeline.set_skip_condition("missing", None), Err(PipelineError::StepNotFound { .. })));

  let err = pipeline.insert_before_step("a", "a", false, None).unwrap_err();
  assert!(matches!(err, PipelineError::DuplicateStep { ref step_name } if step_name == "a"));
  assert_eq!(pipeline.step_names(), vec!["a"]);
}

#[test]
#[should_panic(expected = "is not defined")]
fn registering_on_unknown_step_panics() {
  let mut pipeline = Pipeline::<FlowTrace, TestError>::new(&[("a", false, None)]);
  pipeline.on_root("typo", recording_handler("typo", ""));
}

#[test]
#[should_panic(expected = "already defined")]
fn duplicate_step_names_panic() {
  let _ = Pipeline::<FlowTrace, TestError>::new(&[("a", false, None), ("a", true, None)]);
}
