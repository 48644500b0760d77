//! End-to-end runner behaviour: preflight, execute, failure, cancellation.

use simpl_core::{AttributeMatrixType, DataArrayPath, ErrorKind, NumericType};
use simpl_data::DataContainerArray;
use simpl_filter::{FilterState, FinishStatus, PipelineEvent, RunMode};
use simpl_filters::{
    CopyDataArray, CreateAttributeMatrix, CreateDataArray, CreateDataContainer,
    DataContainerReader, RemoveArrays, ResizeAttributeMatrix,
};
use simpl_pipeline::{Pipeline, PipelineError, PipelineRunner, RunStatus};
use simpl_test_utils::{
    sample_dca, CallLog, CancelTrigger, FailingFilter, RecordingFilter, RecordingObserver,
};

fn x() -> DataArrayPath {
    DataArrayPath::new("C", "M", "X")
}

fn y() -> DataArrayPath {
    DataArrayPath::new("C", "M", "Y")
}

/// FilterA creates C/M/X with 100 tuples; FilterB reads X and writes Y.
fn create_then_copy() -> Pipeline {
    Pipeline::new("a-then-b")
        .with(CreateDataContainer::new("C"))
        .with(CreateAttributeMatrix::new(
            DataArrayPath::for_matrix("C", "M"),
            AttributeMatrixType::Generic,
            &[100],
        ))
        .with(CreateDataArray::new(x(), NumericType::Float32).with_init(1.5))
        .with(CopyDataArray::new(x(), "Y"))
}

#[test]
fn preflight_creates_placeholders_and_execute_allocates() {
    let mut pipeline = create_then_copy();
    let mut runner = PipelineRunner::new();

    let schema = runner
        .preflight(&mut pipeline, &DataContainerArray::new())
        .unwrap();
    for path in [x(), y()] {
        let a = schema.array(&path).unwrap();
        assert!(a.is_placeholder(), "{path} should be a placeholder");
        assert_eq!(a.tuples(), 0);
    }
    assert!(pipeline.states().iter().all(|s| *s == FilterState::PreflightOk));

    let mut dca = DataContainerArray::new();
    let report = runner.run(&mut pipeline, &mut dca).unwrap();
    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.executed, 4);
    let out = dca.typed_array::<f32>(&y()).unwrap();
    assert_eq!(out.tuples(), 100);
    assert!(out.as_slice().iter().all(|&v| v == 1.5));
    assert!(pipeline.states().iter().all(|s| *s == FilterState::ExecuteOk));
    assert_eq!(report.metrics.filter_us.len(), 4);
    assert!(report.metrics.memory_bytes >= 2 * 100 * 4);
}

#[test]
fn preflight_is_repeatable_and_leaves_input_alone() {
    let input = sample_dca(10);
    let mut pipeline = Pipeline::new("copy").with(CopyDataArray::new(x(), "Y"));
    let mut runner = PipelineRunner::new();

    let first = runner.preflight(&mut pipeline, &input).unwrap();
    let second = runner.preflight(&mut pipeline, &input).unwrap();
    assert_eq!(first.schema(), second.schema());
    assert_eq!(input, sample_dca(10));
    assert!(input.array(&y()).is_err());
}

#[test]
fn preflight_failure_stops_before_any_execute() {
    let log = CallLog::new();
    let mut pipeline = Pipeline::new("fails")
        .with(RecordingFilter::new("A", &log))
        .with(FailingFilter::new("B", RunMode::Preflight, -42, &log))
        .with(RecordingFilter::new("C", &log));
    let observer = RecordingObserver::new();
    let mut runner = PipelineRunner::new().with_observer(observer.clone());
    let mut dca = DataContainerArray::new();

    let err = runner.run(&mut pipeline, &mut dca).unwrap_err();
    assert!(matches!(err, PipelineError::PreflightFailed { index: 1, .. }));
    assert_eq!(err.code(), -42);
    assert_eq!(log.entries(), vec!["A:preflight", "B:preflight"]);
    assert_eq!(
        pipeline.states(),
        vec![
            FilterState::PreflightOk,
            FilterState::PreflightFailed,
            FilterState::Constructed
        ]
    );
    assert!(observer.events().contains(&PipelineEvent::PreflightDone {
        pipeline: "fails".into(),
        error_code: Some(-42),
    }));
}

#[test]
fn missing_input_file_is_a_configuration_error() {
    let mut pipeline = Pipeline::new("read").with(DataContainerReader::default());
    let mut runner = PipelineRunner::new();
    let err = runner
        .preflight(&mut pipeline, &DataContainerArray::new())
        .unwrap_err();
    assert_eq!(err.error().kind, ErrorKind::Configuration);
    assert_eq!(err.code(), -387);
    assert_eq!(pipeline.states(), vec![FilterState::PreflightFailed]);
}

#[test]
fn execute_failure_keeps_earlier_changes() {
    let log = CallLog::new();
    let mut pipeline = Pipeline::new("partial")
        .with(CreateDataContainer::new("Kept"))
        .with(FailingFilter::new("Boom", RunMode::Execute, -7, &log))
        .with(RecordingFilter::new("Never", &log));
    let mut runner = PipelineRunner::new();
    let mut dca = DataContainerArray::new();

    let err = runner.run(&mut pipeline, &mut dca).unwrap_err();
    assert_eq!(err.index(), 1);
    assert_eq!(err.executed(), 1);
    assert_eq!(
        err.to_string(),
        "stopped at filter 1 (Boom) with code -7: deliberate execute failure"
    );
    assert!(dca.contains_data_container("Kept"));
    assert!(log.for_filter("Never").iter().all(|e| e != "Never:execute"));
    assert_eq!(pipeline.states()[2], FilterState::PreflightOk);
}

#[test]
fn cancel_before_filter_two_of_five_stops_there() {
    let log = CallLog::new();
    let mut runner = PipelineRunner::new();
    let token = runner.cancel_token();
    let mut pipeline = Pipeline::new("cancel")
        .with(RecordingFilter::new("F0", &log))
        .with(CancelTrigger::new("F1", &token, &log))
        .with(RecordingFilter::new("F2", &log))
        .with(RecordingFilter::new("F3", &log))
        .with(RecordingFilter::new("F4", &log));
    let mut dca = DataContainerArray::new();

    let report = runner.run(&mut pipeline, &mut dca).unwrap();
    assert_eq!(
        report.status,
        RunStatus::Cancelled {
            index: 2,
            filter: "F2".into()
        }
    );
    assert_eq!(report.executed, 2);
    assert!(!report.is_completed());
    assert!(!log.entries().contains(&"F2:data_check".to_string()));
    assert!(!log.entries().contains(&"F2:execute".to_string()));
    let states = pipeline.states();
    assert_eq!(states[2], FilterState::Cancelled);
    for s in &states[3..] {
        assert!(!s.is_failed());
        assert_ne!(*s, FilterState::ExecuteOk);
    }
    assert!(token.is_cancelled());
}

#[test]
fn cancelled_structural_filters_leave_data_untouched() {
    let z = DataArrayPath::new("C", "M", "Z");
    let pipelines = [
        Pipeline::new("resize").with(ResizeAttributeMatrix::new(
            DataArrayPath::for_matrix("C", "M"),
            &[5],
        )),
        Pipeline::new("remove").with(RemoveArrays::new(vec![x()])),
        Pipeline::new("create").with(CreateDataArray::new(z.clone(), NumericType::Int32)),
    ];
    for mut pipeline in pipelines {
        let mut runner = PipelineRunner::new();
        runner.cancel_token().cancel();
        let mut dca = sample_dca(10);

        let report = runner.run(&mut pipeline, &mut dca).unwrap();
        assert!(matches!(report.status, RunStatus::Cancelled { index: 0, .. }));
        assert_eq!(report.executed, 0);
        assert_eq!(dca, sample_dca(10), "{} changed the data", pipeline.name());
        assert_eq!(dca.array(&x()).unwrap().tuples(), 10);
        assert!(dca.array(&z).is_err());
        assert_eq!(pipeline.states(), vec![FilterState::Cancelled]);
    }
}

#[test]
fn disabled_filters_are_skipped_in_both_phases() {
    let log = CallLog::new();
    let mut pipeline = Pipeline::new("skip")
        .with(RecordingFilter::new("A", &log))
        .with(FailingFilter::new("Off", RunMode::Preflight, -1, &log))
        .with(RecordingFilter::new("B", &log));
    assert!(pipeline.set_enabled(1, false));
    assert_eq!(pipeline.enabled_count(), 2);

    let mut runner = PipelineRunner::new();
    let report = runner
        .run(&mut pipeline, &mut DataContainerArray::new())
        .unwrap();
    assert_eq!(report.skipped, vec![1]);
    assert_eq!(report.total, 3);
    assert_eq!(report.executed, 2);
    assert!(log.for_filter("Off").is_empty());
    assert_eq!(pipeline.states()[1], FilterState::Constructed);
}

#[test]
fn observer_sees_events_in_order() {
    let log = CallLog::new();
    let mut pipeline = Pipeline::new("events")
        .with(RecordingFilter::new("A", &log))
        .with(RecordingFilter::new("B", &log));
    let observer = RecordingObserver::new();
    let mut runner = PipelineRunner::new().with_observer(observer.clone());
    runner
        .run(&mut pipeline, &mut DataContainerArray::new())
        .unwrap();

    assert_eq!(
        observer.kinds(),
        vec![
            "AboutToPreflight",
            "FilterStarted",
            "FilterFinished",
            "FilterStarted",
            "FilterFinished",
            "PreflightDone",
            "FilterStarted",
            "FilterFinished",
            "FilterStarted",
            "FilterFinished",
            "PipelineFinished",
        ]
    );
    assert_eq!(
        observer.events().last(),
        Some(&PipelineEvent::PipelineFinished {
            pipeline: "events".into(),
            executed: 2,
            status: FinishStatus::Completed,
        })
    );
}

#[test]
fn resize_ten_by_three_to_five_holds_fifteen_values() {
    let mut dca = DataContainerArray::new();
    dca.create_non_prereq_data_container("C").unwrap();
    let m = DataArrayPath::for_matrix("C", "M");
    dca.create_non_prereq_attribute_matrix(&m, AttributeMatrixType::Generic, &[10])
        .unwrap();
    dca.create_array::<f64>(&x(), &[3], 2.0).unwrap();

    let mut pipeline = Pipeline::new("resize").with(ResizeAttributeMatrix::new(m, &[5]));
    PipelineRunner::new().run(&mut pipeline, &mut dca).unwrap();
    let arr = dca.typed_array::<f64>(&x()).unwrap();
    assert_eq!(arr.tuples(), 5);
    assert_eq!(arr.as_slice().len(), 15);
}

#[test]
fn pipeline_editing() {
    let log = CallLog::new();
    let mut pipeline = Pipeline::new("edit");
    assert!(pipeline.is_empty());
    pipeline.push(RecordingFilter::new("A", &log));
    pipeline.push(RecordingFilter::new("C", &log));
    assert!(pipeline.insert(1, RecordingFilter::new("B", &log)));
    assert!(!pipeline.insert(9, RecordingFilter::new("Z", &log)));
    let names: Vec<_> = pipeline.filters().iter().map(|f| f.name().to_string()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(pipeline.remove(0).map(|f| f.name().to_string()), Some("A".into()));
    assert!(pipeline.remove(5).is_none());
    assert_eq!(pipeline.len(), 2);
    assert!(!pipeline.set_enabled(7, false));
}
