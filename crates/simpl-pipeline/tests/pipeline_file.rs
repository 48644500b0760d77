//! Pipeline files: save, load, and rebuild through the core registry.

use simpl_core::{DataArrayPath, NumericType};
use simpl_data::DataContainerArray;
use simpl_filter::ParameterValue;
use simpl_filters::core_registry;
use simpl_pipeline::{ConfigError, FilterEntry, PipelineFile, PipelineRunner};

fn sample_file() -> PipelineFile {
    PipelineFile {
        name: "from-file".into(),
        filters: vec![
            FilterEntry::new("CreateDataContainer").with("DataContainerName", "C"),
            FilterEntry::new("CreateAttributeMatrix")
                .with("CreatedAttributeMatrix", DataArrayPath::for_matrix("C", "M"))
                .with("TupleDimensions", vec![4usize]),
            FilterEntry::new("CreateDataArray")
                .with("NewArray", DataArrayPath::new("C", "M", "X"))
                .with("ScalarType", NumericType::Int16)
                .with("InitializationValue", 3.0),
            FilterEntry::new("ScaleDataArray")
                .with("SelectedArrayPath", DataArrayPath::new("C", "M", "X"))
                .with("ScaleFactor", 2.0),
        ],
    }
}

#[test]
fn save_load_build_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    let file = sample_file();
    file.save(&path).unwrap();

    let loaded = PipelineFile::load(&path).unwrap();
    assert_eq!(loaded, file);

    let registry = core_registry();
    let pipeline = loaded.build(&registry).unwrap();
    assert_eq!(pipeline.len(), 4);
    let rebuilt = PipelineFile::from_pipeline(&pipeline);
    for (entry, original) in rebuilt.filters.iter().zip(&file.filters) {
        assert_eq!(entry.filter, original.filter);
        for (key, value) in &original.parameters {
            assert_eq!(entry.parameters.get(key), Some(value), "{}: {key}", entry.filter);
        }
    }
}

#[test]
fn built_pipeline_runs() {
    let mut pipeline = sample_file().build(&core_registry()).unwrap();
    let mut dca = DataContainerArray::new();
    let report = PipelineRunner::new().run(&mut pipeline, &mut dca).unwrap();
    assert!(report.is_completed());
    let x = dca
        .typed_array::<i16>(&DataArrayPath::new("C", "M", "X"))
        .unwrap();
    assert_eq!(x.as_slice(), &[6; 4]);
}

#[test]
fn disabled_flag_survives_round_trip() {
    let mut file = sample_file();
    file.filters[3].enabled = false;
    let pipeline = PipelineFile::from_json(&file.to_json().unwrap())
        .unwrap()
        .build(&core_registry())
        .unwrap();
    assert!(!pipeline.filters()[3].is_enabled());
    assert!(!PipelineFile::from_pipeline(&pipeline).filters[3].enabled);
}

#[test]
fn wrong_parameter_type_is_rejected() {
    let file = PipelineFile {
        name: "bad".into(),
        filters: vec![FilterEntry::new("ScaleDataArray").with("ScaleFactor", ParameterValue::Bool(true))],
    };
    let err = file.build(&core_registry()).unwrap_err();
    match err {
        ConfigError::InvalidParameter { index, filter, .. } => {
            assert_eq!(index, 0);
            assert_eq!(filter, "ScaleDataArray");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_parameter_key_is_rejected() {
    let file = PipelineFile {
        name: "bad".into(),
        filters: vec![FilterEntry::new("CreateDataContainer").with("Colour", "red")],
    };
    assert!(matches!(
        file.build(&core_registry()),
        Err(ConfigError::InvalidParameter { .. })
    ));
}
