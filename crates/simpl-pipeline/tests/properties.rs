//! Property tests for the runner.

use proptest::prelude::*;
use simpl_core::DataArrayPath;
use simpl_filters::{CopyDataArray, ResizeAttributeMatrix, ScaleDataArray};
use simpl_pipeline::{Pipeline, PipelineRunner};
use simpl_test_utils::sample_dca;

proptest! {
    #[test]
    fn preflight_never_touches_input(tuples in 0usize..64, resize in 1usize..64) {
        let input = sample_dca(tuples);
        let snapshot = input.clone();
        let mut pipeline = Pipeline::new("p")
            .with(CopyDataArray::new(DataArrayPath::new("C", "M", "X"), "Y"))
            .with(ResizeAttributeMatrix::new(DataArrayPath::for_matrix("C", "M"), &[resize]))
            .with(ScaleDataArray::new(DataArrayPath::new("C", "M", "Y"), 3.0));
        let schema = PipelineRunner::new().preflight(&mut pipeline, &input).unwrap();
        prop_assert_eq!(&input, &snapshot);
        prop_assert_eq!(schema.memory_bytes(), 0);
        let m = schema.attribute_matrix(&DataArrayPath::for_matrix("C", "M")).unwrap();
        prop_assert_eq!(m.tuples(), resize);
    }

    #[test]
    fn run_keeps_every_array_sized_to_its_matrix(tuples in 1usize..64, resize in 0usize..64) {
        let mut dca = sample_dca(tuples);
        let mut pipeline = Pipeline::new("p")
            .with(CopyDataArray::new(DataArrayPath::new("C", "M", "X"), "Y"))
            .with(ResizeAttributeMatrix::new(DataArrayPath::for_matrix("C", "M"), &[resize]));
        PipelineRunner::new().run(&mut pipeline, &mut dca).unwrap();
        prop_assert!(dca.validate().is_ok());
        let y = dca.typed_array::<f32>(&DataArrayPath::new("C", "M", "Y")).unwrap();
        prop_assert_eq!(y.tuples(), resize);
        for (i, v) in y.as_slice().iter().enumerate() {
            let expected = if i < tuples { i as f32 } else { 0.0 };
            prop_assert_eq!(*v, expected);
        }
    }
}
