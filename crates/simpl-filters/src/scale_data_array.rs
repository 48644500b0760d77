//! Multiply every value of an array by a constant.

use simpl_core::{DataArrayPath, Element, FilterError, NumericType, ParameterError};
use simpl_data::{ArrayElement, ArrayRef};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

use crate::stored_handle;

/// Values processed between cancellation checks.
const CHUNK: usize = 1 << 16;

/// `ScaleFactor` is not finite.
pub const NON_FINITE_FACTOR: i32 = -11030;
/// The selected array holds booleans.
pub const BOOL_ARRAY: i32 = -11031;

/// Multiplies `SelectedArrayPath` in place by `ScaleFactor`.
///
/// Integer arrays scaled by a whole factor are multiplied exactly in
/// integer arithmetic; other factors go through `f64`. Integer results
/// saturate. The array is processed in chunks; between
/// chunks the filter reports progress and stops if cancellation was
/// requested, leaving the remaining values unscaled.
#[derive(Clone, Debug)]
pub struct ScaleDataArray {
    path: DataArrayPath,
    factor: f64,
    handle: Option<ArrayRef>,
}

impl ScaleDataArray {
    /// Registry name.
    pub const NAME: &'static str = "ScaleDataArray";

    /// Scale `path` by `factor`.
    pub fn new(path: DataArrayPath, factor: f64) -> Self {
        Self {
            path,
            factor,
            handle: None,
        }
    }
}

impl Default for ScaleDataArray {
    fn default() -> Self {
        Self::new(DataArrayPath::default(), 1.0)
    }
}

/// Element-wise multiplication by a finite factor.
trait Scale: ArrayElement {
    fn scaled(self, factor: f64) -> Self;
}

macro_rules! impl_scale_int {
    ($($ty:ty),*) => {
        $(
            impl Scale for $ty {
                fn scaled(self, factor: f64) -> Self {
                    if factor.fract() != 0.0 {
                        return Self::from_f64(self.to_f64() * factor);
                    }
                    // `as` saturates factors beyond the i128 range.
                    let product = i128::from(self).saturating_mul(factor as i128);
                    <$ty>::try_from(product).unwrap_or(if product < 0 {
                        <$ty>::MIN
                    } else {
                        <$ty>::MAX
                    })
                }
            }
        )*
    };
}

impl_scale_int!(i8, u8, i16, u16, i32, u32, i64, u64);

impl Scale for f32 {
    fn scaled(self, factor: f64) -> Self {
        Self::from_f64(self.to_f64() * factor)
    }
}

impl Scale for f64 {
    fn scaled(self, factor: f64) -> Self {
        self * factor
    }
}

fn scale<T: Scale>(
    ctx: &mut FilterContext<'_>,
    handle: &ArrayRef,
    factor: f64,
) -> Result<ExecuteOutcome, FilterError> {
    let total = ctx.resolve::<T>(handle)?.element_count();
    let mut done = 0;
    while done < total {
        if ctx.is_cancelled() {
            return Ok(ExecuteOutcome::Cancelled);
        }
        let end = total.min(done + CHUNK);
        let array = ctx.resolve_mut::<T>(handle)?;
        for v in &mut array.as_mut_slice()[done..end] {
            *v = v.scaled(factor);
        }
        done = end;
        ctx.notify_progress(done, total);
    }
    Ok(ExecuteOutcome::Completed)
}

impl Filter for ScaleDataArray {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Scale Data Array"
    }

    fn group(&self) -> &str {
        "Processing"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("SelectedArrayPath", "Array to Scale"),
            ParameterSpec::new("ScaleFactor", "Scale Factor", ParameterKind::Float),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "SelectedArrayPath" => Some(self.path.clone().into()),
            "ScaleFactor" => Some(self.factor.into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "SelectedArrayPath" => self.path = value.extract(key)?,
            "ScaleFactor" => self.factor = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        if !self.factor.is_finite() {
            return Err(FilterError::configuration(
                NON_FINITE_FACTOR,
                format!("scale factor {} is not finite", self.factor),
            ));
        }
        self.path.require_depth(3)?;
        let handle = ctx.prereq_any_array(&self.path)?;
        if ctx.dca().resolve_any(&handle)?.numeric_type() == NumericType::Bool {
            return Err(FilterError::type_mismatch(
                BOOL_ARRAY,
                format!("cannot scale boolean array '{}'", self.path),
            ));
        }
        self.handle = Some(handle);
        Ok(())
    }

    fn execute(&mut self, ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        let handle = stored_handle(&self.handle, Self::NAME)?.clone();
        let numeric_type = ctx.dca().resolve_any(&handle)?.numeric_type();
        ctx.notify_status(format!("scaling '{}' by {}", self.path, self.factor));
        match numeric_type {
            NumericType::Int8 => scale::<i8>(ctx, &handle, self.factor),
            NumericType::UInt8 => scale::<u8>(ctx, &handle, self.factor),
            NumericType::Int16 => scale::<i16>(ctx, &handle, self.factor),
            NumericType::UInt16 => scale::<u16>(ctx, &handle, self.factor),
            NumericType::Int32 => scale::<i32>(ctx, &handle, self.factor),
            NumericType::UInt32 => scale::<u32>(ctx, &handle, self.factor),
            NumericType::Int64 => scale::<i64>(ctx, &handle, self.factor),
            NumericType::UInt64 => scale::<u64>(ctx, &handle, self.factor),
            NumericType::Float32 => scale::<f32>(ctx, &handle, self.factor),
            NumericType::Float64 => scale::<f64>(ctx, &handle, self.factor),
            NumericType::Bool => Err(FilterError::type_mismatch(
                BOOL_ARRAY,
                format!("cannot scale boolean array '{}'", self.path),
            )),
        }
    }
}
