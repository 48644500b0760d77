//! The filter contract for the SIMPL pipeline engine.
//!
//! A [`Filter`] is one pipeline step. It holds its own parameters and runs
//! in two phases against a [`DataContainerArray`](simpl_data::DataContainerArray):
//!
//! - **preflight**: [`Filter::data_check`] in preflight mode checks that
//!   every configured path resolves and creates placeholder outputs.
//! - **execute**: `data_check` again in execute mode (allocating outputs
//!   and re-resolving handles), then [`Filter::execute`].
//!
//! [`FilterInstance`] wraps a boxed filter with its enabled flag, state
//! machine, last error, and warnings. Progress and diagnostics flow out
//! through a [`PipelineObserver`]; cancellation flows in through a
//! [`CancelToken`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod context;
pub mod filter;
pub mod instance;
pub mod observer;
pub mod parameter;
pub mod registry;

pub use cancel::CancelToken;
pub use context::{FilterContext, RunMode};
pub use filter::{ExecuteOutcome, Filter};
pub use instance::{FilterInstance, FilterState, FilterWarning};
pub use observer::{
    channel_observer, ChannelObserver, FinishStatus, NullObserver, PipelineEvent,
    PipelineObserver, TracingObserver,
};
pub use parameter::{
    FromParameter, ParameterCategory, ParameterKind, ParameterSpec, ParameterValue,
};
pub use registry::{FilterConstructor, FilterRegistry, RegistryError};
