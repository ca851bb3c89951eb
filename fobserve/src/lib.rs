//! Observability hooks for the tool runtime.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fobserve::{FanoutToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
//! use ftooling::{DefaultToolRuntime, ToolRegistry};
//!
//! let hooks = FanoutToolHooks::new()
//!     .with(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)))
//!     .with(Arc::new(SafeToolHooks::new(MetricsObservabilityHooks)));
//! let _runtime = DefaultToolRuntime::new(Arc::new(ToolRegistry::new())).with_hooks(Arc::new(hooks));
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutToolHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeToolHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        FanoutToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks,
    };
}
