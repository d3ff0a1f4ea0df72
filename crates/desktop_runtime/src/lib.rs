//! Desktop window manager runtime: state model, reducer, app sessions, and the Leptos shell.

pub mod app_runtime;
pub mod apps;
pub mod components;
pub mod host;
pub mod model;
pub mod reducer;
pub mod runtime_context;
pub mod window_manager;

pub use components::{DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use host::DesktopHostContext;
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerEnv, ReducerError, RuntimeEffect};
