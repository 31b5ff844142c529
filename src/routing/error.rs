//! Routing error types.

use thiserror::Error;

/// Per-request resolution failure, delivered to [`Context::set_result`].
///
/// [`Context::set_result`]: crate::routing::Context::set_result
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No method name was addressed and no catch-all exists for the verb.
    #[error("undefined controller: [{verb}] <{parent_path}/{controller}>")]
    UndefinedController {
        verb: String,
        parent_path: String,
        controller: String,
    },

    /// The addressed method does not exist for the verb.
    #[error("undefined controller: [{verb}] <{parent_path}/{controller}.{method}>")]
    UndefinedMethod {
        verb: String,
        parent_path: String,
        controller: String,
        method: String,
    },
}

/// Setup-time registration failure. These indicate a programming mistake and
/// should abort startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The controller type name is empty once the `Controller` suffix is removed.
    #[error("controller type `{type_name}` has no name after stripping the `Controller` suffix")]
    EmptyControllerName { type_name: String },

    /// Another controller already owns this path under the same route.
    #[error("controller path `{path}` is already registered")]
    DuplicateController { path: String },
}
