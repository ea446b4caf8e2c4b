//! Action invocation errors

/// Errors that can occur when running a row or bulk action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// No action with this id is registered.
    #[error("Unknown action '{id}'")]
    UnknownAction { id: String },

    /// The action's enablement predicate rejected the current target.
    #[error("Action '{id}' is disabled")]
    ActionDisabled { id: String },

    /// No row resolves to the requested id.
    #[error("No row with id '{row_id}'")]
    UnknownRow { row_id: String },
}
