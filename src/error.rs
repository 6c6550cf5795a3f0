use thiserror::Error;

/// Error types for the need-driven GOAP system.
///
/// Planning failure is not an error on its own: the planner returns `None`
/// and callers decide what to do. `NoPlanFound` is used where an operation
/// has to report that as a `Result`, such as [`Executor::replan`].
///
/// # Examples
///
/// ```
/// use goap_needs::GoapError;
///
/// let error = GoapError::ActionAlreadyInCollection("eat".to_string());
/// assert_eq!(format!("{}", error), "Action already in collection: eat");
/// ```
///
/// [`Executor::replan`]: crate::Executor::replan
#[derive(Error, Debug)]
pub enum GoapError {
    // Plan errors
    /// The planner could not reach the goal within its budget
    #[error("No valid plan found to achieve the goal")]
    NoPlanFound,

    // Action errors
    /// An action with the same type is already registered
    #[error("Action already in collection: {0}")]
    ActionAlreadyInCollection(String),

    /// Action costs must be strictly positive
    #[error("Action cost must be positive")]
    InvalidActionCost,

    // Goal errors
    /// A goal with the same type is already registered
    #[error("Goal already in collection: {0}")]
    GoalAlreadyInCollection(String),

    // State errors
    /// Removing more items than the inventory holds
    #[error("Not enough '{item}' in inventory: requested {requested}, available {available}")]
    InsufficientItems {
        item: String,
        requested: u32,
        available: u32,
    },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // IO errors
    /// A wrapper around standard IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    /// A wrapper around serde_json serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for GOAP operations
pub type Result<T> = std::result::Result<T, GoapError>;
