#![forbid(unsafe_code)]

//! Error taxonomy for the binder and the store.
//!
//! Every failure here is either a caller contract violation (an action name
//! that was never registered, a key set that changed across renders) or a
//! propagated reducer failure. The crate performs no local recovery: errors
//! surface at the call site unmodified, and a failed dispatch commits
//! nothing.

use thiserror::Error;

/// Failure raised by a user reducer or by the draft engine.
///
/// Reducers are application code; their failures are opaque to this crate
/// and travel as boxed errors.
pub type ReducerError = Box<dyn std::error::Error + 'static>;

/// Errors from the stable method binder.
#[derive(Debug, Error)]
pub enum BindError {
    /// A bound call named a method that was never registered.
    #[error("unknown method: {name}")]
    UnknownMethod {
        /// The name that failed to resolve.
        name: String,
    },

    /// A rebind supplied a different key set than first construction.
    ///
    /// The key set is fixed when the binder is first built; later renders
    /// must supply the same names.
    #[error("method set changed across renders: expected [{expected}], got [{got}]")]
    KeySetMismatch {
        /// Names fixed at first construction.
        expected: String,
        /// Names supplied by the offending rebind.
        got: String,
    },
}

/// Errors from the reactive state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A dispatch named an action absent from the registered reducer set.
    #[error("unknown action: {name}")]
    UnknownAction {
        /// The name that failed to resolve.
        name: String,
    },

    /// A render supplied a reducer map with a different key set than the
    /// one the store was first built from.
    #[error("action set changed across renders: expected [{expected}], got [{got}]")]
    ActionSetMismatch {
        /// Names fixed at first construction.
        expected: String,
        /// Names supplied by the offending render.
        got: String,
    },

    /// A reducer (or the draft engine) failed while computing the next
    /// state. The pre-dispatch state is left untouched and no re-render
    /// was requested.
    #[error("reducer failed: {0}")]
    Reducer(ReducerError),
}

impl From<BindError> for StoreError {
    fn from(err: BindError) -> Self {
        match err {
            BindError::UnknownMethod { name } => Self::UnknownAction { name },
            BindError::KeySetMismatch { expected, got } => {
                Self::ActionSetMismatch { expected, got }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_display() {
        let err = BindError::UnknownMethod {
            name: "inc".into(),
        };
        assert_eq!(err.to_string(), "unknown method: inc");

        let err = BindError::KeySetMismatch {
            expected: "a, b".into(),
            got: "a".into(),
        };
        assert_eq!(
            err.to_string(),
            "method set changed across renders: expected [a, b], got [a]"
        );
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::UnknownAction {
            name: "reset".into(),
        };
        assert_eq!(err.to_string(), "unknown action: reset");

        let err = StoreError::Reducer("count overflow".into());
        assert_eq!(err.to_string(), "reducer failed: count overflow");
    }

    #[test]
    fn bind_error_maps_to_store_error() {
        let err: StoreError = BindError::UnknownMethod {
            name: "inc".into(),
        }
        .into();
        assert!(matches!(err, StoreError::UnknownAction { name } if name == "inc"));

        let err: StoreError = BindError::KeySetMismatch {
            expected: "a".into(),
            got: "b".into(),
        }
        .into();
        assert!(matches!(err, StoreError::ActionSetMismatch { .. }));
    }
}
