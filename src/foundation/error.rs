/// Convenience result type used across Vine.
pub type VineResult<T> = Result<T, VineError>;

/// Error taxonomy for timeline construction and specification editing.
///
/// Every variant is raised synchronously by the call that violates the contract. Lookups that
/// find nothing are not errors: they return `None` or `false`.
#[derive(thiserror::Error, Debug)]
pub enum VineError {
    /// A numeric argument is outside its permitted range (or not finite).
    #[error("range violation: {0}")]
    Range(String),

    /// Two arguments that exclude each other were both supplied.
    #[error("conflicting arguments: {0}")]
    Conflict(String),

    /// An end time precedes its start time.
    #[error("invalid ordering: {0}")]
    Ordering(String),

    /// A name does not belong to a closed enumeration (transition type, easing, ...).
    #[error("unknown value: {0}")]
    UnknownValue(String),

    /// An audio asset failed validation.
    #[error("asset rejected: {0}")]
    AssetRejected(String),

    /// Specification-level metadata or structure is invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VineError {
    /// Build a [`VineError::Range`] value.
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Build a [`VineError::Conflict`] value.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Build a [`VineError::Ordering`] value.
    pub fn ordering(msg: impl Into<String>) -> Self {
        Self::Ordering(msg.into())
    }

    /// Build a [`VineError::UnknownValue`] value.
    pub fn unknown_value(msg: impl Into<String>) -> Self {
        Self::UnknownValue(msg.into())
    }

    /// Build a [`VineError::AssetRejected`] value.
    pub fn asset_rejected(msg: impl Into<String>) -> Self {
        Self::AssetRejected(msg.into())
    }

    /// Build a [`VineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Prepend `prefix` to the message, keeping the category.
    pub fn prefixed(self, prefix: impl std::fmt::Display) -> Self {
        match self {
            Self::Range(m) => Self::Range(format!("{prefix}: {m}")),
            Self::Conflict(m) => Self::Conflict(format!("{prefix}: {m}")),
            Self::Ordering(m) => Self::Ordering(format!("{prefix}: {m}")),
            Self::UnknownValue(m) => Self::UnknownValue(format!("{prefix}: {m}")),
            Self::AssetRejected(m) => Self::AssetRejected(format!("{prefix}: {m}")),
            Self::Validation(m) => Self::Validation(format!("{prefix}: {m}")),
            Self::Serde(m) => Self::Serde(format!("{prefix}: {m}")),
            Self::Other(e) => Self::Other(e.context(prefix.to_string())),
        }
    }
}

/// Reject NaN/inf and negative values.
pub(crate) fn ensure_non_negative(value: f64, field: &str) -> VineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(VineError::range(format!(
            "{field} must be finite and >= 0 (got {value})"
        )));
    }
    Ok(())
}

/// Reject values outside the closed interval `[lo, hi]`.
pub(crate) fn ensure_within(value: f64, lo: f64, hi: f64, field: &str) -> VineResult<()> {
    if !value.is_finite() || value < lo || value > hi {
        return Err(VineError::range(format!(
            "{field} must be within [{lo}, {hi}] (got {value})"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_finite(value: f64, field: &str) -> VineResult<()> {
    if !value.is_finite() {
        return Err(VineError::range(format!("{field} must be finite")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
