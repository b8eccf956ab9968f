/// Errors raised before any geometry is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid generation parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("sample count must be at least 1")]
    EmptySampleCount,
}

impl GenerationError {
    pub fn invalid(name: &'static str, value: impl Into<f64>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
        }
    }
}

/// Reject NaN and infinities.
pub fn ensure_finite(name: &'static str, value: f32) -> Result<f32, GenerationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GenerationError::invalid(name, value))
    }
}

/// Reject non-finite, zero and negative values.
pub fn ensure_positive(name: &'static str, value: f32) -> Result<f32, GenerationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GenerationError::invalid(name, value))
    }
}

/// Reject values outside `[0, 1]`.
pub fn ensure_unit(name: &'static str, value: f32) -> Result<f32, GenerationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(GenerationError::invalid(name, value))
    }
}
