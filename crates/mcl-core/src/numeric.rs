use crate::CoreError;

/// Pass `v` through if it is finite.
pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Like [`ensure_finite`], additionally rejecting values `<= 0`.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}
