use crate::utils::error::{Result, RunnerError};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(RunnerError::invalid_config(field_name, "path cannot be empty"));
    }

    if path.to_string_lossy().contains('\0') {
        return Err(RunnerError::invalid_config(
            field_name,
            "path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RunnerError::invalid_config(
            field_name,
            "value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Field names are addressed with `a.b` and `a[0]`, so those characters
/// cannot appear inside a single name.
pub fn validate_field_name(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains(['.', '[', ']']) {
        return Err(RunnerError::invalid_config(
            field_name,
            format!("'{}' must not contain '.', '[' or ']'", value),
        ));
    }
    Ok(())
}

pub fn validate_unique_names<'a>(
    field_name: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(RunnerError::invalid_config(
                field_name,
                format!("duplicate name '{}'", name),
            ));
        }
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(RunnerError::invalid_config(
            field_name,
            format!("{} is not a finite number", value),
        ));
    }
    Ok(())
}

pub fn validate_range_bounds(field_name: &str, min: Option<f64>, max: Option<f64>) -> Result<()> {
    if let Some(min) = min {
        validate_finite(&format!("{}.min", field_name), min)?;
    }
    if let Some(max) = max {
        validate_finite(&format!("{}.max", field_name), max)?;
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(RunnerError::invalid_config(
                field_name,
                format!("min {} is greater than max {}", min, max),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", Path::new("data.json")).is_ok());
        assert!(validate_path("input", Path::new("")).is_err());
    }

    #[test]
    fn test_validate_field_name() {
        assert!(validate_field_name("schema.fields", "value").is_ok());
        assert!(validate_field_name("schema.fields", "  ").is_err());
        assert!(validate_field_name("schema.fields", "a.b").is_err());
        assert!(validate_field_name("schema.fields", "a[0]").is_err());
    }

    #[test]
    fn test_validate_unique_names() {
        assert!(validate_unique_names("schema.fields", ["a", "b"]).is_ok());
        let err = validate_unique_names("schema.fields", ["a", "b", "a"]).unwrap_err();
        assert!(err.to_string().contains("duplicate name 'a'"));
    }

    #[test]
    fn test_validate_range_bounds() {
        assert!(validate_range_bounds("value", Some(0.0), Some(10.0)).is_ok());
        assert!(validate_range_bounds("value", None, Some(10.0)).is_ok());
        assert!(validate_range_bounds("value", Some(10.0), Some(0.0)).is_err());
        assert!(validate_range_bounds("value", Some(f64::NAN), None).is_err());
    }
}
