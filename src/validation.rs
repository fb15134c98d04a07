use crate::error::{BmiError, Result};

/// Validation of entry-form input before anything reaches the record store
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the person's name
    ///
    /// Only the empty string is rejected; the name is stored exactly as given.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(BmiError::invalid_input("Name cannot be empty"));
        }

        Ok(())
    }

    /// Validate height in centimeters
    pub fn validate_height(height_cm: f64) -> Result<()> {
        Self::validate_positive("Height", height_cm)
    }

    /// Validate weight in kilograms
    pub fn validate_weight(weight_kg: f64) -> Result<()> {
        Self::validate_positive("Weight", weight_kg)
    }

    /// Validate a complete entry-form submission
    pub fn validate_submission(name: &str, height_cm: f64, weight_kg: f64) -> Result<()> {
        Self::validate_name(name)?;
        Self::validate_height(height_cm)?;
        Self::validate_weight(weight_kg)?;
        Ok(())
    }

    fn validate_positive(field: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(BmiError::invalid_input(format!("{field} must be a finite number")));
        }

        if value <= 0.0 {
            return Err(BmiError::invalid_input(format!("{field} must be greater than 0")));
        }

        Ok(())
    }
}
