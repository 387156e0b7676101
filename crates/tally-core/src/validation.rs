//! # Validation Module
//!
//! Input validation for pagination values coming from constructors and
//! configuration files.
//!
//! The reducers themselves never validate `page` against the dataset: an
//! out-of-range page is a slicing concern and simply renders an empty page.
//! What IS validated here is the shape of the pagination state itself.
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_rows_per_page, validate_rows_per_page_options};
//!
//! assert_eq!(validate_rows_per_page(25).unwrap().get(), 25);
//! assert!(validate_rows_per_page(0).is_err());
//!
//! assert!(validate_rows_per_page_options(&[5, 10, 25], 10).is_ok());
//! assert!(validate_rows_per_page_options(&[5, 10, 25], 50).is_err());
//! ```

use std::num::NonZeroUsize;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a rows-per-page value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Returns
/// The value as a `NonZeroUsize`, the type `PaginationState` stores.
pub fn validate_rows_per_page(rows_per_page: usize) -> ValidationResult<NonZeroUsize> {
    NonZeroUsize::new(rows_per_page).ok_or_else(|| ValidationError::MustBePositive {
        field: "rowsPerPage".to_string(),
    })
}

/// Validates the options offered by a rows-per-page selector.
///
/// ## Rules
/// - The list must not be empty
/// - Every option must be positive
/// - The default must be one of the options
pub fn validate_rows_per_page_options(
    options: &[usize],
    default_rows_per_page: usize,
) -> ValidationResult<()> {
    if options.is_empty() {
        return Err(ValidationError::Required {
            field: "rowsPerPageOptions".to_string(),
        });
    }

    if options.contains(&0) {
        return Err(ValidationError::MustBePositive {
            field: "rowsPerPageOptions".to_string(),
        });
    }

    if !options.contains(&default_rows_per_page) {
        return Err(ValidationError::NotAllowed {
            field: "defaultRowsPerPage".to_string(),
            allowed: options.iter().map(ToString::to_string).collect(),
        });
    }

    Ok(())
}
