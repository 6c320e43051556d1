//! Result type alias for classroll

use super::errors::ClassrollError;

/// Result type alias for classroll operations
///
/// # Examples
///
/// ```
/// use classroll::domain::result::Result;
/// use classroll::domain::errors::ClassrollError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ClassrollError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ClassrollError>;
