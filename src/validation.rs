//! Input validation utilities for the service layer.
//!
//! Every validator returns `Error::Validation` with a message naming the
//! offending field, which the HTTP layer reports as `400 Bad Request`.

use rust_decimal::Decimal;

use crate::error::{Error, Result};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;

/// Validates email format using structural checks
///
/// # Examples
/// ```
/// use shopline::validation::validate_email;
///
/// validate_email("user@example.com").unwrap();
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(Error::Validation("Email cannot be empty".to_string()));
    }

    if email.len() > 254 {
        return Err(Error::Validation("Email address is too long (max 254 characters)".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    let [local_part, domain] = parts.as_slice() else {
        return Err(Error::Validation("Invalid email format: must contain exactly one @ symbol".to_string()));
    };

    if local_part.is_empty() {
        return Err(Error::Validation("Invalid email format: local part cannot be empty".to_string()));
    }

    if local_part.len() > 64 {
        return Err(Error::Validation("Invalid email format: local part is too long (max 64 characters)".to_string()));
    }

    if domain.is_empty() {
        return Err(Error::Validation("Invalid email format: domain part cannot be empty".to_string()));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(Error::Validation("Invalid email format: domain must contain a dot between labels".to_string()));
    }

    if email.contains("..") {
        return Err(Error::Validation("Invalid email format: cannot contain consecutive dots".to_string()));
    }

    let invalid_chars = ['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', ' '];
    if let Some(c) = email.chars().find(|c| invalid_chars.contains(c)) {
        return Err(Error::Validation(format!("Invalid email format: cannot contain '{}'", c)));
    }

    Ok(())
}

/// Lowercases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates password length
pub fn validate_password(password: &str) -> Result<()> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(Error::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(Error::Validation(format!(
            "Password is too long (max {} characters)",
            MAX_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

/// Validates a display name and returns it trimmed
pub fn validate_name(name: &str) -> Result<String> {
    let name = validate_required_string(name, "Name")?;

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(Error::Validation("Name cannot contain control characters".to_string()));
    }

    Ok(name)
}

/// Validates a product name and returns it trimmed
pub fn validate_product_name(name: &str) -> Result<String> {
    let name = validate_required_string(name, "Product name")?;

    if name.chars().count() > MAX_PRODUCT_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "Product name must be at most {} characters",
            MAX_PRODUCT_NAME_LENGTH
        )));
    }

    Ok(name)
}

/// Validates that a price is strictly positive with at most two decimal places
pub fn validate_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(Error::Validation("Product price must be greater than zero".to_string()));
    }

    if price.normalize().scale() > 2 {
        return Err(Error::Validation("Product price cannot have more than two decimal places".to_string()));
    }

    Ok(())
}

/// Validates the initial stock of a new product (must be positive)
pub fn validate_initial_stock(stock: i32) -> Result<()> {
    if stock <= 0 {
        return Err(Error::Validation("Product stock must be greater than zero".to_string()));
    }
    Ok(())
}

/// Validates a stock level set directly by an administrator
pub fn validate_stock_level(stock: i32) -> Result<()> {
    if stock < 0 {
        return Err(Error::Validation("Product stock cannot be negative".to_string()));
    }
    Ok(())
}

/// Sanitizes string input by trimming whitespace
pub fn sanitize_string(input: &str) -> String {
    input.trim().to_string()
}

/// Validates that a string is not empty after sanitization
///
/// # Returns
/// * `Ok(String)` with sanitized string
/// * `Err(Error)` if empty after sanitization
pub fn validate_required_string(input: &str, field_name: &str) -> Result<String> {
    let sanitized = sanitize_string(input);

    if sanitized.is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", field_name)));
    }

    Ok(sanitized)
}
