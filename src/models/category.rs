//! Budget category model
//!
//! A category pairs a display name with a monthly budget amount. Categories
//! are created by user action and mutated only through budget updates; they
//! are never deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::money::Money;

/// A spending category with a monthly budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name, unique case-insensitively across the ledger
    pub name: String,

    /// Monthly budget amount (non-negative)
    pub monthly_budget: Money,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, monthly_budget: Money) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            monthly_budget,
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if self.monthly_budget.is_negative() {
            return Err(CategoryValidationError::NegativeBudget);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeBudget,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::NegativeBudget => write!(f, "Monthly budget cannot be negative"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
