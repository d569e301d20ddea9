use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Longest company identifier accepted in a storage key.
pub const COMPANY_ID_MAX_LENGTH: usize = 128;

/// Company identifier used as the partition key for every stored resource.
///
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted so the value can
/// be embedded in `:`-separated storage keys and scan patterns verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CompanyId(String);

impl CompanyId {
    /// Creates a validated company identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "company id must not be empty".to_owned(),
            ));
        }

        if trimmed.len() > COMPANY_ID_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "company id must not exceed {COMPANY_ID_MAX_LENGTH} characters"
            )));
        }

        if let Some(invalid) = trimmed
            .chars()
            .find(|character| !is_allowed_company_id_char(*character))
        {
            return Err(AppError::Validation(format!(
                "company id '{trimmed}' contains invalid character '{invalid}'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for CompanyId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Display for CompanyId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

fn is_allowed_company_id_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_' | '.')
}
