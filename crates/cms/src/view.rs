// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{CmsError, Result};

/// What a detail or list view renders after its load attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loaded(T),
    NotFound,
    /// User-facing error message.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            ViewState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T>> for ViewState<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => ViewState::Loaded(value),
            Err(CmsError::NotFound { .. }) => ViewState::NotFound,
            Err(err) => ViewState::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        assert_eq!(ViewState::from(Ok::<_, CmsError>(3)), ViewState::Loaded(3));
        assert_eq!(
            ViewState::<u8>::from(Err(CmsError::not_found("product", "ego"))),
            ViewState::NotFound
        );
        let failed = ViewState::<u8>::from(Err(CmsError::fetch(502, "http://cms/api/x", "bad gateway")));
        assert_eq!(
            failed,
            ViewState::Failed("CMS request failed with HTTP 502 on http://cms/api/x -> bad gateway".to_string())
        );
        assert_eq!(ViewState::Loaded("x").loaded(), Some("x"));
    }
}
