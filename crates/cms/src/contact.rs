// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Contact-form configuration check and mail template payload.

use crate::error::{CmsError, Result};
use serde::Serialize;

pub const PUBLIC_KEY_ENV: &str = "EMAILJS_PUBLIC_KEY";
pub const SERVICE_ID_ENV: &str = "EMAILJS_SERVICE_ID";
pub const TEMPLATE_ID_ENV: &str = "EMAILJS_TEMPLATE_ID";

pub const DEFAULT_SUBJECT: &str = "Nouveau message depuis le site";

/// Mail-delivery credentials. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactConfig {
    pub public_key: Option<String>,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ContactConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            public_key: non_blank(lookup(PUBLIC_KEY_ENV)),
            service_id: non_blank(lookup(SERVICE_ID_ENV)),
            template_id: non_blank(lookup(TEMPLATE_ID_ENV)),
        }
    }

    /// Fails with every missing variable name before any send is tried.
    pub fn check(&self) -> Result<()> {
        let missing: Vec<String> = [
            (PUBLIC_KEY_ENV, &self.public_key),
            (SERVICE_ID_ENV, &self.service_id),
            (TEMPLATE_ID_ENV, &self.template_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CmsError::ConfigurationMissing(missing))
        }
    }

    /// Public key shortened for logs: `abc…xyz`.
    pub fn masked_public_key(&self) -> String {
        match &self.public_key {
            None => "(none)".to_string(),
            Some(key) if key.chars().count() < 6 => "(short)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                let head: String = chars[..3].iter().collect();
                let tail: String = chars[chars.len() - 3..].iter().collect();
                format!("{}…{}", head, tail)
            }
        }
    }
}

/// What a visitor typed into the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMessage {
    pub full_name: String,
    pub email: String,
    pub project_type: String,
    pub phone: String,
    pub message: String,
}

/// Variables handed to the mail template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub project_type: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Every form field is required; blank ones are listed in form order.
    pub fn check(&self) -> Result<()> {
        let missing: Vec<String> = [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("project_type", &self.project_type),
            ("phone", &self.phone),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CmsError::MissingFields(missing))
        }
    }

    pub fn template_params(&self) -> TemplateParams {
        let project_type = self.project_type.trim().to_string();
        let subject = if project_type.is_empty() {
            DEFAULT_SUBJECT.to_string()
        } else {
            project_type.clone()
        };
        TemplateParams {
            from_name: self.full_name.trim().to_string(),
            from_email: self.email.trim().to_string(),
            project_type,
            phone: self.phone.trim().to_string(),
            subject,
            message: self.message.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_configuration_lists_all_names() {
        let config = ContactConfig::from_lookup(lookup(&[(SERVICE_ID_ENV, "svc"), (TEMPLATE_ID_ENV, "  ")]));
        match config.check() {
            Err(CmsError::ConfigurationMissing(names)) => {
                assert_eq!(names, vec![PUBLIC_KEY_ENV.to_string(), TEMPLATE_ID_ENV.to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_complete_configuration() {
        let config = ContactConfig::from_lookup(lookup(&[
            (PUBLIC_KEY_ENV, "pk_1234567"),
            (SERVICE_ID_ENV, "svc"),
            (TEMPLATE_ID_ENV, "tpl"),
        ]));
        assert!(config.check().is_ok());
        assert_eq!(config.masked_public_key(), "pk_…567");
        assert_eq!(ContactConfig::default().masked_public_key(), "(none)");
    }

    #[test]
    fn test_template_params() {
        let message = ContactMessage {
            full_name: "  Jeanne Martin ".to_string(),
            email: "jeanne@example.com ".to_string(),
            project_type: " ".to_string(),
            phone: "0600000000".to_string(),
            message: "Bonjour\n".to_string(),
        };
        let params = message.template_params();
        assert_eq!(params.from_name, "Jeanne Martin");
        assert_eq!(params.from_email, "jeanne@example.com");
        assert_eq!(params.project_type, "");
        assert_eq!(params.subject, DEFAULT_SUBJECT);
        assert_eq!(params.message, "Bonjour");

        let with_type = ContactMessage {
            project_type: "Installation".to_string(),
            ..message
        };
        let params = with_type.template_params();
        assert_eq!(params.subject, "Installation");
    }

    #[test]
    fn test_blank_fields_are_reported() {
        let message = ContactMessage {
            full_name: "Jeanne".to_string(),
            email: " ".to_string(),
            project_type: "Installation".to_string(),
            phone: String::new(),
            message: "Bonjour".to_string(),
        };
        match message.check() {
            Err(CmsError::MissingFields(names)) => assert_eq!(names, vec!["email", "phone"]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            message.check().unwrap_err().to_string(),
            "Missing required fields: email, phone"
        );

        let complete = ContactMessage {
            email: "jeanne@example.com".to_string(),
            phone: "0600000000".to_string(),
            ..message
        };
        assert!(complete.check().is_ok());
    }
}
