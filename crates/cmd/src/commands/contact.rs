// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Args;
use cms::{ContactConfig, ContactMessage};
use std::io::Write;

#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    /// Sender's full name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// Kind of project; also used as the subject
    #[arg(long)]
    pub project_type: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub message: String,
}

impl ContactArgs {
    pub fn message(&self) -> ContactMessage {
        ContactMessage {
            full_name: self.name.clone(),
            email: self.email.clone(),
            project_type: self.project_type.clone(),
            phone: self.phone.clone(),
            message: self.message.clone(),
        }
    }
}

/// Check mail configuration, then print the template payload that would be
/// sent.
pub fn contact_command(config: &ContactConfig, args: &ContactArgs, out: &mut impl Write) -> Result<()> {
    config
        .check()
        .with_context(|| "Contact form is disabled")?;
    diagnostics::debug!(
        "Mail service {service} template {template} key {key}",
        service: config.service_id.as_deref().unwrap_or_default(),
        template: config.template_id.as_deref().unwrap_or_default(),
        key: config.masked_public_key()
    );

    let message = args.message();
    message.check().with_context(|| "Contact message is incomplete")?;
    let params = message.template_params();
    let json = serde_json::to_string_pretty(&params).with_context(|| "Failed to encode template parameters")?;
    writeln!(out, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ContactArgs {
        ContactArgs {
            name: "Jeanne".to_string(),
            email: "jeanne@example.com".to_string(),
            project_type: "Entretien".to_string(),
            phone: "0600000000".to_string(),
            message: "Bonjour".to_string(),
        }
    }

    #[test]
    fn test_disabled_without_configuration() {
        let config = ContactConfig {
            public_key: Some("pk".to_string()),
            ..Default::default()
        };
        let err = contact_command(&config, &args(), &mut Vec::new()).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "Contact form is disabled: Missing configuration: EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID"
        );
    }

    #[test]
    fn test_prints_payload() {
        let config = ContactConfig {
            public_key: Some("pk_123456".to_string()),
            service_id: Some("svc".to_string()),
            template_id: Some("tpl".to_string()),
        };
        let mut out = Vec::new();
        contact_command(&config, &args(), &mut out).unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(payload["from_name"], "Jeanne");
        assert_eq!(payload["subject"], "Entretien");
        assert_eq!(payload["phone"], "0600000000");
    }

    #[test]
    fn test_blank_fields_rejected_before_payload() {
        let config = ContactConfig {
            public_key: Some("pk_123456".to_string()),
            service_id: Some("svc".to_string()),
            template_id: Some("tpl".to_string()),
        };
        let blank = ContactArgs {
            name: "  ".to_string(),
            message: String::new(),
            ..args()
        };
        let mut out = Vec::new();
        let err = contact_command(&config, &blank, &mut out).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "Contact message is incomplete: Missing required fields: full_name, message"
        );
        assert!(out.is_empty());
    }
}
