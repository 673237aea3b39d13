// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reminder emails.
//!
//! Delivery is fire-and-forget: transport failures are logged here and never
//! reach the code that triggered the reminder.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// What a reminder is about.
#[derive(Debug, Clone, PartialEq)]
pub enum Reminder {
    Habit { name: String },
    Event { name: String, date: DateTime<Utc> },
}

impl Reminder {
    /// Subject line and plaintext body.
    pub fn compose(&self) -> (String, String) {
        match self {
            Reminder::Habit { name } => (
                format!("Reminder: {} is due soon!", name),
                format!(
                    "Hi,\n\nThis is a reminder that your habit '{}' is due in 10 minutes.\n\nBest regards,\nLifeHub.",
                    name
                ),
            ),
            Reminder::Event { name, date } => (
                format!("Reminder: Upcoming Event - {}", name),
                format!(
                    "Hi there,\n\nThis is a reminder for your upcoming event:\n\nEvent: {}\nDate: {}\n\nBest regards, LifeHub.",
                    name,
                    date.format("%Y-%m-%d %H:%M")
                ),
            ),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Reminder::Habit { name } | Reminder::Event { name, .. } => name,
        }
    }
}

/// Sends one reminder to one recipient. Never fails from the caller's view.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, reminder: &Reminder, recipient: &str);
}

/// Transport-level failure, kept inside this module.
#[derive(Debug, thiserror::Error)]
enum TransportError {
    #[error("invalid address {0}: {1}")]
    Address(String, lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP notifier over an implicit-TLS relay.
pub struct SmtpNotifier {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Option<String>,
}

impl SmtpNotifier {
    /// Build from config. Without a credential pair, sends are skipped.
    pub fn from_config(smtp: &SmtpConfig) -> Self {
        let (Some(sender), Some(password)) = (&smtp.sender_email, &smtp.sender_password) else {
            tracing::warn!("SENDER_EMAIL/SENDER_PASSWORD not set, reminder emails disabled");
            return Self::disabled();
        };

        match AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host) {
            Ok(builder) => {
                let transport = builder
                    .port(smtp.port)
                    .credentials(Credentials::new(sender.clone(), password.clone()))
                    .build();
                tracing::info!(host = %smtp.host, port = smtp.port, "SMTP notifier configured");
                Self {
                    transport: Some(transport),
                    sender: Some(sender.clone()),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, host = %smtp.host, "Invalid SMTP relay, reminder emails disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            transport: None,
            sender: None,
        }
    }

    async fn deliver(
        &self,
        transport: &AsyncSmtpTransport<Tokio1Executor>,
        sender: &str,
        reminder: &Reminder,
        recipient: &str,
    ) -> Result<(), TransportError> {
        let from: Mailbox = sender
            .parse()
            .map_err(|e| TransportError::Address(sender.to_string(), e))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| TransportError::Address(recipient.to_string(), e))?;
        let (subject, body) = reminder.compose();

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        transport.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, reminder: &Reminder, recipient: &str) {
        let (Some(transport), Some(sender)) = (&self.transport, &self.sender) else {
            tracing::debug!(reminder = reminder.name(), recipient, "Mail disabled, reminder skipped");
            return;
        };

        match self.deliver(transport, sender, reminder, recipient).await {
            Ok(()) => tracing::info!(reminder = reminder.name(), recipient, "Reminder sent"),
            Err(e) => tracing::error!(
                error = %e,
                reminder = reminder.name(),
                recipient,
                "Error sending reminder"
            ),
        }
    }
}
