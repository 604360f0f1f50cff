//! Email dispatch collaborator.
//!
//! Services hand fully built messages to a `Mailer`; transport details stay
//! behind the trait so tests can swap in the in-memory implementation.

pub mod smtp;
pub mod templates;

pub use smtp::SmtpMailer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as TokioMutex;

use crate::error::Result;

/// outgoing message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Message delivery interface
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand the message to the underlying transport
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// In-memory mailer recording every message instead of delivering it
pub struct MemoryMailer {
    sent: TokioMutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self {
            sent: TokioMutex::new(Vec::new()),
        }
    }

    /// Snapshot of all recorded messages
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

impl Default for MemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let mut sent = self.sent.lock().await;
        sent.push(message);
        Ok(())
    }
}
