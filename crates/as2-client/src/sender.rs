//! End-to-end AS2 send: validate, package, build headers, post.

use as2_core::MessageId;
use as2_crypto::CmsBackend;

use crate::error::As2Error;
use crate::transaction::Transaction;
use crate::transport::{StatusCode, Transport};

/// Outcome of a successful send.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: MessageId,
    pub status: StatusCode,
    pub content_type: String,
    pub body_len: usize,
    pub signed: bool,
    pub encrypted: bool,
}

/// Sends transactions through a CMS backend and an HTTP transport.
///
/// Holds no per-transaction state, so a single sender can be shared
/// across threads.
#[derive(Debug)]
pub struct As2Sender<C, T> {
    crypto: C,
    transport: T,
}

impl<C: CmsBackend, T: Transport> As2Sender<C, T> {
    pub fn new(crypto: C, transport: T) -> Self {
        Self { crypto, transport }
    }

    pub fn crypto(&self) -> &C {
        &self.crypto
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one transaction. One attempt; any failure is returned as-is.
    pub fn send(&self, transaction: &Transaction) -> Result<SendReceipt, As2Error> {
        let prepared = transaction.prepare(&self.crypto)?;

        tracing::info!(
            message_id = %prepared.message_id,
            from = %transaction.from,
            to = %transaction.to,
            filename = %transaction.filename,
            signed = prepared.signed,
            encrypted = prepared.encrypted,
            "sending AS2 message"
        );
        tracing::debug!(
            content_type = %prepared.content_type,
            body_len = prepared.body.len(),
            "AS2 envelope"
        );

        let status = self
            .transport
            .post(&transaction.url, &prepared.headers, &prepared.body)?;

        tracing::info!(message_id = %prepared.message_id, status = status.as_u16(), "AS2 message accepted");

        Ok(SendReceipt {
            body_len: prepared.body.len(),
            message_id: prepared.message_id,
            status,
            content_type: prepared.content_type,
            signed: prepared.signed,
            encrypted: prepared.encrypted,
        })
    }
}
