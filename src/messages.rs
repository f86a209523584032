use crate::audit::{AuditEvent, AuditTrail};
use crate::collection::{Collection, Draft, Entity, Insert};
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::filter::{FilterSpec, Filterable};
use crate::models::{Message, MessageType, NewMessage};
use crate::seed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "admin_messages";

impl Entity for Message {
    const KIND: &'static str = "Message";
    const INSERT: Insert = Insert::Newest;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for Message {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "subject" => Some(&self.subject),
            "content" => Some(&self.content),
            "from" => Some(&self.from),
            "to" => Some(&self.to),
            "type" => Some(self.kind.as_str()),
            _ => None,
        }
    }

    fn time_field(&self, field: &str) -> Option<DateTime<Utc>> {
        (field == "createdAt").then_some(self.created_at)
    }
}

/// Outgoing message ready to be stored; the sender is the signed-in user.
struct Outgoing {
    from: String,
    message: NewMessage,
}

impl Draft<Message> for Outgoing {
    fn into_entity(self, id: String, now: DateTime<Utc>) -> Message {
        Message {
            id,
            from: self.from,
            to: self.message.to.trim().to_string(),
            subject: self.message.subject.trim().to_string(),
            content: self.message.content,
            // Our own messages start read.
            is_read: true,
            created_at: now,
            kind: self.message.kind,
            order_id: self.message.order_id,
            request_id: self.message.request_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, rename = "type")]
    pub kind: Option<MessageType>,
}

impl MessageQuery {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::search(&["subject", "content", "from"], &self.search).exact(
            "type",
            self.kind.map(|k| k.as_str()).unwrap_or_default(),
        )
    }
}

pub struct MessageBox {
    messages: Collection<Message>,
}

impl MessageBox {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            messages: Collection::open(store, STORAGE_KEY, seed::messages()),
        }
    }

    pub fn list(&self) -> &[Message] {
        self.messages.list()
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn send(&mut self, message: NewMessage, trail: &mut AuditTrail<'_>) -> Result<Message> {
        if message.to.trim().is_empty()
            || message.subject.trim().is_empty()
            || message.content.trim().is_empty()
        {
            return Err(Error::validation("Recipient, subject and content are required"));
        }

        let from = trail.actor().email.clone();
        let sent = self.messages.create(Outgoing { from, message })?;
        trail.record(AuditEvent::new("Sent Message", Message::KIND, &sent.id).with_new(&sent))?;
        Ok(sent)
    }

    /// Answer `id`: goes back to the original sender under `Re: <subject>`
    /// and keeps the order / request references.
    pub fn reply(&mut self, id: &str, content: &str, trail: &mut AuditTrail<'_>) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(Error::validation("Reply content is required"));
        }
        let original = self
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(Message::KIND, id))?;

        let reply = NewMessage {
            to: original.from,
            subject: format!("Re: {}", original.subject),
            content: content.to_string(),
            kind: original.kind,
            order_id: original.order_id,
            request_id: original.request_id,
        };
        let from = trail.actor().email.clone();
        let sent = self.messages.create(Outgoing { from, message: reply })?;
        trail.record(AuditEvent::new("Replied to Message", Message::KIND, id).with_new(&sent))?;
        Ok(sent)
    }

    /// Opening a message marks it read. Already-read messages are not rewritten.
    pub fn mark_read(&mut self, id: &str) -> Result<Message> {
        match self.get(id) {
            Some(message) if message.is_read => Ok(message.clone()),
            Some(_) => self.messages.modify(id, |m| m.is_read = true),
            None => Err(Error::not_found(Message::KIND, id)),
        }
    }

    pub fn remove(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<Message> {
        let removed = self.messages.remove(id)?;
        trail.record(AuditEvent::deleted(Message::KIND, id, &removed))?;
        Ok(removed)
    }

    pub fn unread_count(&self) -> usize {
        self.list().iter().filter(|m| !m.is_read).count()
    }

    pub fn filter(&self, query: &MessageQuery) -> Vec<Message> {
        self.messages.filter(&query.to_spec(), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin, audit_logs, store};

    fn new_message(to: &str, subject: &str, content: &str) -> NewMessage {
        NewMessage {
            to: to.into(),
            subject: subject.into(),
            content: content.into(),
            kind: MessageType::Internal,
            order_id: None,
            request_id: None,
        }
    }

    #[test]
    fn send_prepends_from_the_actor() {
        let mut inbox = MessageBox::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        let sent = inbox
            .send(new_message("james@quicklinkservices.com", "Shift", "Cover Friday"), &mut trail)
            .unwrap();
        assert_eq!(inbox.list()[0], sent);
        assert_eq!(sent.from, "admin@quicklinkservices.com");
        assert!(sent.is_read);
    }

    #[test]
    fn send_requires_all_fields() {
        let mut inbox = MessageBox::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        let err = inbox.send(new_message("", "Hi", "there"), &mut trail).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(inbox.list().len(), 3);
    }

    #[test]
    fn reply_goes_back_to_sender_with_references() {
        let mut inbox = MessageBox::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        let reply = inbox.reply("1", "On its way", &mut trail).unwrap();
        assert_eq!(reply.to, "customer@example.com");
        assert_eq!(reply.subject, "Re: Order Delivery Issue");
        assert_eq!(reply.kind, MessageType::CustomerSupport);
        assert_eq!(reply.order_id.as_deref(), Some("ORD-2025-001"));
        assert_eq!(inbox.list()[0].id, reply.id);
    }

    #[test]
    fn mark_read_lowers_unread_count() {
        let mut inbox = MessageBox::open(store());
        assert_eq!(inbox.unread_count(), 1);
        inbox.mark_read("1").unwrap();
        assert_eq!(inbox.unread_count(), 0);
        assert!(matches!(inbox.mark_read("zzz"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn filter_by_type_and_search() {
        let inbox = MessageBox::open(store());

        let system = inbox.filter(&MessageQuery { kind: Some(MessageType::System), ..Default::default() });
        assert_eq!(system.len(), 1);
        assert_eq!(system[0].subject, "Payment Received");

        let airport = inbox.filter(&MessageQuery { search: "airport".into(), ..Default::default() });
        assert_eq!(airport.len(), 1);
        assert_eq!(airport[0].id, "2");
    }

    #[test]
    fn remove_deletes_and_audits() {
        let mut inbox = MessageBox::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        {
            let mut trail = AuditTrail::new(&actor, &mut logs);
            inbox.remove("2", &mut trail).unwrap();
        }
        assert!(inbox.get("2").is_none());
        assert_eq!(logs.list()[0].action, "Deleted Message");
    }
}
