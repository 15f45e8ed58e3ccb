//! In-memory thread store ordered by recency of activity

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::{Clock, DEFAULT_TIME_FORMAT, SystemClock};
use crate::error::{ChatError, Result};
use crate::models::{Counterpart, CounterpartId, Message, SenderSide, Thread, ThreadId};

/// Authoritative mapping from counterpart to thread
///
/// Threads are kept most-recent-first: a new thread goes to the front, and a
/// thread that receives a message is moved to the front. Threads that are
/// never touched keep their relative creation order behind the active ones.
/// At most one thread exists per counterpart.
#[derive(Debug)]
pub struct ThreadStore {
    /// Recency order, index 0 is the most recent
    threads: Vec<Thread>,
    /// Keys thread identity by counterpart. Slots in `threads` shift on every
    /// promotion, so positions are found by scanning; a store holds one
    /// user's conversations and stays small.
    by_counterpart: HashMap<CounterpartId, ThreadId>,
    clock: Arc<dyn Clock>,
    time_format: String,
}

impl ThreadStore {
    /// Create an empty store stamping messages with the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), DEFAULT_TIME_FORMAT)
    }

    /// Create an empty store with an explicit clock and display-time pattern
    pub fn with_clock(clock: Arc<dyn Clock>, time_format: impl Into<String>) -> Self {
        Self {
            threads: Vec::new(),
            by_counterpart: HashMap::new(),
            clock,
            time_format: time_format.into(),
        }
    }

    fn position(&self, id: &ThreadId) -> Option<usize> {
        self.threads.iter().position(|t| t.id() == id)
    }

    fn position_of_counterpart(&self, counterpart_id: &CounterpartId) -> Option<usize> {
        let thread_id = self.by_counterpart.get(counterpart_id)?;
        self.position(thread_id)
    }

    /// Look up the thread for a counterpart
    pub fn find_by_counterpart(&self, counterpart_id: &CounterpartId) -> Option<&Thread> {
        self.position_of_counterpart(counterpart_id)
            .map(|pos| &self.threads[pos])
    }

    /// Resolve a thread id
    pub fn get(&self, id: &ThreadId) -> Option<&Thread> {
        self.position(id).map(|pos| &self.threads[pos])
    }

    /// Return the counterpart's thread, creating an empty one at the front
    /// if none exists.
    ///
    /// An existing thread is returned unchanged and keeps its position; the
    /// name and avatar passed here are ignored for it.
    pub fn get_or_create(&mut self, counterpart: Counterpart) -> &Thread {
        if let Some(pos) = self.position_of_counterpart(&counterpart.id) {
            return &self.threads[pos];
        }

        let thread = Thread::open(counterpart);
        debug!(
            "Created thread {} for counterpart {}",
            thread.id(),
            thread.counterpart_id()
        );
        self.by_counterpart
            .insert(thread.counterpart_id().clone(), thread.id().clone());
        self.threads.insert(0, thread);
        &self.threads[0]
    }

    /// Append a message to a thread and promote the thread to the front.
    ///
    /// Fails with [`ChatError::EmptyText`] when `text` is blank, before the
    /// thread is looked up, and with [`ChatError::ThreadNotFound`] for an
    /// unknown id. Neither failure changes the store.
    pub fn append_message(
        &mut self,
        thread_id: &ThreadId,
        sender_side: SenderSide,
        text: &str,
    ) -> Result<Message> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyText);
        }
        let pos = self
            .position(thread_id)
            .ok_or_else(|| ChatError::thread_not_found(thread_id))?;

        let message = Message::compose(sender_side, text, self.clock.as_ref(), &self.time_format);
        let mut thread = self.threads.remove(pos);
        thread.push(message.clone());
        self.threads.insert(0, thread);

        debug!(
            "Appended message {} to thread {} (was at position {})",
            message.id(),
            thread_id,
            pos
        );
        Ok(message)
    }

    /// Locate-or-create the counterpart's thread and append to it.
    ///
    /// Blank text is rejected before any thread is created.
    pub fn deliver(
        &mut self,
        counterpart: Counterpart,
        sender_side: SenderSide,
        text: &str,
    ) -> Result<(ThreadId, Message)> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyText);
        }
        let thread_id = self.get_or_create(counterpart).id().clone();
        let message = self.append_message(&thread_id, sender_side, text)?;
        Ok((thread_id, message))
    }

    /// Threads with at least one message, in recency order
    pub fn list_with_activity(&self) -> Vec<&Thread> {
        self.threads.iter().filter(|t| t.has_activity()).collect()
    }

    /// All threads in recency order, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = &Thread> {
        self.threads.iter()
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Drop every thread
    pub fn clear(&mut self) {
        self.threads.clear();
        self.by_counterpart.clear();
    }
}

impl Default for ThreadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn counterpart(id: &str) -> Counterpart {
        Counterpart::new(id, format!("Instructor {}", id), format!("avatar://{}", id))
    }

    fn test_store() -> ThreadStore {
        let clock = FixedClock::at("2024-05-02T14:32:00-03:00").unwrap();
        ThreadStore::with_clock(Arc::new(clock), DEFAULT_TIME_FORMAT)
    }

    fn ids(threads: &[&Thread]) -> Vec<String> {
        threads
            .iter()
            .map(|t| t.counterpart_id().as_str().to_string())
            .collect()
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut store = test_store();
        let first = store.get_or_create(counterpart("a")).id().clone();
        let second = store.get_or_create(counterpart("a")).id().clone();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_or_create_keeps_first_metadata() {
        let mut store = test_store();
        store.get_or_create(Counterpart::new("a", "Ana", "avatar://old"));
        let thread = store.get_or_create(Counterpart::new("a", "Ana Oliveira", "avatar://new"));

        assert_eq!(thread.counterpart_name(), "Ana");
        assert_eq!(thread.counterpart_avatar_ref(), "avatar://old");
    }

    #[test]
    fn test_new_threads_go_to_front() {
        let mut store = test_store();
        store.get_or_create(counterpart("a"));
        store.get_or_create(counterpart("b"));
        store.get_or_create(counterpart("c"));

        let order: Vec<_> = store.iter().map(|t| t.counterpart_id().as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_repeat_contact_does_not_reorder() {
        let mut store = test_store();
        store.get_or_create(counterpart("a"));
        store.get_or_create(counterpart("b"));
        store.get_or_create(counterpart("a"));

        let order: Vec<_> = store.iter().map(|t| t.counterpart_id().as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_append_promotes_thread() {
        let mut store = test_store();
        let a = store.get_or_create(counterpart("a")).id().clone();
        let b = store.get_or_create(counterpart("b")).id().clone();
        store.append_message(&b, SenderSide::SelfSide, "to b").unwrap();
        store.append_message(&a, SenderSide::SelfSide, "to a").unwrap();

        assert_eq!(ids(&store.list_with_activity()), vec!["a", "b"]);
    }

    #[test]
    fn test_lookup_follows_promotions() {
        let mut store = test_store();
        let a = store.get_or_create(counterpart("a")).id().clone();
        let b = store.get_or_create(counterpart("b")).id().clone();
        let c = store.get_or_create(counterpart("c")).id().clone();
        for id in [&a, &c, &b, &a] {
            store.append_message(id, SenderSide::SelfSide, "hi").unwrap();
        }

        for (cp, id) in [("a", &a), ("b", &b), ("c", &c)] {
            let found = store.find_by_counterpart(&CounterpartId::new(cp)).unwrap();
            assert_eq!(found.id(), id);
            assert_eq!(store.get(id).unwrap().counterpart_id().as_str(), cp);
        }
        assert_eq!(ids(&store.list_with_activity()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_untouched_threads_keep_creation_order_at_tail() {
        let mut store = test_store();
        store.get_or_create(counterpart("a"));
        store.get_or_create(counterpart("b"));
        let c = store.get_or_create(counterpart("c")).id().clone();
        store.get_or_create(counterpart("d"));
        store.append_message(&c, SenderSide::SelfSide, "hello").unwrap();

        let order: Vec<_> = store.iter().map(|t| t.counterpart_id().as_str()).collect();
        assert_eq!(order, vec!["c", "d", "b", "a"]);
    }

    #[test]
    fn test_append_updates_last_message() {
        let mut store = test_store();
        let a = store.get_or_create(counterpart("a")).id().clone();
        let msg = store.append_message(&a, SenderSide::Counterpart, "Bom dia").unwrap();

        let thread = store.get(&a).unwrap();
        assert_eq!(thread.last_message_text(), "Bom dia");
        assert_eq!(thread.last_message(), Some(&msg));
        assert_eq!(msg.display_timestamp(), "14:32");
        assert_eq!(msg.sender_side(), SenderSide::Counterpart);
    }

    #[test]
    fn test_append_rejects_blank_text() {
        let mut store = test_store();
        let a = store.get_or_create(counterpart("a")).id().clone();

        assert_eq!(
            store.append_message(&a, SenderSide::SelfSide, ""),
            Err(ChatError::EmptyText)
        );
        assert_eq!(
            store.append_message(&a, SenderSide::SelfSide, " \t\n"),
            Err(ChatError::EmptyText)
        );
        assert!(!store.get(&a).unwrap().has_activity());
    }

    #[test]
    fn test_append_to_unknown_thread() {
        let mut store = test_store();
        let missing = ThreadId::new("chat-nobody-0");
        let err = store
            .append_message(&missing, SenderSide::SelfSide, "hello")
            .unwrap_err();
        assert_eq!(err, ChatError::thread_not_found(&missing));
    }

    #[test]
    fn test_list_with_activity_filters_empty_threads() {
        let mut store = test_store();
        store.get_or_create(counterpart("a"));
        let b = store.get_or_create(counterpart("b")).id().clone();
        assert!(store.list_with_activity().is_empty());

        store.append_message(&b, SenderSide::SelfSide, "hi").unwrap();
        assert_eq!(ids(&store.list_with_activity()), vec!["b"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_deliver_creates_thread_with_message() {
        let mut store = test_store();
        let (thread_id, msg) = store
            .deliver(counterpart("a"), SenderSide::Counterpart, "Olá, tudo bem?")
            .unwrap();

        let thread = store.find_by_counterpart(&CounterpartId::new("a")).unwrap();
        assert_eq!(thread.id(), &thread_id);
        assert_eq!(thread.messages(), &[msg]);
    }

    #[test]
    fn test_deliver_blank_creates_nothing() {
        let mut store = test_store();
        let result = store.deliver(counterpart("a"), SenderSide::Counterpart, "  ");
        assert_eq!(result, Err(ChatError::EmptyText));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = test_store();
        store.get_or_create(counterpart("a"));
        store.clear();

        assert!(store.is_empty());
        assert!(store.find_by_counterpart(&CounterpartId::new("a")).is_none());
    }
}
