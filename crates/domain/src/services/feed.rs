//! Reconciliation of the public message wall against live change events.
//!
//! The feed is seeded once from a direct query (`approved = true`, newest
//! first) and then kept consistent by applying insert/update/delete
//! notifications in arrival order. Application is a pure in-memory
//! operation with no connection dependency, so the rules are testable
//! without a database.
//!
//! Rules:
//! - INSERT of an approved row: prepend unless the id is already present.
//! - UPDATE to approved: replace in place when present, otherwise prepend
//!   (a moderator just approved a pending message).
//! - UPDATE to unapproved: remove by id (approval revoked).
//! - INSERT/UPDATE without a row (it vanished before the refetch): remove
//!   by id.
//! - DELETE: remove by id regardless of approval state.
//! - Anything else is a no-op; replaying an identical event is a no-op.

use crate::models::message::{ChangeAction, Message, MessageChange};

/// Ordered view of approved messages, newest `created_at` first.
#[derive(Debug, Clone, Default)]
pub struct MessageFeed {
    messages: Vec<Message>,
}

impl MessageFeed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the feed from a snapshot query.
    ///
    /// Rows are re-sorted newest-first so the feed does not depend on the
    /// caller's query ordering; unapproved rows in the snapshot are dropped.
    pub fn seed(rows: Vec<Message>) -> Self {
        let mut messages: Vec<Message> = rows.into_iter().filter(|m| m.approved).collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { messages }
    }

    /// The current visible feed.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Applies one change event. Events must be applied in arrival order.
    pub fn apply(&mut self, change: &MessageChange) {
        match change.action {
            ChangeAction::Insert => match &change.message {
                Some(new) if new.approved => {
                    if !self.contains(new.id) {
                        self.messages.insert(0, new.clone());
                    }
                }
                Some(_) => {}
                // The row was deleted before it could be refetched.
                None => self.remove(change.id),
            },
            ChangeAction::Update => match &change.message {
                Some(new) if new.approved => match self.position(new.id) {
                    Some(index) => self.messages[index] = new.clone(),
                    None => self.messages.insert(0, new.clone()),
                },
                Some(new) => self.remove(new.id),
                None => self.remove(change.id),
            },
            ChangeAction::Delete => self.remove(change.id),
            ChangeAction::Unknown => {}
        }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    fn contains(&self, id: i64) -> bool {
        self.position(id).is_some()
    }

    fn remove(&mut self, id: i64) {
        if let Some(index) = self.position(id) {
            self.messages.remove(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn message(id: i64, approved: bool) -> Message {
        Message {
            id,
            author_name: Name().fake(),
            message: format!("message {}", id),
            approved,
            // Spread creation times so ordering is observable.
            created_at: Utc::now() + Duration::seconds(id),
        }
    }

    fn named(id: i64, author: &str, body: &str, approved: bool) -> Message {
        Message {
            id,
            author_name: author.to_string(),
            message: body.to_string(),
            approved,
            created_at: Utc::now() + Duration::seconds(id),
        }
    }

    fn ids(feed: &MessageFeed) -> Vec<i64> {
        feed.messages().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_seed_drops_unapproved_and_sorts_newest_first() {
        let feed = MessageFeed::seed(vec![message(1, true), message(3, false), message(2, true)]);
        assert_eq!(ids(&feed), vec![2, 1]);
    }

    #[test]
    fn test_insert_approved_prepends() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        feed.apply(&MessageChange::insert(message(2, true)));
        assert_eq!(ids(&feed), vec![2, 1]);
    }

    #[test]
    fn test_insert_unapproved_is_invisible() {
        let mut feed = MessageFeed::new();
        feed.apply(&MessageChange::insert(message(1, false)));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_insert_duplicate_id_is_a_no_op() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        feed.apply(&MessageChange::insert(message(1, true)));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_update_approved_replaces_in_place() {
        let mut feed = MessageFeed::seed(vec![message(2, true), message(1, true)]);
        let mut edited = message(1, true);
        edited.message = "edited".to_string();
        feed.apply(&MessageChange::update(edited));

        assert_eq!(ids(&feed), vec![2, 1]);
        assert_eq!(feed.messages()[1].message, "edited");
    }

    #[test]
    fn test_update_approving_pending_message_prepends() {
        // A moderator approves a message that was never in the feed.
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        feed.apply(&MessageChange::update(message(5, true)));
        assert_eq!(ids(&feed), vec![5, 1]);
    }

    #[test]
    fn test_update_revoking_approval_removes() {
        let mut feed = MessageFeed::seed(vec![message(2, true), message(1, true)]);
        feed.apply(&MessageChange::update(message(2, false)));
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn test_update_unapproved_absent_id_is_a_no_op() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        feed.apply(&MessageChange::update(message(9, false)));
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn test_update_of_vanished_row_removes() {
        // The row was deleted between the notification and the refetch.
        let mut feed = MessageFeed::seed(vec![message(2, true), message(1, true)]);
        feed.apply(&MessageChange::vanished(ChangeAction::Update, 2));
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn test_delete_removes() {
        let mut feed = MessageFeed::seed(vec![message(2, true), message(1, true)]);
        feed.apply(&MessageChange::delete(2));
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn test_delete_absent_id_is_a_no_op() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        feed.apply(&MessageChange::delete(42));
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        feed.apply(&MessageChange {
            action: ChangeAction::Unknown,
            id: 2,
            message: Some(message(2, true)),
        });
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn test_replaying_an_identical_update_is_idempotent() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        let change = MessageChange::update(message(2, true));

        feed.apply(&change);
        let after_first = ids(&feed);
        feed.apply(&change);

        assert_eq!(ids(&feed), after_first);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn test_replaying_a_delete_is_idempotent() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);
        let change = MessageChange::delete(1);

        feed.apply(&change);
        feed.apply(&change);

        assert!(feed.is_empty());
    }

    #[test]
    fn test_approval_toggle_round_trips_visibility() {
        let mut feed = MessageFeed::seed(vec![message(1, true)]);

        feed.apply(&MessageChange::update(message(1, false)));
        assert!(feed.is_empty());

        feed.apply(&MessageChange::update(message(1, true)));
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn test_feed_contains_exactly_latest_approved_ids() {
        // Arbitrary event sequence; the final list must equal the set of ids
        // whose latest known state is approved with no later delete.
        let mut feed = MessageFeed::new();

        feed.apply(&MessageChange::insert(message(1, true)));
        feed.apply(&MessageChange::insert(message(2, false)));
        feed.apply(&MessageChange::update(message(2, true)));
        feed.apply(&MessageChange::insert(message(3, true)));
        feed.apply(&MessageChange::update(message(1, false)));
        feed.apply(&MessageChange::delete(3));

        assert_eq!(ids(&feed), vec![2]);
    }

    #[test]
    fn test_pending_submission_then_moderation_scenario() {
        // End-to-end: a submission is invisible until approved, then heads
        // the feed.
        let mut feed = MessageFeed::seed(vec![named(1, "Lia", "bem-vindo!", true)]);

        let pending = named(2, "Ana", "Parabéns!", false);
        feed.apply(&MessageChange::insert(pending));
        assert_eq!(feed.len(), 1, "unapproved submission must not be visible");

        let approved = named(2, "Ana", "Parabéns!", true);
        feed.apply(&MessageChange::update(approved));

        assert_eq!(ids(&feed), vec![2, 1]);
        assert_eq!(feed.messages()[0].author_name, "Ana");
        assert_eq!(feed.messages()[0].message, "Parabéns!");
    }
}
