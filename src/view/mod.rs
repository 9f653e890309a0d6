//! Collection view: owns the list-of-users state and the pending draft,
//! and orchestrates fetch-on-mount and refetch-after-create. The view is
//! the sole writer of its own state; the list is only ever replaced
//! wholesale with what the service returned, never merged or edited in
//! place.

use async_trait::async_trait;
use std::str::FromStr;
use tracing::{debug, error};

use crate::client::types::{CreateAck, NewUser, User};
use crate::client::{TransportError, UsersClient};

/// Seam between the view and the transport. Implemented by the real HTTP
/// client and by in-memory stubs in tests.
#[async_trait]
pub trait CollectionClient {
    async fn list(&self) -> Result<Vec<User>, TransportError>;
    async fn create(&self, record: &NewUser) -> Result<CreateAck, TransportError>;
}

#[async_trait]
impl CollectionClient for UsersClient {
    async fn list(&self) -> Result<Vec<User>, TransportError> {
        UsersClient::list(self).await
    }

    async fn create(&self, record: &NewUser) -> Result<CreateAck, TransportError> {
        UsersClient::create(self, record).await
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown draft field: {0}")]
pub struct UnknownField(String);

/// The closed set of draft fields. Operator input is parsed through
/// `FromStr`, so a malformed field name is rejected before it can touch
/// any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    Username,
    Email,
}

impl FromStr for DraftField {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "username" => Ok(Self::Username),
            "email" => Ok(Self::Email),
            _ => Err(UnknownField(name.to_string())),
        }
    }
}

/// View state: the fetched collection plus the operator's draft.
pub struct UsersView<C> {
    client: C,
    users: Vec<User>,
    draft_username: String,
    draft_email: String,
}

impl<C: CollectionClient> UsersView<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            users: Vec::new(),
            draft_username: String::new(),
            draft_email: String::new(),
        }
    }

    /// Attach the view: triggers the initial fetch.
    pub async fn on_mount(&mut self) {
        debug!("mounting users view");

        self.refresh().await;
    }

    /// Update one draft field. Pure local mutation, no side effects.
    pub fn on_field_change(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::Username => self.draft_username = value.to_string(),
            DraftField::Email => self.draft_email = value.to_string(),
        }
    }

    /// Submit the current draft. On success the collection is refetched and
    /// the draft cleared; on failure the error is logged and all state,
    /// draft included, stays put so the operator can retry.
    pub async fn on_submit(&mut self) -> Option<CreateAck> {
        let record = NewUser {
            username: self.draft_username.clone(),
            email: self.draft_email.clone(),
        };

        match self.client.create(&record).await {
            Ok(ack) => {
                self.refresh().await;
                self.draft_username.clear();
                self.draft_email.clear();

                Some(ack)
            }
            Err(err) => {
                error!("create failed: {err}");

                None
            }
        }
    }

    /// Refetch the collection. On success the list is replaced wholesale;
    /// on failure the error is logged and the prior value kept
    /// (stale-but-present, never cleared).
    pub(crate) async fn refresh(&mut self) {
        match self.client.list().await {
            Ok(users) => self.users = users,
            Err(err) => error!("list failed: {err}"),
        }
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn draft(&self) -> (&str, &str) {
        (&self.draft_username, &self.draft_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    /// Counts ERROR-level events emitted while a test subscriber is current.
    #[derive(Clone, Default)]
    struct ErrorCount(Arc<AtomicUsize>);

    impl ErrorCount {
        fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCount {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if event.metadata().level() == &tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    struct StubClient {
        lists: Mutex<VecDeque<Result<Vec<User>, TransportError>>>,
        creates: Mutex<VecDeque<Result<CreateAck, TransportError>>>,
        list_calls: AtomicUsize,
        create_calls: AtomicUsize,
    }

    impl StubClient {
        fn new(
            lists: Vec<Result<Vec<User>, TransportError>>,
            creates: Vec<Result<CreateAck, TransportError>>,
        ) -> Self {
            Self {
                lists: Mutex::new(lists.into()),
                creates: Mutex::new(creates.into()),
                list_calls: AtomicUsize::new(0),
                create_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CollectionClient for &StubClient {
        async fn list(&self) -> Result<Vec<User>, TransportError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.lists
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("no list response scripted")))
        }

        async fn create(&self, _record: &NewUser) -> Result<CreateAck, TransportError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.creates
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("no create response scripted")))
        }
    }

    fn user(username: &str, email: &str) -> User {
        User {
            id: None,
            username: username.to_string(),
            email: email.to_string(),
            active: true,
        }
    }

    fn ack(message: &str) -> CreateAck {
        CreateAck {
            status: "success".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn mount_loads_users_from_service() {
        let stub = StubClient::new(vec![Ok(vec![user("bob", "b@x.com")])], vec![]);
        let mut view = UsersView::new(&stub);

        view.on_mount().await;

        assert_eq!(view.users(), &[user("bob", "b@x.com")]);
        assert_eq!(view.draft(), ("", ""));
        assert_eq!(stub.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn field_changes_update_only_the_draft() {
        let stub = StubClient::new(vec![Ok(vec![user("bob", "b@x.com")])], vec![]);
        let mut view = UsersView::new(&stub);

        view.on_mount().await;
        view.on_field_change(DraftField::Username, "alice");
        view.on_field_change(DraftField::Email, "a@x.com");

        assert_eq!(view.draft(), ("alice", "a@x.com"));
        assert_eq!(view.users(), &[user("bob", "b@x.com")]);
        assert_eq!(stub.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submit_success_refetches_and_clears_draft() {
        let stub = StubClient::new(
            vec![
                Ok(vec![user("bob", "b@x.com")]),
                Ok(vec![user("bob", "b@x.com"), user("carol", "c@x.com")]),
            ],
            vec![Ok(ack("c@x.com was added!"))],
        );
        let mut view = UsersView::new(&stub);

        view.on_mount().await;
        view.on_field_change(DraftField::Username, "carol");
        view.on_field_change(DraftField::Email, "c@x.com");

        let ack = view.on_submit().await;

        assert_eq!(ack.map(|a| a.message), Some("c@x.com was added!".to_string()));
        assert_eq!(view.users().len(), 2);
        assert_eq!(view.users()[1].username, "carol");
        assert_eq!(view.draft(), ("", ""));
        assert_eq!(stub.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn submit_failure_preserves_draft_and_users() {
        let errors = ErrorCount::default();
        let subscriber = tracing_subscriber::registry().with(errors.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let stub = StubClient::new(
            vec![Ok(vec![user("bob", "b@x.com")])],
            vec![Err(TransportError::new("connection refused"))],
        );
        let mut view = UsersView::new(&stub);

        view.on_mount().await;
        view.on_field_change(DraftField::Username, "carol");
        view.on_field_change(DraftField::Email, "c@x.com");

        let ack = view.on_submit().await;

        assert!(ack.is_none());
        assert_eq!(view.users(), &[user("bob", "b@x.com")]);
        assert_eq!(view.draft(), ("carol", "c@x.com"));
        // no refetch after a failed create, and exactly one error logged
        assert_eq!(stub.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(errors.get(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_users() {
        let errors = ErrorCount::default();
        let subscriber = tracing_subscriber::registry().with(errors.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let stub = StubClient::new(
            vec![
                Ok(vec![user("bob", "b@x.com")]),
                Err(TransportError::new("connection refused")),
            ],
            vec![],
        );
        let mut view = UsersView::new(&stub);

        view.on_mount().await;
        view.refresh().await;

        assert_eq!(view.users(), &[user("bob", "b@x.com")]);
        assert_eq!(errors.get(), 1);
    }

    #[tokio::test]
    async fn latest_completed_refresh_wins() {
        let stub = StubClient::new(
            vec![
                Ok(vec![user("bob", "b@x.com")]),
                Ok(vec![user("carol", "c@x.com")]),
            ],
            vec![],
        );
        let mut view = UsersView::new(&stub);

        view.refresh().await;
        view.refresh().await;

        assert_eq!(view.users(), &[user("carol", "c@x.com")]);
    }

    #[tokio::test]
    async fn empty_draft_is_submitted_as_is() {
        let stub = StubClient::new(
            vec![Ok(vec![]), Ok(vec![])],
            vec![Ok(ack("was added!"))],
        );
        let mut view = UsersView::new(&stub);

        view.on_mount().await;
        let ack = view.on_submit().await;

        assert!(ack.is_some());
        assert_eq!(stub.create_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn draft_field_parses_known_names_only() {
        assert_eq!("username".parse::<DraftField>().ok(), Some(DraftField::Username));
        assert_eq!("EMAIL".parse::<DraftField>().ok(), Some(DraftField::Email));
        assert!("nope".parse::<DraftField>().is_err());
        assert!(
            "nope"
                .parse::<DraftField>()
                .unwrap_err()
                .to_string()
                .contains("unknown draft field")
        );
    }
}
