//! Session + List Scenario Tests
//!
//! Wire the session manager and the list controller together over the
//! in-memory backend, the way the UI does.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::backend::{DocumentStore, MemoryIdentityProvider, MemoryStore};
    use crate::domain::{Item, ItemId, ItemPatch, NewItem, StoreError, StoreResult, UserId};
    use crate::list::{FailurePolicy, ListController};
    use crate::route::{can_render, route_guard, Route};
    use crate::session::SessionManager;

    struct App {
        provider: Rc<MemoryIdentityProvider>,
        session: SessionManager,
        list: ListController,
    }

    impl App {
        fn new() -> Self {
            let provider = Rc::new(
                MemoryIdentityProvider::new()
                    .with_account("u1@example.com", "secret1", Some("One"))
                    .with_account("u2@example.com", "secret2", Some("Two")),
            );
            let session = SessionManager::init(provider.clone());
            let list = ListController::new(Rc::new(MemoryStore::new()));
            provider.emit_current();
            Self {
                provider,
                session,
                list,
            }
        }

        /// What the UI's session effect does after every session change
        async fn follow_session(&self) {
            let owner = self.session.identity().map(|i| i.id);
            self.list.set_owner(owner).await.unwrap();
        }

        async fn sign_in(&self, email: &str, password: &str) {
            self.session.sign_in_with_password(email, password).await.unwrap();
            self.follow_session().await;
        }
    }

    #[tokio::test]
    async fn items_are_scoped_to_the_signed_in_user() {
        let app = App::new();
        app.sign_in("u1@example.com", "secret1").await;
        let u1 = app.session.identity().unwrap().id;

        app.list.add("Buy milk").await.unwrap();

        let items = app.list.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "Buy milk");
        assert_eq!(items[0].owner, u1);
        assert!(!items[0].completed);

        app.session.sign_out().await.unwrap();
        app.follow_session().await;
        assert!(app.list.items().is_empty());

        app.sign_in("u2@example.com", "secret2").await;
        assert!(app.list.items().is_empty());
    }

    #[tokio::test]
    async fn sign_out_redirects_home_to_login() {
        let app = App::new();
        app.sign_in("u1@example.com", "secret1").await;
        assert!(can_render(&app.session.state(), Route::Home));

        app.session.sign_out().await.unwrap();
        app.follow_session().await;

        let state = app.session.state();
        assert!(state.identity.is_none());
        assert_eq!(route_guard(&state, Route::Home), Some(Route::Login));
        assert!(!can_render(&state, Route::Home));
        assert!(app.list.owner().is_none());
    }

    #[tokio::test]
    async fn expired_session_empties_the_list() {
        let app = App::new();
        app.sign_in("u1@example.com", "secret1").await;
        app.list.add("Buy milk").await.unwrap();

        app.provider.expire_session();
        app.follow_session().await;

        assert!(app.list.entries().is_empty());
        assert_eq!(route_guard(&app.session.state(), Route::Home), Some(Route::Login));
    }

    /// A read held open until released, optionally failing afterwards
    struct Gate {
        entered: oneshot::Sender<()>,
        release: oneshot::Receiver<()>,
        fail_with: Option<StoreError>,
    }

    /// Store whose reads can be held open until released
    struct GatedStore {
        inner: MemoryStore,
        gates: RefCell<VecDeque<Gate>>,
    }

    impl GatedStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                gates: RefCell::new(VecDeque::new()),
            }
        }

        /// Hold the next read open. The first receiver fires once the read
        /// has taken its snapshot; sending on the returned sender releases it.
        fn hold_next_read(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
            self.push_gate(None)
        }

        /// Like `hold_next_read`, but the read fails with `err` once released
        fn hold_next_read_failing(&self, err: StoreError) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
            self.push_gate(Some(err))
        }

        fn push_gate(&self, fail_with: Option<StoreError>) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
            let (entered_tx, entered_rx) = oneshot::channel();
            let (release_tx, release_rx) = oneshot::channel();
            self.gates.borrow_mut().push_back(Gate {
                entered: entered_tx,
                release: release_rx,
                fail_with,
            });
            (entered_rx, release_tx)
        }
    }

    #[async_trait(?Send)]
    impl DocumentStore for GatedStore {
        async fn query_owned(&self, collection: &str, owner: &UserId) -> StoreResult<Vec<Item>> {
            let snapshot = self.inner.query_owned(collection, owner).await;
            let gate = self.gates.borrow_mut().pop_front();
            if let Some(gate) = gate {
                let _ = gate.entered.send(());
                let _ = gate.release.await;
                if let Some(err) = gate.fail_with {
                    return Err(err);
                }
            }
            snapshot
        }

        async fn insert(&self, collection: &str, item: &NewItem) -> StoreResult<ItemId> {
            self.inner.insert(collection, item).await
        }

        async fn update(&self, collection: &str, id: &str, patch: &ItemPatch) -> StoreResult<()> {
            self.inner.update(collection, id, patch).await
        }

        async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
            self.inner.delete(collection, id).await
        }
    }

    #[tokio::test]
    async fn slow_earlier_read_does_not_clobber_later_one() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let store = Rc::new(GatedStore::new());
                let list = Rc::new(ListController::new(store.clone()));
                list.set_owner(Some(UserId::new("u1"))).await.unwrap();

                let (entered, release) = store.hold_next_read();
                let slow_list = Rc::clone(&list);
                let slow = tokio::task::spawn_local(async move { slow_list.refresh().await });
                entered.await.unwrap();

                list.add("Buy milk").await.unwrap();
                assert_eq!(list.items().len(), 1);

                release.send(()).unwrap();
                slow.await.unwrap().unwrap();

                assert_eq!(list.items().len(), 1);
                assert_eq!(list.items()[0].content, "Buy milk");
            })
            .await;
    }

    #[tokio::test]
    async fn read_for_previous_owner_is_discarded() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let store = Rc::new(GatedStore::new());
                let u1 = UserId::new("u1");
                store.inner.insert("todos", &NewItem::new(u1.clone(), "u1 item")).await.unwrap();

                let list = Rc::new(ListController::new(store.clone()));
                let (entered, release) = store.hold_next_read();
                let slow_list = Rc::clone(&list);
                let slow = tokio::task::spawn_local(async move { slow_list.set_owner(Some(u1)).await });
                entered.await.unwrap();

                list.set_owner(Some(UserId::new("u2"))).await.unwrap();
                release.send(()).unwrap();
                slow.await.unwrap().unwrap();

                assert_eq!(list.owner(), Some(UserId::new("u2")));
                assert!(list.items().is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn failed_read_for_previous_owner_is_discarded() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let store = Rc::new(GatedStore::new());
                let list = Rc::new(ListController::new(store.clone()).with_policy(FailurePolicy::Propagate));
                let seen_errors = Rc::new(RefCell::new(Vec::new()));
                let seen_in_cb = Rc::clone(&seen_errors);
                let _sub = list.subscribe(move |snapshot| {
                    if let Some(err) = &snapshot.last_error {
                        seen_in_cb.borrow_mut().push(err.clone());
                    }
                });

                let (entered, release) =
                    store.hold_next_read_failing(StoreError::Request("connection reset".into()));
                let slow_list = Rc::clone(&list);
                let slow = tokio::task::spawn_local(async move {
                    slow_list.set_owner(Some(UserId::new("u1"))).await
                });
                entered.await.unwrap();

                list.set_owner(Some(UserId::new("u2"))).await.unwrap();
                release.send(()).unwrap();

                assert_eq!(slow.await.unwrap(), Ok(()));
                assert_eq!(list.owner(), Some(UserId::new("u2")));
                assert_eq!(list.last_error(), None);
                assert!(seen_errors.borrow().is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn failed_current_read_is_still_reported() {
        let store = Rc::new(MemoryStore::new());
        let list = ListController::new(store.clone()).with_policy(FailurePolicy::Propagate);
        store.fail_next(StoreError::Request("offline".into()));

        let result = list.set_owner(Some(UserId::new("u1"))).await;

        assert_eq!(result, Err(StoreError::Request("offline".into())));
        assert_eq!(list.last_error(), Some(StoreError::Request("offline".into())));
    }
}
