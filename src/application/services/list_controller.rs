//! Load, filter, summarize and mutate one backend collection.
//!
//! Asynchronous work is returned to the caller as an [`Effect`]: a `'static`
//! future whose output is fed back through [`ListController::apply`]. The
//! terminal UI spawns effects on the runtime; tests await them inline.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::crud::{CrudState, Submission};
use crate::domain::errors::ApiError;
use crate::domain::filter::ListFilter;
use crate::domain::namespace::ListScope;
use crate::domain::ports::ResourcePort;
use crate::domain::resource::{Resource, Stat};

/// Pending asynchronous work of a list.
pub type Effect<R> = BoxFuture<'static, ListEvent<R>>;

/// Mutation kinds reported back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A record was created.
    Created,
    /// A record was updated.
    Updated,
    /// A record was deleted.
    Deleted,
}

/// Completion of an [`Effect`].
#[derive(Debug)]
pub enum ListEvent<R> {
    /// A fetch finished.
    Loaded(Result<Vec<R>, ApiError>),
    /// A mutation finished.
    Mutated(Mutation, Result<(), ApiError>),
}

/// Fetch state of the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The collection is loaded.
    Loaded,
    /// The last fetch failed with this message.
    Failed(String),
}

/// Controller behind one list tab.
pub struct ListController<R: Resource> {
    port: Arc<dyn ResourcePort<R>>,
    scope: ListScope,
    items: Vec<R>,
    state: LoadState,
    filter: ListFilter,
    crud: CrudState<R>,
    alert: Option<String>,
    mutating: bool,
}

impl<R: Resource> ListController<R> {
    /// Creates a controller for a scope. Nothing is fetched until [`Self::load`].
    #[must_use]
    pub fn new(port: Arc<dyn ResourcePort<R>>, scope: ListScope) -> Self {
        Self {
            port,
            scope,
            items: Vec::new(),
            state: LoadState::Idle,
            filter: ListFilter::new(),
            crud: CrudState::Closed,
            alert: None,
            mutating: false,
        }
    }

    /// Starts a full fetch of the collection.
    pub fn load(&mut self) -> Effect<R> {
        debug!(collection = R::KIND.collection(), scope = ?self.scope, "Loading list");
        self.state = LoadState::Loading;

        let port = Arc::clone(&self.port);
        let scope = self.scope.clone();
        Box::pin(async move { ListEvent::Loaded(port.list(&scope).await) })
    }

    /// Folds a finished effect into the state; may return the follow-up reload.
    pub fn apply(&mut self, event: ListEvent<R>) -> Option<Effect<R>> {
        match event {
            ListEvent::Loaded(Ok(items)) => {
                info!(
                    collection = R::KIND.collection(),
                    count = items.len(),
                    "List loaded"
                );
                self.items = items;
                self.state = LoadState::Loaded;
                None
            }
            ListEvent::Loaded(Err(e)) => {
                warn!(collection = R::KIND.collection(), error = %e, "List fetch failed");
                self.items.clear();
                self.state = LoadState::Failed(e.to_string());
                None
            }
            ListEvent::Mutated(kind, Ok(())) => {
                info!(collection = R::KIND.collection(), ?kind, "Mutation succeeded");
                self.mutating = false;
                self.crud.cancel();
                self.alert = None;
                Some(self.load())
            }
            ListEvent::Mutated(kind, Err(e)) => {
                warn!(collection = R::KIND.collection(), ?kind, error = %e, "Mutation failed");
                self.mutating = false;
                self.alert = Some(e.to_string());
                None
            }
        }
    }

    /// Sends the open form. Invalid input sets the alert instead.
    pub fn submit(&mut self) -> Option<Effect<R>> {
        if self.mutating {
            return None;
        }

        let submission = match self.crud.submission() {
            Ok(submission) => submission,
            Err(e) => {
                debug!(error = %e, "Form not submitted");
                self.alert = Some(e.to_string());
                return None;
            }
        };

        self.mutating = true;
        let port = Arc::clone(&self.port);
        Some(match submission {
            Submission::Create(mut payload) => {
                if let ListScope::Company(id) = &self.scope {
                    payload
                        .entry("compagnie")
                        .or_insert_with(|| Value::String(id.clone()));
                }
                Box::pin(async move {
                    ListEvent::Mutated(Mutation::Created, port.create(payload).await)
                })
            }
            Submission::Update { id, payload } => Box::pin(async move {
                ListEvent::Mutated(Mutation::Updated, port.update(&id, payload).await)
            }),
        })
    }

    /// Deletes the record awaiting confirmation. The only path to a delete.
    pub fn confirm_delete(&mut self) -> Option<Effect<R>> {
        if self.mutating {
            return None;
        }
        let target = self.crud.pending_delete()?;
        let Some(id) = target.id().map(str::to_string) else {
            self.alert = Some(format!("{} has no identifier", target.label()));
            return None;
        };

        info!(collection = R::KIND.collection(), %id, "Deleting record");
        self.mutating = true;
        let port = Arc::clone(&self.port);
        Some(Box::pin(async move {
            ListEvent::Mutated(Mutation::Deleted, port.delete(&id).await)
        }))
    }

    /// Opens the create form, if offered.
    pub fn open_create(&mut self) -> bool {
        self.alert = None;
        self.crud.open_create()
    }

    /// Opens the edit form for a record, if offered.
    pub fn open_edit(&mut self, target: R) -> bool {
        self.alert = None;
        self.crud.open_edit(target)
    }

    /// Asks for confirmation before deleting a record, if offered.
    pub fn request_delete(&mut self, target: R) -> bool {
        self.alert = None;
        self.crud.request_delete(target)
    }

    /// Closes the open modal without any request.
    pub fn cancel(&mut self) {
        self.crud.cancel();
        self.alert = None;
    }

    /// Records that satisfy the current filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&R> {
        self.filter.apply(&self.items)
    }

    /// Summary statistics over the whole loaded collection.
    #[must_use]
    pub fn stats(&self) -> Vec<Stat> {
        R::summarize(&self.items)
    }

    /// Loaded records.
    #[must_use]
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Fetch state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Scope of the fetches.
    #[must_use]
    pub const fn scope(&self) -> &ListScope {
        &self.scope
    }

    /// Current filter.
    #[must_use]
    pub const fn filter(&self) -> &ListFilter {
        &self.filter
    }

    /// Mutable filter.
    pub const fn filter_mut(&mut self) -> &mut ListFilter {
        &mut self.filter
    }

    /// Modal state.
    #[must_use]
    pub const fn crud(&self) -> &CrudState<R> {
        &self.crud
    }

    /// Mutable modal state.
    pub const fn crud_mut(&mut self) -> &mut CrudState<R> {
        &mut self.crud
    }

    /// Blocking alert from the last failed write.
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Dismisses the alert.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Returns whether a mutation is in flight.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        self.mutating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Bus, Payment};
    use crate::domain::ports::mocks::{Call, MockResourcePort};

    fn buses() -> Vec<Bus> {
        serde_json::from_str(
            r#"[
                {"_id": "b1", "numero": 1, "type": "VIP", "capacite": 40},
                {"_id": "b2", "numero": 2, "type": "Standard", "capacite": 30}
            ]"#,
        )
        .unwrap()
    }

    async fn loaded(port: Arc<MockResourcePort<Bus>>) -> ListController<Bus> {
        let mut controller = ListController::new(port, ListScope::Company("c1".into()));
        let event = controller.load().await;
        assert!(controller.apply(event).is_none());
        controller
    }

    #[tokio::test]
    async fn test_load_and_filter() {
        let port = MockResourcePort::new(buses());
        let mut controller = loaded(port.clone()).await;

        assert_eq!(controller.state(), &LoadState::Loaded);
        assert_eq!(port.calls(), vec![Call::List(ListScope::Company("c1".into()))]);

        controller.filter_mut().set_search("vip");
        let visible = controller.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id(), Some("b1"));
    }

    #[tokio::test]
    async fn test_stats_cover_whole_collection() {
        let mut controller = loaded(MockResourcePort::new(buses())).await;
        controller.filter_mut().set_search("2");

        assert_eq!(controller.visible().len(), 1);
        assert_eq!(controller.stats()[1], Stat::amount("Total seats", 70.0));
    }

    #[tokio::test]
    async fn test_load_failure_sets_failed_state() {
        let port = MockResourcePort::<Bus>::new(buses());
        port.fail_with("Compagnie introuvable");
        let mut controller = ListController::new(port, ListScope::All);

        let event = controller.load().await;
        controller.apply(event);

        assert_eq!(
            controller.state(),
            &LoadState::Failed("Compagnie introuvable".into())
        );
        assert!(controller.items().is_empty());
    }

    #[tokio::test]
    async fn test_create_triggers_exactly_one_reload() {
        let port = MockResourcePort::new(buses());
        let mut controller = loaded(port.clone()).await;

        assert!(controller.open_create());
        let form = controller.crud_mut().form_mut().unwrap();
        form.set("numero", "3");
        form.set("capacite", "50");

        let mutation = controller.submit().unwrap();
        assert!(controller.is_mutating());
        let reload = controller.apply(mutation.await).expect("reload after create");
        assert_eq!(controller.state(), &LoadState::Loading);
        assert!(!controller.crud().is_open());

        assert!(controller.apply(reload.await).is_none());
        assert_eq!(port.list_count(), 2);
        assert_eq!(port.mutation_count(), 1);

        let Call::Create(payload) = &port.calls()[1] else {
            panic!("expected a create call");
        };
        assert_eq!(payload["compagnie"], "c1");
        assert_eq!(payload["capacite"], 50);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_modal_and_alerts() {
        let port = MockResourcePort::new(buses());
        let mut controller = loaded(port.clone()).await;
        let target = controller.items()[0].clone();

        assert!(controller.open_edit(target));
        port.fail_with("Numéro déjà utilisé");
        let mutation = controller.submit().unwrap();

        assert!(controller.apply(mutation.await).is_none());
        assert!(controller.crud().is_open());
        assert_eq!(controller.alert(), Some("Numéro déjà utilisé"));
        assert_eq!(port.list_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let port = MockResourcePort::new(buses());
        let mut controller = loaded(port.clone()).await;

        controller.open_create();
        assert!(controller.submit().is_none());
        assert!(controller.alert().is_some());
        assert_eq!(port.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let port = MockResourcePort::new(buses());
        let mut controller = loaded(port.clone()).await;
        let target = controller.items()[1].clone();

        assert!(controller.confirm_delete().is_none());

        assert!(controller.request_delete(target.clone()));
        controller.cancel();
        assert!(controller.confirm_delete().is_none());
        assert_eq!(port.mutation_count(), 0);

        controller.request_delete(target);
        let deletion = controller.confirm_delete().unwrap();
        let reload = controller.apply(deletion.await).expect("reload after delete");
        controller.apply(reload.await);

        assert_eq!(port.calls()[1], Call::Delete("b2".into()));
        assert_eq!(port.list_count(), 2);
    }

    #[tokio::test]
    async fn test_read_only_resource_opens_nothing() {
        let port = MockResourcePort::<Payment>::new(Vec::new());
        let mut controller = ListController::new(port, ListScope::All);

        assert!(!controller.open_create());
        assert!(!controller.crud().is_open());
    }
}
