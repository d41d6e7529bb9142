use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Payloads, and Actions)
// =============================================================================

/// Transport-level failures, shared by every resource.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Trait that any record must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Ord + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    /// Get the ID of the record
    fn id(&self) -> &Self::Id;

    /// Construct the full record from the generated ID and creation parameters
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> { Ok(()) }

    /// Handle a record-specific command
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        predicate: Predicate<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = std::any::type_name::<T>()))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { predicate, respond_to } => {
                    let items = self.store.values().filter(|item| predicate(*item)).cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.on_update(patch).map(|_| item.clone()),
                        None => Err(FrameworkError::NotFound(id.to_string()).into()),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(&id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action),
                        None => Err(FrameworkError::NotFound(id.to_string()).into()),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
        info!(records = self.store.len(), "Actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T::Id, T::Error> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params)?;
        item.on_create()?;
        debug!(id = %id, "Record created");
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    fn handle_delete(&mut self, id: &T::Id) -> Result<(), T::Error> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete()?;
        self.store.remove(id);
        debug!(id = %id, "Record deleted");
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, T::Error> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self, predicate: impl Fn(&T) -> bool + Send + 'static) -> Result<Vec<T>, T::Error> {
        let predicate: Predicate<T> = Box::new(predicate);
        self.request(|respond_to| ResourceRequest::List { predicate, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), T::Error> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Error, PartialEq)]
    enum DriverError {
        #[error("Driver not found: {0}")]
        NotFound(String),
        #[error("Vehicle already assigned")]
        AlreadyAssigned,
        #[error("Actor communication error: {0}")]
        ActorCommunicationError(String),
    }

    impl From<FrameworkError> for DriverError {
        fn from(err: FrameworkError) -> Self {
            match err {
                FrameworkError::NotFound(id) => DriverError::NotFound(id),
                other => DriverError::ActorCommunicationError(other.to_string()),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Driver {
        id: String,
        name: String,
        vehicle: Option<String>,
    }

    #[derive(Debug)]
    struct DriverCreate {
        name: String,
    }

    #[derive(Debug)]
    struct DriverPatch {
        name: Option<String>,
    }

    #[derive(Debug)]
    enum DriverAction {
        AssignVehicle(String),
    }

    impl Entity for Driver {
        type Id = String;
        type CreateParams = DriverCreate;
        type Patch = DriverPatch;
        type Action = DriverAction;
        type ActionResult = bool;
        type Error = DriverError;

        fn id(&self) -> &String { &self.id }

        fn from_create_params(id: String, params: DriverCreate) -> Result<Self, DriverError> {
            Ok(Self { id, name: params.name, vehicle: None })
        }

        fn on_update(&mut self, patch: DriverPatch) -> Result<(), DriverError> {
            if let Some(name) = patch.name {
                self.name = name;
            }
            Ok(())
        }

        fn handle_action(&mut self, action: DriverAction) -> Result<bool, DriverError> {
            match action {
                DriverAction::AssignVehicle(plate) => {
                    if self.vehicle.is_some() {
                        return Err(DriverError::AlreadyAssigned);
                    }
                    self.vehicle = Some(plate);
                    Ok(true)
                }
            }
        }
    }

    fn spawn_driver_actor() -> ResourceClient<Driver> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("driver_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_driver_actor();

        let id = client.create(DriverCreate { name: "Marcos".into() }).await.unwrap();
        assert_eq!(id, "driver_1");

        let assigned = client.perform_action(id.clone(), DriverAction::AssignVehicle("AB123CD".into())).await.unwrap();
        assert!(assigned);

        let driver = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(driver.vehicle.as_deref(), Some("AB123CD"));

        let again = client.perform_action(id.clone(), DriverAction::AssignVehicle("XY987ZW".into())).await;
        assert_eq!(again, Err(DriverError::AlreadyAssigned));
    }

    #[tokio::test]
    async fn test_missing_record_maps_to_entity_error() {
        let client = spawn_driver_actor();

        assert_eq!(client.get("driver_9".into()).await, Ok(None));
        assert_eq!(
            client.delete("driver_9".into()).await,
            Err(DriverError::NotFound("driver_9".into()))
        );
        assert_eq!(
            client.update("driver_9".into(), DriverPatch { name: None }).await,
            Err(DriverError::NotFound("driver_9".into()))
        );
    }

    #[tokio::test]
    async fn test_list_filters_in_id_order() {
        let client = spawn_driver_actor();
        for name in ["Ana", "Bruno", "Carla"] {
            client.create(DriverCreate { name: name.into() }).await.unwrap();
        }
        client.delete("driver_2".into()).await.unwrap();

        let all = client.list(|_| true).await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Carla"]);

        let with_a = client.list(|d: &Driver| d.name.starts_with('A')).await.unwrap();
        assert_eq!(with_a.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_communication_error() {
        let (actor, client) = ResourceActor::<Driver>::new(1, || "driver_1".to_string());
        drop(actor);

        let result = client.get("driver_1".into()).await;
        assert!(matches!(result, Err(DriverError::ActorCommunicationError(_))));
    }
}
