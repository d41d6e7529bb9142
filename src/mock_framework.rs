//! # Mock Framework
//!
//! Scripts actor replies so a client's orchestration can be tested without a
//! running [`ResourceActor`](crate::actor_framework::ResourceActor).
//!
//! [`create_mock_client`] returns a client plus the receiving end of its
//! channel. Each `expect_*` helper pops the next request, checks its kind and
//! hands back the payload together with the responder.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};

pub type MockReceiver<T> = mpsc::Receiver<ResourceRequest<T>>;

pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, MockReceiver<T>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request must be a Create.
pub async fn expect_create<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::CreateParams, Response<T::Id, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request must be a Get.
pub async fn expect_get<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request must be an Action.
pub async fn expect_action<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_actor::CustomerError;
    use crate::domain::{Customer, CustomerCreate, CustomerKind, PriceList, Zone};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Customer>(10);

        let create_task = tokio::spawn(async move {
            let customer = CustomerCreate::new("Kiosco 24", CustomerKind::Kiosk, Zone::Sur, PriceList::A);
            client.create(customer).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Kiosco 24");
        responder.send(Ok("customer_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("customer_1".to_string()));
    }

    #[tokio::test]
    async fn test_scripted_error_reaches_caller() {
        let (client, mut receiver) = create_mock_client::<Customer>(10);

        let get_task = tokio::spawn(async move { client.get("customer_9".to_string()).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, "customer_9");
        responder
            .send(Err(CustomerError::ValidationError("offline".to_string())))
            .unwrap();

        let result = get_task.await.unwrap();
        assert_eq!(result, Err(CustomerError::ValidationError("offline".to_string())));
    }
}
