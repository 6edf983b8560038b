//! Notification listener management on [`OneApiClient`].
//!
//! Every (kind, mode) pair has one registry and one background activity. Adding the
//! first listener starts the activity; removing the listeners stops it. A per-pair
//! async mutex serializes these transitions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;

use super::{OneApiClient, OneApiError};
use crate::domain::{
    DeliveryInfoNotification, DeliveryReport, InboundMessageNotification, InboundSmsMessage,
};
use crate::notify::{
    ActivityState, Decode, DeliveryMode, Fetch, ListenerRegistry, NotificationKind, PullRetriever,
    PushReceiver, SharedListener, Snapshot,
};

struct PullSlot<T> {
    registry: ListenerRegistry<T>,
    retriever: PullRetriever<T>,
    transition: Mutex<()>,
}

impl<T> PullSlot<T>
where
    T: Send + 'static,
{
    fn new(kind: &'static str) -> Self {
        let registry = ListenerRegistry::new();
        let retriever = PullRetriever::new(kind, registry.reader());
        Self {
            registry,
            retriever,
            transition: Mutex::new(()),
        }
    }

    async fn add(
        &self,
        listener: SharedListener<T>,
        interval: Duration,
        fetch: impl FnOnce() -> Arc<dyn Fetch<T>>,
    ) -> Result<(), OneApiError> {
        let _transition = self.transition.lock().await;
        if !self.registry.add(listener) {
            return Ok(());
        }
        if let Err(err) = self.retriever.start(interval, fetch()) {
            self.registry.clear();
            return Err(err);
        }
        Ok(())
    }

    async fn remove_all(&self) -> usize {
        let _transition = self.transition.lock().await;
        self.retriever.stop();
        self.registry.clear()
    }
}

struct PushSlot<T> {
    registry: ListenerRegistry<T>,
    receiver: PushReceiver<T>,
    transition: Mutex<()>,
}

impl<T> PushSlot<T>
where
    T: Send + 'static,
{
    fn new(kind: &'static str, decode: Decode<T>) -> Self {
        let registry = ListenerRegistry::new();
        let receiver = PushReceiver::new(kind, registry.reader(), decode);
        Self {
            registry,
            receiver,
            transition: Mutex::new(()),
        }
    }

    async fn add(&self, listener: SharedListener<T>, addr: SocketAddr) -> Result<(), OneApiError> {
        let _transition = self.transition.lock().await;
        if !self.registry.add(listener) {
            return Ok(());
        }
        if let Err(err) = self.receiver.start(addr) {
            self.registry.clear();
            return Err(err);
        }
        Ok(())
    }

    async fn remove_all(&self) -> usize {
        let _transition = self.transition.lock().await;
        self.receiver.stop().await;
        self.registry.clear()
    }
}

/// Listener registries and background activities shared by clones of a client.
pub(super) struct ListenerHub {
    delivery_reports: PullSlot<DeliveryReport>,
    inbound_messages: PullSlot<InboundSmsMessage>,
    delivery_status: PushSlot<DeliveryInfoNotification>,
    inbound_notifications: PushSlot<InboundMessageNotification>,
}

impl ListenerHub {
    pub(super) fn new() -> Self {
        Self {
            delivery_reports: PullSlot::new("delivery_reports"),
            inbound_messages: PullSlot::new("inbound_messages"),
            delivery_status: PushSlot::new("delivery_status", decode_delivery_status),
            inbound_notifications: PushSlot::new(
                "inbound_notifications",
                super::decode_inbound_message_notifications,
            ),
        }
    }
}

fn decode_delivery_status(body: &[u8]) -> Result<Vec<DeliveryInfoNotification>, OneApiError> {
    super::decode_delivery_info_notification(body).map(|notification| vec![notification])
}

impl OneApiClient {
    /// Register a listener for delivery reports retrieved by polling.
    ///
    /// The first listener starts polling every
    /// [`dlr_retrieving_interval`](crate::NotificationConfig::dlr_retrieving_interval).
    pub async fn add_pull_delivery_report_listener(
        &self,
        listener: SharedListener<DeliveryReport>,
    ) -> Result<(), OneApiError> {
        let interval = self.notifications.dlr_retrieving_interval;
        self.listeners
            .delivery_reports
            .add(listener, interval, || {
                let connection = self.connection.clone();
                let limit = self.notifications.delivery_reports_limit;
                let fetch: Arc<dyn Fetch<DeliveryReport>> = Arc::new(move || {
                    let connection = connection.clone();
                    async move { connection.delivery_reports(limit).await }
                });
                fetch
            })
            .await?;
        info!(kind = "delivery_reports", "pull listener added");
        Ok(())
    }

    /// Remove every delivery report listener and stop polling.
    pub async fn remove_pull_delivery_report_listeners(&self) -> usize {
        let removed = self.listeners.delivery_reports.remove_all().await;
        info!(kind = "delivery_reports", removed, "pull listeners released");
        removed
    }

    pub fn delivery_report_pull_listeners(&self) -> Snapshot<DeliveryReport> {
        self.listeners.delivery_reports.registry.snapshot()
    }

    /// Register a listener for inbound messages retrieved by polling.
    ///
    /// Each poll asks for at most
    /// [`inbound_messages_batch_size`](crate::NotificationConfig::inbound_messages_batch_size)
    /// messages.
    pub async fn add_pull_inbound_message_listener(
        &self,
        listener: SharedListener<InboundSmsMessage>,
    ) -> Result<(), OneApiError> {
        let interval = self.notifications.inbound_messages_retrieving_interval;
        self.listeners
            .inbound_messages
            .add(listener, interval, || {
                let connection = self.connection.clone();
                let batch_size = self.notifications.inbound_messages_batch_size;
                let fetch: Arc<dyn Fetch<InboundSmsMessage>> = Arc::new(move || {
                    let connection = connection.clone();
                    async move {
                        connection
                            .inbound_messages(batch_size)
                            .await
                            .map(|list| list.messages)
                    }
                });
                fetch
            })
            .await?;
        info!(kind = "inbound_messages", "pull listener added");
        Ok(())
    }

    /// Remove every inbound message listener and stop polling.
    pub async fn remove_pull_inbound_message_listeners(&self) -> usize {
        let removed = self.listeners.inbound_messages.remove_all().await;
        info!(kind = "inbound_messages", removed, "pull listeners released");
        removed
    }

    pub fn inbound_message_pull_listeners(&self) -> Snapshot<InboundSmsMessage> {
        self.listeners.inbound_messages.registry.snapshot()
    }

    /// Register a listener for delivery status notifications pushed to the local endpoint.
    ///
    /// The first listener binds
    /// [`dlr_push_addr`](crate::NotificationConfig::dlr_push_addr); a bind failure is
    /// returned and the listener is not kept.
    pub async fn add_push_delivery_status_listener(
        &self,
        listener: SharedListener<DeliveryInfoNotification>,
    ) -> Result<(), OneApiError> {
        self.listeners
            .delivery_status
            .add(listener, self.notifications.dlr_push_addr())
            .await?;
        info!(kind = "delivery_status", "push listener added");
        Ok(())
    }

    /// Remove every delivery status listener and close the local endpoint.
    pub async fn remove_push_delivery_status_listeners(&self) -> usize {
        let removed = self.listeners.delivery_status.remove_all().await;
        info!(kind = "delivery_status", removed, "push listeners released");
        removed
    }

    pub fn delivery_status_push_listeners(&self) -> Snapshot<DeliveryInfoNotification> {
        self.listeners.delivery_status.registry.snapshot()
    }

    /// Register a listener for inbound messages pushed to the local endpoint.
    pub async fn add_push_inbound_message_listener(
        &self,
        listener: SharedListener<InboundMessageNotification>,
    ) -> Result<(), OneApiError> {
        self.listeners
            .inbound_notifications
            .add(listener, self.notifications.inbound_push_addr())
            .await?;
        info!(kind = "inbound_notifications", "push listener added");
        Ok(())
    }

    /// Remove every pushed inbound message listener and close the local endpoint.
    pub async fn remove_push_inbound_message_listeners(&self) -> usize {
        let removed = self.listeners.inbound_notifications.remove_all().await;
        info!(kind = "inbound_notifications", removed, "push listeners released");
        removed
    }

    pub fn inbound_message_push_listeners(&self) -> Snapshot<InboundMessageNotification> {
        self.listeners.inbound_notifications.registry.snapshot()
    }

    pub fn activity_state(&self, kind: NotificationKind, mode: DeliveryMode) -> ActivityState {
        let hub = &self.listeners;
        match (kind, mode) {
            (NotificationKind::DeliveryStatus, DeliveryMode::Pull) => {
                hub.delivery_reports.retriever.state()
            }
            (NotificationKind::InboundMessage, DeliveryMode::Pull) => {
                hub.inbound_messages.retriever.state()
            }
            (NotificationKind::DeliveryStatus, DeliveryMode::Push) => {
                hub.delivery_status.receiver.state()
            }
            (NotificationKind::InboundMessage, DeliveryMode::Push) => {
                hub.inbound_notifications.receiver.state()
            }
        }
    }

    /// Address the local push endpoint of `kind` is bound to, while it runs.
    pub fn push_receiver_addr(&self, kind: NotificationKind) -> Option<SocketAddr> {
        match kind {
            NotificationKind::DeliveryStatus => self.listeners.delivery_status.receiver.local_addr(),
            NotificationKind::InboundMessage => {
                self.listeners.inbound_notifications.receiver.local_addr()
            }
        }
    }

    /// Remove all listeners of every kind and stop all background activities.
    pub async fn shutdown(&self) {
        tokio::join!(
            self.remove_pull_delivery_report_listeners(),
            self.remove_pull_inbound_message_listeners(),
            self.remove_push_delivery_status_listeners(),
            self.remove_push_inbound_message_listeners(),
        );
    }
}
