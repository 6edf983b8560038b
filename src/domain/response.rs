use crate::domain::value::{DeliveryStatus, RequestId, SubscriptionId};

/// Which `requestError` exception the provider reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// `serviceException`: the request itself was invalid.
    Service,
    /// `policyException`: the request was valid but refused by account policy.
    Policy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryInfo {
    pub address: String,
    pub delivery_status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryInfoList {
    pub delivery_info: Vec<DeliveryInfo>,
    pub resource_url: Option<String>,
}

/// Delivery status pushed by the provider to a subscribed `notifyURL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryInfoNotification {
    pub delivery_info: DeliveryInfo,
    pub callback_data: Option<String>,
}

/// Delivery report retrieved by polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub request_id: Option<RequestId>,
    pub message_id: Option<String>,
    pub sent_date_time: Option<String>,
    pub done_date_time: Option<String>,
    pub delivery_status: DeliveryStatus,
    /// Price as sent by the server (string form is preserved, `0.01` stays `"0.01"`).
    pub price: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSmsMessage {
    pub date_time: Option<String>,
    pub destination_address: Option<String>,
    pub message_id: Option<String>,
    pub message: String,
    pub resource_url: Option<String>,
    pub sender_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSmsMessageList {
    pub messages: Vec<InboundSmsMessage>,
    pub number_of_messages_in_this_batch: u32,
    pub total_number_of_pending_messages: u32,
    pub resource_url: Option<String>,
}

/// Inbound message pushed by the provider to a subscribed `notifyURL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessageNotification {
    pub message: InboundSmsMessage,
    pub callback_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackReference {
    pub notify_url: Option<String>,
    pub callback_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReportSubscription {
    pub subscription_id: Option<SubscriptionId>,
    pub callback_reference: Option<CallbackReference>,
    pub criteria: Option<String>,
    pub resource_url: Option<String>,
}

/// Inbound ("mobile originated") message subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoSubscription {
    pub subscription_id: Option<SubscriptionId>,
    pub notify_url: Option<String>,
    pub callback_data: Option<String>,
    pub criteria: Option<String>,
    pub destination_address: Option<String>,
    pub notification_format: Option<String>,
}
