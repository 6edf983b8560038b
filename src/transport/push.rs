//! Decoders for payloads the provider pushes to a subscribed `notifyURL`.

use serde::Deserialize;

use super::TransportError;
use super::inbound::{InboundSmsMessageJson, InboundSmsMessageListJson};
use super::outbound::DeliveryInfoJson;
use crate::domain::{DeliveryInfoNotification, InboundMessageNotification};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryInfoNotificationJson {
    delivery_info: DeliveryInfoJson,
    #[serde(default)]
    callback_data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeliveryInfoNotificationPayload {
    Wrapped {
        #[serde(rename = "deliveryInfoNotification")]
        notification: DeliveryInfoNotificationJson,
    },
    Bare(DeliveryInfoNotificationJson),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundNotificationJson {
    #[serde(rename = "inboundSMSMessage")]
    inbound_sms_message: InboundSmsMessageJson,
    #[serde(default)]
    callback_data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BareInboundListJson {
    #[serde(rename = "inboundSMSMessage")]
    inbound_sms_message: Vec<InboundSmsMessageJson>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InboundPayload {
    Notification {
        #[serde(rename = "inboundSMSMessageNotification")]
        notification: InboundNotificationJson,
    },
    List {
        #[serde(rename = "inboundSMSMessageList")]
        list: InboundSmsMessageListJson,
    },
    BareNotification(InboundNotificationJson),
    BareList(BareInboundListJson),
}

/// Decode a pushed delivery status, either wrapped in `deliveryInfoNotification` or bare.
pub fn decode_delivery_info_notification(
    body: &[u8],
) -> Result<DeliveryInfoNotification, TransportError> {
    let notification = match serde_json::from_slice(body)? {
        DeliveryInfoNotificationPayload::Wrapped { notification } => notification,
        DeliveryInfoNotificationPayload::Bare(notification) => notification,
    };
    Ok(DeliveryInfoNotification {
        delivery_info: notification.delivery_info.into_domain(),
        callback_data: notification.callback_data,
    })
}

/// Decode a pushed inbound message payload into one notification per message.
///
/// Accepts `inboundSMSMessageNotification` (wrapped or bare) as well as an inbound
/// message list (wrapped in `inboundSMSMessageList` or bare).
pub fn decode_inbound_message_notifications(
    body: &[u8],
) -> Result<Vec<InboundMessageNotification>, TransportError> {
    let notifications = match serde_json::from_slice(body)? {
        InboundPayload::Notification { notification } | InboundPayload::BareNotification(notification) => {
            vec![InboundMessageNotification {
                message: notification.inbound_sms_message.into_domain(),
                callback_data: notification.callback_data,
            }]
        }
        InboundPayload::List { list } => list
            .into_domain()
            .messages
            .into_iter()
            .map(|message| InboundMessageNotification {
                message,
                callback_data: None,
            })
            .collect(),
        InboundPayload::BareList(list) => list
            .inbound_sms_message
            .into_iter()
            .map(|message| InboundMessageNotification {
                message: message.into_domain(),
                callback_data: None,
            })
            .collect(),
    };
    Ok(notifications)
}
