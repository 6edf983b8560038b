//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod inbound;
mod money;
mod outbound;
mod path;
mod push;
mod request_error;

pub use inbound::{
    decode_inbound_message_list, decode_inbound_resource_reference, decode_mo_subscriptions,
    encode_subscribe_inbound_form,
};
pub use outbound::{
    decode_delivery_info_list, decode_delivery_receipt_subscription,
    decode_delivery_receipt_subscription_id, decode_delivery_receipt_subscriptions,
    decode_delivery_reports, decode_send_sms_response, encode_send_sms_form,
    encode_subscribe_delivery_form,
};
pub use path::endpoint_url;
pub use push::{decode_delivery_info_notification, decode_inbound_message_notifications};
pub use request_error::{RequestError, decode_request_error};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("resource URL does not end with an id: {value:?}")]
    MissingResourceId { value: String },

    #[error("invalid base URL: {value}")]
    InvalidBaseUrl { value: String },
}
