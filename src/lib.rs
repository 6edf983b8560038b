//! Typed Rust client for the GSMA OneAPI SMS messaging API.
//!
//! The crate is split the usual way: a domain layer of validated types, a transport
//! layer for wire-format details, and a client layer orchestrating requests. On top of
//! the request/response operations the client delivers notifications (delivery reports
//! and inbound messages) to registered listeners, either by polling the API (PULL) or
//! through a local callback endpoint (PUSH).
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use oneapi_sms::{
//!     Address, Auth, DeliveryReport, ListenerError, MessageText, OneApiClient, SendOptions,
//!     SendSms, SenderAddress,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), oneapi_sms::OneApiError> {
//!     let client = OneApiClient::new(Auth::basic("user", "secret")?);
//!
//!     let request = SendSms::new(
//!         SenderAddress::new("tel:+38598123456")?,
//!         vec![Address::new("tel:+79251234567")?],
//!         MessageText::new("hello")?,
//!         SendOptions::default(),
//!     )?;
//!     let _request_id = client.send_sms(request).await?;
//!
//!     client
//!         .add_pull_delivery_report_listener(Arc::new(
//!             |report: &DeliveryReport| -> Result<(), ListenerError> {
//!                 println!("{:?}", report.delivery_status);
//!                 Ok(())
//!             },
//!         ))
//!         .await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod notify;
mod transport;

pub use client::{
    Auth, OneApiClient, OneApiClientBuilder, OneApiError, decode_delivery_info_notification,
    decode_inbound_message_notifications,
};
pub use config::NotificationConfig;
pub use domain::{
    Address, CallbackData, CallbackReference, ClientCorrelator, Criteria, DeliveryInfo,
    DeliveryInfoList, DeliveryInfoNotification, DeliveryReport, DeliveryReportSubscription,
    DeliveryStatus, IbssoToken, InboundMessageNotification, InboundSmsMessage,
    InboundSmsMessageList, MessageText, MoSubscription, NotifyUrl, Pagination, Password,
    PhoneNumber, RequestErrorKind, RequestId, SendOptions, SendSms, SenderAddress, SenderName,
    SubscribeToDeliveryNotifications, SubscribeToInboundMessages, SubscriptionId, Username,
    ValidationError,
};
pub use notify::{
    ActivityState, DeliveryMode, Listener, ListenerError, NotificationKind, SharedListener,
};
