//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    SEND_SMS_MAX_RECIPIENTS, SendOptions, SendSms, SubscribeToDeliveryNotifications,
    SubscribeToInboundMessages,
};
pub use response::{
    CallbackReference, DeliveryInfo, DeliveryInfoList, DeliveryInfoNotification, DeliveryReport,
    DeliveryReportSubscription, InboundMessageNotification, InboundSmsMessage,
    InboundSmsMessageList, MoSubscription, RequestErrorKind,
};
pub use validation::ValidationError;
pub use value::{
    Address, CallbackData, ClientCorrelator, Criteria, DeliveryStatus, IbssoToken, MessageText,
    NotifyUrl, Pagination, Password, PhoneNumber, RequestId, SenderAddress, SenderName,
    SubscriptionId, Username,
};
