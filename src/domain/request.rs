use crate::domain::validation::ValidationError;
use crate::domain::value::{
    Address, CallbackData, ClientCorrelator, Criteria, MessageText, NotifyUrl, SenderAddress,
    SenderName,
};

pub const SEND_SMS_MAX_RECIPIENTS: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub sender_name: Option<SenderName>,
    pub client_correlator: Option<ClientCorrelator>,
    /// Where the provider should push the delivery status of this request.
    pub notify_url: Option<NotifyUrl>,
    pub callback_data: Option<CallbackData>,
}

#[derive(Debug, Clone)]
pub struct SendSms {
    sender_address: SenderAddress,
    recipients: Vec<Address>,
    message: MessageText,
    options: SendOptions,
}

impl SendSms {
    pub fn new(
        sender_address: SenderAddress,
        recipients: Vec<Address>,
        message: MessageText,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: Address::FIELD,
            });
        }
        if recipients.len() > SEND_SMS_MAX_RECIPIENTS {
            return Err(ValidationError::TooManyRecipients {
                max: SEND_SMS_MAX_RECIPIENTS,
                actual: recipients.len(),
            });
        }
        Ok(Self {
            sender_address,
            recipients,
            message,
            options,
        })
    }

    pub fn sender_address(&self) -> &SenderAddress {
        &self.sender_address
    }

    pub fn recipients(&self) -> &[Address] {
        &self.recipients
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone)]
pub struct SubscribeToDeliveryNotifications {
    notify_url: NotifyUrl,
    /// When set, only requests sent from this address are covered.
    pub sender_address: Option<SenderAddress>,
    pub criteria: Option<Criteria>,
    pub callback_data: Option<CallbackData>,
    pub client_correlator: Option<ClientCorrelator>,
}

impl SubscribeToDeliveryNotifications {
    pub fn new(notify_url: NotifyUrl) -> Self {
        Self {
            notify_url,
            sender_address: None,
            criteria: None,
            callback_data: None,
            client_correlator: None,
        }
    }

    pub fn notify_url(&self) -> &NotifyUrl {
        &self.notify_url
    }
}

#[derive(Debug, Clone)]
pub struct SubscribeToInboundMessages {
    destination_address: Address,
    notify_url: NotifyUrl,
    pub criteria: Option<Criteria>,
    /// Payload format for pushed messages, e.g. `JSON`.
    pub notification_format: Option<String>,
    pub callback_data: Option<CallbackData>,
    pub client_correlator: Option<ClientCorrelator>,
}

impl SubscribeToInboundMessages {
    pub fn new(destination_address: Address, notify_url: NotifyUrl) -> Self {
        Self {
            destination_address,
            notify_url,
            criteria: None,
            notification_format: None,
            callback_data: None,
            client_correlator: None,
        }
    }

    pub fn destination_address(&self) -> &Address {
        &self.destination_address
    }

    pub fn notify_url(&self) -> &NotifyUrl {
        &self.notify_url
    }
}
