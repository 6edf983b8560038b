use serde::Deserialize;

use super::TransportError;
use super::money::TransportId;
use super::outbound::resource_reference_id;
use crate::domain::{
    CallbackData, ClientCorrelator, Criteria, InboundSmsMessage, InboundSmsMessageList,
    MoSubscription, NotifyUrl, SubscribeToInboundMessages, SubscriptionId,
};

const DESTINATION_ADDRESS_FIELD: &str = "destinationAddress";
const NOTIFICATION_FORMAT_FIELD: &str = "notificationFormat";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InboundSmsMessageJson {
    #[serde(default)]
    date_time: Option<String>,
    #[serde(default)]
    destination_address: Option<String>,
    #[serde(default)]
    message_id: Option<TransportId>,
    #[serde(default)]
    message: String,
    #[serde(default, rename = "resourceURL")]
    resource_url: Option<String>,
    #[serde(default)]
    sender_address: Option<String>,
}

impl InboundSmsMessageJson {
    pub(super) fn into_domain(self) -> InboundSmsMessage {
        InboundSmsMessage {
            date_time: self.date_time,
            destination_address: self.destination_address,
            message_id: self.message_id.map(TransportId::into_string),
            message: self.message,
            resource_url: self.resource_url,
            sender_address: self.sender_address,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InboundSmsMessageListJson {
    #[serde(default, rename = "inboundSMSMessage")]
    inbound_sms_message: Vec<InboundSmsMessageJson>,
    #[serde(default)]
    number_of_messages_in_this_batch: Option<u32>,
    #[serde(default)]
    total_number_of_pending_messages: Option<u32>,
    #[serde(default, rename = "resourceURL")]
    resource_url: Option<String>,
}

impl InboundSmsMessageListJson {
    pub(super) fn into_domain(self) -> InboundSmsMessageList {
        let messages = self
            .inbound_sms_message
            .into_iter()
            .map(InboundSmsMessageJson::into_domain)
            .collect::<Vec<_>>();
        let in_batch = self
            .number_of_messages_in_this_batch
            .unwrap_or(u32::try_from(messages.len()).unwrap_or(u32::MAX));
        InboundSmsMessageList {
            messages,
            number_of_messages_in_this_batch: in_batch,
            total_number_of_pending_messages: self.total_number_of_pending_messages.unwrap_or(0),
            resource_url: self.resource_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InboundSmsMessageListEnvelope {
    #[serde(rename = "inboundSMSMessageList")]
    list: InboundSmsMessageListJson,
}

#[derive(Debug, Deserialize)]
struct MoSubscriptionsEnvelope {
    #[serde(default)]
    subscriptions: Vec<MoSubscriptionJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoSubscriptionJson {
    #[serde(default)]
    subscription_id: Option<TransportId>,
    #[serde(default, rename = "notifyURL")]
    notify_url: Option<String>,
    #[serde(default)]
    callback_data: Option<String>,
    #[serde(default)]
    criteria: Option<String>,
    #[serde(default)]
    destination_address: Option<String>,
    #[serde(default)]
    notification_format: Option<String>,
}

pub fn encode_subscribe_inbound_form(request: &SubscribeToInboundMessages) -> Vec<(String, String)> {
    let mut params = vec![
        (
            DESTINATION_ADDRESS_FIELD.to_owned(),
            request.destination_address().as_str().to_owned(),
        ),
        (
            NotifyUrl::FIELD.to_owned(),
            request.notify_url().as_str().to_owned(),
        ),
    ];
    if let Some(criteria) = request.criteria.as_ref() {
        params.push((Criteria::FIELD.to_owned(), criteria.as_str().to_owned()));
    }
    if let Some(format) = request.notification_format.as_ref() {
        params.push((NOTIFICATION_FORMAT_FIELD.to_owned(), format.clone()));
    }
    if let Some(callback_data) = request.callback_data.as_ref() {
        params.push((
            CallbackData::FIELD.to_owned(),
            callback_data.as_str().to_owned(),
        ));
    }
    if let Some(client_correlator) = request.client_correlator.as_ref() {
        params.push((
            ClientCorrelator::FIELD.to_owned(),
            client_correlator.as_str().to_owned(),
        ));
    }
    params
}

pub fn decode_inbound_message_list(json: &str) -> Result<InboundSmsMessageList, TransportError> {
    let parsed: InboundSmsMessageListEnvelope = serde_json::from_str(json)?;
    Ok(parsed.list.into_domain())
}

pub fn decode_inbound_resource_reference(json: &str) -> Result<SubscriptionId, TransportError> {
    let id = resource_reference_id(json)?;
    SubscriptionId::new(id.clone()).map_err(|_| TransportError::MissingResourceId { value: id })
}

pub fn decode_mo_subscriptions(json: &str) -> Result<Vec<MoSubscription>, TransportError> {
    let parsed: MoSubscriptionsEnvelope = serde_json::from_str(json)?;
    Ok(parsed
        .subscriptions
        .into_iter()
        .map(|subscription| MoSubscription {
            subscription_id: subscription
                .subscription_id
                .and_then(|id| SubscriptionId::new(id.into_string()).ok()),
            notify_url: subscription.notify_url,
            callback_data: subscription.callback_data,
            criteria: subscription.criteria,
            destination_address: subscription.destination_address,
            notification_format: subscription.notification_format,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::domain::Address;

    use super::*;

    #[test]
    fn encode_subscribe_inbound_form_params() {
        let mut request = SubscribeToInboundMessages::new(
            Address::new("tel:+3851000").unwrap(),
            NotifyUrl::new("https://example.com/mo").unwrap(),
        );
        request.notification_format = Some("JSON".to_owned());
        request.callback_data = Some(CallbackData::new("cb").unwrap());

        assert_eq!(
            encode_subscribe_inbound_form(&request),
            vec![
                ("destinationAddress".to_owned(), "tel:+3851000".to_owned()),
                ("notifyURL".to_owned(), "https://example.com/mo".to_owned()),
                ("notificationFormat".to_owned(), "JSON".to_owned()),
                ("callbackData".to_owned(), "cb".to_owned()),
            ]
        );
    }

    #[test]
    fn decode_inbound_message_list_maps_messages() {
        let json = r#"
        {
          "inboundSMSMessageList": {
            "inboundSMSMessage": [
              {
                "dateTime": "2024-01-01T10:00:00Z",
                "destinationAddress": "3851000",
                "messageId": "m-1",
                "message": "hello",
                "resourceURL": "https://x.invalid/messages/m-1",
                "senderAddress": "tel:+385911111111"
              },
              {
                "messageId": 2,
                "message": "world"
              }
            ],
            "numberOfMessagesInThisBatch": 2,
            "totalNumberOfPendingMessages": 5
          }
        }
        "#;
        let list = decode_inbound_message_list(json).unwrap();
        assert_eq!(list.messages.len(), 2);
        assert_eq!(list.messages[0].message, "hello");
        assert_eq!(list.messages[1].message_id.as_deref(), Some("2"));
        assert_eq!(list.number_of_messages_in_this_batch, 2);
        assert_eq!(list.total_number_of_pending_messages, 5);
    }

    #[test]
    fn decode_inbound_message_list_defaults_counts() {
        let json = r#"{"inboundSMSMessageList": {"inboundSMSMessage": [{"message": "x"}]}}"#;
        let list = decode_inbound_message_list(json).unwrap();
        assert_eq!(list.number_of_messages_in_this_batch, 1);
        assert_eq!(list.total_number_of_pending_messages, 0);
    }

    #[test]
    fn decode_mo_subscriptions_accepts_numeric_ids() {
        let json = r#"
        {
          "subscriptions": [
            {"subscriptionId": 12, "notifyURL": "https://example.com/mo", "criteria": "STOP"},
            {"subscriptionId": "abc", "destinationAddress": "3851000"}
          ]
        }
        "#;
        let subscriptions = decode_mo_subscriptions(json).unwrap();
        assert_eq!(subscriptions.len(), 2);
        assert_eq!(
            subscriptions[0].subscription_id,
            Some(SubscriptionId::new("12").unwrap())
        );
        assert_eq!(subscriptions[0].criteria.as_deref(), Some("STOP"));
        assert_eq!(
            subscriptions[1].destination_address.as_deref(),
            Some("3851000")
        );
    }

    #[test]
    fn decode_inbound_resource_reference_returns_subscription_id() {
        let json = r#"{"resourceReference": {"resourceURL": "https://x.invalid/smsmessaging/inbound/subscriptions/mo-7"}}"#;
        assert_eq!(
            decode_inbound_resource_reference(json).unwrap().as_str(),
            "mo-7"
        );
    }
}
