use serde::Deserialize;

use super::TransportError;
use super::money::{TransportId, TransportMoney};
use super::path::id_from_resource_url;
use crate::domain::{
    Address, CallbackData, CallbackReference, ClientCorrelator, Criteria, DeliveryInfo,
    DeliveryInfoList, DeliveryReport, DeliveryReportSubscription, DeliveryStatus, MessageText,
    NotifyUrl, RequestId, SendSms, SenderAddress, SenderName, SubscribeToDeliveryNotifications,
    SubscriptionId,
};

#[derive(Debug, Deserialize)]
struct ResourceReferenceEnvelope {
    #[serde(rename = "resourceReference")]
    resource_reference: ResourceReferenceJson,
}

#[derive(Debug, Deserialize)]
struct ResourceReferenceJson {
    #[serde(rename = "resourceURL")]
    resource_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct DeliveryInfoJson {
    address: String,
    #[serde(rename = "deliveryStatus")]
    delivery_status: String,
}

impl DeliveryInfoJson {
    pub(super) fn into_domain(self) -> DeliveryInfo {
        DeliveryInfo {
            address: self.address,
            delivery_status: DeliveryStatus::from_wire(&self.delivery_status),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeliveryInfoListEnvelope {
    #[serde(rename = "deliveryInfoList")]
    delivery_info_list: DeliveryInfoListJson,
}

#[derive(Debug, Deserialize)]
struct DeliveryInfoListJson {
    #[serde(default, rename = "deliveryInfo")]
    delivery_info: Vec<DeliveryInfoJson>,
    #[serde(default, rename = "resourceURL")]
    resource_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeliveryReportListEnvelope {
    #[serde(rename = "deliveryReportList")]
    delivery_report_list: Vec<DeliveryReportJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryReportJson {
    #[serde(default)]
    request_id: Option<TransportId>,
    #[serde(default)]
    message_id: Option<TransportId>,
    #[serde(default)]
    sent_date_time: Option<String>,
    #[serde(default)]
    done_date_time: Option<String>,
    #[serde(alias = "status")]
    delivery_status: String,
    #[serde(default, alias = "pricePerMessage")]
    price: Option<TransportMoney>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionEnvelope {
    #[serde(rename = "deliveryReceiptSubscription")]
    subscription: DeliveryReceiptSubscriptionJson,
}

#[derive(Debug, Deserialize)]
struct SubscriptionsEnvelope {
    #[serde(default, rename = "deliveryReceiptSubscriptions")]
    subscriptions: Vec<DeliveryReceiptSubscriptionJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryReceiptSubscriptionJson {
    #[serde(default)]
    callback_reference: Option<CallbackReferenceJson>,
    #[serde(default)]
    criteria: Option<String>,
    #[serde(default, rename = "resourceURL")]
    resource_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallbackReferenceJson {
    #[serde(default, rename = "notifyURL")]
    notify_url: Option<String>,
    #[serde(default)]
    callback_data: Option<String>,
}

pub fn encode_send_sms_form(request: &SendSms) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    params.push((
        SenderAddress::FIELD.to_owned(),
        request.sender_address().as_str().to_owned(),
    ));
    for address in request.recipients() {
        params.push((Address::FIELD.to_owned(), address.as_str().to_owned()));
    }
    params.push((
        MessageText::FIELD.to_owned(),
        request.message().as_str().to_owned(),
    ));

    let options = request.options();
    if let Some(sender_name) = options.sender_name.as_ref() {
        params.push((SenderName::FIELD.to_owned(), sender_name.as_str().to_owned()));
    }
    if let Some(client_correlator) = options.client_correlator.as_ref() {
        params.push((
            ClientCorrelator::FIELD.to_owned(),
            client_correlator.as_str().to_owned(),
        ));
    }
    if let Some(notify_url) = options.notify_url.as_ref() {
        params.push((NotifyUrl::FIELD.to_owned(), notify_url.as_str().to_owned()));
    }
    if let Some(callback_data) = options.callback_data.as_ref() {
        params.push((
            CallbackData::FIELD.to_owned(),
            callback_data.as_str().to_owned(),
        ));
    }

    params
}

pub fn encode_subscribe_delivery_form(
    request: &SubscribeToDeliveryNotifications,
) -> Vec<(String, String)> {
    let mut params = vec![(
        NotifyUrl::FIELD.to_owned(),
        request.notify_url().as_str().to_owned(),
    )];
    if let Some(criteria) = request.criteria.as_ref() {
        params.push((Criteria::FIELD.to_owned(), criteria.as_str().to_owned()));
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

/// Id of a resource created by a POST answered with `resourceReference`.
pub(super) fn resource_reference_id(json: &str) -> Result<String, TransportError> {
    let parsed: ResourceReferenceEnvelope = serde_json::from_str(json)?;
    let url = parsed.resource_reference.resource_url;
    match id_from_resource_url(&url) {
        Some(id) => Ok(id.to_owned()),
        None => Err(TransportError::MissingResourceId { value: url }),
    }
}

pub fn decode_send_sms_response(json: &str) -> Result<RequestId, TransportError> {
    let id = resource_reference_id(json)?;
    RequestId::new(id.clone()).map_err(|_| TransportError::MissingResourceId { value: id })
}

pub fn decode_delivery_info_list(json: &str) -> Result<DeliveryInfoList, TransportError> {
    let parsed: DeliveryInfoListEnvelope = serde_json::from_str(json)?;
    let list = parsed.delivery_info_list;
    Ok(DeliveryInfoList {
        delivery_info: list
            .delivery_info
            .into_iter()
            .map(DeliveryInfoJson::into_domain)
            .collect(),
        resource_url: list.resource_url,
    })
}

pub fn decode_delivery_reports(json: &str) -> Result<Vec<DeliveryReport>, TransportError> {
    let parsed: DeliveryReportListEnvelope = serde_json::from_str(json)?;
    Ok(parsed
        .delivery_report_list
        .into_iter()
        .map(|report| DeliveryReport {
            request_id: report
                .request_id
                .and_then(|id| RequestId::new(id.into_string()).ok()),
            message_id: report.message_id.map(TransportId::into_string),
            sent_date_time: report.sent_date_time,
            done_date_time: report.done_date_time,
            delivery_status: DeliveryStatus::from_wire(&report.delivery_status),
            price: report.price.map(TransportMoney::into_string),
            currency: report.currency,
        })
        .collect())
}

pub fn decode_delivery_receipt_subscription_id(
    json: &str,
) -> Result<SubscriptionId, TransportError> {
    let parsed: SubscriptionEnvelope = serde_json::from_str(json)?;
    let url = parsed.subscription.resource_url.unwrap_or_default();
    id_from_resource_url(&url)
        .and_then(|id| SubscriptionId::new(id).ok())
        .ok_or(TransportError::MissingResourceId { value: url })
}

pub fn decode_delivery_receipt_subscription(
    json: &str,
) -> Result<DeliveryReportSubscription, TransportError> {
    let parsed: SubscriptionEnvelope = serde_json::from_str(json)?;
    Ok(subscription_into_domain(parsed.subscription))
}

pub fn decode_delivery_receipt_subscriptions(
    json: &str,
) -> Result<Vec<DeliveryReportSubscription>, TransportError> {
    let parsed: SubscriptionsEnvelope = serde_json::from_str(json)?;
    Ok(parsed
        .subscriptions
        .into_iter()
        .map(subscription_into_domain)
        .collect())
}

fn subscription_into_domain(value: DeliveryReceiptSubscriptionJson) -> DeliveryReportSubscription {
    DeliveryReportSubscription {
        subscription_id: value
            .resource_url
            .as_deref()
            .and_then(id_from_resource_url)
            .and_then(|id| SubscriptionId::new(id).ok()),
        callback_reference: value.callback_reference.map(|reference| CallbackReference {
            notify_url: reference.notify_url,
            callback_data: reference.callback_data,
        }),
        criteria: value.criteria,
        resource_url: value.resource_url,
    }
}
