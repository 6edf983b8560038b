//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::NotificationConfig;
use crate::domain::{
    DeliveryInfoList, DeliveryInfoNotification, DeliveryReport, DeliveryReportSubscription,
    InboundMessageNotification, InboundSmsMessageList, IbssoToken, MoSubscription, Pagination,
    Password, RequestErrorKind, RequestId, SendSms, SenderAddress, SubscribeToDeliveryNotifications,
    SubscribeToInboundMessages, SubscriptionId, Username, ValidationError,
};
use crate::notify::BoxFuture;
use crate::transport::{self, TransportError};

#[cfg(test)]
mod fake;
mod listeners;

use listeners::ListenerHub;

const DEFAULT_BASE_URL: &str = "https://oneapi.infobip.com/1";

const OUTBOUND: [&str; 2] = ["smsmessaging", "outbound"];
const INBOUND: [&str; 2] = ["smsmessaging", "inbound"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: String,
    form: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        auth: &'a Auth,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        auth: &'a Auth,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url).form(&request.form),
                HttpMethod::Delete => self.client.delete(&request.url),
            };
            let builder = match auth {
                Auth::Basic { username, password } => {
                    builder.basic_auth(username.as_str(), Some(password.as_str()))
                }
                Auth::Ibsso(token) => builder.header(
                    reqwest::header::AUTHORIZATION,
                    format!("IBSSO {}", token.as_str()),
                ),
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Credentials sent with every OneAPI request.
///
/// Use [`Auth::basic`] for username/password (HTTP Basic) or [`Auth::ibsso`] when you
/// already hold an IBSSO session token.
pub enum Auth {
    Basic {
        username: Username,
        password: Password,
    },
    /// Sent as `Authorization: IBSSO <token>`.
    Ibsso(IbssoToken),
}

impl Auth {
    /// Create [`Auth::Basic`] and validate that both parts are non-empty.
    pub fn basic(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::Basic {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    /// Create [`Auth::Ibsso`] and validate that the token is non-empty after trimming.
    pub fn ibsso(token: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::Ibsso(IbssoToken::new(token)?))
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`OneApiClient`] and its notification listeners.
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - API-level failures (a `requestError` body),
/// - validation/parse failures,
/// - failures to start background notification delivery.
pub enum OneApiError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code without a recognisable error body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// OneAPI rejected the request with a `serviceException` or `policyException`.
    #[error("API error {message_id} (HTTP {status}): {text}")]
    Api {
        status: u16,
        kind: RequestErrorKind,
        message_id: String,
        text: String,
        variables: Vec<String>,
    },

    /// Response or pushed body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The local push endpoint could not be bound.
    #[error("cannot bind push endpoint on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Background notification delivery was started outside a Tokio runtime.
    #[error("no Tokio runtime available to run notification delivery")]
    NoRuntime,
}

impl From<TransportError> for OneApiError {
    fn from(err: TransportError) -> Self {
        Self::Parse(Box::new(err))
    }
}

/// Decode a delivery status notification pushed to a `notifyURL`.
///
/// Accepts the body wrapped in `deliveryInfoNotification` or bare.
pub fn decode_delivery_info_notification(
    body: &[u8],
) -> Result<DeliveryInfoNotification, OneApiError> {
    Ok(transport::decode_delivery_info_notification(body)?)
}

/// Decode an inbound message payload pushed to a `notifyURL`, one notification per message.
pub fn decode_inbound_message_notifications(
    body: &[u8],
) -> Result<Vec<InboundMessageNotification>, OneApiError> {
    Ok(transport::decode_inbound_message_notifications(body)?)
}

#[derive(Debug, Clone)]
/// Builder for [`OneApiClient`].
///
/// Use this when you need to customize the base URL, timeout, user-agent, or the
/// notification settings.
pub struct OneApiClientBuilder {
    auth: Auth,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    notifications: NotificationConfig,
}

impl OneApiClientBuilder {
    /// Create a builder with the default base URL and notification settings.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            notifications: NotificationConfig::default(),
        }
    }

    /// Override the API base URL; resource paths are appended to it.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace every notification setting at once.
    pub fn notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn dlr_retrieving_interval(mut self, interval: Duration) -> Self {
        self.notifications.dlr_retrieving_interval = interval;
        self
    }

    pub fn inbound_messages_retrieving_interval(mut self, interval: Duration) -> Self {
        self.notifications.inbound_messages_retrieving_interval = interval;
        self
    }

    pub fn dlr_status_push_port(mut self, port: u16) -> Self {
        self.notifications.dlr_status_push_server_simulator_port = port;
        self
    }

    pub fn inbound_messages_push_port(mut self, port: u16) -> Self {
        self.notifications.inbound_messages_push_server_simulator_port = port;
        self
    }

    /// Build a [`OneApiClient`].
    pub fn build(self) -> Result<OneApiClient, OneApiError> {
        match url::Url::parse(&self.base_url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            _ => {
                return Err(ValidationError::InvalidUrl {
                    field: "baseUrl",
                    input: self.base_url,
                }
                .into());
            }
        }
        self.notifications.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| OneApiError::Transport(Box::new(err)))?;

        Ok(OneApiClient {
            connection: Connection {
                auth: self.auth,
                base_url: self.base_url,
                http: Arc::new(ReqwestTransport { client }),
            },
            notifications: self.notifications,
            listeners: Arc::new(ListenerHub::new()),
        })
    }
}

#[derive(Clone)]
/// High-level OneAPI SMS messaging client.
///
/// Besides the request/response operations, the client owns the notification
/// listeners: registering the first PULL listener of a kind starts polling, registering
/// the first PUSH listener binds the local callback endpoint, and removing the
/// listeners stops the activity again. Clones share the same listeners.
///
/// Background activities end when the last clone is dropped.
pub struct OneApiClient {
    connection: Connection,
    notifications: NotificationConfig,
    listeners: Arc<ListenerHub>,
}

/// Credentials, base URL and HTTP transport: everything needed to issue a request.
///
/// Polling tasks hold their own clone so they never keep the listeners alive.
#[derive(Clone)]
struct Connection {
    auth: Auth,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl OneApiClient {
    /// Create a client using the default base URL and notification settings.
    ///
    /// For more customization, use [`OneApiClient::builder`].
    pub fn new(auth: Auth) -> Self {
        Self {
            connection: Connection {
                auth,
                base_url: DEFAULT_BASE_URL.to_owned(),
                http: Arc::new(ReqwestTransport {
                    client: reqwest::Client::new(),
                }),
            },
            notifications: NotificationConfig::default(),
            listeners: Arc::new(ListenerHub::new()),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> OneApiClientBuilder {
        OneApiClientBuilder::new(auth)
    }

    pub fn notifications(&self) -> &NotificationConfig {
        &self.notifications
    }

    /// Send an SMS to one or more recipients. Returns the id of the created request.
    ///
    /// Errors:
    /// - [`OneApiError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`OneApiError::Api`] when OneAPI answers with a `requestError`,
    /// - [`OneApiError::Parse`] when the `resourceReference` cannot be read.
    pub async fn send_sms(&self, request: SendSms) -> Result<RequestId, OneApiError> {
        let url = self.url(
            &[
                OUTBOUND[0],
                OUTBOUND[1],
                request.sender_address().as_str(),
                "requests",
            ],
            &[],
        )?;
        let body = self
            .call(HttpMethod::Post, url, transport::encode_send_sms_form(&request))
            .await?;
        Ok(transport::decode_send_sms_response(&body)?)
    }

    /// Delivery status of every recipient of a sent request.
    pub async fn query_delivery_status(
        &self,
        sender_address: &SenderAddress,
        request_id: &RequestId,
    ) -> Result<DeliveryInfoList, OneApiError> {
        let url = self.url(
            &[
                OUTBOUND[0],
                OUTBOUND[1],
                sender_address.as_str(),
                "requests",
                request_id.as_str(),
                "deliveryInfos",
            ],
            &[],
        )?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_delivery_info_list(&body)?)
    }

    /// Subscribe a `notifyURL` to delivery notifications, optionally scoped to one sender.
    pub async fn subscribe_to_delivery_notifications(
        &self,
        request: SubscribeToDeliveryNotifications,
    ) -> Result<SubscriptionId, OneApiError> {
        let mut segments = OUTBOUND.to_vec();
        if let Some(sender_address) = request.sender_address.as_ref() {
            segments.push(sender_address.as_str());
        }
        segments.push("subscriptions");

        let url = self.url(&segments, &[])?;
        let body = self
            .call(
                HttpMethod::Post,
                url,
                transport::encode_subscribe_delivery_form(&request),
            )
            .await?;
        Ok(transport::decode_delivery_receipt_subscription_id(&body)?)
    }

    pub async fn delivery_notification_subscriptions_by_sender(
        &self,
        sender_address: &SenderAddress,
    ) -> Result<Vec<DeliveryReportSubscription>, OneApiError> {
        let url = self.url(
            &[
                OUTBOUND[0],
                OUTBOUND[1],
                sender_address.as_str(),
                "subscriptions",
            ],
            &[],
        )?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_delivery_receipt_subscriptions(&body)?)
    }

    pub async fn delivery_notification_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<DeliveryReportSubscription, OneApiError> {
        let url = self.url(
            &[
                OUTBOUND[0],
                OUTBOUND[1],
                "subscriptions",
                subscription_id.as_str(),
            ],
            &[],
        )?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_delivery_receipt_subscription(&body)?)
    }

    pub async fn delivery_notification_subscriptions(
        &self,
    ) -> Result<Vec<DeliveryReportSubscription>, OneApiError> {
        let url = self.url(&[OUTBOUND[0], OUTBOUND[1], "subscriptions"], &[])?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_delivery_receipt_subscriptions(&body)?)
    }

    pub async fn remove_delivery_notification_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<(), OneApiError> {
        let url = self.url(
            &[
                OUTBOUND[0],
                OUTBOUND[1],
                "subscriptions",
                subscription_id.as_str(),
            ],
            &[],
        )?;
        self.call(HttpMethod::Delete, url, Vec::new()).await?;
        Ok(())
    }

    /// Fetch pending inbound messages, at most `max_batch_size` of them.
    ///
    /// Retrieved messages are removed from the provider's queue.
    pub async fn inbound_messages(
        &self,
        max_batch_size: u32,
    ) -> Result<InboundSmsMessageList, OneApiError> {
        self.connection.inbound_messages(max_batch_size).await
    }

    pub async fn subscribe_to_inbound_messages(
        &self,
        request: SubscribeToInboundMessages,
    ) -> Result<SubscriptionId, OneApiError> {
        let url = self.url(&[INBOUND[0], INBOUND[1], "subscriptions"], &[])?;
        let body = self
            .call(
                HttpMethod::Post,
                url,
                transport::encode_subscribe_inbound_form(&request),
            )
            .await?;
        Ok(transport::decode_inbound_resource_reference(&body)?)
    }

    pub async fn inbound_message_subscriptions(
        &self,
        page: Pagination,
    ) -> Result<Vec<MoSubscription>, OneApiError> {
        let url = self.url(
            &[INBOUND[0], INBOUND[1], "subscriptions"],
            &[
                (Pagination::PAGE_FIELD, page.page().to_string()),
                (Pagination::PAGE_SIZE_FIELD, page.page_size().to_string()),
            ],
        )?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_mo_subscriptions(&body)?)
    }

    pub async fn remove_inbound_message_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<(), OneApiError> {
        let url = self.url(
            &[
                INBOUND[0],
                INBOUND[1],
                "subscriptions",
                subscription_id.as_str(),
            ],
            &[],
        )?;
        self.call(HttpMethod::Delete, url, Vec::new()).await?;
        Ok(())
    }

    /// Fetch delivery reports not retrieved yet.
    ///
    /// `None` lets the provider choose how many reports to return.
    pub async fn delivery_reports(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<DeliveryReport>, OneApiError> {
        self.connection.delivery_reports(limit).await
    }

    pub async fn delivery_reports_by_request_id(
        &self,
        request_id: &RequestId,
        limit: Option<u32>,
    ) -> Result<Vec<DeliveryReport>, OneApiError> {
        let url = self.url(
            &[
                OUTBOUND[0],
                OUTBOUND[1],
                "requests",
                request_id.as_str(),
                "deliveryReports",
            ],
            &[("limit", limit.unwrap_or(0).to_string())],
        )?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_delivery_reports(&body)?)
    }

    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<String, OneApiError> {
        self.connection.url(segments, query)
    }

    async fn call(
        &self,
        method: HttpMethod,
        url: String,
        form: Vec<(String, String)>,
    ) -> Result<String, OneApiError> {
        self.connection.call(method, url, form).await
    }
}

impl Connection {
    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<String, OneApiError> {
        Ok(transport::endpoint_url(&self.base_url, segments, query)?)
    }

    /// Execute a request and return the body of a 2xx response.
    async fn call(
        &self,
        method: HttpMethod,
        url: String,
        form: Vec<(String, String)>,
    ) -> Result<String, OneApiError> {
        debug!(?method, url = %url, "sending OneAPI request");
        let response = self
            .http
            .execute(&self.auth, HttpRequest { method, url, form })
            .await
            .map_err(OneApiError::Transport)?;

        if (200..=299).contains(&response.status) {
            return Ok(response.body);
        }

        if let Some(err) = transport::decode_request_error(&response.body) {
            return Err(OneApiError::Api {
                status: response.status,
                kind: err.kind,
                message_id: err.message_id,
                text: err.text,
                variables: err.variables,
            });
        }
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };
        Err(OneApiError::HttpStatus {
            status: response.status,
            body,
        })
    }

    async fn inbound_messages(
        &self,
        max_batch_size: u32,
    ) -> Result<InboundSmsMessageList, OneApiError> {
        let url = self.url(
            &[INBOUND[0], INBOUND[1], "registrations", "INBOUND", "messages"],
            &[("maxBatchSize", max_batch_size.to_string())],
        )?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_inbound_message_list(&body)?)
    }

    async fn delivery_reports(&self, limit: Option<u32>) -> Result<Vec<DeliveryReport>, OneApiError> {
        let url = self.url(
            &[OUTBOUND[0], OUTBOUND[1], "requests", "deliveryReports"],
            &[("limit", limit.unwrap_or(0).to_string())],
        )?;
        let body = self.call(HttpMethod::Get, url, Vec::new()).await?;
        Ok(transport::decode_delivery_reports(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeTransport, assert_param, make_client};
    use super::*;
    use crate::domain::{Address, DeliveryStatus, MessageText, NotifyUrl, PhoneNumber, SendOptions};

    fn send_request() -> SendSms {
        let phone = PhoneNumber::parse(Some(phonenumber::country::Id::RU), "79251234567").unwrap();
        SendSms::new(
            SenderAddress::new("tel:+38598123456").unwrap(),
            vec![Address::from(phone)],
            MessageText::new("hello").unwrap(),
            SendOptions::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn send_sms_posts_form_and_returns_request_id() {
        let json = r#"
        {
          "resourceReference": {
            "resourceURL": "https://example.invalid/1/smsmessaging/outbound/tel%3A%2B38598123456/requests/req-42"
          }
        }
        "#;
        let transport = FakeTransport::new().respond(201, json);
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());

        let request_id = client.send_sms(send_request()).await.unwrap();
        assert_eq!(request_id.as_str(), "req-42");

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.url,
            "https://example.invalid/1/smsmessaging/outbound/tel:+38598123456/requests"
        );
        assert_param(&request.form, "senderAddress", "tel:+38598123456");
        assert_param(&request.form, "address", "tel:+79251234567");
        assert_param(&request.form, "message", "hello");
        assert_eq!(transport.last_authorization(), "Basic user:pass");
    }

    #[tokio::test]
    async fn ibsso_token_is_passed_to_the_transport() {
        let transport = FakeTransport::new().respond(200, r#"{"deliveryReportList": []}"#);
        let client = make_client(Auth::ibsso("token-1").unwrap(), transport.clone());

        client.delivery_reports(None).await.unwrap();
        assert_eq!(transport.last_authorization(), "IBSSO token-1");
    }

    #[tokio::test]
    async fn request_error_body_maps_to_api_error() {
        let json = r#"
        {
          "requestError": {
            "serviceException": {
              "messageId": "SVC0004",
              "text": "No valid addresses provided in message part %1",
              "variables": ["address"]
            }
          }
        }
        "#;
        let transport = FakeTransport::new().respond(400, json);
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport);

        let err = client.send_sms(send_request()).await.unwrap_err();
        match err {
            OneApiError::Api {
                status,
                kind,
                message_id,
                variables,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(kind, RequestErrorKind::Service);
                assert_eq!(message_id, "SVC0004");
                assert_eq!(variables, vec!["address".to_owned()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_without_error_body_maps_to_http_status() {
        let transport = FakeTransport::new().respond(500, "oops").respond(503, "   ");
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport);

        assert!(matches!(
            client.delivery_reports(None).await.unwrap_err(),
            OneApiError::HttpStatus {
                status: 500,
                body: Some(_)
            }
        ));
        assert!(matches!(
            client.delivery_reports(None).await.unwrap_err(),
            OneApiError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn invalid_json_maps_to_parse_error() {
        let transport = FakeTransport::new().respond(200, "{ not json }");
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport);

        let err = client.delivery_reports(Some(5)).await.unwrap_err();
        assert!(matches!(err, OneApiError::Parse(_)));
    }

    #[tokio::test]
    async fn query_delivery_status_uses_request_path() {
        let json = r#"
        {
          "deliveryInfoList": {
            "deliveryInfo": [
              {"address": "tel:+79251234567", "deliveryStatus": "DeliveredToTerminal"}
            ],
            "resourceURL": "https://example.invalid/1/smsmessaging/outbound/3855/requests/abc/deliveryInfos"
          }
        }
        "#;
        let transport = FakeTransport::new().respond(200, json);
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());

        let list = client
            .query_delivery_status(
                &SenderAddress::new("3855").unwrap(),
                &RequestId::new("abc").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            list.delivery_info[0].delivery_status,
            DeliveryStatus::DeliveredToTerminal
        );

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "https://example.invalid/1/smsmessaging/outbound/3855/requests/abc/deliveryInfos"
        );
        assert!(request.form.is_empty());
    }

    #[tokio::test]
    async fn delivery_subscription_path_includes_optional_sender() {
        let json = r#"
        {
          "deliveryReceiptSubscription": {
            "callbackReference": {"notifyURL": "http://localhost:3000/dlr"},
            "resourceURL": "https://example.invalid/1/smsmessaging/outbound/subscriptions/sub-1"
          }
        }
        "#;
        let transport = FakeTransport::new().respond(201, json).respond(201, json);
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());
        let notify_url = NotifyUrl::new("http://localhost:3000/dlr").unwrap();

        let id = client
            .subscribe_to_delivery_notifications(SubscribeToDeliveryNotifications::new(
                notify_url.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(id.as_str(), "sub-1");
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/1/smsmessaging/outbound/subscriptions"
        );

        let mut request = SubscribeToDeliveryNotifications::new(notify_url);
        request.sender_address = Some(SenderAddress::new("3855").unwrap());
        client
            .subscribe_to_delivery_notifications(request)
            .await
            .unwrap();
        let request = transport.last_request();
        assert_eq!(
            request.url,
            "https://example.invalid/1/smsmessaging/outbound/3855/subscriptions"
        );
        assert_param(&request.form, "notifyURL", "http://localhost:3000/dlr");
    }

    #[tokio::test]
    async fn delivery_subscription_queries_and_removal() {
        let single = r#"
        {
          "deliveryReceiptSubscription": {
            "criteria": "promo",
            "resourceURL": "https://example.invalid/1/smsmessaging/outbound/subscriptions/sub-9"
          }
        }
        "#;
        let many = r#"
        {
          "deliveryReceiptSubscriptions": [
            {"resourceURL": "https://example.invalid/1/smsmessaging/outbound/subscriptions/a"},
            {"resourceURL": "https://example.invalid/1/smsmessaging/outbound/subscriptions/b"}
          ]
        }
        "#;
        let transport = FakeTransport::new()
            .respond(200, single)
            .respond(200, many)
            .respond(200, many)
            .respond(204, "");
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());
        let id = SubscriptionId::new("sub-9").unwrap();

        let subscription = client.delivery_notification_subscription(&id).await.unwrap();
        assert_eq!(subscription.criteria.as_deref(), Some("promo"));
        assert_eq!(subscription.subscription_id, Some(id.clone()));

        let by_sender = client
            .delivery_notification_subscriptions_by_sender(&SenderAddress::new("3855").unwrap())
            .await
            .unwrap();
        assert_eq!(by_sender.len(), 2);
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/1/smsmessaging/outbound/3855/subscriptions"
        );

        assert_eq!(
            client.delivery_notification_subscriptions().await.unwrap().len(),
            2
        );

        client
            .remove_delivery_notification_subscription(&id)
            .await
            .unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(
            request.url,
            "https://example.invalid/1/smsmessaging/outbound/subscriptions/sub-9"
        );
    }

    #[tokio::test]
    async fn inbound_messages_sends_batch_size() {
        let json = r#"
        {
          "inboundSMSMessageList": {
            "inboundSMSMessage": [
              {
                "dateTime": "2013-03-26T10:38:52Z",
                "destinationAddress": "3855",
                "messageId": "m-1",
                "message": "hi",
                "senderAddress": "tel:+79251234567"
              }
            ],
            "numberOfMessagesInThisBatch": 1,
            "totalNumberOfPendingMessages": 0
          }
        }
        "#;
        let transport = FakeTransport::new().respond(200, json);
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());

        let list = client.inbound_messages(50).await.unwrap();
        assert_eq!(list.messages.len(), 1);
        assert_eq!(list.messages[0].message, "hi");
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/1/smsmessaging/inbound/registrations/INBOUND/messages?maxBatchSize=50"
        );
    }

    #[tokio::test]
    async fn inbound_subscriptions_apply_pagination() {
        let json = r#"{"subscriptions": [{"subscriptionId": 7, "notifyURL": "http://localhost:3001/mo"}]}"#;
        let transport = FakeTransport::new().respond(200, json);
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());

        let subscriptions = client
            .inbound_message_subscriptions(Pagination::new(2, 25).unwrap())
            .await
            .unwrap();
        assert_eq!(
            subscriptions[0].subscription_id.as_ref().map(SubscriptionId::as_str),
            Some("7")
        );
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/1/smsmessaging/inbound/subscriptions?page=2&pageSize=25"
        );
    }

    #[tokio::test]
    async fn inbound_subscribe_and_remove() {
        let created = r#"
        {
          "resourceReference": {
            "resourceURL": "https://example.invalid/1/smsmessaging/inbound/subscriptions/mo-3"
          }
        }
        "#;
        let transport = FakeTransport::new().respond(201, created).respond(204, "");
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());

        let request = SubscribeToInboundMessages::new(
            Address::new("3855").unwrap(),
            NotifyUrl::new("http://localhost:3001/mo").unwrap(),
        );
        let id = client.subscribe_to_inbound_messages(request).await.unwrap();
        assert_eq!(id.as_str(), "mo-3");
        assert_param(&transport.last_request().form, "destinationAddress", "3855");

        client.remove_inbound_message_subscription(&id).await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(
            request.url,
            "https://example.invalid/1/smsmessaging/inbound/subscriptions/mo-3"
        );
    }

    #[tokio::test]
    async fn delivery_reports_send_limit() {
        let json = r#"
        {
          "deliveryReportList": [
            {
              "requestId": "req-1",
              "messageId": "msg-1",
              "deliveryStatus": "DeliveredToTerminal",
              "price": 0.01,
              "currency": "EUR"
            }
          ]
        }
        "#;
        let transport = FakeTransport::new().respond(200, json).respond(200, json);
        let client = make_client(Auth::basic("user", "pass").unwrap(), transport.clone());

        let reports = client.delivery_reports(None).await.unwrap();
        assert_eq!(reports[0].price.as_deref(), Some("0.01"));
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/1/smsmessaging/outbound/requests/deliveryReports?limit=0"
        );

        client
            .delivery_reports_by_request_id(&RequestId::new("req-1").unwrap(), Some(10))
            .await
            .unwrap();
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/1/smsmessaging/outbound/requests/req-1/deliveryReports?limit=10"
        );
    }

    #[test]
    fn auth_constructors_validate_inputs() {
        assert!(Auth::basic("", "pass").is_err());
        assert!(Auth::basic("user", "   ").is_err());
        assert!(Auth::ibsso("").is_err());
    }

    #[test]
    fn builder_validates_base_url_and_notification_settings() {
        let auth = Auth::basic("user", "pass").unwrap();

        let client = OneApiClient::builder(auth.clone())
            .base_url("https://example.invalid/1")
            .dlr_retrieving_interval(Duration::from_millis(250))
            .inbound_messages_push_port(0)
            .build()
            .unwrap();
        assert_eq!(client.connection.base_url, "https://example.invalid/1");
        assert_eq!(
            client.notifications().dlr_retrieving_interval,
            Duration::from_millis(250)
        );
        assert_eq!(
            client
                .notifications()
                .inbound_messages_push_server_simulator_port,
            0
        );

        assert!(matches!(
            OneApiClient::builder(auth.clone()).base_url("not a url").build(),
            Err(OneApiError::Validation(ValidationError::InvalidUrl { .. }))
        ));
        assert!(matches!(
            OneApiClient::builder(auth)
                .inbound_messages_retrieving_interval(Duration::ZERO)
                .build(),
            Err(OneApiError::Validation(ValidationError::ZeroInterval { .. }))
        ));
    }

    #[test]
    fn public_push_decoders_map_errors_to_parse() {
        let notification = decode_delivery_info_notification(
            br#"{"deliveryInfoNotification": {"deliveryInfo": {"address": "tel:+1", "deliveryStatus": "DeliveryImpossible"}, "callbackData": "cb"}}"#,
        )
        .unwrap();
        assert_eq!(notification.callback_data.as_deref(), Some("cb"));

        assert!(matches!(
            decode_inbound_message_notifications(b"{ broken"),
            Err(OneApiError::Parse(_))
        ));
    }
}
