use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// OneAPI account username used for HTTP Basic authentication.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// OneAPI account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(..)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// IBSSO session token, sent as `Authorization: IBSSO <token>`.
///
/// Invariant: non-empty after trimming.
pub struct IbssoToken(String);

impl IbssoToken {
    pub const FIELD: &'static str = "ibssoToken";

    /// Create a validated [`IbssoToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for IbssoToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IbssoToken(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Destination address of an outbound message (`address`), usually `tel:+<E.164>`.
///
/// Invariant: non-empty after trimming. No normalization is applied; parse into
/// [`PhoneNumber`] and convert if you want the `tel:` E.164 form.
pub struct Address(String);

impl Address {
    /// Form field name used by OneAPI (`address`).
    pub const FIELD: &'static str = "address";

    /// Create a validated (non-empty) address.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to OneAPI.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Address {
    fn from(value: PhoneNumber) -> Self {
        Self(format!("tel:{}", value.e164))
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    pub const FIELD: &'static str = "address";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    /// A leading `tel:` scheme is accepted and stripped.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let trimmed = input.trim();
        let raw = trimmed.strip_prefix("tel:").unwrap_or(trimmed).to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming (without the `tel:` scheme).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Address the message is sent from (`senderAddress`); also a path segment.
///
/// Invariant: non-empty after trimming.
pub struct SenderAddress(String);

impl SenderAddress {
    /// Form field name used by OneAPI (`senderAddress`).
    pub const FIELD: &'static str = "senderAddress";

    /// Create a validated [`SenderAddress`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Alphanumeric sender name shown on the handset (`senderName`).
///
/// Invariant: non-empty after trimming.
pub struct SenderName(String);

impl SenderName {
    /// Form field name used by OneAPI (`senderName`).
    pub const FIELD: &'static str = "senderName";

    /// Create a validated [`SenderName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`message`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by OneAPI (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Caller-chosen idempotency key (`clientCorrelator`).
///
/// Invariant: non-empty after trimming.
pub struct ClientCorrelator(String);

impl ClientCorrelator {
    pub const FIELD: &'static str = "clientCorrelator";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Opaque data echoed back in notifications (`callbackData`).
///
/// Invariant: non-empty. The value is passed through untouched.
pub struct CallbackData(String);

impl CallbackData {
    pub const FIELD: &'static str = "callbackData";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Subscription filter (`criteria`), e.g. a keyword for inbound messages.
///
/// Invariant: non-empty after trimming.
pub struct Criteria(String);

impl Criteria {
    pub const FIELD: &'static str = "criteria";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// URL the provider pushes notifications to (`notifyURL`).
///
/// Invariant: absolute `http` or `https` URL.
pub struct NotifyUrl(String);

impl NotifyUrl {
    /// Form field name used by OneAPI (`notifyURL`).
    pub const FIELD: &'static str = "notifyURL";

    /// Create a validated notify URL.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        match url::Url::parse(trimmed) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(ValidationError::InvalidUrl {
                field: Self::FIELD,
                input: trimmed.to_owned(),
            }),
        }
    }

    /// Borrow the validated URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of a send request, taken from the `resourceURL` returned by `send_sms`.
///
/// Invariant: non-empty after trimming.
pub struct RequestId(String);

impl RequestId {
    pub const FIELD: &'static str = "requestId";

    /// Create a validated [`RequestId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated request id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of a delivery-receipt or inbound-message subscription.
///
/// Invariant: non-empty after trimming.
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub const FIELD: &'static str = "subscriptionId";

    /// Create a validated [`SubscriptionId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated subscription id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Page selection for list endpoints (`page`, `pageSize`).
///
/// Invariant: `page >= 1`, `1 <= page_size <= 100`.
pub struct Pagination {
    page: u32,
    page_size: u32,
}

impl Pagination {
    pub const PAGE_FIELD: &'static str = "page";
    pub const PAGE_SIZE_FIELD: &'static str = "pageSize";

    /// Largest page size accepted by the API.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Create a validated page selection.
    pub fn new(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::OutOfRange {
                field: Self::PAGE_FIELD,
                min: 1,
                max: u32::MAX,
                actual: page,
            });
        }
        if !(1..=Self::MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ValidationError::OutOfRange {
                field: Self::PAGE_SIZE_FIELD,
                min: 1,
                max: Self::MAX_PAGE_SIZE,
                actual: page_size,
            });
        }
        Ok(Self { page, page_size })
    }

    pub fn page(self) -> u32 {
        self.page
    }

    pub fn page_size(self) -> u32 {
        self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Delivery state of an outbound message as reported by OneAPI.
///
/// Unknown values are preserved in [`DeliveryStatus::Other`].
pub enum DeliveryStatus {
    DeliveredToTerminal,
    DeliveryUncertain,
    DeliveryImpossible,
    MessageWaiting,
    DeliveredToNetwork,
    DeliveryNotificationNotSupported,
    Other(String),
}

impl DeliveryStatus {
    /// Map the wire value to a status. Never fails.
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "DeliveredToTerminal" => Self::DeliveredToTerminal,
            "DeliveryUncertain" => Self::DeliveryUncertain,
            "DeliveryImpossible" => Self::DeliveryImpossible,
            "MessageWaiting" => Self::MessageWaiting,
            "DeliveredToNetwork" => Self::DeliveredToNetwork,
            "DeliveryNotificationNotSupported" => Self::DeliveryNotificationNotSupported,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::DeliveredToTerminal => "DeliveredToTerminal",
            Self::DeliveryUncertain => "DeliveryUncertain",
            Self::DeliveryImpossible => "DeliveryImpossible",
            Self::MessageWaiting => "MessageWaiting",
            Self::DeliveredToNetwork => "DeliveredToNetwork",
            Self::DeliveryNotificationNotSupported => "DeliveryNotificationNotSupported",
            Self::Other(value) => value,
        }
    }

    /// Whether no further status changes are expected for the message.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::DeliveredToTerminal | Self::DeliveryImpossible
        )
    }
}
