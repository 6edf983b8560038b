//! Notification settings: polling intervals, push endpoint ports and batch sizes.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::domain::ValidationError;

const DEFAULT_RETRIEVING_INTERVAL: Duration = Duration::from_millis(5000);
const DEFAULT_DLR_PUSH_PORT: u16 = 3000;
const DEFAULT_INBOUND_PUSH_PORT: u16 = 3001;
const DEFAULT_INBOUND_BATCH_SIZE: u32 = 100;

/// Settings for the PULL retrievers and PUSH receivers of a client.
///
/// Deserializes from camelCase keys; intervals are given in milliseconds:
///
/// ```json
/// {
///   "dlrRetrievingInterval": 5000,
///   "inboundMessagesRetrievingInterval": 5000,
///   "dlrStatusPushServerSimulatorPort": 3000,
///   "inboundMessagesPushServerSimulatorPort": 3001,
///   "inboundMessagesBatchSize": 100,
///   "deliveryReportsLimit": 50,
///   "pushServerBindAddress": "127.0.0.1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationConfig {
    #[serde(deserialize_with = "millis")]
    pub dlr_retrieving_interval: Duration,
    #[serde(deserialize_with = "millis")]
    pub inbound_messages_retrieving_interval: Duration,
    pub dlr_status_push_server_simulator_port: u16,
    pub inbound_messages_push_server_simulator_port: u16,
    pub inbound_messages_batch_size: u32,
    /// `None` lets the provider pick its default page of reports.
    pub delivery_reports_limit: Option<u32>,
    pub push_server_bind_address: IpAddr,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dlr_retrieving_interval: DEFAULT_RETRIEVING_INTERVAL,
            inbound_messages_retrieving_interval: DEFAULT_RETRIEVING_INTERVAL,
            dlr_status_push_server_simulator_port: DEFAULT_DLR_PUSH_PORT,
            inbound_messages_push_server_simulator_port: DEFAULT_INBOUND_PUSH_PORT,
            inbound_messages_batch_size: DEFAULT_INBOUND_BATCH_SIZE,
            delivery_reports_limit: None,
            push_server_bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

impl NotificationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, crate::OneApiError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| crate::OneApiError::Parse(Box::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dlr_retrieving_interval.is_zero() {
            return Err(ValidationError::ZeroInterval {
                field: "dlrRetrievingInterval",
            });
        }
        if self.inbound_messages_retrieving_interval.is_zero() {
            return Err(ValidationError::ZeroInterval {
                field: "inboundMessagesRetrievingInterval",
            });
        }
        if self.inbound_messages_batch_size == 0 {
            return Err(ValidationError::OutOfRange {
                field: "inboundMessagesBatchSize",
                min: 1,
                max: u32::MAX,
                actual: 0,
            });
        }
        Ok(())
    }

    pub fn dlr_push_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.push_server_bind_address,
            self.dlr_status_push_server_simulator_port,
        )
    }

    pub fn inbound_push_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.push_server_bind_address,
            self.inbound_messages_push_server_simulator_port,
        )
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OneApiError;

    #[test]
    fn defaults_match_documented_values() {
        let config = NotificationConfig::default();
        assert_eq!(config.dlr_retrieving_interval, Duration::from_secs(5));
        assert_eq!(config.inbound_messages_retrieving_interval, Duration::from_secs(5));
        assert_eq!(config.dlr_push_addr(), "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.inbound_push_addr(), "127.0.0.1:3001".parse().unwrap());
        assert_eq!(config.inbound_messages_batch_size, 100);
        assert_eq!(config.delivery_reports_limit, None);
    }

    #[test]
    fn from_json_overrides_only_given_keys() {
        let config = NotificationConfig::from_json(
            r#"{"dlrRetrievingInterval": 1000, "deliveryReportsLimit": 25, "pushServerBindAddress": "0.0.0.0"}"#,
        )
        .unwrap();
        assert_eq!(config.dlr_retrieving_interval, Duration::from_millis(1000));
        assert_eq!(config.inbound_messages_retrieving_interval, Duration::from_secs(5));
        assert_eq!(config.delivery_reports_limit, Some(25));
        assert_eq!(config.dlr_push_addr(), "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = NotificationConfig::from_json(r#"{"inboundMessagesRetrievingInterval": 0}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            OneApiError::Validation(ValidationError::ZeroInterval {
                field: "inboundMessagesRetrievingInterval"
            })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            NotificationConfig::from_json(r#"{"dlrRetrievingInterval": "soon"}"#),
            Err(OneApiError::Parse(_))
        ));
    }
}
