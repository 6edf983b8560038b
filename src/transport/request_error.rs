use serde::Deserialize;

use crate::domain::RequestErrorKind;

/// Error body OneAPI returns alongside non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: RequestErrorKind,
    pub message_id: String,
    pub text: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RequestErrorEnvelope {
    #[serde(rename = "requestError")]
    request_error: RequestErrorJson,
}

#[derive(Debug, Deserialize)]
struct RequestErrorJson {
    #[serde(default, rename = "serviceException")]
    service_exception: Option<ExceptionJson>,
    #[serde(default, rename = "policyException")]
    policy_exception: Option<ExceptionJson>,
}

#[derive(Debug, Deserialize)]
struct ExceptionJson {
    #[serde(rename = "messageId")]
    message_id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    variables: Vec<String>,
}

/// Decode a `requestError` body. Returns `None` when the body is not one.
pub fn decode_request_error(body: &str) -> Option<RequestError> {
    let envelope: RequestErrorEnvelope = serde_json::from_str(body).ok()?;
    let (kind, exception) = match envelope.request_error {
        RequestErrorJson {
            service_exception: Some(exception),
            ..
        } => (RequestErrorKind::Service, exception),
        RequestErrorJson {
            policy_exception: Some(exception),
            ..
        } => (RequestErrorKind::Policy, exception),
        _ => return None,
    };

    Some(RequestError {
        kind,
        message_id: exception.message_id,
        text: exception.text,
        variables: exception.variables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_exception() {
        let body = r#"
        {
          "requestError": {
            "serviceException": {
              "messageId": "SVC0002",
              "text": "Invalid input value for message part %1",
              "variables": ["address"]
            }
          }
        }
        "#;
        let err = decode_request_error(body).unwrap();
        assert_eq!(err.kind, RequestErrorKind::Service);
        assert_eq!(err.message_id, "SVC0002");
        assert_eq!(err.variables, vec!["address".to_owned()]);
    }

    #[test]
    fn decodes_policy_exception_without_variables() {
        let body = r#"{"requestError":{"policyException":{"messageId":"POL0001","text":"Denied"}}}"#;
        let err = decode_request_error(body).unwrap();
        assert_eq!(err.kind, RequestErrorKind::Policy);
        assert_eq!(err.text, "Denied");
        assert!(err.variables.is_empty());
    }

    #[test]
    fn other_bodies_are_not_request_errors() {
        assert_eq!(decode_request_error("oops"), None);
        assert_eq!(decode_request_error(r#"{"requestError":{}}"#), None);
        assert_eq!(decode_request_error(r#"{"resourceReference":{}}"#), None);
    }
}
