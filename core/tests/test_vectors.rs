//! Verify request construction and response classification against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each build vector describes request options and the expected built request;
//! each classify vector describes a simulated transport outcome and the
//! expected result. Bodies are compared as parsed JSON (not raw strings) to
//! avoid false negatives from field ordering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use api_client::{
    ApiClient, ClientConfig, ErrorKind, HttpMethod, HttpRequest, NetworkError, QueryValue,
    RequestOptions, Transport, TransportResponse,
};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, Value)> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|pair| {
                    let arr = pair.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].clone())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn string_pairs(value: &Value) -> Vec<(String, String)> {
    pairs(value)
        .into_iter()
        .map(|(k, v)| (k, v.as_str().unwrap().to_string()))
        .collect()
}

fn query_value(value: Value) -> QueryValue {
    match value {
        Value::String(s) => QueryValue::Str(s),
        Value::Bool(b) => QueryValue::Bool(b),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => QueryValue::Int(i),
            (None, Some(u)) => QueryValue::UInt(u),
            _ => QueryValue::Float(n.as_f64().unwrap()),
        },
        // JSON has no literal for non-finite numbers: `{"float": "Infinity"}`.
        Value::Object(obj) => QueryValue::Float(obj["float"].as_str().unwrap().parse().unwrap()),
        other => panic!("not a scalar query value: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let mut config = ClientConfig::new(vectors["base_url"].as_str().unwrap());
    for (name, value) in string_pairs(&vectors["default_headers"]) {
        config = config.with_default_header(name, value);
    }
    let client = ApiClient::new(config);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = parse_method(case["method"].as_str().unwrap());

        let mut options = RequestOptions::<Value>::default();
        for (key, value) in pairs(&case["params"]) {
            options = options.param(key, query_value(value));
        }
        for (header, value) in string_pairs(&case["headers"]) {
            options = options.header(header, value);
        }
        options.body = case.get("body").cloned();

        let req = client
            .build_request(method, case["path"].as_str().unwrap(), &options)
            .unwrap();
        let expected = &case["expected_request"];

        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url.as_str(), expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, string_pairs(&expected["headers"]), "{name}: headers");

        match req.body.as_deref() {
            Some(body) => {
                let body: Value = serde_json::from_str(body).unwrap();
                assert_eq!(body, expected["body"], "{name}: body");
            }
            None => assert!(expected["body"].is_null(), "{name}: body should be None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classify
// ---------------------------------------------------------------------------

/// Transport that answers every request with one vector's simulated outcome.
struct VectorTransport {
    case: Value,
    body_read: Arc<AtomicBool>,
    sent: Mutex<Vec<HttpRequest>>,
}

struct VectorResponse {
    status: u16,
    status_text: String,
    body: String,
    body_read: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for VectorTransport {
    type Response = VectorResponse;

    async fn send(&self, request: HttpRequest) -> Result<VectorResponse, NetworkError> {
        self.sent.lock().unwrap().push(request);
        if let Some(message) = self.case.get("transport_error") {
            return Err(NetworkError::new(message.as_str().unwrap()));
        }
        let sim = &self.case["simulated_response"];
        Ok(VectorResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            status_text: sim["status_text"].as_str().unwrap().to_string(),
            body: sim["body"].as_str().unwrap().to_string(),
            body_read: self.body_read.clone(),
        })
    }
}

#[async_trait]
impl TransportResponse for VectorResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn status_text(&self) -> String {
        self.status_text.clone()
    }

    async fn bytes(self) -> Result<Bytes, NetworkError> {
        self.body_read.store(true, Ordering::SeqCst);
        Ok(Bytes::from(self.body))
    }
}

#[tokio::test]
async fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let body_read = Arc::new(AtomicBool::new(false));
        let transport = VectorTransport {
            case: case.clone(),
            body_read: body_read.clone(),
            sent: Mutex::new(Vec::new()),
        };
        let client = ApiClient::with_transport(ClientConfig::new("http://localhost:3000"), transport);
        let expected = &case["expected"];

        let result = client.get::<Option<Value>>("/resource", RequestOptions::new()).await;
        assert_eq!(client.transport().sent.lock().unwrap().len(), 1, "{name}: one call");

        match expected["kind"].as_str().unwrap() {
            "ok" => {
                assert_eq!(result.unwrap(), Some(expected["value"].clone()), "{name}: value");
            }
            "absent" => {
                assert_eq!(result.unwrap(), None, "{name}: absent");
                assert_eq!(
                    body_read.load(Ordering::SeqCst),
                    expected["body_read"].as_bool().unwrap(),
                    "{name}: body read"
                );
            }
            "api" => {
                let err = result.unwrap_err();
                let api = err.as_api_error().unwrap_or_else(|| panic!("{name}: expected ApiError, got {err}"));
                assert_eq!(u64::from(api.status_code()), expected["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(api.is_client_error(), expected["client_error"].as_bool().unwrap(), "{name}: client");
                assert_eq!(api.is_server_error(), expected["server_error"].as_bool().unwrap(), "{name}: server");
                let parsed = api.parsed_body().cloned().unwrap_or(Value::Null);
                assert_eq!(parsed, expected["parsed_body"], "{name}: parsed body");
            }
            "decode" => {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::Decode, "{name}: kind");
            }
            "network" => {
                let err = result.unwrap_err();
                let net = err.as_network_error().unwrap_or_else(|| panic!("{name}: expected NetworkError, got {err}"));
                assert_eq!(net.message(), expected["message"].as_str().unwrap(), "{name}: message");
            }
            other => panic!("{name}: unknown expected kind: {other}"),
        }
    }
}
