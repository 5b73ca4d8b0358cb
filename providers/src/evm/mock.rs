//! wiremock responders speaking JSON-RPC, for tests against a fake node.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, method},
    Mock, MockServer, Request, ResponseTemplate,
};

fn request_id(req: &Request) -> Value {
    serde_json::from_slice::<Value>(&req.body)
        .ok()
        .and_then(|body| body.get("id").cloned())
        .unwrap_or(json!(1))
}

/// Answers with `result`, echoing the request id back.
pub fn rpc_result(result: Value) -> impl Fn(&Request) -> ResponseTemplate {
    move |req: &Request| {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": request_id(req),
            "result": result,
        }))
    }
}

pub fn rpc_error(message: &'static str) -> impl Fn(&Request) -> ResponseTemplate {
    move |req: &Request| {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": request_id(req),
            "error": { "code": -32000, "message": message },
        }))
    }
}

/// Mounts `result` as the answer to every call of `rpc_method`.
pub async fn answer(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(rpc_result(result))
        .mount(server)
        .await;
}

/// Node that passes the liveness probe and nothing else yet.
pub async fn node() -> MockServer {
    let server = MockServer::start().await;
    answer(&server, "web3_clientVersion", json!("Geth/v1.10.26")).await;
    server
}

/// Methods of every JSON-RPC call `server` has seen, in arrival order.
pub async fn called_methods(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
        .filter_map(|body| body["method"].as_str().map(String::from))
        .collect()
}
