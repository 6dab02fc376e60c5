//! In-process fake backend: a minimal JSON-RPC server speaking both
//! dialects, with switchable response shapes and failure injection.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

pub const USERNAME: &str = "ana";
pub const PASSWORD: &str = "s3cret";
pub const UID: i64 = 7;
pub const TOKEN: &str = "sess-abc";
pub const CREATED_ID: i64 = 101;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bare,
    Wrapped,
    Double,
}

pub struct FakeState {
    pub shape: Shape,
    pub partners: Vec<Value>,
    /// Force this HTTP status on data calls.
    pub reject_data_calls: Option<u16>,
    /// Emit an rpc fault with this code on data calls.
    pub fault_code: Option<i64>,
    /// Hold data responses for this long.
    pub delay: Option<Duration>,
    /// Return a login result without a uid.
    pub malformed_login: bool,
    /// Fail the remote session teardown.
    pub fail_destroy: bool,

    pub last_search: Option<Value>,
    pub last_create: Option<Value>,
    pub last_write: Option<Value>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            shape: Shape::Wrapped,
            partners: default_partners(),
            reject_data_calls: None,
            fault_code: None,
            delay: None,
            malformed_login: false,
            fail_destroy: false,
            last_search: None,
            last_create: None,
            last_write: None,
        }
    }
}

pub fn default_partners() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "John Doe",
            "email": "john@demo.com",
            "phone": "+1234567890",
            "is_company": false,
            "customer_rank": 1,
            "comment": "Guardian: Ana Cruz | Grade: 7",
            "create_date": "2024-01-01 10:00:00",
        }),
        json!({
            "id": 2,
            "name": "Jane Smith",
            "email": "jane@demo.com",
            "phone": "+0987654321",
            "is_company": false,
            "customer_rank": 1,
            "comment": false,
            "create_date": "2024-01-02 11:00:00",
        }),
        json!({
            "id": 6,
            "name": "Mike Johnson",
            "email": false,
            "phone": "+1357924680",
            "is_company": false,
            "customer_rank": 1,
            "create_date": "2024-01-06 15:00:00",
        }),
    ]
}

pub type Shared = Arc<Mutex<FakeState>>;

/// Bind to an ephemeral port and serve. Returns the base URL and a handle
/// to the shared state for inspection and failure injection.
pub async fn spawn(state: FakeState) -> (String, Shared) {
    let shared = Arc::new(Mutex::new(state));
    let app = Router::new()
        .route("/web/session/authenticate", post(session_authenticate))
        .route("/web/session/destroy", post(session_destroy))
        .route("/web/dataset/search_read", post(dataset_search_read))
        .route("/web/dataset/call_kw", post(dataset_call_kw))
        .route("/jsonrpc", post(jsonrpc))
        .with_state(Arc::clone(&shared));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), shared)
}

/// An address nothing listens on, for connect-failure tests.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn ok(id: &Value, result: Value) -> Response {
    Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
}

fn fault(id: &Value, code: i64, message: &str, data: Value) -> Response {
    Json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message, "data": data},
    }))
    .into_response()
}

fn access_denied(id: &Value) -> Response {
    fault(
        id,
        200,
        "Odoo Server Error",
        json!({"name": "odoo.exceptions.AccessDenied"}),
    )
}

fn has_session_cookie(headers: &HeaderMap) -> bool {
    headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(&format!("session_id={}", TOKEN)))
}

fn id_filter(domain: &Value) -> Option<i64> {
    domain.as_array()?.iter().find_map(|term| {
        let term = term.as_array()?;
        if term.len() == 3 && term[0] == "id" && term[1] == "=" {
            term[2].as_i64()
        } else {
            None
        }
    })
}

fn shaped(shape: Shape, rows: Vec<Value>, total: u64) -> Value {
    match shape {
        Shape::Bare => json!(rows),
        Shape::Wrapped => json!({"records": rows, "length": total}),
        Shape::Double => json!({"records": {"records": rows, "length": total}}),
    }
}

fn run_search(state: &mut FakeState, params: &Value, shape: Shape) -> Value {
    state.last_search = Some(params.clone());

    let rows: Vec<Value> = match id_filter(&params["domain"]) {
        Some(id) => state
            .partners
            .iter()
            .filter(|row| row["id"].as_i64() == Some(id))
            .cloned()
            .collect(),
        None => state.partners.clone(),
    };
    let total = rows.len() as u64;
    let offset = params["offset"].as_u64().unwrap_or(0) as usize;
    let limit = params["limit"].as_u64().unwrap_or(80) as usize;
    let page: Vec<Value> = rows.into_iter().skip(offset).take(limit).collect();
    shaped(shape, page, total)
}

/// Data-call gate: injected status, injected fault, then delay.
async fn data_gate(shared: &Shared, id: &Value) -> Result<(), Response> {
    let (reject, fault_code, delay) = {
        let state = shared.lock().unwrap();
        (state.reject_data_calls, state.fault_code, state.delay)
    };
    if let Some(status) = reject {
        return Err((
            StatusCode::from_u16(status).unwrap(),
            Json(json!({"error": "rejected"})),
        )
            .into_response());
    }
    if let Some(code) = fault_code {
        return Err(fault(id, code, "Odoo Session Expired", json!({})));
    }
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Ok(())
}

async fn session_authenticate(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = body["id"].clone();
    let params = &body["params"];
    let malformed = shared.lock().unwrap().malformed_login;
    if malformed {
        return ok(&id, json!({"server_version": "17.0"}));
    }
    if params["login"] == USERNAME && params["password"] == PASSWORD {
        ok(
            &id,
            json!({
                "uid": UID,
                "session_id": TOKEN,
                "username": USERNAME,
                "db": params["db"],
                "name": "Ana",
                "partner_id": UID,
                "user_context": {},
            }),
        )
    } else {
        access_denied(&id)
    }
}

async fn session_destroy(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    if shared.lock().unwrap().fail_destroy {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "teardown failed"})),
        )
            .into_response();
    }
    ok(&body["id"].clone(), json!(true))
}

async fn dataset_search_read(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let id = body["id"].clone();
    if !has_session_cookie(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Err(response) = data_gate(&shared, &id).await {
        return response;
    }
    let mut state = shared.lock().unwrap();
    let shape = state.shape;
    let result = run_search(&mut state, &body["params"], shape);
    ok(&id, result)
}

async fn dataset_call_kw(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let id = body["id"].clone();
    if !has_session_cookie(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Err(response) = data_gate(&shared, &id).await {
        return response;
    }

    let params = &body["params"];
    let mut state = shared.lock().unwrap();
    match params["method"].as_str() {
        Some("create") => {
            state.last_create = Some(params["args"][0].clone());
            ok(&id, json!(CREATED_ID))
        }
        Some("write") => {
            state.last_write = Some(params["args"].clone());
            ok(&id, json!(true))
        }
        Some("unlink") => ok(&id, json!(true)),
        other => fault(
            &id,
            400,
            &format!("unsupported method {:?}", other),
            json!({}),
        ),
    }
}

async fn jsonrpc(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = body["id"].clone();
    let params = &body["params"];
    let service = params["service"].as_str().unwrap_or_default();
    let method = params["method"].as_str().unwrap_or_default();
    let args = params["args"].as_array().cloned().unwrap_or_default();

    match (service, method) {
        ("common", "version") => ok(&id, json!({"server_version": "17.0"})),
        ("common", "authenticate") => {
            let login = args.get(1).cloned().unwrap_or_default();
            let password = args.get(2).cloned().unwrap_or_default();
            if login == USERNAME && password == PASSWORD {
                ok(&id, json!(UID))
            } else {
                // Legacy dialect reports bad credentials as a bare false.
                ok(&id, json!(false))
            }
        }
        ("object", "execute_kw") => {
            if let Err(response) = data_gate(&shared, &id).await {
                return response;
            }
            let uid = args.get(1).and_then(Value::as_i64);
            let credential = args.get(2).cloned().unwrap_or_default();
            if uid != Some(UID) || credential != PASSWORD {
                return access_denied(&id);
            }
            let model_method = args.get(4).and_then(Value::as_str).unwrap_or_default();
            let mut state = shared.lock().unwrap();
            match model_method {
                "search_read" => {
                    let kwargs = args.get(6).cloned().unwrap_or(json!({}));
                    let domain = args
                        .get(5)
                        .and_then(|a| a.get(0))
                        .cloned()
                        .unwrap_or(json!([]));
                    let params = json!({
                        "domain": domain,
                        "fields": kwargs["fields"],
                        "limit": kwargs["limit"],
                        "offset": kwargs["offset"],
                    });
                    // Legacy servers always answer with the bare array.
                    let result = run_search(&mut state, &params, Shape::Bare);
                    ok(&id, result)
                }
                "create" => {
                    state.last_create = args.get(5).and_then(|a| a.get(0)).cloned();
                    ok(&id, json!(CREATED_ID))
                }
                "write" => {
                    state.last_write = args.get(5).cloned();
                    ok(&id, json!(true))
                }
                "unlink" => ok(&id, json!(true)),
                other => fault(&id, 400, &format!("unsupported {}", other), json!({})),
            }
        }
        _ => fault(&id, 400, "unknown service", json!({})),
    }
}
