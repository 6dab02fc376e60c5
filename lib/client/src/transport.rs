//! HTTP transport: one logical operation in, one normalized outcome out.
//!
//! This is the only layer that sees raw network and HTTP results. Every
//! outcome is classified into [`OperationError`] — no reqwest error type
//! crosses this boundary.

use std::sync::{Arc, RwLock};

use reqwest::StatusCode;
use serde_json::{Value, json};

use campus_core::{OperationError, RecordQuery, RecordSet};

use crate::config::{BackendConfig, RpcDialect, endpoints};
use crate::envelope::{self, AuthPayload, RpcResponse};
use crate::session::{Session, SessionStore};

pub struct Transport {
    http: reqwest::Client,
    config: BackendConfig,
    session: Arc<SessionStore>,

    /// Service-dialect execution credential captured at login. Held in
    /// memory only — never written to the session snapshot.
    exec_credential: RwLock<Option<String>>,
}

impl Transport {
    pub fn new(config: BackendConfig, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
            exec_credential: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn exec_credential(&self) -> Option<String> {
        self.exec_credential
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_exec_credential(&self, credential: Option<String>) {
        *self
            .exec_credential
            .write()
            .unwrap_or_else(|e| e.into_inner()) = credential;
    }

    /// POST an envelope and unwrap the rpc layer.
    ///
    /// When `invalidate_on_auth` is set, a 401 or a session-expired fault
    /// clears the session store before the error is returned, so the next
    /// `check_auth()` reports false. Login calls pass false: a rejected
    /// login attempt must not destroy a previously valid session.
    async fn call(
        &self,
        path: &str,
        params: Value,
        invalidate_on_auth: bool,
    ) -> Result<Value, OperationError> {
        let body = envelope::request(params);
        let mut req = self
            .http
            .post(self.url(path))
            .timeout(self.config.timeout)
            .json(&body);

        if let Some(token) = self.session.current().and_then(|s| s.session_token) {
            req = req.header(reqwest::header::COOKIE, format!("session_id={}", token));
        }

        let resp = req.send().await.map_err(classify)?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            if invalidate_on_auth {
                self.session.clear();
            }
            return Err(OperationError::Unauthorized(
                "session rejected by backend".into(),
            ));
        }

        // Read the body regardless of status: rpc faults arrive with 200,
        // and failure statuses usually still carry a message.
        let text = resp.text().await.map_err(classify)?;
        match serde_json::from_str::<RpcResponse>(&text) {
            Ok(RpcResponse {
                error: Some(fault), ..
            }) => {
                if fault.is_session_expired() && invalidate_on_auth {
                    self.session.clear();
                }
                Err(fault.into_error())
            }
            Ok(RpcResponse { result, .. }) if status.is_success() => {
                Ok(result.unwrap_or(Value::Null))
            }
            Ok(_) | Err(_) => {
                if status.is_success() {
                    Err(OperationError::remote(
                        400,
                        format!("unexpected response body: {}", truncate(&text)),
                        None,
                    ))
                } else {
                    Err(OperationError::remote(
                        i64::from(status.as_u16()),
                        if text.is_empty() {
                            status.to_string()
                        } else {
                            truncate(&text).to_string()
                        },
                        None,
                    ))
                }
            }
        }
    }

    // ── Authentication ──────────────────────────────────────────────

    /// Exchange credentials for a session. Returns the new session without
    /// installing it — the caller decides what happens to any previous one.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, OperationError> {
        match self.config.dialect {
            RpcDialect::Session => self.authenticate_session(username, password).await,
            RpcDialect::Service => self.authenticate_service(username, password).await,
        }
    }

    async fn authenticate_session(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, OperationError> {
        let result = self
            .call(
                endpoints::SESSION_AUTHENTICATE,
                json!({
                    "db": self.config.database,
                    "login": username,
                    "password": password,
                }),
                false,
            )
            .await
            .map_err(reject_login)?;

        let payload: AuthPayload = serde_json::from_value(result).unwrap_or_default();
        let Some(uid) = payload.uid.filter(|uid| *uid > 0) else {
            // Reachable backend, OK status, but no user id: not a login.
            return Err(OperationError::Unauthorized("invalid credentials".into()));
        };

        Ok(Session {
            user_id: uid,
            session_token: payload.session_id,
            username: payload.username.unwrap_or_else(|| username.to_string()),
            database: payload.db.unwrap_or_else(|| self.config.database.clone()),
            display_name: payload.name,
            partner_id: payload.partner_id,
        })
    }

    async fn authenticate_service(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, OperationError> {
        let credential = self
            .config
            .service_credential
            .clone()
            .unwrap_or_else(|| password.to_string());

        let result = self
            .call(
                endpoints::JSONRPC,
                json!({
                    "service": "common",
                    "method": "authenticate",
                    "args": [self.config.database, username, credential, {}],
                }),
                false,
            )
            .await
            .map_err(reject_login)?;

        // Bare uid on success, `false` on bad credentials.
        let uid = result
            .as_i64()
            .filter(|uid| *uid > 0)
            .ok_or_else(|| OperationError::Unauthorized("invalid credentials".into()))?;

        self.set_exec_credential(Some(credential));
        Ok(Session {
            user_id: uid,
            session_token: None,
            username: username.to_string(),
            database: self.config.database.clone(),
            display_name: None,
            partner_id: None,
        })
    }

    /// Remote half of logout. The Service dialect has no remote session to
    /// destroy; its execution credential is simply forgotten.
    pub async fn destroy_session(&self) -> Result<(), OperationError> {
        match self.config.dialect {
            RpcDialect::Session => self
                .call(endpoints::SESSION_DESTROY, json!({}), false)
                .await
                .map(|_| ()),
            RpcDialect::Service => {
                self.set_exec_credential(None);
                Ok(())
            }
        }
    }

    // ── Data operations ─────────────────────────────────────────────

    /// Run a search-read, normalized to one record-set shape.
    pub async fn search_read(
        &self,
        model: &str,
        query: &RecordQuery,
    ) -> Result<RecordSet<Value>, OperationError> {
        let result = match self.config.dialect {
            RpcDialect::Session => {
                self.call(
                    endpoints::DATASET_SEARCH_READ,
                    json!({
                        "model": model,
                        "domain": query.domain,
                        "fields": query.fields,
                        "limit": query.limit,
                        "offset": query.offset,
                        "sort": query.order,
                    }),
                    true,
                )
                .await?
            }
            RpcDialect::Service => {
                self.execute_kw(
                    model,
                    "search_read",
                    json!([query.domain]),
                    json!({
                        "fields": query.fields,
                        "limit": query.limit,
                        "offset": query.offset,
                        "order": query.order,
                    }),
                )
                .await?
            }
        };
        envelope::normalize_search_read(result)
    }

    /// Generic model method call — create/write/unlink and friends.
    pub async fn call_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, OperationError> {
        match self.config.dialect {
            RpcDialect::Session => {
                self.call(
                    endpoints::DATASET_CALL_KW,
                    json!({
                        "model": model,
                        "method": method,
                        "args": args,
                        "kwargs": kwargs,
                    }),
                    true,
                )
                .await
            }
            RpcDialect::Service => self.execute_kw(model, method, args, kwargs).await,
        }
    }

    async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, OperationError> {
        let session = self
            .session
            .current()
            .ok_or_else(|| OperationError::Unauthorized("not authenticated".into()))?;
        let credential = self
            .config
            .service_credential
            .clone()
            .or_else(|| self.exec_credential())
            .ok_or_else(|| {
                OperationError::Unauthorized("no execution credential for this session".into())
            })?;

        self.call(
            endpoints::JSONRPC,
            json!({
                "service": "object",
                "method": "execute_kw",
                "args": [
                    self.config.database,
                    session.user_id,
                    credential,
                    model,
                    method,
                    args,
                    kwargs,
                ],
            }),
            true,
        )
        .await
    }

    /// Backend version probe, for status/health display.
    pub async fn version(&self) -> Result<Value, OperationError> {
        match self.config.dialect {
            RpcDialect::Session => {
                self.call(endpoints::SESSION_VERSION, json!({}), false).await
            }
            RpcDialect::Service => {
                self.call(
                    endpoints::JSONRPC,
                    json!({"service": "common", "method": "version", "args": []}),
                    false,
                )
                .await
            }
        }
    }
}

/// Map transport-level reqwest failures. Anything that kept the request
/// from completing means the backend is unreachable from our side.
fn classify(e: reqwest::Error) -> OperationError {
    if e.is_connect() || e.is_timeout() {
        OperationError::ServiceUnavailable("cannot connect to backend".into())
    } else {
        OperationError::ServiceUnavailable(e.to_string())
    }
}

/// During login, any remote rejection is a credential rejection; only
/// transport-level failures keep their ServiceUnavailable classification.
fn reject_login(e: OperationError) -> OperationError {
    match e {
        OperationError::ServiceUnavailable(_) | OperationError::Unauthorized(_) => e,
        OperationError::BadRequest(message)
        | OperationError::OperationFailed { message, .. } => {
            OperationError::Unauthorized(message)
        }
    }
}

fn truncate(text: &str) -> &str {
    let limit = 200.min(text.len());
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
