//! In-process stub of the Sportify backend for integration tests.
//!
//! Serves the `/v1` endpoints the client uses from in-memory state on an
//! ephemeral port and counts the requests it receives.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

use sportify_client::{
    config::ClientConfig,
    infrastructure::{RouteTracker, TokenStore, http::ApiClient, storage::InMemoryStorage},
    domain::Route,
};

pub const PASSWORD: &str = "Secret#123";

/// Event id whose deletion fails with a plain-text 500
pub const BROKEN_EVENT_ID: i64 = 99;

/// Bearer token carrying `{"sub": user_id}`
pub fn token_for(user_id: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(json!({ "sub": user_id, "exp": 4_102_444_800i64 }).to_string());
    format!("{}.{}.signature", header, claims)
}

/// Event JSON in the backend's wire format
pub fn event_json(id: i64, owner: i64, max_players: u32, participants: &[i64]) -> Value {
    json!({
        "id": id,
        "title": format!("Event {}", id),
        "sport": "Football",
        "location_name": "Central Park",
        "latitude": 40.7812,
        "longitude": -73.9665,
        "event_datetime": "2026-11-01T10:00:00+09:00",
        "max_players": max_players,
        "event_owner": owner,
        "owner_first_name": "Owner",
        "owner_last_name": format!("{}", owner),
        "participants": participants.iter().map(|id| json!({ "user_id": id })).collect::<Vec<_>>(),
    })
}

#[derive(Default)]
pub struct BackendState {
    /// email -> user id
    users: Mutex<HashMap<String, i64>>,
    /// token -> user id
    sessions: Mutex<HashMap<String, i64>>,
    /// emails whose login returns a token without claims
    opaque_users: Mutex<Vec<String>>,
    profiles: Mutex<HashMap<i64, Value>>,
    events: Mutex<Vec<Value>>,
    /// Every authenticated request gets a 401 while set
    pub revoked: AtomicBool,
    pub list_requests: AtomicUsize,
    pub detail_requests: AtomicUsize,
    pub join_requests: AtomicUsize,
    pub authorization_headers: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl BackendState {
    pub fn add_user(&self, email: &str, user_id: i64) {
        lock(&self.users).insert(email.to_string(), user_id);
    }

    pub fn add_opaque_user(&self, email: &str, user_id: i64) {
        self.add_user(email, user_id);
        lock(&self.opaque_users).push(email.to_string());
    }

    pub fn add_profile(&self, user_id: i64) {
        lock(&self.profiles).insert(
            user_id,
            json!({
                "first_name": "User",
                "last_name": format!("{}", user_id),
                "age": 30,
                "gender": "Others",
                "sport_preference": ["Football"],
            }),
        );
    }

    pub fn profile_of(&self, user_id: i64) -> Option<Value> {
        lock(&self.profiles).get(&user_id).cloned()
    }

    pub fn add_event(&self, event: Value) {
        lock(&self.events).push(event);
    }

    pub fn participants_of(&self, event_id: i64) -> Vec<i64> {
        lock(&self.events)
            .iter()
            .find(|e| e["id"] == event_id)
            .and_then(|e| e["participants"].as_array().cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(|p| p["user_id"].as_i64())
            .collect()
    }

    pub fn authorization_headers(&self) -> Vec<String> {
        lock(&self.authorization_headers).clone()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<i64, Response> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        lock(&self.authorization_headers).push(header.clone());

        if self.revoked.load(Ordering::SeqCst) {
            return Err(error(StatusCode::UNAUTHORIZED, "token expired"));
        }
        header
            .strip_prefix("Bearer ")
            .and_then(|token| lock(&self.sessions).get(token).copied())
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "unauthorized"))
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn data(status: StatusCode, payload: Value) -> Response {
    (status, Json(json!({ "data": payload }))).into_response()
}

type Shared = State<Arc<BackendState>>;

async fn signup(State(state): Shared, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut users = lock(&state.users);
    if users.contains_key(&email) {
        return error(StatusCode::BAD_REQUEST, "email already exists");
    }
    let id = users.len() as i64 + 100;
    users.insert(email, id);
    data(StatusCode::CREATED, json!({ "id": id }))
}

async fn login(State(state): Shared, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let Some(user_id) = lock(&state.users).get(email).copied() else {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    };
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    let token = if lock(&state.opaque_users).iter().any(|u| u == email) {
        format!("opaque-token-{}", user_id)
    } else {
        token_for(user_id)
    };
    lock(&state.sessions).insert(token.clone(), user_id);
    data(StatusCode::OK, json!(token))
}

async fn get_profile(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let id = if id == 0 { user_id } else { id };
    match lock(&state.profiles).get(&id) {
        Some(profile) => data(StatusCode::OK, profile.clone()),
        None => error(StatusCode::NOT_FOUND, "Profile not found"),
    }
}

async fn create_profile(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    lock(&state.profiles).insert(user_id, body.clone());
    data(StatusCode::CREATED, body)
}

async fn update_profile(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let mut profiles = lock(&state.profiles);
    let Some(profile) = profiles.get_mut(&user_id) else {
        return error(StatusCode::NOT_FOUND, "Profile not found");
    };
    *profile = body.clone();
    data(StatusCode::OK, body)
}

async fn list_events(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    state.list_requests.fetch_add(1, Ordering::SeqCst);
    data(StatusCode::OK, Value::Array(lock(&state.events).clone()))
}

async fn get_event(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    state.detail_requests.fetch_add(1, Ordering::SeqCst);
    // let concurrent requests overlap
    tokio::time::sleep(Duration::from_millis(10)).await;
    match lock(&state.events).iter().find(|e| e["id"] == id) {
        Some(event) => data(StatusCode::OK, event.clone()),
        None => error(StatusCode::NOT_FOUND, "Event not found"),
    }
}

async fn update_event(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    let mut events = lock(&state.events);
    let Some(event) = events.iter_mut().find(|e| e["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Event not found");
    };
    if let (Some(target), Some(fields)) = (event.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    data(StatusCode::OK, event.clone())
}

async fn delete_event(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    if id == BROKEN_EVENT_ID {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    lock(&state.events).retain(|e| e["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn join_event(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    state.join_requests.fetch_add(1, Ordering::SeqCst);

    let mut events = lock(&state.events);
    let Some(event) = events.iter_mut().find(|e| e["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Event not found");
    };
    let max_players = event["max_players"].as_u64().unwrap_or_default() as usize;
    let Some(participants) = event["participants"].as_array_mut() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "broken event");
    };
    if participants.iter().any(|p| p["user_id"] == user_id) {
        return error(StatusCode::BAD_REQUEST, "Already joined");
    }
    if participants.len() >= max_players {
        return error(StatusCode::BAD_REQUEST, "Event is full");
    }
    participants.push(json!({ "user_id": user_id }));
    data(StatusCode::OK, json!({ "event_id": id, "user_id": user_id }))
}

async fn leave_event(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let mut events = lock(&state.events);
    let Some(participants) = events
        .iter_mut()
        .find(|e| e["id"] == id)
        .and_then(|e| e["participants"].as_array_mut())
    else {
        return error(StatusCode::NOT_FOUND, "Event not found");
    };
    participants.retain(|p| p["user_id"] != user_id);
    data(StatusCode::OK, json!({ "event_id": id }))
}

pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
    handle: JoinHandle<()>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/v1/auth/signup", post(signup))
            .route("/v1/auth/login", post(login))
            .route("/v1/profile/{id}", get(get_profile))
            .route("/v1/profile", post(create_profile).put(update_profile))
            .route("/v1/events/all", get(list_events))
            .route("/v1/events/{id}", get(get_event).put(update_event).delete(delete_event))
            .route("/v1/events/{id}/join", post(join_event))
            .route("/v1/events/{id}/leave", delete(leave_event))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Failed to read stub address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            state,
            handle,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Request layer wired to fresh in-memory storage, as a user's client would be
pub struct TestClient {
    pub token_store: TokenStore,
    pub navigator: Arc<RouteTracker>,
    pub api: Arc<ApiClient>,
}

impl TestClient {
    pub fn new(backend: &StubBackend) -> Self {
        let token_store = TokenStore::new(Arc::new(InMemoryStorage::new()));
        let navigator = Arc::new(RouteTracker::new(Route::Login));
        let api = Arc::new(
            ApiClient::new(&backend.config(), token_store.clone(), navigator.clone())
                .expect("Failed to build ApiClient"),
        );
        Self {
            token_store,
            navigator,
            api,
        }
    }
}
