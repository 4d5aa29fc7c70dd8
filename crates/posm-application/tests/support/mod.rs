#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use posm_application::{AuthenticatedClient, SurveyApi};
use posm_core::Result;
use posm_core::session::{InMemoryCredentialStore, Session, TokenPair, User};
use posm_core::transport::{ApiRequest, ApiResponse, HttpMethod, Transport};
use serde_json::Value;

struct Route {
    method: HttpMethod,
    path: String,
    queue: VecDeque<ApiResponse>,
    last: ApiResponse,
}

/// In-process backend: fixed or sequenced responses per route, a request
/// log, and optional latency per `q` value.
#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<Vec<Route>>,
    delays: Mutex<HashMap<String, Duration>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.on_sequence(method, path, vec![(status, body)]);
    }

    /// Answers with each response in turn, repeating the last one.
    pub fn on_sequence(&self, method: HttpMethod, path: &str, responses: Vec<(u16, Value)>) {
        let mut queue: VecDeque<ApiResponse> = responses
            .iter()
            .map(|(status, body)| ApiResponse::json_body(*status, body))
            .collect();
        let last = queue.pop_back().unwrap();
        queue.push_back(last.clone());
        let mut routes = self.routes.lock().unwrap();
        routes.retain(|r| !(r.method == method && r.path == path));
        routes.push(Route {
            method,
            path: path.to_string(),
            queue,
            last,
        });
    }

    pub fn delay_query(&self, query: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls(&self, path: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|r| r.path == path).count()
    }

    pub fn queries(&self, path: &str) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .flat_map(|r| r.query.iter().map(|(_, v)| v.clone()))
            .collect()
    }

    fn respond(&self, request: &ApiRequest) -> ApiResponse {
        let mut routes = self.routes.lock().unwrap();
        match routes
            .iter_mut()
            .find(|r| r.method == request.method && r.path == request.path)
        {
            Some(route) => route.queue.pop_front().unwrap_or_else(|| route.last.clone()),
            None => ApiResponse::new(404, ""),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.log.lock().unwrap().push(request.clone());
        let delay = request
            .query
            .iter()
            .find_map(|(_, v)| self.delays.lock().unwrap().get(v).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.respond(&request))
    }
}

pub fn user(leader: Option<&str>) -> User {
    User {
        username: "lan".to_string(),
        role: "user".to_string(),
        leader: leader.map(str::to_string),
        assigned_stores: vec!["S001".to_string()],
    }
}

pub fn signed_in_api(backend: &Arc<FakeBackend>) -> (SurveyApi, Arc<InMemoryCredentialStore>) {
    let session = Session::new(
        TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        },
        user(Some("Minh")),
    );
    let store = Arc::new(InMemoryCredentialStore::with_session(session));
    let client = AuthenticatedClient::new(backend.clone(), store.clone());
    (SurveyApi::new(client), store)
}
