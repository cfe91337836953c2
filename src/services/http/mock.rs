//! Scripted transport shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiError, ApiRequest, ApiResponse, HttpTransport};

#[derive(Clone)]
enum Reply {
    Response(ApiResponse),
    Timeout,
}

struct Route {
    method: Method,
    url: String,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
struct Script {
    routes: Vec<Route>,
    calls: Vec<ApiRequest>,
}

/// Replies are consumed in order; the last one repeats.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, url: &str, status: u16, body: &str) -> &Self {
        self.push(method, url, Reply::Response(ApiResponse::new(status, body)))
    }

    pub fn time_out(&self, method: Method, url: &str) -> &Self {
        self.push(method, url, Reply::Timeout)
    }

    fn push(&self, method: Method, url: &str, reply: Reply) -> &Self {
        let mut script = self.inner.lock().unwrap();
        match script
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.url == url)
        {
            Some(route) => route.replies.push_back(reply),
            None => script.routes.push(Route {
                method,
                url: url.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.url == url).count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut script = self.inner.lock().unwrap();
        script.calls.push(request.clone());

        let route = script
            .routes
            .iter_mut()
            .find(|r| r.method == request.method && r.url == request.url)
            .ok_or_else(|| ApiError::Transport(format!("no route for {}", request.url)))?;

        let reply = if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        };

        match reply {
            Some(Reply::Response(resp)) => Ok(resp),
            Some(Reply::Timeout) => Err(ApiError::Timeout),
            None => Err(ApiError::Transport("empty script".to_string())),
        }
    }
}
