//! Integration test harness for the PLUG waitlist.
//!
//! [`TestServer`] runs the real router on `127.0.0.1:0` over an in-memory
//! database and a recording mailer; the tests under `tests/` drive it with
//! `reqwest`.
//!
//! ```sh
//! cargo test -p plug-integration-tests
//! ```

use std::sync::Arc;

use plug_mail::{Mailer, MemoryMailer};
use plug_server::config::ServerConfig;
use plug_server::AppState;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Public URL the test server builds links with.
pub const APP_URL: &str = "https://plugservices.ng";

/// A running server plus handles into its state.
pub struct TestServer {
    pub base_url: String,
    pub state: Arc<AppState>,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start with a recording mailer.
    pub async fn start() -> (Self, Arc<MemoryMailer>) {
        let mailer = Arc::new(MemoryMailer::new());
        let server = Self::start_with(mailer.clone(), test_config()).await;
        (server, mailer)
    }

    /// Start with any mailer and configuration.
    pub async fn start_with(mailer: Arc<dyn Mailer>, config: ServerConfig) -> Self {
        let conn = plug_db::open_memory().expect("open in-memory db");
        let state = AppState::new(conn, config, mailer);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let serve_state = state.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) =
                plug_server::serve(listener, serve_state, std::future::pending()).await
            {
                eprintln!("test server stopped: {e}");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            client: reqwest::Client::new(),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST JSON, returning status and decoded body.
    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        self.post_from(path, body, None).await
    }

    /// POST JSON as a given caller address (`x-forwarded-for`).
    pub async fn post_from(&self, path: &str, body: &Value, caller: Option<&str>) -> (u16, Value) {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(ip) = caller {
            request = request.header("x-forwarded-for", ip);
        }
        decode(request.send().await.expect("request")).await
    }

    /// GET, returning status and decoded body.
    pub async fn get(&self, path: &str) -> (u16, Value) {
        decode(self.client.get(self.url(path)).send().await.expect("request")).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn decode(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

/// Defaults with a fixed public URL.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.server.app_url = APP_URL.to_string();
    config
}

/// A complete, valid signup body.
pub fn signup_body(email: &str, first_name: &str, referred_by: Option<&str>) -> Value {
    let mut body = serde_json::json!({
        "email": email,
        "firstName": first_name,
        "lastName": "Okafor",
        "userType": "user",
        "services": ["cleaning", "plumbing"],
        "location": "Lagos",
    });
    if let Some(code) = referred_by {
        body["referredBy"] = Value::String(code.to_string());
    }
    body
}

/// The confirmation link from a plain-text email body.
pub fn confirm_link_in(text: &str) -> Option<String> {
    text.lines()
        .find_map(|line| line.strip_prefix("Confirm your email: "))
        .map(|link| link.trim().to_string())
}
