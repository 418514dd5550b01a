use axum_signout::{
    auth::session::{encode_session, Session},
    configuration::{ApplicationSettings, AuthSettings, Settings},
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use secrecy::Secret;
use wiremock::MockServer;

pub const STORAGE_KEY: &str = "sb-test-auth-token";
pub const ANON_KEY: &str = "test-anon-key";

pub struct TestState {
    pub app_address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub auth_server: MockServer,
}

// Ensure that the `tracing` stack is only initialized once
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "test=debug,axum_signout=debug".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("failed to init tracing");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("failed to init tracing");
    }
});

pub async fn spawn_app() -> TestState {
    spawn_app_with(|_| {}).await
}

/// Spawns the service against a fresh mock auth server. `configure` may
/// adjust the auth settings before the service starts.
pub async fn spawn_app_with<F>(configure: F) -> TestState
where
    F: FnOnce(&mut AuthSettings),
{
    // Initialize tracing stack
    Lazy::force(&TRACING);

    let auth_server = MockServer::start().await;
    let mut auth = AuthSettings {
        url: Some(auth_server.uri()),
        anon_key: Some(Secret::new(ANON_KEY.to_string())),
        storage_key: Some(STORAGE_KEY.to_string()),
        timeout_milliseconds: 2_000,
        cookie_domain: None,
        cookie_secure: false,
    };
    configure(&mut auth);

    let settings = Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        auth,
    };

    let (router, listener) =
        axum_signout::build_service(settings).expect("failed to build service");
    let port = listener.local_addr().unwrap().port();

    let _ = tokio::spawn(axum_signout::serve(router, listener));

    let reqwest_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    let res = TestState {
        app_address: format!("http://127.0.0.1:{}", port),
        port,
        api_client: reqwest_client,
        auth_server,
    };
    tracing::debug!("The app was spawned at: {}", res.app_address);

    res
}

impl TestState {
    pub async fn get_signout(&self, query: &str, cookies: Option<String>) -> reqwest::Response {
        let mut request = self
            .api_client
            .get(&format!("{}/auth/signout{}", &self.app_address, query));
        if let Some(cookies) = cookies {
            request = request.header("Cookie", cookies);
        }
        request.send().await.expect("request to signout failed")
    }
}

pub fn session(access_token: &str, expires_at: i64) -> Session {
    serde_json::from_value(serde_json::json!({
        "access_token": access_token,
        "refresh_token": "refresh-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": expires_at,
        "user": { "id": "2f6c1b0e-5c1a-4d55-9d1e-3f3f7d4c2a10", "email": "bob@example.com" },
    }))
    .unwrap()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A `Cookie` header value carrying a live session.
pub fn active_session_cookie(access_token: &str) -> String {
    let value = encode_session(&session(access_token, now() + 3600)).unwrap();
    format!("{STORAGE_KEY}={value}")
}

pub fn expired_session_cookie() -> String {
    let value = encode_session(&session("stale-token", now() - 60)).unwrap();
    format!("{STORAGE_KEY}={value}")
}

pub fn set_cookie_headers(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect()
}

pub fn assert_cookie_removed(response: &reqwest::Response, name: &str) {
    let headers = set_cookie_headers(response);
    assert!(
        headers
            .iter()
            .any(|h| h.starts_with(&format!("{name}=;")) && h.contains("Max-Age=0")),
        "expected removal of cookie {name}, got {headers:?}"
    );
}

pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(
        response.status().as_u16(),
        303,
        "received https status code: 303 Redirect"
    );
    assert_eq!(
        response.headers().get("Location").unwrap(),
        location,
        "redirect location is: {}",
        location
    )
}
