use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use signup::{
    configuration::{get_configuration, Settings},
    telemetry::{get_subscriber, init_subscriber},
    App,
};
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber("test".into(), true, std::io::stdout));
    } else {
        init_subscriber(get_subscriber("test".into(), true, std::io::sink));
    };
});

pub struct TestApp {
    pub address: String,
    pub topic_server: MockServer,
    api_client: Client,
}

/// Spawn an instance of the app on a random port, keeping signups in memory
/// and publishing to a mock topic backend.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Like [`spawn_app`], with a chance to change the configuration first.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);
    let topic_server = MockServer::start().await;

    let config = {
        let mut c = get_configuration().expect("Failed to read configuration");
        c.application.host = "127.0.0.1".into();
        // Make OS choose random port
        c.application.port = 0;
        c.database = None;
        c.notifier.set_base_url(topic_server.uri());
        configure(&mut c);
        c
    };

    let app = App::build(config).expect("Failed to build app");
    let address = format!("http://127.0.0.1:{}", app.port());
    let _ = tokio::spawn(app.run_until_stopped());

    TestApp {
        address,
        topic_server,
        api_client: Client::new(),
    }
}

impl TestApp {
    pub fn at_url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    pub fn api_client(&self) -> &Client {
        &self.api_client
    }

    pub async fn post_signup(&self, body: &str) -> Response {
        self.api_client
            .post(self.at_url("/signup"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body.to_owned())
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.api_client
            .get(self.at_url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Make the topic backend answer every publish with `status`.
    pub async fn mock_publish_to_respond_with(&self, status: u16) {
        Mock::given(path_regex("^/topics/[^/]+/publish$"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.topic_server)
            .await;
    }

    /// Bodies of all publish requests received by the topic backend.
    pub async fn published_messages(&self) -> Vec<serde_json::Value> {
        self.topic_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("Publish body is not JSON"))
            .collect()
    }
}
