use reqwest::{Client, redirect::Policy};
use shopline::{AppState, build_router};
use tokio::net::TcpListener;

use crate::common::TestDb;

/// HTTP test application wrapper
///
/// Runs the real router on a random port, backed by the test database.
/// Each test gets its own server instance to allow parallel test execution.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    pub client: Client,
    pub test_db: TestDb,
}

impl TestApp {
    /// # Example
    /// ```rust
    /// #[tokio::test]
    /// async fn test_health_endpoint() {
    ///     let app = TestApp::new("test_health_endpoint").await;
    ///
    ///     let response = app.client
    ///         .get(&app.url("/api/v1/health"))
    ///         .send()
    ///         .await
    ///         .unwrap();
    ///
    ///     assert_eq!(response.status(), 200);
    /// }
    /// ```
    pub async fn new(test_name: &str) -> Self {
        let test_db = TestDb::new(test_name).await;

        let app = build_router(AppState::new(test_db.pool.clone(), test_db.config.clone()));

        // Port 0 tells the OS to assign an available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            test_db,
        }
    }

    /// Get the full URL for an API endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
