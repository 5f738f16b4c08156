use event_management::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::{models::user::User, services::auth_service::{hash_password, JwtAuthProvider}},
    infra::repositories::{
        memory_user_repo::InMemoryUserRepo,
        sqlite_attendee_repo::SqliteAttendeeRepo,
        sqlite_event_repo::SqliteEventRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use tower::ServiceExt;
use serde_json::{json, Value};

pub const TEST_USERNAME: &str = "johndoe";
pub const TEST_PASSWORD: &str = "secret";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: "test-secret-key".to_string(),
            auth_issuer: "test-issuer".to_string(),
            access_token_expire_minutes: 30,
            admin_username: None,
            admin_password: None,
        };

        let user = User::new(TEST_USERNAME.to_string(), hash_password(TEST_PASSWORD).unwrap());
        let users = Arc::new(InMemoryUserRepo::with_users([user]));
        let auth_provider = Arc::new(JwtAuthProvider::new(users, &config));

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteAttendeeRepo::new(pool.clone())),
            auth_provider,
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn token(&self) -> String {
        let form = format!("username={}&password={}", TEST_USERNAME, TEST_PASSWORD);

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body = parse_body(response).await;
        body["access_token"].as_str().expect("No access_token in body").to_string()
    }

    pub async fn send_json(&self, method: &str, uri: &str, token: &str, payload: Value) -> Response {
        self.router.clone().oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    pub async fn put_empty(&self, uri: &str, token: &str) -> Response {
        self.send_empty("PUT", uri, token).await
    }

    pub async fn post_empty(&self, uri: &str, token: &str) -> Response {
        self.send_empty("POST", uri, token).await
    }

    async fn send_empty(&self, method: &str, uri: &str, token: &str) -> Response {
        self.router.clone().oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    pub async fn upload_roster(&self, event_id: i64, token: &str, contents: &str) -> Response {
        let boundary = "roster-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"roster.csv\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
            b = boundary,
            c = contents,
        );

        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/events/{}/bulk-checkin/", event_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
                .body(Body::from(body))
                .unwrap()
        ).await.unwrap()
    }

    /// Creates an event and returns its id.
    pub async fn create_event(
        &self,
        token: &str,
        name: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        max_attendees: i32,
    ) -> i64 {
        let payload = json!({
            "name": name,
            "description": "Test event",
            "start_time": start_time.to_rfc3339(),
            "end_time": end_time.to_rfc3339(),
            "location": "Main Hall",
            "max_attendees": max_attendees,
        });

        let response = self.send_json("POST", "/events/", token, payload).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        parse_body(response).await["event_id"].as_i64().unwrap()
    }

    pub async fn register(&self, token: &str, event_id: i64, email: &str) -> Response {
        let payload = json!({
            "first_name": "Test",
            "last_name": "Attendee",
            "email": email,
            "phone_number": "555-0100",
            "event_id": event_id,
        });
        self.send_json("POST", "/attendees/", token, payload).await
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
