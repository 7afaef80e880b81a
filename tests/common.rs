#![allow(dead_code)]

use hotel_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{
        deal::{Deal, NewDeal},
        room::{NewRoom, Room, RoomStatus},
    },
    domain::ports::EmailService,
    domain::services::booking_service::{BookingReceipt, BookingRequest},
    error::AppError,
    infra::clock::ManualClock,
    infra::factory::{seed_staff_account, sqlite_repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tower::ServiceExt;
use serde_json::Value;

pub const STAFF_EMAIL: &str = "frontdesk@hotel.test";
pub const STAFF_PASSWORD: &str = "frontdesk-password";
pub const GUEST_PASSWORD: &str = "guest-password";

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: AtomicBool,
    pub delay_ms: AtomicU64,
}

impl MockEmailService {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Mail is handed off to a background task; poll until `count` messages arrived.
    pub async fn wait_for(&self, count: usize) -> Vec<SentMail> {
        for _ in 0..200 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} mails, got {}", count, self.sent().len());
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("mail relay down".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    pub mailer: Arc<MockEmailService>,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

impl TestApp {
    /// Hotel in UTC, clock frozen at 2024-06-01 09:00.
    pub async fn new() -> Self {
        Self::with_timezone(chrono_tz::UTC).await
    }

    pub async fn with_timezone(tz: Tz) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            hotel_timezone: tz,
            sweep_interval_secs: 1,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            staff_email: Some(STAFF_EMAIL.to_string()),
            staff_password: Some(STAFF_PASSWORD.to_string()),
        };

        let clock = Arc::new(ManualClock::new(utc(2024, 6, 1, 9, 0)));
        let mailer = Arc::new(MockEmailService::default());
        let repos = sqlite_repositories(&pool);

        seed_staff_account(&config, repos.users.as_ref())
            .await
            .expect("Failed to seed staff account");

        let state = Arc::new(AppState::new(config, repos, clock.clone(), mailer.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            clock,
            mailer,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, json)
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token,
        }
    }

    pub async fn staff(&self) -> AuthHeaders {
        self.login(STAFF_EMAIL, STAFF_PASSWORD).await
    }

    /// Registers a guest through the API and signs them in.
    pub async fn register_guest(&self, email: &str) -> (i64, AuthHeaders) {
        let (status, body) = self.send("POST", "/api/v1/auth/register", None, Some(serde_json::json!({
            "email": email,
            "full_name": "Test Guest",
            "password": GUEST_PASSWORD
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let user_id = body["id"].as_i64().unwrap();
        (user_id, self.login(email, GUEST_PASSWORD).await)
    }

    pub async fn seed_room(&self, name: &str, type_price_cents: i64, level_price_cents: i64, deal_id: Option<i64>) -> Room {
        let catalog = &self.state.catalog_repo;
        let room_type = catalog.create_room_type(&format!("{}-type", name), type_price_cents).await.unwrap();
        let room_level = catalog.create_room_level(&format!("{}-level", name), level_price_cents).await.unwrap();
        let floor = catalog.create_floor(&format!("{}-floor", name)).await.unwrap();

        self.state.room_repo.create(&NewRoom {
            name: name.to_string(),
            status: RoomStatus::Available,
            room_type_id: room_type.id,
            room_level_id: room_level.id,
            floor_id: floor.id,
            deal_id,
        }).await.unwrap()
    }

    pub async fn seed_deal(&self, rate: f64, start: NaiveDate, end: NaiveDate) -> Deal {
        self.state.deal_repo.create(&NewDeal {
            name: format!("Deal {}", Uuid::new_v4()),
            discount_rate: rate,
            start_date: start,
            end_date: end,
        }).await.unwrap()
    }

    pub async fn staff_user_id(&self) -> i64 {
        self.state.user_repo.find_by_email(STAFF_EMAIL).await.unwrap().unwrap().id
    }

    pub async fn book(&self, user_id: i64, room_id: i64, check_in: NaiveDate, check_out: NaiveDate) -> Result<BookingReceipt, AppError> {
        self.state.booking_service.create_booking(BookingRequest {
            user_id,
            room_id,
            check_in,
            check_out,
            initial_status: None,
        }).await
    }

    pub async fn booking_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
