//! Shared fixtures: an in-memory user store and a router wired to it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use account_api::api::{create_router, AppState};
use account_api::domain::{NewUser, Password, User, UserChanges};
use account_api::errors::{AppError, AppResult};
use account_api::infra::{HealthProbe, UserRepository};
use account_api::services::{JwtTokens, Services, TokenService};

pub const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";
pub const PASSWORD: &str = "SecurePass123";

/// [`UserRepository`] over a map, with store-assigned ids.
pub struct InMemoryUsers {
    rows: Mutex<HashMap<i32, User>>,
    next_id: AtomicI32,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Insert an account with a fixed id and [`PASSWORD`] as its password.
    pub fn seed(&self, id: i32, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id,
            email: email.to_string(),
            password_hash: Password::new(PASSWORD).unwrap().into_string(),
            name: format!("User {}", id),
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(id, user.clone());
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
        user
    }

    pub fn get(&self, id: i32) -> Option<User> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|u| u.email == email).cloned())
    }

    async fn filter_by_id(&self, id: i32) -> AppResult<Vec<User>> {
        Ok(self.get(id).into_iter().collect())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let user = User {
            id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows.get_mut(&id).ok_or(AppError::NotFound)?;
        user.email = changes.email;
        user.name = changes.name;
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn mark_verified(&self, id: i32) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows.get_mut(&id).ok_or(AppError::NotFound)?;
        user.is_verified = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

/// Probe that always reports the store as reachable.
pub struct AlwaysUp;

#[async_trait]
impl HealthProbe for AlwaysUp {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Router plus handles on the store and token issuer behind it.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUsers>,
    pub tokens: Arc<JwtTokens>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_detailed_errors(false)
    }

    pub fn with_detailed_errors(verify_detailed_errors: bool) -> Self {
        let users = Arc::new(InMemoryUsers::new());
        let tokens = Arc::new(JwtTokens::new(SECRET, 1, 48));
        let services = Services::new(users.clone(), tokens.clone());
        let state = AppState::from_services(&services, Arc::new(AlwaysUp), verify_detailed_errors);

        Self {
            router: create_router(state),
            users,
            tokens,
        }
    }

    pub fn access_token(&self, user: &User) -> String {
        self.tokens.issue_access_token(user).unwrap().access_token
    }

    /// Send a request; the body is `None` when the response has none.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Option<Value>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).unwrap())
        };
        (status, body)
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}
