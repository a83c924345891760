//! Failed requests leave a warning in the log, wherever they are rejected.

mod common;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt;

use common::{json_request, TestApp, PASSWORD};

/// Formatted log output shared with the subscriber.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    /// Install a warn-level subscriber for the current thread.
    fn install(&self) -> DefaultGuard {
        let sink = self.clone();
        let subscriber = fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_invalid_registration_is_logged() {
    let log = CapturedLog::default();
    let _guard = log.install();
    let app = TestApp::new();

    let (status, _) = app
        .send(json_request(
            "POST",
            "/auth/register/",
            None,
            json!({"email": "not-an-email", "name": "", "password": PASSWORD}),
        ))
        .await;

    assert_eq!(status.as_u16(), 400);
    let output = log.contents();
    assert!(output.contains("Account operation failed"), "{}", output);
    assert!(output.contains("operation=\"register\""), "{}", output);
    assert!(output.contains("Invalid email format"), "{}", output);
}

#[tokio::test]
async fn test_refused_update_is_logged() {
    let log = CapturedLog::default();
    let _guard = log.install();
    let app = TestApp::new();
    let five = app.users.seed(5, "five@example.com");
    app.users.seed(7, "seven@example.com");

    let (status, _) = app
        .send(json_request(
            "PUT",
            "/users/7/",
            Some(&app.access_token(&five)),
            json!({"email": "seven@example.com", "name": "Taken"}),
        ))
        .await;

    assert_eq!(status.as_u16(), 401);
    let output = log.contents();
    assert!(output.contains("operation=\"update\""), "{}", output);
    assert!(output.contains("does not belong to the caller"), "{}", output);
}

#[tokio::test]
async fn test_unparseable_update_body_is_logged() {
    let log = CapturedLog::default();
    let _guard = log.install();
    let app = TestApp::new();
    let five = app.users.seed(5, "five@example.com");

    let (status, _) = app
        .send(json_request(
            "PUT",
            "/users/5/",
            Some(&app.access_token(&five)),
            json!({"email": 42}),
        ))
        .await;

    assert_eq!(status.as_u16(), 400);
    let output = log.contents();
    assert!(output.contains("Account operation failed"), "{}", output);
    assert!(output.contains("operation=\"update\""), "{}", output);
}
