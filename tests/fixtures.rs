//! Shared helpers for the integration tests: a fetcher pointed at a
//! wiremock backend and a couple of canned sessions.

#![allow(dead_code)]

use std::sync::Arc;

use eduglobal::web::session::{NoSession, Session, StaticSession, ROLE_ADMIN};
use eduglobal::web::ClientBuilder;
use eduglobal::Fetcher;
use serde_json::Value;
use wiremock::{MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

pub fn session(role: &str) -> Session {
    Session {
        name: "Sam".into(),
        email: "sam@example.com".into(),
        role: role.into(),
        is_logged_in: true,
        token: TOKEN.into(),
    }
}

pub fn admin() -> Session {
    session(ROLE_ADMIN)
}

pub fn student() -> Session {
    session("student")
}

pub fn fetcher(server: &MockServer, session: Option<Session>) -> Fetcher {
    let client = ClientBuilder::new(&server.uri()).build().unwrap();
    match session {
        Some(session) => Fetcher::new(client, Arc::new(StaticSession(session))),
        None => Fetcher::new(client, Arc::new(NoSession)),
    }
}

pub fn json(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}
