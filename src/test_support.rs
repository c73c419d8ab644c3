// src/test_support.rs
//! Helpers shared by the unit tests.

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use std::sync::Arc;
use wiremock::MockServer;

use crate::core::{ApiClient, InFlight};
use crate::navigation::Navigator;
use crate::router::Route;
use crate::session::Session;
use crate::views::AppContext;

const TEST_SECRET: &[u8] = b"empleos-test-secret";

/// A real HS256 token carrying `claims`.
pub fn mint_token(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("encode test token")
}

/// Three-segment credential with a hand-built payload segment.
pub fn raw_token(payload_segment: &str) -> String {
    format!("eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl", payload_segment)
}

/// Context pointed at `server`, with `claims` signed in when given.
pub fn context_for(server: &MockServer, claims: Option<Value>) -> AppContext {
    let session = Session::in_memory();
    if let Some(claims) = claims {
        session.sign_in(&mint_token(claims)).expect("sign in");
    }
    AppContext {
        api: ApiClient::new(server.uri(), 5).expect("client"),
        session,
        navigator: Arc::new(Navigator::new(Route::Landing)),
        in_flight: InFlight::new(),
    }
}
