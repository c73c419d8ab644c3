// src/token.rs
//! Best-effort reading of bearer credential claims.
//!
//! Nothing here verifies a signature. Decoded claims personalize the UI and pick
//! a landing page; the API remains the only authority on who may do what.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// Standard alphabet, padding optional, lenient about trailing bits.
/// URL-safe input is mapped onto it before decoding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub const EMPLOYER_ROLE: &str = "empleador";
pub const WORKER_ROLE: &str = "empleado";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Employer,
    Worker,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Employer => EMPLOYER_ROLE,
            Role::Worker => WORKER_ROLE,
            Role::Other(name) => name,
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        match name {
            EMPLOYER_ROLE => Role::Employer,
            WORKER_ROLE => Role::Worker,
            other => Role::Other(other.to_string()),
        }
    }
}

/// `roles` as it appears in the payload: either a single annotated string such
/// as `{empleador,empleado}` or a list of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RolesClaim {
    Annotated(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Role::as_str).collect()
    }
}

impl<'a> FromIterator<&'a str> for RoleSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        RoleSet(
            iter.into_iter()
                .map(|name| name.trim_matches(|c: char| c == '{' || c == '}' || c == '"'))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(Role::from)
                .collect(),
        )
    }
}

/// Strip braces and quotes, split on commas, trim, drop empties.
pub fn normalize_roles(raw: &str) -> RoleSet {
    let cleaned = raw.replace(['{', '}', '"'], "");
    cleaned.split(',').collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Option<RolesClaim>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn roles(&self) -> RoleSet {
        match &self.roles {
            Some(RolesClaim::Annotated(raw)) => normalize_roles(raw),
            Some(RolesClaim::List(names)) => names.iter().map(String::as_str).collect(),
            None => RoleSet::default(),
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles().contains(role)
    }
}

/// Decode the payload segment of `credential`.
///
/// Any failure (missing segment, bad base64, non-UTF-8, invalid JSON, a payload
/// that is not an object) yields `None`.
pub fn decode_claims(credential: &str) -> Option<Claims> {
    let payload = credential.trim().split('.').nth(1)?;
    if payload.is_empty() {
        return None;
    }

    let standard: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    let bytes = match PAYLOAD_ENGINE.decode(standard.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Credential payload is not base64: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<Claims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Credential payload is not a claims object: {}", e);
            None
        }
    }
}
