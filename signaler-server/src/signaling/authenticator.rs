use async_trait::async_trait;
use signaler_core::{SessionAddress, TenantId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Maps the upgrade request's query parameters to an identity, or rejects it.
#[async_trait]
pub trait Authenticator: Send + Sync + 'static {
    async fn authenticate(&self, params: &HashMap<String, String>) -> Option<SessionAddress>;
}

/// Takes the identity straight from `?apiKey=..&room=..&sessionKey=..`.
///
/// With an allow-list, only the listed API keys are accepted as tenants.
#[derive(Debug, Clone, Default)]
pub struct QueryAuthenticator {
    allowed_api_keys: Option<HashSet<TenantId>>,
}

impl QueryAuthenticator {
    pub const API_KEY: &'static str = "apiKey";
    pub const ROOM: &'static str = "room";
    pub const SESSION_KEY: &'static str = "sessionKey";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowed_api_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<TenantId>,
    {
        Self {
            allowed_api_keys: Some(keys.into_iter().map(Into::into).collect()),
        }
    }
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    let value = params.get(name).map(String::as_str).filter(|v| !v.is_empty());
    if value.is_none() {
        debug!("Missing query parameter {}", name);
    }
    value
}

#[async_trait]
impl Authenticator for QueryAuthenticator {
    async fn authenticate(&self, params: &HashMap<String, String>) -> Option<SessionAddress> {
        let api_key = TenantId::from(required(params, Self::API_KEY)?);
        let room = required(params, Self::ROOM)?;
        let session_key = required(params, Self::SESSION_KEY)?;

        if let Some(allowed) = &self.allowed_api_keys {
            if !allowed.contains(&api_key) {
                debug!("API key {} is not allowed", api_key);
                return None;
            }
        }

        Some(SessionAddress::new(api_key, room, session_key))
    }
}
