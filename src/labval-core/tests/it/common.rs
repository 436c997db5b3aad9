//! Shared fixtures: test keys and token minting.

use std::collections::HashMap;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use labval_crypto::PemKeyProvider;

pub const ISSUER_PRIVATE: &str = include_str!("../fixtures/issuer_private.pem");
pub const ISSUER_PUBLIC: &str = include_str!("../fixtures/issuer_public.pem");
pub const ROGUE_PRIVATE: &str = include_str!("../fixtures/rogue_private.pem");

pub fn issuer_keys() -> PemKeyProvider {
    PemKeyProvider::new("test-issuer", ISSUER_PUBLIC)
}

pub fn mint_with(private_pem: &str, claims: &serde_json::Value) -> String {
    let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
}

pub fn mint(claims: &serde_json::Value) -> String {
    mint_with(ISSUER_PRIVATE, claims)
}

/// Authorization token whose callback points at `callback`.
pub fn auth_token(state: &str, callback: &str) -> String {
    mint(&serde_json::json!({
        "sub": "student-42",
        "iss": "labs",
        "exp": jsonwebtoken::get_current_timestamp() + 600,
        "Lstate": state,
        "Lcb": callback,
        "Lname": "squirrel",
    }))
}

/// Result token whose validation url is `follow_up`.
pub fn result_token(state: &str, follow_up: &str) -> String {
    mint(&serde_json::json!({
        "sub": "student-42",
        "exp": jsonwebtoken::get_current_timestamp() + 600,
        "Lstate": state,
        "Lvurl": follow_up,
        "Lname": "squirrel",
    }))
}

/// Variable lookup backed by a fixed map.
pub fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| map.get(name).cloned()
}
