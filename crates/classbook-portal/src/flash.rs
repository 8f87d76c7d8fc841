//! One-shot flash messages carried across a redirect.
//!
//! A [`Flash`] is serialised to JSON, base64url-encoded, and signed with
//! HMAC-SHA256: `<payload>.<hex signature>`. The token rides in the redirect's
//! query string; the page it lands on renders the message once and never
//! echoes the token into its own links.
//!
//! Each token carries a random nonce and verifies successfully only once per
//! signer, so reloading the landing page drops the banner.

use std::{collections::HashMap, sync::Mutex};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use strum::Display;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const MAX_TOKEN_LEN: usize = 2048;

// ─── Message ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlashKind {
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
  pub kind:      FlashKind,
  pub message:   String,
  /// Unix seconds.
  pub issued_at: i64,
  /// Random hex; makes two otherwise identical flashes distinct tokens.
  pub nonce:     String,
}

impl Flash {
  pub fn success(message: impl Into<String>) -> Self {
    Self::new(FlashKind::Success, message.into())
  }

  pub fn error(message: impl Into<String>) -> Self { Self::new(FlashKind::Error, message.into()) }

  fn new(kind: FlashKind, message: String) -> Self {
    let mut nonce = [0u8; 8];
    OsRng.fill_bytes(&mut nonce);
    Self {
      kind,
      message,
      issued_at: Utc::now().timestamp(),
      nonce: hex::encode(nonce),
    }
  }
}

// ─── Signing ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlashError {
  #[error("malformed flash token")]
  Malformed,
  #[error("flash token signature mismatch")]
  BadSignature,
  #[error("flash token expired")]
  Expired,
  #[error("flash token already shown")]
  Consumed,
  #[error("flash payload error: {0}")]
  Payload(String),
}

/// Signs and verifies flash tokens with a process-wide key.
pub struct FlashSigner {
  key:      Vec<u8>,
  ttl_secs: i64,
  /// Signatures already verified, with their `issued_at`. Entries older than
  /// the TTL are pruned since expiry rejects those tokens anyway.
  shown:    Mutex<HashMap<String, i64>>,
}

impl FlashSigner {
  pub fn new(key: impl Into<Vec<u8>>, ttl_secs: u64) -> Self {
    Self {
      key:      key.into(),
      ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
      shown:    Mutex::new(HashMap::new()),
    }
  }

  /// A signer with a fresh random key. Tokens do not survive a restart.
  pub fn random(ttl_secs: u64) -> Self {
    let mut key = vec![0u8; 32];
    OsRng.fill_bytes(&mut key);
    Self::new(key, ttl_secs)
  }

  pub fn sign(&self, flash: &Flash) -> Result<String, FlashError> {
    let json = serde_json::to_vec(flash).map_err(|e| FlashError::Payload(e.to_string()))?;
    let payload = URL_SAFE_NO_PAD.encode(json);
    let signature = hex::encode(self.mac(payload.as_bytes())?.finalize().into_bytes());
    Ok(format!("{payload}.{signature}"))
  }

  pub fn verify(&self, token: &str) -> Result<Flash, FlashError> {
    self.verify_at(token, Utc::now().timestamp())
  }

  /// Verify `token` as if the current time were `now` (Unix seconds).
  ///
  /// A token that passes is consumed: verifying it again fails with
  /// [`FlashError::Consumed`].
  pub fn verify_at(&self, token: &str, now: i64) -> Result<Flash, FlashError> {
    if token.len() > MAX_TOKEN_LEN {
      return Err(FlashError::Malformed);
    }
    let (payload, signature_hex) = token.split_once('.').ok_or(FlashError::Malformed)?;
    let signature = hex::decode(signature_hex).map_err(|_| FlashError::Malformed)?;

    self
      .mac(payload.as_bytes())?
      .verify_slice(&signature)
      .map_err(|_| FlashError::BadSignature)?;

    let json = URL_SAFE_NO_PAD.decode(payload).map_err(|_| FlashError::Malformed)?;
    let flash: Flash =
      serde_json::from_slice(&json).map_err(|e| FlashError::Payload(e.to_string()))?;

    if (now - flash.issued_at).abs() > self.ttl_secs {
      return Err(FlashError::Expired);
    }
    self.consume(&signature_hex.to_ascii_lowercase(), flash.issued_at, now)?;
    Ok(flash)
  }

  fn consume(&self, signature: &str, issued_at: i64, now: i64) -> Result<(), FlashError> {
    let mut shown = self.shown.lock().unwrap_or_else(|e| e.into_inner());
    if shown.contains_key(signature) {
      return Err(FlashError::Consumed);
    }
    shown.retain(|_, at| (now - *at).abs() <= self.ttl_secs);
    shown.insert(signature.to_owned(), issued_at);
    Ok(())
  }

  fn mac(&self, data: &[u8]) -> Result<HmacSha256, FlashError> {
    let mut mac =
      HmacSha256::new_from_slice(&self.key).map_err(|e| FlashError::Payload(e.to_string()))?;
    mac.update(data);
    Ok(mac)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn signer() -> FlashSigner { FlashSigner::new(b"test-secret".to_vec(), 60) }

  #[test]
  fn sign_then_verify() {
    let s = signer();
    let flash = Flash::success("Student added successfully!");
    let token = s.sign(&flash).unwrap();
    assert_eq!(s.verify(&token).unwrap(), flash);
  }

  #[test]
  fn token_is_shown_once() {
    let s = signer();
    let token = s.sign(&Flash::success("Marks saved.")).unwrap();
    assert!(s.verify(&token).is_ok());
    assert_eq!(s.verify(&token), Err(FlashError::Consumed));

    let (payload, sig) = token.split_once('.').unwrap();
    let respelled = format!("{payload}.{}", sig.to_ascii_uppercase());
    assert_eq!(s.verify(&respelled), Err(FlashError::Consumed));
  }

  #[test]
  fn identical_messages_get_distinct_tokens() {
    let s = signer();
    let a = s.sign(&Flash::success("Marks saved.")).unwrap();
    let b = s.sign(&Flash::success("Marks saved.")).unwrap();
    assert_ne!(a, b);
    assert!(s.verify(&a).is_ok());
    assert!(s.verify(&b).is_ok());
  }

  #[test]
  fn token_is_url_safe() {
    let token = signer().sign(&Flash::error("Please fill all fields.")).unwrap();
    assert!(
      token.chars().all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c)),
      "{token}"
    );
  }

  #[test]
  fn tampered_payload_is_rejected() {
    let s = signer();
    let token = s.sign(&Flash::success("Marks saved.")).unwrap();
    let (_, sig) = token.split_once('.').unwrap();
    let forged = URL_SAFE_NO_PAD.encode(
      serde_json::to_vec(&Flash::success("Everything deleted.")).unwrap(),
    );
    assert_eq!(s.verify(&format!("{forged}.{sig}")), Err(FlashError::BadSignature));
  }

  #[test]
  fn other_key_is_rejected() {
    let token = signer().sign(&Flash::success("Marks saved.")).unwrap();
    let other = FlashSigner::new(b"another-secret".to_vec(), 60);
    assert_eq!(other.verify(&token), Err(FlashError::BadSignature));
  }

  #[test]
  fn expired_token_is_rejected() {
    let s = signer();
    let flash = Flash::success("Attendance saved.");
    let token = s.sign(&flash).unwrap();
    assert_eq!(s.verify_at(&token, flash.issued_at + 61), Err(FlashError::Expired));
    assert_eq!(s.verify_at(&token, flash.issued_at - 61), Err(FlashError::Expired));
    assert!(s.verify_at(&token, flash.issued_at + 60).is_ok());
  }

  #[test]
  fn garbage_is_malformed() {
    let s = signer();
    assert_eq!(s.verify("no-dot-here"), Err(FlashError::Malformed));
    assert_eq!(s.verify("abc.not-hex"), Err(FlashError::Malformed));
  }
}
