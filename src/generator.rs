use crate::encoding::{dynamic_truncate, int_to_bytes, pad_left};
use crate::error::{OTPError, OTPResult};
use crate::secret::OTPSecret;
use crate::uri::format_uri;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OTPAlgorithm {
  SHA1,
  SHA256,
  SHA512,
}

impl fmt::Display for OTPAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      OTPAlgorithm::SHA1 => write!(f, "SHA1")?,
      OTPAlgorithm::SHA256 => write!(f, "SHA256")?,
      OTPAlgorithm::SHA512 => write!(f, "SHA512")?,
    }
    Ok(())
  }
}

impl FromStr for OTPAlgorithm {
  type Err = OTPError;

  fn from_str(s: &str) -> OTPResult<Self> {
    match s.to_ascii_lowercase().as_str() {
      "sha1" => Ok(OTPAlgorithm::SHA1),
      "sha256" => Ok(OTPAlgorithm::SHA256),
      "sha512" => Ok(OTPAlgorithm::SHA512),
      _ => Err(OTPError::UnsupportedAlgorithm(s.to_string())),
    }
  }
}

/// Caller-facing parameter record.
///
/// All fields are optional so that an absent field is distinguishable from an
/// explicit value: construction merges these over the defaults of the concrete
/// generator, field by field. The algorithm stays plain lower-case text until
/// construction, exactly as the uri codec produces it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OTPParams {
  pub otp_type: Option<String>,
  pub algorithm: Option<String>,
  pub digits: Option<u32>,
  pub secret: Option<OTPSecret>,
  pub issuer: Option<String>,
  pub account: Option<String>,
  pub period: Option<u32>,
  pub counter: Option<u64>,
}

impl OTPParams {
  pub fn merged_over(self, defaults: OTPParams) -> OTPParams {
    OTPParams {
      otp_type: self.otp_type.or(defaults.otp_type),
      algorithm: self.algorithm.or(defaults.algorithm),
      digits: self.digits.or(defaults.digits),
      secret: self.secret.or(defaults.secret),
      issuer: self.issuer.or(defaults.issuer),
      account: self.account.or(defaults.account),
      period: self.period.or(defaults.period),
      counter: self.counter.or(defaults.counter),
    }
  }
}

/// Resolved configuration shared by both generator kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OTPCore {
  pub algorithm: OTPAlgorithm,
  pub digits: u32,
  pub secret: OTPSecret,
  pub otp_type: Option<String>,
  pub issuer: Option<String>,
  pub account: Option<String>,
}

impl OTPCore {
  pub fn from_params(params: &OTPParams) -> OTPResult<OTPCore> {
    let secret = match &params.secret {
      Some(secret) if !secret.is_empty() => secret.clone(),
      _ => return Err(OTPError::MissingSecret),
    };
    let algorithm = match &params.algorithm {
      Some(algorithm) => algorithm.parse()?,
      None => OTPAlgorithm::SHA1,
    };

    Ok(OTPCore {
      algorithm,
      digits: params.digits.unwrap_or(6),
      secret,
      otp_type: params.otp_type.clone(),
      issuer: params.issuer.clone(),
      account: params.account.clone(),
    })
  }

  /// Single source of truth for code generation: hmac over the big-endian
  /// moving factor, dynamic truncation, zero-padded to `digits` characters.
  pub fn code_for(&self, moving_factor: u64) -> String {
    let message = int_to_bytes(moving_factor, 8);
    let digest = match self.algorithm {
      OTPAlgorithm::SHA1 => hmac_digest::<Hmac<Sha1>>(self.secret.as_bytes(), &message),
      OTPAlgorithm::SHA256 => hmac_digest::<Hmac<Sha256>>(self.secret.as_bytes(), &message),
      OTPAlgorithm::SHA512 => hmac_digest::<Hmac<Sha512>>(self.secret.as_bytes(), &message),
    };
    let code = dynamic_truncate(&digest, Some(self.digits)).unwrap_or_default();

    pad_left(&code, self.digits as usize, '0')
  }
}

fn hmac_digest<M>(key: &[u8], message: &[u8]) -> Vec<u8>
where
  M: Mac + KeyInit,
{
  // Hmac accepts keys of any length
  let mut mac = <M as Mac>::new_from_slice(key).unwrap();

  mac.update(message);
  mac.finalize().into_bytes().to_vec()
}

/// Kind-specific part of a generated code snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OTPCodeState {
  Hotp {
    /// Counter value after the generation increment.
    counter: u64,
  },
  Totp {
    /// Seconds until the code changes.
    timeout: u64,
  },
}

/// Snapshot of a generated code with its display context. Plain data, safe to
/// discard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OTPCode {
  pub code: String,
  pub otp_type: String,
  pub issuer: Option<String>,
  pub account: Option<String>,
  #[serde(flatten)]
  pub state: OTPCodeState,
}

/// Common behavior of the counter- and time-based generators.
///
/// A concrete generator supplies its identity, its current moving factor (which
/// may have side effects, see [`crate::hotp::HOTPGenerator`]) and the window of
/// moving factors tolerated by lax validation. Code generation, validation and
/// url export are shared.
pub trait OTPGenerator: fmt::Debug {
  fn otp_type(&self) -> &'static str;

  fn core(&self) -> &OTPCore;

  /// The moving factor a code generated right now would use. Advances the
  /// counter of a counter-based generator.
  fn current_moving_factor(&mut self) -> u64;

  /// Moving factors accepted by lax validation.
  fn lax_window(&mut self) -> Vec<u64>;

  /// Kind-specific state to attach to a result snapshot.
  fn code_state(&self) -> OTPCodeState;

  /// Full parameter record of this instance, for url export.
  fn export_params(&self) -> OTPParams;

  fn current_code(&mut self) -> String {
    let factor = self.current_moving_factor();
    self.core().code_for(factor)
  }

  fn result(&mut self) -> OTPCode {
    let code = self.current_code();
    let core = self.core();

    OTPCode {
      code,
      otp_type: core.otp_type.clone().unwrap_or_else(|| self.otp_type().to_string()),
      issuer: core.issuer.clone(),
      account: core.account.clone(),
      state: self.code_state(),
    }
  }

  /// Check a candidate code by exact string comparison.
  ///
  /// With `lax` set, the code may match any moving factor of the generator's
  /// lax window instead of just the current one.
  fn is_valid(&mut self, candidate: &str, lax: bool) -> bool {
    if lax {
      self
        .lax_window()
        .into_iter()
        .any(|factor| self.core().code_for(factor) == candidate)
    } else {
      let factor = self.current_moving_factor();
      self.core().code_for(factor) == candidate
    }
  }

  fn to_uri(&self) -> OTPResult<String> {
    format_uri(&self.export_params())
  }
}
