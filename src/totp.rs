use crate::error::{OTPError, OTPResult};
use crate::generator::{OTPCodeState, OTPCore, OTPGenerator, OTPParams};
use chrono::Utc;
use std::fmt;

/// Wall clock seam, injectable for deterministic tests.
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> u64 {
    Utc::now().timestamp_millis() as u64
  }
}

/// Time-based generator.
///
/// The moving factor is the number of whole periods elapsed since the epoch.
/// Generation does not mutate any state, all real-time non-determinism comes
/// from the clock.
pub struct TOTPGenerator {
  core: OTPCore,
  period: u32,
  clock: Box<dyn Clock>,
}

impl TOTPGenerator {
  pub fn defaults() -> OTPParams {
    OTPParams {
      algorithm: Some("sha1".to_string()),
      digits: Some(6),
      period: Some(30),
      ..OTPParams::default()
    }
  }

  pub fn new(params: OTPParams) -> OTPResult<TOTPGenerator> {
    Self::with_clock(params, Box::new(SystemClock))
  }

  pub fn with_clock(params: OTPParams, clock: Box<dyn Clock>) -> OTPResult<TOTPGenerator> {
    let params = params.merged_over(Self::defaults());
    let core = OTPCore::from_params(&params)?;
    let period = params.period.unwrap_or(30);

    if period == 0 {
      return Err(OTPError::InvalidParameter("period".to_string()));
    }

    Ok(TOTPGenerator { core, period, clock })
  }

  pub fn period(&self) -> u32 {
    self.period
  }

  /// Seconds until the current code expires, always in `(0, period]`.
  pub fn timeout(&self) -> u64 {
    let now_seconds = self.clock.now_millis() / 1000;

    u64::from(self.period) - now_seconds % u64::from(self.period)
  }

  fn time_step(&self) -> u64 {
    (self.clock.now_millis() / 1000) / u64::from(self.period)
  }
}

impl fmt::Debug for TOTPGenerator {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("TOTPGenerator")
      .field("core", &self.core)
      .field("period", &self.period)
      .finish()
  }
}

impl OTPGenerator for TOTPGenerator {
  fn otp_type(&self) -> &'static str {
    "totp"
  }

  fn core(&self) -> &OTPCore {
    &self.core
  }

  fn current_moving_factor(&mut self) -> u64 {
    self.time_step()
  }

  fn lax_window(&mut self) -> Vec<u64> {
    // tolerate one period of clock skew in either direction
    let current = self.time_step();
    let mut window = Vec::with_capacity(3);

    if let Some(previous) = current.checked_sub(1) {
      window.push(previous);
    }
    window.push(current);
    window.push(current + 1);

    window
  }

  fn code_state(&self) -> OTPCodeState {
    OTPCodeState::Totp { timeout: self.timeout() }
  }

  fn export_params(&self) -> OTPParams {
    OTPParams {
      otp_type: self.core.otp_type.clone().or_else(|| Some(self.otp_type().to_string())),
      algorithm: Some(self.core.algorithm.to_string()),
      digits: Some(self.core.digits),
      secret: Some(self.core.secret.clone()),
      issuer: self.core.issuer.clone(),
      account: self.core.account.clone(),
      period: Some(self.period),
      counter: None,
    }
  }
}
