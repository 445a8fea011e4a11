use crate::error::OTPResult;
use crate::generator::{OTPCodeState, OTPCore, OTPGenerator, OTPParams};

/// Counter-based generator.
///
/// Reading the current moving factor increments the counter, so
/// [`OTPGenerator::current_code`], [`OTPGenerator::result`] and
/// [`OTPGenerator::is_valid`] are NOT idempotent: every call advances the
/// counter by one.
#[derive(Debug)]
pub struct HOTPGenerator {
  core: OTPCore,
  counter: u64,
}

impl HOTPGenerator {
  pub fn defaults() -> OTPParams {
    OTPParams {
      algorithm: Some("sha1".to_string()),
      digits: Some(6),
      counter: Some(0),
      ..OTPParams::default()
    }
  }

  pub fn new(params: OTPParams) -> OTPResult<HOTPGenerator> {
    let params = params.merged_over(Self::defaults());
    let core = OTPCore::from_params(&params)?;
    let counter = params.counter.unwrap_or(0);

    Ok(HOTPGenerator { core, counter })
  }

  /// Current counter value, without advancing it.
  pub fn counter(&self) -> u64 {
    self.counter
  }
}

impl OTPGenerator for HOTPGenerator {
  fn otp_type(&self) -> &'static str {
    "hotp"
  }

  fn core(&self) -> &OTPCore {
    &self.core
  }

  fn current_moving_factor(&mut self) -> u64 {
    self.counter += 1;
    self.counter
  }

  fn lax_window(&mut self) -> Vec<u64> {
    // tolerate a single counter slip ahead of this instance
    let current = self.current_moving_factor();
    vec![current, current + 1]
  }

  fn code_state(&self) -> OTPCodeState {
    OTPCodeState::Hotp { counter: self.counter }
  }

  fn export_params(&self) -> OTPParams {
    OTPParams {
      otp_type: self.core.otp_type.clone().or_else(|| Some(self.otp_type().to_string())),
      algorithm: Some(self.core.algorithm.to_string()),
      digits: Some(self.core.digits),
      secret: Some(self.core.secret.clone()),
      issuer: self.core.issuer.clone(),
      account: self.core.account.clone(),
      period: None,
      counter: Some(self.counter),
    }
  }
}
