use crate::error::OTPResult;
use crate::generator::{OTPGenerator, OTPParams};
use crate::hotp::HOTPGenerator;
use crate::totp::TOTPGenerator;
use crate::uri::parse_uri;
use log::debug;

/// Construct the generator matching the type of a parameter record.
///
/// An unknown or missing type yields `Ok(None)`. Construction failures of a
/// recognized type (missing secret, unsupported hash) are real errors.
pub fn create_otp(params: OTPParams) -> OTPResult<Option<Box<dyn OTPGenerator>>> {
  let otp_type = params.otp_type.clone();

  match otp_type.as_deref() {
    Some("totp") => Ok(Some(Box::new(TOTPGenerator::new(params)?))),
    Some("hotp") => Ok(Some(Box::new(HOTPGenerator::new(params)?))),
    other => {
      debug!("Unrecognized otp type: {:?}", other);
      Ok(None)
    }
  }
}

/// Construct a generator from an `otpauth://` url. An unparseable url yields
/// `Ok(None)`.
pub fn create_otp_from_url<S: AsRef<str>>(uri: S) -> OTPResult<Option<Box<dyn OTPGenerator>>> {
  match parse_uri(uri) {
    Some(params) => create_otp(params),
    None => Ok(None),
  }
}
