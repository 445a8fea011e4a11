use crate::error::{OTPError, OTPResult};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw key material of an OTP instance.
///
/// The textual representation is RFC 4648 base32 with `=` padding, as used in
/// the secret parameter of otpauth urls. Memory is zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct OTPSecret(Vec<u8>);

impl OTPSecret {
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<Vec<u8>> for OTPSecret {
  fn from(bytes: Vec<u8>) -> Self {
    OTPSecret(bytes)
  }
}

impl From<&[u8]> for OTPSecret {
  fn from(bytes: &[u8]) -> Self {
    OTPSecret(bytes.to_vec())
  }
}

impl fmt::Display for OTPSecret {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", data_encoding::BASE32.encode(&self.0))
  }
}

impl fmt::Debug for OTPSecret {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "OTPSecret({} bytes)", self.0.len())
  }
}

impl FromStr for OTPSecret {
  type Err = OTPError;

  fn from_str(s: &str) -> OTPResult<Self> {
    match data_encoding::BASE32.decode(s.as_bytes()) {
      Ok(bytes) => Ok(OTPSecret(bytes)),
      Err(_) => Err(OTPError::InvalidEncoding),
    }
  }
}
