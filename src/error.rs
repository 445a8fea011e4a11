use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OTPError {
  MissingSecret,
  UnsupportedAlgorithm(String),
  InvalidParameter(String),
  InvalidEncoding,
  MissingInput,
  InvalidUrl(String),
}

impl fmt::Display for OTPError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      OTPError::MissingSecret => write!(f, "No secret key")?,
      OTPError::UnsupportedAlgorithm(name) => write!(f, "Unsupported algorithm: {}", name)?,
      OTPError::InvalidParameter(name) => write!(f, "Invalid parameter: {}", name)?,
      OTPError::InvalidEncoding => write!(f, "Invalid base32 encoding")?,
      OTPError::MissingInput => write!(f, "Missing input")?,
      OTPError::InvalidUrl(error) => write!(f, "Invalid url: {}", error)?,
    }
    Ok(())
  }
}

impl std::error::Error for OTPError {}

pub type OTPResult<T> = Result<T, OTPError>;

error_convert_from!(url::ParseError, OTPError, InvalidUrl(display));
