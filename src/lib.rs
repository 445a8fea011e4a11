#[macro_use]
mod macros;

pub mod encoding;
pub mod error;
pub mod factory;
pub mod generator;
pub mod hotp;
pub mod secret;
pub mod totp;
pub mod uri;

#[cfg(test)]
mod tests;

pub use crate::error::{OTPError, OTPResult};
pub use crate::factory::{create_otp, create_otp_from_url};
pub use crate::generator::{OTPAlgorithm, OTPCode, OTPCodeState, OTPCore, OTPGenerator, OTPParams};
pub use crate::hotp::HOTPGenerator;
pub use crate::secret::OTPSecret;
pub use crate::totp::{Clock, SystemClock, TOTPGenerator};
pub use crate::uri::{format_uri, parse_uri};
