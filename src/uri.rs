use crate::error::{OTPError, OTPResult};
use crate::generator::OTPParams;
use crate::secret::OTPSecret;
use log::debug;
use percent_encoding::percent_decode_str;
use std::str::FromStr;
use url::Url;

const OTP_URL_SCHEME: &str = "otpauth";

/// Parse an `otpauth://` url into a parameter record.
///
/// Anything unrecognized yields `None`, never an error: wrong scheme, a host
/// other than `totp`/`hotp`, a missing or undecodable secret, malformed
/// percent-escapes in the label. Optional query parameters are copied only when
/// present, so default-merging applies downstream.
pub fn parse_uri<S: AsRef<str>>(uri: S) -> Option<OTPParams> {
  let url = match Url::parse(uri.as_ref()) {
    Ok(url) => url,
    Err(error) => {
      debug!("Not a parseable url: {}", error);
      return None;
    }
  };

  if url.scheme() != OTP_URL_SCHEME {
    debug!("Unexpected url scheme: {}", url.scheme());
    return None;
  }

  let otp_type = url.host_str()?.to_ascii_lowercase();
  if otp_type != "totp" && otp_type != "hotp" {
    debug!("Unsupported otp type: {}", otp_type);
    return None;
  }

  let secret = match query_value(&url, "secret") {
    Some(text) => match OTPSecret::from_str(&text) {
      Ok(secret) => secret,
      Err(_) => {
        debug!("Secret is not valid base32");
        return None;
      }
    },
    None => {
      debug!("Missing secret parameter");
      return None;
    }
  };

  let mut label = Vec::new();
  for segment in url.path().trim_start_matches('/').split(':') {
    match percent_decode_str(segment).decode_utf8() {
      Ok(decoded) => label.push(decoded.into_owned()),
      Err(_) => {
        debug!("Malformed label encoding");
        return None;
      }
    }
  }
  // last label segment is the account, the one before it the issuer
  let account = label.pop().filter(|segment| !segment.is_empty());
  let issuer = query_value(&url, "issuer")
    .filter(|issuer| !issuer.is_empty())
    .or_else(|| label.pop().filter(|segment| !segment.is_empty()));

  Some(OTPParams {
    otp_type: Some(otp_type),
    algorithm: query_value(&url, "algorithm")
      .filter(|algorithm| !algorithm.is_empty())
      .map(|algorithm| algorithm.to_ascii_lowercase()),
    digits: query_value(&url, "digits").and_then(|digits| digits.parse().ok()),
    secret: Some(secret),
    issuer,
    account,
    period: query_value(&url, "period").and_then(|period| period.parse().ok()),
    counter: query_value(&url, "counter").and_then(|counter| counter.parse().ok()),
  })
}

/// Format a parameter record as an `otpauth://` url.
///
/// The secret is mandatory, everything else is emitted only when present and
/// non-zero, in a fixed query order. An unknown or missing type falls back to
/// `hotp`.
pub fn format_uri(params: &OTPParams) -> OTPResult<String> {
  let otp_type = match params.otp_type.as_deref() {
    Some("totp") => "totp",
    _ => "hotp",
  };
  let secret = params.secret.as_ref().ok_or(OTPError::MissingInput)?;

  let mut url = Url::parse(&format!("{}://{}", OTP_URL_SCHEME, otp_type))?;

  let mut label = Vec::new();
  if let Some(issuer) = non_empty(&params.issuer) {
    label.push(issuer);
  }
  if let Some(account) = non_empty(&params.account) {
    label.push(account);
  }
  url.set_path(&format!("/{}", label.join(":")));

  {
    let mut query = url.query_pairs_mut();

    query.append_pair("secret", &secret.to_string());
    if let Some(issuer) = non_empty(&params.issuer) {
      query.append_pair("issuer", issuer);
    }
    if let Some(algorithm) = non_empty(&params.algorithm) {
      query.append_pair("algorithm", &algorithm.to_ascii_uppercase());
    }
    if let Some(digits) = params.digits.filter(|digits| *digits != 0) {
      query.append_pair("digits", &digits.to_string());
    }
    if let Some(period) = params.period.filter(|period| *period != 0) {
      query.append_pair("period", &period.to_string());
    }
    if let Some(counter) = params.counter.filter(|counter| *counter != 0) {
      query.append_pair("counter", &counter.to_string());
    }
  }

  Ok(url.to_string())
}

fn query_value(url: &Url, name: &str) -> Option<String> {
  url
    .query_pairs()
    .find(|(key, _)| key == name)
    .map(|(_, value)| value.into_owned())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|value| !value.is_empty())
}
