use crate::error::OTPError;
use crate::factory::{create_otp, create_otp_from_url};
use crate::generator::{OTPCodeState, OTPGenerator, OTPParams};
use crate::hotp::HOTPGenerator;
use crate::secret::OTPSecret;
use crate::totp::{Clock, TOTPGenerator};
use spectral::prelude::*;
use std::str::FromStr;

struct FixedClock(u64);

impl Clock for FixedClock {
  fn now_millis(&self) -> u64 {
    self.0
  }
}

fn totp_at(params: OTPParams, now_millis: u64) -> TOTPGenerator {
  TOTPGenerator::with_clock(params, Box::new(FixedClock(now_millis))).unwrap()
}

fn test_secret() -> Option<OTPSecret> {
  Some(OTPSecret::from(&b"test"[..]))
}

#[test]
fn test_construction_errors() {
  assert_that(&HOTPGenerator::new(OTPParams::default()).err()).is_equal_to(Some(OTPError::MissingSecret));
  assert_that(
    &HOTPGenerator::new(OTPParams {
      secret: Some(OTPSecret::from(Vec::new())),
      ..OTPParams::default()
    })
    .err(),
  )
  .is_equal_to(Some(OTPError::MissingSecret));

  assert_that(
    &HOTPGenerator::new(OTPParams {
      secret: test_secret(),
      algorithm: Some("md5".to_string()),
      ..OTPParams::default()
    })
    .err(),
  )
  .is_equal_to(Some(OTPError::UnsupportedAlgorithm("md5".to_string())));

  assert_that(
    &TOTPGenerator::new(OTPParams {
      secret: test_secret(),
      period: Some(0),
      ..OTPParams::default()
    })
    .err(),
  )
  .is_equal_to(Some(OTPError::InvalidParameter("period".to_string())));
}

#[test]
fn test_code_vectors() {
  // moving factor 0 for every clock below one period
  let mut totp = totp_at(
    OTPParams {
      secret: test_secret(),
      ..OTPParams::default()
    },
    11_000,
  );
  assert_that(&totp.current_code()).is_equal_to("941117".to_string());

  let mut totp = totp_at(
    OTPParams {
      secret: test_secret(),
      digits: Some(4),
      ..OTPParams::default()
    },
    11_000,
  );
  assert_that(&totp.current_code()).is_equal_to("1117".to_string());

  let mut totp = totp_at(
    OTPParams {
      secret: test_secret(),
      algorithm: Some("sha256".to_string()),
      ..OTPParams::default()
    },
    11_000,
  );
  assert_that(&totp.current_code()).is_equal_to("972871".to_string());

  let mut totp = totp_at(
    OTPParams {
      secret: Some(OTPSecret::from_str("74======").unwrap()),
      ..OTPParams::default()
    },
    11_000,
  );
  assert_that(&totp.current_code()).is_equal_to("559234".to_string());
}

#[test]
fn test_totp_timeout() {
  let params = OTPParams {
    secret: test_secret(),
    ..OTPParams::default()
  };

  assert_that(&totp_at(params.clone(), 10_000).timeout()).is_equal_to(20);
  assert_that(&totp_at(params.clone(), 11_000).timeout()).is_equal_to(19);
  assert_that(&totp_at(params.clone(), 30_000).timeout()).is_equal_to(30);

  let params = OTPParams {
    period: Some(60),
    ..params
  };
  assert_that(&totp_at(params, 61_000).timeout()).is_equal_to(59);
}

#[test]
fn test_totp_result() {
  let mut totp = totp_at(
    OTPParams {
      secret: test_secret(),
      issuer: Some("iss".to_string()),
      account: Some("acc".to_string()),
      ..OTPParams::default()
    },
    11_000,
  );
  let result = totp.result();

  assert_that(&result.code).is_equal_to("941117".to_string());
  assert_that(&result.otp_type).is_equal_to("totp".to_string());
  assert_that(&result.issuer).is_equal_to(Some("iss".to_string()));
  assert_that(&result.account).is_equal_to(Some("acc".to_string()));
  assert_that(&result.state).is_equal_to(OTPCodeState::Totp { timeout: 19 });
}

#[test]
fn test_hotp_counter_sequence() {
  let mut hotp = HOTPGenerator::new(OTPParams {
    secret: Some(OTPSecret::from_str("74======").unwrap()),
    issuer: Some("iss".to_string()),
    account: Some("acc".to_string()),
    counter: Some(2),
    ..OTPParams::default()
  })
  .unwrap();

  assert_that(&hotp.counter()).is_equal_to(2);
  assert_that(&hotp.counter()).is_equal_to(2);

  // every generated code advances the counter first
  assert_that(&hotp.current_code()).is_equal_to("052701".to_string());
  assert_that(&hotp.counter()).is_equal_to(3);

  assert_that(&hotp.current_code()).is_equal_to("840180".to_string());
  assert_that(&hotp.counter()).is_equal_to(4);

  let result = hotp.result();
  assert_that(&result.code).is_equal_to("629675".to_string());
  assert_that(&result.otp_type).is_equal_to("hotp".to_string());
  assert_that(&result.state).is_equal_to(OTPCodeState::Hotp { counter: 5 });

  assert_that(&hotp.to_uri().unwrap())
    .is_equal_to("otpauth://hotp/iss:acc?secret=74%3D%3D%3D%3D%3D%3D&issuer=iss&algorithm=SHA1&digits=6&counter=5".to_string());
}

#[test]
fn test_totp_to_uri() {
  let totp = totp_at(
    OTPParams {
      secret: Some(OTPSecret::from_str("74======").unwrap()),
      issuer: Some("iss".to_string()),
      account: Some("acc".to_string()),
      ..OTPParams::default()
    },
    11_000,
  );

  assert_that(&totp.to_uri().unwrap())
    .is_equal_to("otpauth://totp/iss:acc?secret=74%3D%3D%3D%3D%3D%3D&issuer=iss&algorithm=SHA1&digits=6&period=30".to_string());
}

#[test]
fn test_hotp_validation() {
  let fresh = || {
    HOTPGenerator::new(OTPParams {
      secret: test_secret(),
      ..OTPParams::default()
    })
    .unwrap()
  };
  let code_for = |factor: u64| fresh().core().code_for(factor);

  // a verifier at the same counter state accepts the code just produced
  assert_that(&fresh().is_valid(&code_for(1), false)).is_true();
  assert_that(&fresh().is_valid(&code_for(2), false)).is_false();

  // lax tolerates a single counter slip ahead, nothing else
  assert_that(&fresh().is_valid(&code_for(1), true)).is_true();
  assert_that(&fresh().is_valid(&code_for(2), true)).is_true();
  assert_that(&fresh().is_valid(&code_for(3), true)).is_false();
  assert_that(&fresh().is_valid(&code_for(0), true)).is_false();

  // validation advances the counter like any generation
  let mut hotp = fresh();
  assert_that(&hotp.is_valid(&code_for(1), false)).is_true();
  assert_that(&hotp.counter()).is_equal_to(1);
  assert_that(&hotp.is_valid(&code_for(1), false)).is_false();
}

#[test]
fn test_totp_validation() {
  let params = OTPParams {
    secret: test_secret(),
    ..OTPParams::default()
  };
  let code_at = |now_millis: u64| totp_at(params.clone(), now_millis).current_code();

  let mut totp = totp_at(params.clone(), 90_000);

  assert_that(&totp.is_valid(&code_at(90_000), false)).is_true();
  assert_that(&totp.is_valid(&code_at(60_000), false)).is_false();

  // lax accepts the adjacent time steps, rejects two steps away
  assert_that(&totp.is_valid(&code_at(60_000), true)).is_true();
  assert_that(&totp.is_valid(&code_at(90_000), true)).is_true();
  assert_that(&totp.is_valid(&code_at(120_000), true)).is_true();
  assert_that(&totp.is_valid(&code_at(30_000), true)).is_false();
  assert_that(&totp.is_valid(&code_at(150_000), true)).is_false();
}

#[test]
fn test_factory_from_url() {
  let mut otp = create_otp_from_url("otpauth://hotp/iss:acc?secret=74%3D%3D%3D%3D%3D%3D&issuer=iss&algorithm=SHA1&digits=6&counter=5")
    .unwrap()
    .unwrap();
  assert_that(&otp.otp_type()).is_equal_to("hotp");
  assert_that(&otp.result().state).is_equal_to(OTPCodeState::Hotp { counter: 6 });

  let otp = create_otp_from_url("otpauth://totp/iss:acc?secret=74%3D%3D%3D%3D%3D%3D&issuer=iss&algorithm=SHA1&digits=6&period=30")
    .unwrap()
    .unwrap();
  assert_that(&otp.otp_type()).is_equal_to("totp");

  assert_that(&create_otp_from_url("otpauth://otp/iss:acc?secret=74%3D%3D%3D%3D%3D%3D").unwrap()).is_none();
  assert_that(&create_otp_from_url("otpauth://totp/iss:acc").unwrap()).is_none();
}

#[test]
fn test_factory_from_params() {
  let hotp = create_otp(OTPParams {
    otp_type: Some("hotp".to_string()),
    secret: test_secret(),
    counter: Some(2),
    ..OTPParams::default()
  })
  .unwrap()
  .unwrap();
  assert_that(&hotp.otp_type()).is_equal_to("hotp");

  let totp = create_otp(OTPParams {
    otp_type: Some("totp".to_string()),
    secret: test_secret(),
    ..OTPParams::default()
  })
  .unwrap()
  .unwrap();
  assert_that(&totp.otp_type()).is_equal_to("totp");

  // no type cannot be dispatched
  let none = create_otp(OTPParams {
    secret: test_secret(),
    ..OTPParams::default()
  })
  .unwrap();
  assert_that(&none).is_none();

  // recognized type with invalid parameters is an error, not a None
  let error = create_otp(OTPParams {
    otp_type: Some("hotp".to_string()),
    ..OTPParams::default()
  });
  assert_that(&error.err()).is_equal_to(Some(OTPError::MissingSecret));
}

#[test]
fn test_result_serialization() {
  let mut hotp = HOTPGenerator::new(OTPParams {
    secret: Some(OTPSecret::from_str("74======").unwrap()),
    issuer: Some("iss".to_string()),
    account: Some("acc".to_string()),
    counter: Some(2),
    ..OTPParams::default()
  })
  .unwrap();

  assert_that(&serde_json::to_value(hotp.result()).unwrap()).is_equal_to(serde_json::json!({
    "code": "052701",
    "otp_type": "hotp",
    "issuer": "iss",
    "account": "acc",
    "counter": 3,
  }));
}
