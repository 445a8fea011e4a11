use byteorder::{BigEndian, ByteOrder};

/// Encode the low `length * 8` bits of `value` as big-endian bytes.
///
/// Higher-order bits are silently discarded, so e.g. `int_to_bytes(65536, 2)`
/// yields two zero bytes.
pub fn int_to_bytes(value: u64, length: usize) -> Vec<u8> {
  let mut bytes = vec![0u8; length];
  let mut rest = value;

  for i in (0..length).rev() {
    bytes[i] = (rest & 0xff) as u8;
    rest >>= 8;
  }

  bytes
}

/// Dynamic truncation of an hmac digest to an unpadded decimal string.
///
/// The extraction offset is the low nibble of the 20th digest byte (index 19),
/// for every digest size. The 4 bytes at that offset are read big-endian with
/// the top bit cleared and reduced modulo `10^digits`.
///
/// Without a digit count there is no valid numeric result, so `None` is
/// returned instead of a code.
pub fn dynamic_truncate(digest: &[u8], digits: Option<u32>) -> Option<String> {
  let digits = digits?;
  let offset = (digest[19] & 0xf) as usize;
  let value = u64::from(BigEndian::read_u32(&digest[offset..offset + 4]) & 0x7fff_ffff);
  let code = match 10u64.checked_pow(digits) {
    Some(modulus) => value % modulus,
    None => value,
  };

  Some(code.to_string())
}

/// Left-pad `s` with `pad` up to `length` characters. Never truncates.
pub fn pad_left(s: &str, length: usize, pad: char) -> String {
  let missing = length.saturating_sub(s.len());
  let mut result = String::with_capacity(s.len() + missing);

  for _ in 0..missing {
    result.push(pad);
  }
  result.push_str(s);

  result
}
