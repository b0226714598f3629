// covenant/src/identifier.rs

//! Issues the human-typeable identifiers handed out to registrants and buyers.
//!
//! Registration codes look like `RC-7K2Q-M0ZD`, order numbers like `ORD-4HX91B`.
//! Both are drawn from the OS random source over an uppercase base-36 alphabet.
//! Nothing here consults the store: order numbers are protected by the store's
//! uniqueness constraint at write time, registration codes only by their length.

use rand_core::{OsRng, RngCore};

pub const REGISTRATION_CODE_PREFIX: &str = "RC";
pub const ORDER_NUMBER_PREFIX: &str = "ORD";

const BASE36_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REGISTRATION_SEGMENT_LEN: usize = 4;
const ORDER_SEGMENT_LEN: usize = 6;

/// Source of fresh identifiers. Workflows take this as a trait object so tests
/// can script the sequence (e.g. to force an order-number collision).
pub trait IdentifierSource: Send + Sync {
  fn registration_code(&self) -> String;
  fn order_number(&self) -> String;
}

/// Default source backed by [`issue_registration_code`] and [`issue_order_number`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentifiers;

impl IdentifierSource for RandomIdentifiers {
  fn registration_code(&self) -> String {
    issue_registration_code()
  }

  fn order_number(&self) -> String {
    issue_order_number()
  }
}

/// `RC-XXXX-XXXX`
pub fn issue_registration_code() -> String {
  format!(
    "{}-{}-{}",
    REGISTRATION_CODE_PREFIX,
    random_segment(REGISTRATION_SEGMENT_LEN),
    random_segment(REGISTRATION_SEGMENT_LEN)
  )
}

/// `ORD-XXXXXX`
pub fn issue_order_number() -> String {
  format!("{}-{}", ORDER_NUMBER_PREFIX, random_segment(ORDER_SEGMENT_LEN))
}

/// Canonical lookup form of a user-typed code: surrounding whitespace removed, uppercased.
pub fn normalize_code(raw: &str) -> String {
  raw.trim().to_ascii_uppercase()
}

pub fn is_registration_code(candidate: &str) -> bool {
  let mut parts = candidate.split('-');
  matches!(
    (parts.next(), parts.next(), parts.next(), parts.next()),
    (Some(REGISTRATION_CODE_PREFIX), Some(a), Some(b), None)
      if is_segment(a, REGISTRATION_SEGMENT_LEN) && is_segment(b, REGISTRATION_SEGMENT_LEN)
  )
}

pub fn is_order_number(candidate: &str) -> bool {
  match candidate.split_once('-') {
    Some((ORDER_NUMBER_PREFIX, segment)) => is_segment(segment, ORDER_SEGMENT_LEN),
    _ => false,
  }
}

fn is_segment(segment: &str, len: usize) -> bool {
  segment.len() == len && segment.bytes().all(|b| BASE36_ALPHABET.contains(&b))
}

fn random_segment(len: usize) -> String {
  let mut rng = OsRng;
  (0..len)
    .map(|_| {
      // Values past the last full multiple of 36 are resampled.
      let zone = u32::MAX - (u32::MAX % 36);
      let value = loop {
        let v = rng.next_u32();
        if v < zone {
          break v;
        }
      };
      BASE36_ALPHABET[(value % 36) as usize] as char
    })
    .collect()
}
