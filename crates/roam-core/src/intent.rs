//! Outbound intent URLs (map directions, phone dialer).
//!
//! Only the URLs are built here. Launching them is the host's job; a missing
//! precondition is reported before anything is attempted.

use thiserror::Error;

/// A requested intent whose preconditions are not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntentError {
  #[error("location not available")]
  LocationUnavailable,

  #[error("phone not available")]
  PhoneUnavailable,
}

/// Map-directions URL for a destination. Both coordinates are required.
///
/// Only absent coordinates are rejected; `0.0` is a valid latitude or
/// longitude and is passed through.
pub fn navigation_url(lat: Option<f64>, lng: Option<f64>) -> Result<String, IntentError> {
  match (lat, lng) {
    (Some(lat), Some(lng)) => Ok(format!(
      "https://www.google.com/maps/dir/?api=1&destination={lat},{lng}"
    )),
    _ => Err(IntentError::LocationUnavailable),
  }
}

/// Dialer URL for a free-form phone number. Non-digits are stripped.
pub fn dial_url(phone: Option<&str>) -> Result<String, IntentError> {
  let digits: String = phone
    .unwrap_or_default()
    .chars()
    .filter(char::is_ascii_digit)
    .collect();

  if digits.is_empty() {
    return Err(IntentError::PhoneUnavailable);
  }
  Ok(format!("tel:{digits}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn navigation_requires_both_coordinates() {
    assert_eq!(
      navigation_url(Some(17.62), Some(100.09)).unwrap(),
      "https://www.google.com/maps/dir/?api=1&destination=17.62,100.09"
    );
    assert_eq!(
      navigation_url(Some(17.62), None),
      Err(IntentError::LocationUnavailable)
    );
    assert_eq!(navigation_url(None, None), Err(IntentError::LocationUnavailable));
  }

  #[test]
  fn zero_coordinates_are_still_a_location() {
    assert!(navigation_url(Some(0.0), Some(0.0)).is_ok());
  }

  #[test]
  fn dial_strips_formatting() {
    assert_eq!(dial_url(Some("055-411 234")).unwrap(), "tel:055411234");
    assert_eq!(dial_url(Some("+66 (0) 81")).unwrap(), "tel:66081");
  }

  #[test]
  fn dial_requires_a_number() {
    assert_eq!(dial_url(None), Err(IntentError::PhoneUnavailable));
    assert_eq!(dial_url(Some("")), Err(IntentError::PhoneUnavailable));
    assert_eq!(dial_url(Some("n/a")), Err(IntentError::PhoneUnavailable));
  }
}
