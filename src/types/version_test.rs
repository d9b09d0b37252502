//! Tests for `Version`.

use super::Version;

#[test]
fn find_in_free_text() {
  assert_eq!(Version::find("3.0_RC3"), Some(Version::new([3, 0])));
  assert_eq!(Version::find("FSL version 5.0.9\n"), Some(Version::new([5, 0, 9])));
  assert_eq!(Version::find("no digits"), None);
}

#[test]
fn trailing_zeros_are_insignificant() {
  assert_eq!(Version::new([5]), Version::new([5, 0, 0]));
  assert!(Version::new([5, 0, 1]) > Version::new([5]));
}

#[test]
fn numeric_ordering() {
  assert!(Version::new([5, 0, 10]) > Version::new([5, 0, 9]));
  assert!(Version::new([2, 1]) < Version::new([2, 10]));
}

#[test]
fn display_and_parse() {
  let v: Version = "ANTs 2.1.0".parse().unwrap();
  assert_eq!(v.to_string(), "2.1.0");
  assert!("none".parse::<Version>().is_err());
}
