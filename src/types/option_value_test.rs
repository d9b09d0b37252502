//! Tests for `OptionValue`.

use super::OptionValue;

#[test]
fn parse_cli_scalars() {
  assert_eq!(OptionValue::parse_cli("true"), OptionValue::Bool(true));
  assert_eq!(OptionValue::parse_cli("32"), OptionValue::Int(32));
  assert_eq!(OptionValue::parse_cli(" 0.5 "), OptionValue::Float(0.5));
  assert_eq!(
    OptionValue::parse_cli("spatial"),
    OptionValue::Str("spatial".to_string())
  );
}

#[test]
fn parse_cli_words_that_look_like_floats_stay_strings() {
  assert_eq!(OptionValue::parse_cli("nan"), OptionValue::Str("nan".to_string()));
  assert_eq!(OptionValue::parse_cli("inf"), OptionValue::Str("inf".to_string()));
}

#[test]
fn parse_cli_lists() {
  assert_eq!(
    OptionValue::parse_cli("7.38,22.14"),
    OptionValue::List(vec![OptionValue::Float(7.38), OptionValue::Float(22.14)])
  );
}

#[test]
fn int_widens_to_float() {
  assert_eq!(OptionValue::Int(3).as_f64(), Some(3.0));
  assert_eq!(OptionValue::Float(3.5).as_i64(), None);
}

#[test]
fn untagged_json() {
  let value: OptionValue = serde_json::from_str("[7.38, 22.14]").unwrap();
  assert_eq!(value, OptionValue::from(vec![7.38, 22.14]));
  let value: OptionValue = serde_json::from_str("2").unwrap();
  assert_eq!(value, OptionValue::Int(2));
  assert_eq!(serde_json::to_string(&OptionValue::from("s")).unwrap(), "\"s\"");
}

#[test]
fn display_list() {
  assert_eq!(OptionValue::from(vec![1, 2]).to_string(), "[1, 2]");
}
