//! Tests for `PipelineBuilder` and `Pipeline`.

use crate::error::StudyError;
use crate::interface::{IdentityInterface, ToolInterface};
use crate::options::OptionTable;
use crate::pipeline::PipelineBuilder;
use crate::types::{
  DataFormat, DataSpec, DatasetSpec, IoDirection, OptionOverrides, OptionValue, Requirement,
  Version,
};
use std::collections::BTreeMap;

fn spec(name: &str) -> DataSpec {
  DatasetSpec::acquired(name, DataFormat::NIFTI_GZ).into()
}

fn builder(inputs: &[&str], outputs: &[&str]) -> PipelineBuilder {
  PipelineBuilder::new(
    "test_pipeline",
    inputs.iter().map(|n| spec(n)).collect(),
    outputs.iter().map(|n| spec(n)).collect(),
    "pipeline under test",
    OptionTable::default(),
  )
}

fn bet() -> ToolInterface {
  ToolInterface::new("fsl.BET", "bet")
}

#[test]
fn single_node_pipeline_validates() {
  let mut b = builder(&["t1"], &["betted_T1"]);
  let node = b
    .create_node(bet(), "bet", vec![], Some(4000), Some(10))
    .unwrap();
  b.connect_input("t1", &node, "in_file").unwrap();
  b.connect_output("betted_T1", &node, "out_file").unwrap();
  let pipeline = b.assert_connected().unwrap();
  assert_eq!(pipeline.name(), "test_pipeline");
  assert_eq!(pipeline.input_names().collect::<Vec<_>>(), vec!["t1"]);
  assert!(pipeline.produces("betted_T1"));
  assert_eq!(pipeline.node("bet").and_then(|n| n.memory), Some(4000));
  assert_eq!(
    pipeline.output_connection("betted_T1").map(|c| c.endpoint()),
    Some("bet.out_file".to_string())
  );
}

#[test]
fn duplicate_node_name_is_rejected() {
  let mut b = builder(&[], &[]);
  b.create_node(bet(), "bet", vec![], None, None).unwrap();
  let err = b.create_node(bet(), "bet", vec![], None, None).unwrap_err();
  assert!(matches!(err, StudyError::DuplicateNodeName { node, .. } if node == "bet"));
}

#[test]
fn connect_rejects_handles_from_other_pipelines() {
  let mut other = builder(&[], &[]);
  let foreign = other.create_node(bet(), "bet", vec![], None, None).unwrap();

  let mut b = builder(&[], &[]);
  let local = b.create_node(bet(), "bet", vec![], None, None).unwrap();
  let err = b.connect(&foreign, "out_file", &local, "in_file").unwrap_err();
  assert!(matches!(err, StudyError::UnknownNode { node, .. } if node == "bet"));
  assert!(b.connect(&local, "out_file", &local, "in_file").is_ok());
}

#[test]
fn undeclared_io_is_rejected() {
  let mut b = builder(&["t1"], &["betted_T1"]);
  let node = b.create_node(bet(), "bet", vec![], None, None).unwrap();
  let err = b.connect_input("t2", &node, "in_file").unwrap_err();
  assert!(matches!(
    err,
    StudyError::UndeclaredIo { ref name, direction: IoDirection::Input, .. } if name == "t2"
  ));
  // a declared input is not a declared output
  let err = b.connect_output("t1", &node, "out_file").unwrap_err();
  assert!(matches!(
    err,
    StudyError::UndeclaredIo { direction: IoDirection::Output, .. }
  ));
}

#[test]
fn output_connects_exactly_once() {
  let mut b = builder(&[], &["betted_T1"]);
  let first = b.create_node(bet(), "first", vec![], None, None).unwrap();
  let second = b.create_node(bet(), "second", vec![], None, None).unwrap();
  b.connect_output("betted_T1", &first, "out_file").unwrap();
  let err = b
    .connect_output("betted_T1", &second, "out_file")
    .unwrap_err();
  match err {
    StudyError::OutputAlreadyConnected { connected_to, .. } => {
      assert_eq!(connected_to, "first.out_file")
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn inputs_may_feed_several_nodes() {
  let mut b = builder(&["t1"], &["betted_T1"]);
  let a = b.create_node(bet(), "a", vec![], None, None).unwrap();
  let c = b.create_node(bet(), "c", vec![], None, None).unwrap();
  b.connect_input("t1", &a, "in_file").unwrap();
  b.connect_input("t1", &c, "in_file").unwrap();
  b.connect(&a, "out_file", &c, "mask").unwrap();
  b.connect_output("betted_T1", &c, "out_file").unwrap();
  let pipeline = b.assert_connected().unwrap();
  assert_eq!(pipeline.input_connections().len(), 2);
}

#[test]
fn disconnected_output_is_named() {
  let mut b = builder(&["t1"], &["betted_T1", "brain_mask"]);
  let node = b.create_node(bet(), "bet", vec![], None, None).unwrap();
  b.connect_input("t1", &node, "in_file").unwrap();
  b.connect_output("betted_T1", &node, "out_file").unwrap();
  match b.assert_connected().unwrap_err() {
    StudyError::DisconnectedIo {
      name, direction, ..
    } => {
      assert_eq!(name, "brain_mask");
      assert_eq!(direction, IoDirection::Output);
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn disconnected_inputs_are_reported_before_outputs() {
  let mut b = builder(&["t1"], &["betted_T1"]);
  b.create_node(bet(), "bet", vec![], None, None).unwrap();
  let err = b.assert_connected().unwrap_err();
  assert!(matches!(
    err,
    StudyError::DisconnectedIo { ref name, direction: IoDirection::Input, .. } if name == "t1"
  ));
}

#[test]
fn cycles_are_rejected() {
  let mut b = builder(&[], &[]);
  let a = b.create_node(bet(), "a", vec![], None, None).unwrap();
  let c = b.create_node(bet(), "c", vec![], None, None).unwrap();
  b.connect(&a, "out_file", &c, "in_file").unwrap();
  b.connect(&c, "out_file", &a, "in_file").unwrap();
  match b.assert_connected().unwrap_err() {
    StudyError::CycleDetected { cycle, .. } => assert_eq!(cycle, vec!["a", "c", "a"]),
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn isolated_nodes_are_not_rejected() {
  let mut b = builder(&["t1"], &["betted_T1"]);
  let used = b.create_node(bet(), "used", vec![], None, None).unwrap();
  b.create_node(IdentityInterface::new(["x"]), "isolated", vec![], None, None)
    .unwrap();
  b.connect_input("t1", &used, "in_file").unwrap();
  b.connect_output("betted_T1", &used, "out_file").unwrap();
  assert_eq!(b.assert_connected().unwrap().nodes().len(), 2);
}

#[test]
fn options_resolve_through_table() {
  let table = OptionTable::new(
    BTreeMap::from([("threshold".to_string(), OptionValue::Float(0.5))]),
    OptionOverrides::new(),
    OptionOverrides::from([("threshold".to_string(), OptionValue::Float(0.2))]),
  );
  let b = PipelineBuilder::new("p", vec![], vec![], "", table).default_option("robust", true);
  assert_eq!(b.option("threshold").unwrap(), OptionValue::Float(0.2));
  assert_eq!(b.option("robust").unwrap(), OptionValue::Bool(true));
  let err = b.option("missing").unwrap_err();
  assert!(matches!(err, StudyError::UnknownOption { name, .. } if name == "missing"));
}

#[test]
fn undeclared_call_site_option_fails_validation() {
  let table = OptionTable::new(
    BTreeMap::new(),
    OptionOverrides::new(),
    OptionOverrides::from([("typo".to_string(), OptionValue::Int(1))]),
  );
  let b = PipelineBuilder::new("p", vec![], vec![], "", table);
  let err = b.assert_connected().unwrap_err();
  assert!(matches!(err, StudyError::UnknownOption { name, .. } if name == "typo"));
}

#[test]
fn static_inputs_and_map_nodes_are_recorded() {
  let mut b = builder(&[], &[]);
  let node = b
    .create_map_node(bet(), "crop", vec!["in_file".to_string()], vec![], None, None)
    .unwrap();
  b.set_input(&node, "frac", 0.15).unwrap();
  let pipeline = b.assert_connected().unwrap();
  let crop = pipeline.node("crop").unwrap();
  assert!(crop.is_map_node());
  assert_eq!(crop.inputs.get("frac"), Some(&OptionValue::Float(0.15)));
}

#[test]
fn requirements_are_deduplicated() {
  let fsl = Requirement::new("fsl", Version::new(vec![5, 0, 8]));
  let mut b = builder(&[], &[]);
  b.create_node(bet(), "a", vec![fsl.clone()], None, None)
    .unwrap();
  b.create_node(bet(), "b", vec![fsl.clone()], None, None)
    .unwrap();
  let pipeline = b.assert_connected().unwrap();
  assert_eq!(pipeline.requirements(), vec![&fsl]);
}

#[test]
fn topological_order_follows_edges() {
  let mut b = builder(&[], &[]);
  let last = b.create_node(bet(), "last", vec![], None, None).unwrap();
  let first = b.create_node(bet(), "first", vec![], None, None).unwrap();
  b.connect(&first, "out_file", &last, "in_file").unwrap();
  let pipeline = b.assert_connected().unwrap();
  let order: Vec<&str> = pipeline
    .topological_order()
    .map(|n| n.name.as_str())
    .collect();
  assert_eq!(order, vec!["first", "last"]);
}
