use std::path::Path;

use thiserror::Error;

use crate::community::Community;
use crate::parse::{load_graph, AttrValue, Graph, Node};
use crate::{Error, Result};

pub const SEX_DOMAIN: [&str; 3] = ["male", "female", "unknown"];
pub const RACE_DOMAIN: [&str; 6] = ["white", "black", "asian", "hispanic", "mixed/other", "unknown"];
/// `school` may also be absent.
pub const SCHOOL_DOMAIN: [i64; 2] = [0, 1];
pub const GRADE_DOMAIN: [i64; 8] = [0, 6, 7, 8, 9, 10, 11, 12];

/// The first thing wrong with a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("the graph has no nodes")]
    Empty,
    #[error("node {node} has no {attribute} attribute")]
    MissingAttribute { node: String, attribute: &'static str },
    #[error("node {node} has {attribute} = {value}, which is not allowed")]
    OutOfDomain {
        node: String,
        attribute: &'static str,
        value: AttrValue,
    },
}

/// Checks every node's `sex`, `race`, `school` and `grade`, stopping at
/// the first violation.
pub fn validate_graph(graph: &Graph) -> core::result::Result<(), Violation> {
    if graph.nodes.is_empty() {
        return Err(Violation::Empty);
    }
    graph.nodes.iter().try_for_each(validate_node)
}

pub fn validate_node(node: &Node) -> core::result::Result<(), Violation> {
    check(node, "sex", true, |v| {
        v.as_str().is_some_and(|s| SEX_DOMAIN.contains(&s))
    })?;
    check(node, "race", true, |v| {
        v.as_str().is_some_and(|s| RACE_DOMAIN.contains(&s))
    })?;
    check(node, "school", false, |v| {
        v.as_integer().is_some_and(|n| SCHOOL_DOMAIN.contains(&n))
    })?;
    check(node, "grade", true, |v| {
        v.as_integer().is_some_and(|n| GRADE_DOMAIN.contains(&n))
    })
}

fn check(
    node: &Node,
    attribute: &'static str,
    required: bool,
    allowed: impl Fn(&AttrValue) -> bool,
) -> core::result::Result<(), Violation> {
    match node.get(attribute) {
        None if required => Err(Violation::MissingAttribute {
            node: node.id.clone(),
            attribute,
        }),
        None => Ok(()),
        Some(value) if allowed(value) => Ok(()),
        Some(value) => Err(Violation::OutOfDomain {
            node: node.id.clone(),
            attribute,
            value: value.clone(),
        }),
    }
}

/// Loads `community_N.xml` from `data_dir` and validates it.
pub fn validate_community(data_dir: impl AsRef<Path>, community: Community) -> Result<()> {
    let graph = load_graph(community.graph_path(data_dir))?;
    validate_graph(&graph).map_err(|violation| Error::Invalid {
        community: community.index(),
        violation,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn node(attrs: &[(&str, AttrValue)]) -> Node {
        Node {
            id: "n0".to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn s(v: &str) -> AttrValue {
        AttrValue::String(v.to_string())
    }

    fn valid() -> Vec<(&'static str, AttrValue)> {
        vec![
            ("sex", s("female")),
            ("race", s("hispanic")),
            ("school", AttrValue::Int(0)),
            ("grade", AttrValue::Int(12)),
        ]
    }

    fn with(name: &'static str, value: Option<AttrValue>) -> Node {
        let mut attrs: Vec<_> = valid().into_iter().filter(|(k, _)| *k != name).collect();
        attrs.extend(value.map(|v| (name, v)));
        node(&attrs)
    }

    #[test]
    fn accepts_a_valid_node() {
        assert_eq!(validate_node(&node(&valid())), Ok(()));
    }

    #[test]
    fn school_is_optional() {
        assert_eq!(validate_node(&with("school", None)), Ok(()));
        assert_eq!(validate_node(&with("school", Some(AttrValue::Int(1)))), Ok(()));
    }

    #[test]
    fn school_two_is_rejected() {
        assert_eq!(
            validate_node(&with("school", Some(AttrValue::Int(2)))),
            Err(Violation::OutOfDomain {
                node: "n0".into(),
                attribute: "school",
                value: AttrValue::Int(2),
            })
        );
    }

    #[test]
    fn missing_sex_is_a_missing_key_not_a_bad_value() {
        assert_eq!(
            validate_node(&with("sex", None)),
            Err(Violation::MissingAttribute {
                node: "n0".into(),
                attribute: "sex",
            })
        );
    }

    #[test]
    fn race_and_grade_are_required() {
        assert!(matches!(
            validate_node(&with("race", None)),
            Err(Violation::MissingAttribute { attribute: "race", .. })
        ));
        assert!(matches!(
            validate_node(&with("grade", None)),
            Err(Violation::MissingAttribute { attribute: "grade", .. })
        ));
    }

    #[test]
    fn values_outside_the_domains() {
        for (name, value) in [
            ("sex", s("Male")),
            ("race", s("other")),
            ("grade", AttrValue::Int(5)),
            ("grade", AttrValue::Int(13)),
            ("grade", s("7")),
            ("school", s("1")),
            ("sex", AttrValue::Int(1)),
        ] {
            let res = validate_node(&with(name, Some(value.clone())));
            assert!(
                matches!(&res, Err(Violation::OutOfDomain { attribute, .. }) if *attribute == name),
                "{name} = {value} gave {res:?}"
            );
        }
    }

    #[test]
    fn integer_domains_use_numeric_equality() {
        assert_eq!(validate_node(&with("grade", Some(AttrValue::Float(7.0)))), Ok(()));
        assert_eq!(validate_node(&with("school", Some(AttrValue::Bool(true)))), Ok(()));
        assert!(validate_node(&with("grade", Some(AttrValue::Float(7.5)))).is_err());
    }

    #[test]
    fn every_domain_value_passes() {
        for sex in SEX_DOMAIN {
            for race in RACE_DOMAIN {
                for grade in GRADE_DOMAIN {
                    let n = node(&[
                        ("sex", s(sex)),
                        ("race", s(race)),
                        ("grade", AttrValue::Int(grade)),
                    ]);
                    assert_eq!(validate_node(&n), Ok(()));
                }
            }
        }
    }

    #[test]
    fn first_violation_wins() {
        let graph = Graph {
            nodes: vec![
                node(&valid()),
                with("grade", Some(AttrValue::Int(3))),
                with("sex", None),
            ],
        };
        assert!(matches!(
            validate_graph(&graph),
            Err(Violation::OutOfDomain { attribute: "grade", .. })
        ));
    }

    #[test]
    fn empty_graph_fails() {
        assert_eq!(validate_graph(&Graph::default()), Err(Violation::Empty));
    }

    #[test]
    fn community_errors_name_the_community() {
        let dir = tempfile::tempdir().unwrap();
        let community = Community::new(48).unwrap();
        std::fs::write(
            community.graph_path(dir.path()),
            r#"<graphml>
  <key id="sex" for="node" attr.name="sex" attr.type="string"/>
  <graph><node id="1"><data key="sex">male</data></node></graph>
</graphml>"#,
        )
        .unwrap();

        let err = validate_community(dir.path(), community).unwrap_err();
        assert!(matches!(
            &err,
            Error::Invalid {
                community: 48,
                violation: Violation::MissingAttribute { attribute: "race", .. },
            }
        ));
        assert!(err.to_string().contains("Community 48"));
    }

    #[test]
    fn valid_community_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let community = Community::new(12).unwrap();
        std::fs::write(
            community.graph_path(dir.path()),
            r#"<?xml version='1.0' encoding='utf-8'?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="d0" for="node" attr.name="sex" attr.type="string"/>
  <key id="d1" for="node" attr.name="race" attr.type="string"/>
  <key id="d2" for="node" attr.name="school" attr.type="long"/>
  <key id="d3" for="node" attr.name="grade" attr.type="long"/>
  <graph edgedefault="directed">
    <node id="1">
      <data key="d0">female</data>
      <data key="d1">black</data>
      <data key="d2">1</data>
      <data key="d3">8</data>
    </node>
    <node id="2">
      <data key="d0">unknown</data>
      <data key="d1">mixed/other</data>
      <data key="d3">0</data>
    </node>
    <edge source="1" target="2"/>
  </graph>
</graphml>"#,
        )
        .unwrap();

        assert!(validate_community(dir.path(), community).is_ok());
    }

    #[test]
    fn missing_graph_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = validate_community(dir.path(), Community::new(1).unwrap());
        assert!(matches!(res, Err(Error::Load { .. })));
    }
}
