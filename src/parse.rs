use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

/// A typed GraphML attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl AttrValue {
    /// The value as an integer if it compares equal to one.
    /// `true` is 1, `false` is 0 and `7.0` is 7. Strings never are.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            AttrValue::Bool(b) => Some(i64::from(*b)),
            AttrValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(n) => write!(f, "{n}"),
            AttrValue::Float(x) => write!(f, "{x}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub attributes: HashMap<String, AttrValue>,
}

impl Node {
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }
}

/// The nodes of a GraphML graph with their attributes. Edges aren't needed
/// for anything here and are not read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
}

/// A `<key>` declaration that applies to nodes.
#[derive(Debug)]
struct KeyDecl {
    name: String,
    attr_type: String,
    default: Option<AttrValue>,
}

pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::Load {
        path: path.to_path_buf(),
        source: Box::new(e.into()),
    })?;
    parse_graph(&text).map_err(|e| Error::Load {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

/// Parses a GraphML document into its nodes.
///
/// `<data>` values are typed by the `attr.type` of their `<key>` and keys
/// with a `<default>` fill in nodes that don't carry that data element.
/// The document goes through an HTML parser, which leaves self-closing
/// elements open, so every lookup below only looks at an element's own
/// children and never reaches into a nested `<node>` or `<edge>`.
pub fn parse_graph(text: &str) -> Result<Graph> {
    let doc = Html::parse_document(text);

    let key_selector = create_selector("key")?;
    let node_selector = create_selector("node")?;

    let mut keys = HashMap::new();
    for key in doc.select(&key_selector) {
        let el = key.value();
        let applies_to_nodes = matches!(el.attr("for"), None | Some("node") | Some("all"));
        let Some(id) = el.attr("id").filter(|_| applies_to_nodes) else {
            continue;
        };
        let name = el.attr("attr.name").unwrap_or(id).to_string();
        let attr_type = el.attr("attr.type").unwrap_or("string").to_string();
        let default = key
            .children()
            .filter_map(ElementRef::wrap)
            .find(|child| child.value().name() == "default")
            .map(|default| typed_value(id, &attr_type, &own_text(default)))
            .transpose()?;
        keys.insert(
            id.to_string(),
            KeyDecl {
                name,
                attr_type,
                default,
            },
        );
    }

    let mut nodes = Vec::new();
    for (i, node) in doc.select(&node_selector).enumerate() {
        let id = node
            .value()
            .attr("id")
            .ok_or(Error::ParseMissingNodeId(i))?
            .to_string();

        let mut attributes = HashMap::new();
        for data in data_elements(node) {
            let Some(key_id) = data.value().attr("key") else {
                continue;
            };
            let text = own_text(data);
            match keys.get(key_id) {
                Some(decl) => {
                    let value = typed_value(key_id, &decl.attr_type, &text)?;
                    attributes.insert(decl.name.clone(), value);
                }
                None => {
                    attributes.insert(key_id.to_string(), AttrValue::String(text));
                }
            }
        }
        for decl in keys.values() {
            if let Some(default) = &decl.default {
                attributes
                    .entry(decl.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }

        nodes.push(Node { id, attributes });
    }

    Ok(Graph { nodes })
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseSelector(sel_str.into()))
}

/// `<data>` elements belonging to `node`. A `<data />` swallows its
/// following siblings, so nested `<data>` count too.
fn data_elements(node: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut found = Vec::new();
    let mut stack: Vec<_> = node.children().filter_map(ElementRef::wrap).collect();
    stack.reverse();
    while let Some(el) = stack.pop() {
        if el.value().name() != "data" {
            continue;
        }
        found.push(el);
        let mut nested: Vec<_> = el.children().filter_map(ElementRef::wrap).collect();
        nested.reverse();
        stack.extend(nested);
    }
    found
}

/// Text directly inside `el`, trimmed. The HTML tokenizer turns
/// `<![CDATA[..]]>` into a `[CDATA[..]]` comment, so those count as text.
fn own_text(el: ElementRef<'_>) -> String {
    let mut text = String::new();
    for child in el.children() {
        let node = child.value();
        if let Some(t) = node.as_text() {
            text.push_str(t);
        } else if let Some(cdata) = node
            .as_comment()
            .and_then(|c| c.strip_prefix("[CDATA["))
            .and_then(|c| c.strip_suffix("]]"))
        {
            text.push_str(cdata);
        }
    }
    text.trim().to_string()
}

fn typed_value(key: &str, attr_type: &str, raw: &str) -> Result<AttrValue> {
    let bad_value = || Error::ParseValue {
        key: key.to_string(),
        attr_type: attr_type.to_string(),
        value: raw.to_string(),
    };
    let value = match attr_type {
        "int" | "integer" | "long" => AttrValue::Int(raw.parse().map_err(|_| bad_value())?),
        "float" | "double" => AttrValue::Float(raw.parse().map_err(|_| bad_value())?),
        "boolean" => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => AttrValue::Bool(true),
            "false" | "0" => AttrValue::Bool(false),
            _ => return Err(bad_value()),
        },
        _ => AttrValue::String(raw.to_string()),
    };
    Ok(value)
}
