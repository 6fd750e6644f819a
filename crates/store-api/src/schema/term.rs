//! Category term schemas.

use super::{prepare_html_response, PropertySchema, Schema};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use store_commerce::catalog::{CategoryNode, Term};

/// A product category term.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermSchema;

impl Schema for TermSchema {
    type Item = Term;

    fn title(&self) -> &'static str {
        "term"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        BTreeMap::from([
            ("id", PropertySchema::integer("Unique identifier for the resource.")),
            ("name", PropertySchema::string("Term name.")),
            ("slug", PropertySchema::string("String based identifier for the term.")),
            ("description", PropertySchema::string("Term description.")),
            ("parent", PropertySchema::integer("Parent term ID, if applicable.")),
            (
                "count",
                PropertySchema::integer("Number of objects (posts of any type) assigned to the term."),
            ),
        ])
    }

    fn item_response(&self, term: &Term) -> Value {
        json!({
            "id": term.id.get(),
            "name": prepare_html_response(&term.name),
            "slug": term.slug,
            "description": prepare_html_response(&term.description),
            "parent": term.parent.get(),
            "count": term.count,
        })
    }
}

/// A forest of category terms with nested `children`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryTreeSchema;

impl CategoryTreeSchema {
    /// The same document as [`Schema::item_response`], written straight to
    /// JSON text.
    ///
    /// A nested [`Value`] is serialized and dropped recursively, one call
    /// frame per level. This writer keeps its own stack, so any depth the
    /// tree builder accepts can be rendered.
    pub fn to_json_string(&self, forest: &[CategoryNode]) -> String {
        enum Step<'a> {
            Open(&'a CategoryNode, bool),
            Close,
        }

        fn siblings(nodes: &[CategoryNode]) -> impl Iterator<Item = Step<'_>> {
            nodes.iter().enumerate().rev().map(|(i, node)| Step::Open(node, i > 0))
        }

        let mut out = String::from("[");
        let mut stack: Vec<Step<'_>> = siblings(forest).collect();
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node, comma) => {
                    if comma {
                        out.push(',');
                    }
                    // A term object always has fields; reopen it to append `children`.
                    let term = TermSchema.item_response(&node.term).to_string();
                    out.push_str(term.strip_suffix('}').unwrap_or(&term));
                    out.push_str(",\"children\":[");
                    stack.push(Step::Close);
                    stack.extend(siblings(&node.children));
                }
                Step::Close => out.push_str("]}"),
            }
        }
        out.push(']');
        out
    }
}

impl Schema for CategoryTreeSchema {
    type Item = [CategoryNode];

    fn title(&self) -> &'static str {
        "category_tree"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        let mut properties = TermSchema.properties();
        properties.insert(
            "children",
            PropertySchema::array(
                "Child terms, same shape as the parent.",
                PropertySchema::object("Child term.", BTreeMap::new()),
            ),
        );
        properties
    }

    /// Built bottom-up with an explicit stack, so tree depth does not
    /// consume call stack here.
    fn item_response(&self, forest: &[CategoryNode]) -> Value {
        enum Step<'a> {
            Enter(&'a CategoryNode),
            Exit(&'a CategoryNode),
        }

        let mut stack: Vec<Step<'_>> = forest.iter().rev().map(Step::Enter).collect();
        let mut done: Vec<Value> = Vec::new();
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(node) => {
                    stack.push(Step::Exit(node));
                    stack.extend(node.children.iter().rev().map(Step::Enter));
                }
                Step::Exit(node) => {
                    let children = done.split_off(done.len() - node.children.len());
                    let mut item = TermSchema.item_response(&node.term);
                    item["children"] = Value::Array(children);
                    done.push(item);
                }
            }
        }
        Value::Array(done)
    }
}
