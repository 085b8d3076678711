//! Minimal DOM: an arena of nodes, a CSS selector matcher and locator
//! resolution.
//!
//! Nodes are appended depth-first, so node ids are in document order.

use super::app::Binding;
use crate::driver::ElementState;
use crate::locator::{Locator, Refinement};
use crate::result::{E2eError, E2eResult};
use std::str::FromStr;

/// Index of a node in its document
pub type NodeId = usize;

const TEXT_TAG: &str = "#text";

/// One element or text node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Lower-case tag, `#text` for text nodes
    pub tag: String,
    /// `id` attribute
    pub id: Option<String>,
    /// Class list
    pub classes: Vec<String>,
    /// Other attributes
    pub attrs: Vec<(String, String)>,
    /// Content of a text node
    pub text: String,
    /// Form value
    pub value: Option<String>,
    /// Checkbox state
    pub checked: Option<bool>,
    /// `display: none`
    pub hidden: bool,
    /// Application handler for events on this node
    pub binding: Option<Binding>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Element with a tag
    #[must_use]
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// Text node
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: content.into(),
            ..Self::default()
        }
    }

    /// Add a class
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Add a class when `on`
    #[must_use]
    pub fn class_if(self, class: &str, on: bool) -> Self {
        if on {
            self.class(class)
        } else {
            self
        }
    }

    /// Set the id
    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Set the form value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Make this a checkbox
    #[must_use]
    pub fn checkbox(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self.attr("type", "checkbox")
    }

    /// Hide with `display: none`
    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Route events to the application
    #[must_use]
    pub const fn bind(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Whether this is an element (not text)
    #[must_use]
    pub fn is_element(&self) -> bool {
        self.tag != TEXT_TAG
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "value" => self.value.as_deref(),
            _ => self
                .attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}

/// A rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Document with an empty `body`
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::element("body")],
        }
    }

    /// The `body` node
    #[must_use]
    pub const fn body(&self) -> NodeId {
        0
    }

    /// Append a child and return its id
    pub fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Append a text child
    pub fn append_text(&mut self, parent: NodeId, content: impl Into<String>) -> NodeId {
        self.append(parent, Node::text(content))
    }

    /// Borrow a node
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Elements strictly below `scope`, in document order
    #[must_use]
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.nodes[id].is_element() {
                out.push(id);
            }
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        out
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, |&p| self.nodes[p].parent)
    }

    /// Concatenated text of all descendant text nodes
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let node = &self.nodes[id];
        if !node.is_element() {
            return node.text.clone();
        }
        node.children
            .iter()
            .map(|&child| self.text_content(child))
            .collect()
    }

    /// Rendered: neither the node nor any ancestor is hidden
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        !self.nodes[id].hidden && self.ancestors(id).all(|a| !self.nodes[a].hidden)
    }

    /// Every element matching `selector`, in document order
    #[must_use]
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_within(self.body(), selector)
    }

    /// Elements below `scope` matching `selector` (matched against the
    /// whole document, like `Element.querySelectorAll`)
    #[must_use]
    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// Resolve a locator chain to element ids
    pub fn resolve(&self, locator: &Locator) -> E2eResult<Vec<NodeId>> {
        let root: Selector = locator.root().parse()?;
        let mut found = self.query_all(&root);
        for refinement in locator.refinements() {
            found = match refinement {
                Refinement::Nth(index) => found.get(*index).copied().into_iter().collect(),
                Refinement::Find(css) => {
                    let selector: Selector = css.parse()?;
                    let mut below: Vec<NodeId> = found
                        .iter()
                        .flat_map(|&scope| self.query_within(scope, &selector))
                        .collect();
                    below.sort_unstable();
                    below.dedup();
                    below
                }
                Refinement::HasText(text) => found
                    .into_iter()
                    .filter(|&id| self.text_content(id).contains(text.as_str()))
                    .collect(),
            };
        }
        Ok(found)
    }

    /// Observable state of one element
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> ElementState {
        let node = &self.nodes[id];
        ElementState {
            tag: node.tag.clone(),
            text: self.text_content(id),
            value: node.value.clone(),
            classes: node.classes.clone(),
            checked: node.checked,
            visible: self.is_visible(id),
        }
    }
}

/// One compound selector such as `input.toggle[type]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        node.is_element()
            && self.tag.as_ref().map_or(true, |t| *t == node.tag)
            && self.id.as_ref().map_or(true, |id| node.id.as_ref() == Some(id))
            && self.classes.iter().all(|c| node.classes.contains(c))
            && self.attrs.iter().all(|(name, want)| match (node.attribute(name), want) {
                (Some(have), Some(want)) => have == want,
                (Some(_), None) => true,
                (None, _) => false,
            })
    }

    fn parse(token: &str, source: &str) -> E2eResult<Self> {
        let invalid = |why: &str| E2eError::PageError {
            message: format!("invalid selector {source:?}: {why}"),
        };
        let mut compound = Self::default();
        let mut rest = token;

        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '*'))
            .unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        if !tag.is_empty() && tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let len = body
                        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                        .unwrap_or(body.len());
                    if len == 0 {
                        return Err(invalid("empty name"));
                    }
                    let name = body[..len].to_string();
                    if first == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                    rest = &body[len..];
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(|| invalid("unclosed ["))?;
                    let inner = &rest[1..close];
                    let (name, value) = match inner.split_once('=') {
                        Some((n, v)) => (n, Some(v.trim_matches(|c| c == '"' || c == '\''))),
                        None => (inner, None),
                    };
                    if name.is_empty() {
                        return Err(invalid("empty attribute"));
                    }
                    compound
                        .attrs
                        .push((name.to_string(), value.map(ToString::to_string)));
                    rest = &rest[close + 1..];
                }
                other => return Err(invalid(&format!("unsupported character {other:?}"))),
            }
        }
        Ok(compound)
    }
}

/// Selector list: comma-separated chains of descendant-combined compounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Vec<Compound>>,
}

impl Selector {
    /// Whether the element matches any group
    #[must_use]
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.groups
            .iter()
            .any(|chain| chain_matches(doc, id, chain))
    }
}

/// Subject must match the last compound; the rest must match ancestors
/// right to left. Greedy ancestor matching is exact for descendant-only
/// chains.
fn chain_matches(doc: &Document, id: NodeId, chain: &[Compound]) -> bool {
    let Some((subject, ancestors)) = chain.split_last() else {
        return false;
    };
    if !subject.matches(doc.node(id)) {
        return false;
    }
    let mut pending = ancestors.iter().rev().peekable();
    for ancestor in doc.ancestors(id) {
        match pending.peek() {
            Some(compound) if compound.matches(doc.node(ancestor)) => {
                pending.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    pending.peek().is_none()
}

impl FromStr for Selector {
    type Err = E2eError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let groups = source
            .split(',')
            .map(|group| {
                let chain = group
                    .split_whitespace()
                    .map(|token| Compound::parse(token, source))
                    .collect::<E2eResult<Vec<_>>>()?;
                if chain.is_empty() {
                    return Err(E2eError::PageError {
                        message: format!("invalid selector {source:?}: empty"),
                    });
                }
                Ok(chain)
            })
            .collect::<E2eResult<Vec<_>>>()?;
        Ok(Self { groups })
    }
}
