//! Accessibility view of a composed loop.
//!
//! Subtrees marked `aria-hidden` are dropped, which is exactly what
//! assistive technology sees.

use crate::node::{Element, RenderNode};

#[derive(Clone, Debug, PartialEq)]
pub enum SemanticsRole {
    Region,
    List,
    ListItem,
    Link { href: String },
    Image { alt: String },
    Text { value: String },
    Generic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SemanticsNode {
    pub role: SemanticsRole,
    pub label: Option<String>,
    pub children: Vec<SemanticsNode>,
}

impl SemanticsNode {
    /// Number of nodes in this subtree matching `predicate`.
    pub fn count(&self, predicate: &dyn Fn(&SemanticsNode) -> bool) -> usize {
        let own = usize::from(predicate(self));
        own + self
            .children
            .iter()
            .map(|child| child.count(predicate))
            .sum::<usize>()
    }

    pub fn find(&self, predicate: &dyn Fn(&SemanticsNode) -> bool) -> Option<&SemanticsNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }
}

/// Builds the semantics tree rooted at `root`. Returns `None` when the root
/// itself is hidden.
pub fn semantics_tree(root: &Element) -> Option<SemanticsNode> {
    element_semantics(root).and_then(|mut nodes| {
        if nodes.len() == 1 {
            nodes.pop()
        } else {
            Some(SemanticsNode {
                role: SemanticsRole::Generic,
                label: None,
                children: nodes,
            })
        }
    })
}

// Generic wrappers are flattened into their parent, so one element can yield
// several nodes.
fn element_semantics(element: &Element) -> Option<Vec<SemanticsNode>> {
    if element.is_aria_hidden() {
        return None;
    }
    let children: Vec<SemanticsNode> = element
        .children
        .iter()
        .flat_map(|child| match child {
            RenderNode::Element(child) => element_semantics(child).unwrap_or_default(),
            RenderNode::Text(text) if !text.trim().is_empty() => vec![SemanticsNode {
                role: SemanticsRole::Text {
                    value: text.trim().to_string(),
                },
                label: None,
                children: Vec::new(),
            }],
            RenderNode::Text(_) => Vec::new(),
        })
        .collect();

    let role = match (element.attribute("role"), element.tag.as_str()) {
        (Some("region"), _) => SemanticsRole::Region,
        (Some("list"), _) | (_, "ul") => SemanticsRole::List,
        (Some("listitem"), _) | (_, "li") => SemanticsRole::ListItem,
        (_, "a") => SemanticsRole::Link {
            href: element.attribute("href").unwrap_or_default().to_string(),
        },
        (_, "img") => SemanticsRole::Image {
            alt: element.attribute("alt").unwrap_or_default().to_string(),
        },
        _ => return Some(children),
    };

    Some(vec![SemanticsNode {
        role,
        label: element.attribute("aria-label").map(str::to_string),
        children,
    }])
}
