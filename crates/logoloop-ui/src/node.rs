//! Element tree produced by composition.
//!
//! The tree is host-agnostic: a DOM host mirrors it into real elements, the
//! HTML renderer serializes it, and tests inspect it directly.

use std::num::NonZeroUsize;

use indexmap::IndexMap;
use logoloop_foundation::ImageId;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Elements a host has to locate in order to measure or animate a loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Anchor {
    /// The labelled region; its client size is the viewport.
    Container,
    /// The element whose transform is written every frame.
    Track,
    /// The first list. The only one ever measured.
    ReferenceSequence,
}

/// Role of one rendered list inside the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CopyKind {
    /// Copy 0: accessible, measured, and owner of the tracked images.
    Reference,
    /// A visual duplicate hidden from assistive technology.
    Decorative(NonZeroUsize),
}

impl CopyKind {
    pub fn from_index(index: usize) -> Self {
        match NonZeroUsize::new(index) {
            None => CopyKind::Reference,
            Some(index) => CopyKind::Decorative(index),
        }
    }

    pub fn index(self) -> usize {
        match self {
            CopyKind::Reference => 0,
            CopyKind::Decorative(index) => index.get(),
        }
    }

    pub fn is_reference(self) -> bool {
        self == CopyKind::Reference
    }
}

/// A node of the element tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RenderNode {
    Element(Element),
    Text(String),
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderNode::Element(element) => Some(element),
            RenderNode::Text(_) => None,
        }
    }

    fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            RenderNode::Element(element) => Some(element),
            RenderNode::Text(_) => None,
        }
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RenderNode::Text(text) => out.push_str(text),
            RenderNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        RenderNode::Element(element)
    }
}

/// An element with ordered attributes, classes and inline style.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Element {
    pub tag: String,
    pub classes: SmallVec<[String; 4]>,
    pub attributes: IndexMap<String, String>,
    pub style: IndexMap<String, String>,
    pub children: Vec<RenderNode>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub anchor: Option<Anchor>,
    /// Set on `img` elements of the reference copy.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub image: Option<ImageId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets `name` only when `value` is present.
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn style_entry(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = RenderNode>,
    {
        self.children.extend(children);
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_aria_hidden(&self) -> bool {
        self.attribute("aria-hidden") == Some("true")
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(RenderNode::as_element)
    }

    /// Depth-first search for the first element matching `predicate`,
    /// including `self`.
    pub fn find(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if predicate(self) {
            return Some(self);
        }
        self.child_elements()
            .find_map(|child| child.find(predicate))
    }

    /// All elements of this subtree in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in self.child_elements() {
            child.collect_descendants(out);
        }
    }

    /// Visits every `img` of this subtree mutably.
    pub(crate) fn for_each_image_mut(&mut self, visit: &mut dyn FnMut(&mut Element)) {
        if self.tag == "img" {
            visit(self);
        }
        for child in self.children.iter_mut().filter_map(RenderNode::as_element_mut) {
            child.for_each_image_mut(visit);
        }
    }
}

/// The composed output of one loop: the region and everything inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopTree {
    root: Element,
    copy_count: usize,
}

impl LoopTree {
    pub(crate) fn new(root: Element, copy_count: usize) -> Self {
        Self { root, copy_count }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn copy_count(&self) -> usize {
        self.copy_count
    }

    pub fn find_anchor(&self, anchor: Anchor) -> Option<&Element> {
        self.root.find(&|element| element.anchor == Some(anchor))
    }

    pub fn track(&self) -> Option<&Element> {
        self.find_anchor(Anchor::Track)
    }

    /// The rendered lists in track order.
    pub fn copies(&self) -> Vec<&Element> {
        self.track()
            .map(|track| track.child_elements().collect())
            .unwrap_or_default()
    }

    /// Images of the reference copy, in document order.
    pub fn reference_images(&self) -> Vec<ImageId> {
        self.find_anchor(Anchor::ReferenceSequence)
            .map(|sequence| {
                sequence
                    .descendants()
                    .into_iter()
                    .filter_map(|element| element.image)
                    .collect()
            })
            .unwrap_or_default()
    }
}
