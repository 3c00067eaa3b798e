//! Items displayed by a loop.

use crate::node::{Element, RenderNode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Accessible name of a link when nothing better is known.
pub const FALLBACK_LINK_LABEL: &str = "logo link";

/// An image logo.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ImageItem {
    pub src: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub src_set: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sizes: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub alt: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aria_label: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub href: Option<String>,
}

impl ImageItem {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Default::default()
        }
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn src_set(mut self, src_set: impl Into<String>, sizes: Option<&str>) -> Self {
        self.src_set = Some(src_set.into());
        self.sizes = sizes.map(str::to_string);
        self
    }
}

/// An arbitrary renderable node, such as an icon or a text badge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NodeItem {
    pub node: RenderNode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aria_label: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub href: Option<String>,
}

impl NodeItem {
    pub fn new(node: impl Into<RenderNode>) -> Self {
        Self {
            node: node.into(),
            title: None,
            aria_label: None,
            href: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }
}

/// One entry of the loop's sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum LoopItem {
    Image(ImageItem),
    Node(NodeItem),
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

impl LoopItem {
    pub fn image(src: impl Into<String>) -> ImageItem {
        ImageItem::new(src)
    }

    pub fn node(node: impl Into<RenderNode>) -> NodeItem {
        NodeItem::new(node)
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            LoopItem::Image(image) => present(&image.href),
            LoopItem::Node(node) => present(&node.href),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            LoopItem::Image(image) => present(&image.title),
            LoopItem::Node(node) => present(&node.title),
        }
    }

    pub fn explicit_label(&self) -> Option<&str> {
        match self {
            LoopItem::Image(image) => present(&image.aria_label),
            LoopItem::Node(node) => present(&node.aria_label),
        }
    }

    /// Accessible name of the item's link: explicit label, title, alt text,
    /// then [`FALLBACK_LINK_LABEL`]. Empty strings count as absent.
    pub fn accessible_label(&self) -> &str {
        let alt = match self {
            LoopItem::Image(image) => present(&image.alt),
            LoopItem::Node(_) => None,
        };
        self.explicit_label()
            .or_else(|| self.title())
            .or(alt)
            .unwrap_or(FALLBACK_LINK_LABEL)
    }
}

impl From<ImageItem> for LoopItem {
    fn from(image: ImageItem) -> Self {
        LoopItem::Image(image)
    }
}

impl From<NodeItem> for LoopItem {
    fn from(node: NodeItem) -> Self {
        LoopItem::Node(node)
    }
}

/// Item content resolved once per composition.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemContent {
    /// Default image rendering; the `img` element.
    Image(Element),
    /// Default node rendering; the `span.logoloop__node` wrapper.
    Node(Element),
    /// Output of a custom item renderer, placed inside the item wrapper as is.
    CustomRendered(RenderNode),
}

impl ItemContent {
    /// Default rendering of `item`, link wrapper excluded.
    pub fn resolve_default(item: &LoopItem) -> Self {
        match item {
            LoopItem::Image(image) => ItemContent::Image(
                Element::new("img")
                    .attr("src", image.src.clone())
                    .attr_opt("srcset", image.src_set.clone())
                    .attr_opt("sizes", image.sizes.clone())
                    .attr_opt("width", image.width.map(|w| w.to_string()))
                    .attr_opt("height", image.height.map(|h| h.to_string()))
                    .attr("alt", image.alt.clone().unwrap_or_default())
                    .attr_opt("title", image.title.clone())
                    .attr("loading", "lazy")
                    .attr("decoding", "async")
                    .attr("draggable", "false"),
            ),
            LoopItem::Node(node) => {
                let hidden = item.href().is_some() && item.explicit_label().is_none();
                let mut wrapper = Element::new("span")
                    .class("logoloop__node")
                    .child(node.node.clone());
                if hidden {
                    wrapper = wrapper.attr("aria-hidden", "true");
                }
                ItemContent::Node(wrapper)
            }
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ItemContent::CustomRendered(_))
    }

    pub(crate) fn to_node(&self) -> RenderNode {
        match self {
            ItemContent::Image(element) | ItemContent::Node(element) => {
                RenderNode::Element(element.clone())
            }
            ItemContent::CustomRendered(node) => node.clone(),
        }
    }
}
