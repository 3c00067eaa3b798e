//! LogoLoop widget implementation.
//!
//! Turns a configuration, an item sequence and a copy count into the loop's
//! element tree. Composition is memoised by copy count, so geometry passes
//! that do not change the count do not rebuild the tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use logoloop_foundation::{ConfigError, ImageId, LoopConfig, Orientation};

use crate::item::{ItemContent, LoopItem};
use crate::node::{Anchor, CopyKind, Element, LoopTree, RenderNode};
use crate::style::{
    container_style, root_classes, transform_css, ITEM_CLASS, LINK_CLASS, LIST_CLASS, TRACK_CLASS,
};

/// Custom per-item rendering. Receives the item and its key (`"0-{index}"`).
///
/// The renderer runs once per item and its output is cloned into every copy,
/// so the key is the reference copy's key for all of them. Do not derive
/// element ids from it: every copy would carry the same id. The list-item
/// wrapper is always added around the returned node.
pub type ItemRenderer = Rc<dyn Fn(&LoopItem, &str) -> RenderNode>;

/// A continuous loop of logos.
pub struct LogoLoop {
    config: LoopConfig,
    items: Rc<[LoopItem]>,
    renderer: Option<ItemRenderer>,
    cache: RefCell<Option<Rc<LoopTree>>>,
}

impl LogoLoop {
    pub fn new(config: LoopConfig, items: impl Into<Rc<[LoopItem]>>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            items: items.into(),
            renderer: None,
            cache: RefCell::new(None),
        })
    }

    /// Replaces the default image/node rendering for every item.
    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&LoopItem, &str) -> RenderNode + 'static,
    {
        self.renderer = Some(Rc::new(renderer));
        self.cache.get_mut().take();
        self
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn items(&self) -> &Rc<[LoopItem]> {
        &self.items
    }

    pub fn has_custom_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn orientation(&self) -> Orientation {
        self.config.orientation()
    }

    /// Validates and adopts `config`, returning the previous one.
    pub fn set_config(&mut self, config: LoopConfig) -> Result<LoopConfig, ConfigError> {
        config.validate()?;
        self.cache.get_mut().take();
        Ok(std::mem::replace(&mut self.config, config))
    }

    pub fn set_items(&mut self, items: impl Into<Rc<[LoopItem]>>) {
        self.items = items.into();
        self.cache.get_mut().take();
    }

    /// Resolves the content of every item once.
    pub fn resolve_contents(&self) -> Vec<ItemContent> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| match &self.renderer {
                // Key of the reference copy; custom output is reused across copies.
                Some(renderer) => ItemContent::CustomRendered(renderer(item, &format!("0-{index}"))),
                None => ItemContent::resolve_default(item),
            })
            .collect()
    }

    /// Composes the tree for `copy_count` copies, reusing the last tree when
    /// the count is unchanged.
    pub fn compose(&self, copy_count: usize) -> Rc<LoopTree> {
        if let Some(cached) = self.cache.borrow().as_ref() {
            if cached.copy_count() == copy_count {
                return cached.clone();
            }
        }
        log::trace!("composing logo loop with {} copies", copy_count);
        let tree = Rc::new(self.build(copy_count));
        *self.cache.borrow_mut() = Some(tree.clone());
        tree
    }

    fn build(&self, copy_count: usize) -> LoopTree {
        let contents = self.resolve_contents();
        let lists = (0..copy_count).map(|copy| {
            RenderNode::Element(self.build_list(CopyKind::from_index(copy), &contents))
        });

        let track = Element::new("div")
            .class(TRACK_CLASS)
            .anchor(Anchor::Track)
            .style_entry("transform", transform_css(self.orientation(), 0.0))
            .children(lists);

        let mut root = Element::new("div")
            .attr("role", "region")
            .attr("aria-label", self.config.aria_label.clone())
            .anchor(Anchor::Container)
            .child(track);
        root.classes = root_classes(&self.config).into_iter().collect();
        root.style = container_style(&self.config);

        LoopTree::new(root, copy_count)
    }

    fn build_list(&self, kind: CopyKind, contents: &[ItemContent]) -> Element {
        let mut list = Element::new("ul")
            .class(LIST_CLASS)
            .attr("role", "list")
            .children(
                self.items
                    .iter()
                    .zip(contents)
                    .map(|(item, content)| RenderNode::Element(self.build_item(item, content))),
            );

        match kind {
            CopyKind::Reference => {
                list = list.anchor(Anchor::ReferenceSequence);
                let mut next = 0;
                list.for_each_image_mut(&mut |img| {
                    img.image = Some(ImageId(next));
                    next += 1;
                });
            }
            CopyKind::Decorative(_) => {
                list = list.attr("aria-hidden", "true");
            }
        }
        list
    }

    fn build_item(&self, item: &LoopItem, content: &ItemContent) -> Element {
        let wrapper = Element::new("li")
            .class(ITEM_CLASS)
            .attr("role", "listitem");

        if content.is_custom() {
            return wrapper.child(content.to_node());
        }

        match item.href() {
            Some(href) => wrapper.child(
                Element::new("a")
                    .class(LINK_CLASS)
                    .attr("href", href)
                    .attr("aria-label", item.accessible_label())
                    .attr("target", "_blank")
                    .attr("rel", "noreferrer noopener")
                    .child(content.to_node()),
            ),
            None => wrapper.child(content.to_node()),
        }
    }
}

impl fmt::Debug for LogoLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoLoop")
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ImageItem, NodeItem};
    use logoloop_foundation::LoopDirection;

    fn items() -> Vec<LoopItem> {
        vec![
            ImageItem::new("a.svg").alt("A").href("https://a.example").into(),
            NodeItem::new(RenderNode::text("B")).title("Bee").into(),
            ImageItem::new("c.svg").into(),
        ]
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = LogoLoop::new(LoopConfig::new().gap(-1.0), items()).unwrap_err();
        assert_eq!(err, ConfigError::InvalidGap(-1.0));
    }

    #[test]
    fn test_compose_structure() {
        let widget = LogoLoop::new(LoopConfig::default(), items()).unwrap();
        let tree = widget.compose(3);

        let root = tree.root();
        assert_eq!(root.attribute("role"), Some("region"));
        assert_eq!(root.attribute("aria-label"), Some("Partner logos"));
        assert!(root.has_class("logoloop--horizontal"));

        let copies = tree.copies();
        assert_eq!(copies.len(), 3);
        assert!(!copies[0].is_aria_hidden());
        assert_eq!(copies[0].anchor, Some(Anchor::ReferenceSequence));
        for copy in &copies[1..] {
            assert!(copy.is_aria_hidden());
            assert_eq!(copy.anchor, None);
            assert_eq!(copy.child_elements().count(), 3);
        }
    }

    #[test]
    fn test_only_reference_images_are_tracked() {
        let widget = LogoLoop::new(LoopConfig::default(), items()).unwrap();
        let tree = widget.compose(4);
        assert_eq!(tree.reference_images(), vec![ImageId(0), ImageId(1)]);
        let tracked = tree
            .root()
            .descendants()
            .into_iter()
            .filter(|e| e.image.is_some())
            .count();
        assert_eq!(tracked, 2);
    }

    #[test]
    fn test_compose_is_memoised_by_copy_count() {
        let widget = LogoLoop::new(LoopConfig::default(), items()).unwrap();
        let first = widget.compose(2);
        assert!(Rc::ptr_eq(&first, &widget.compose(2)));
        assert!(!Rc::ptr_eq(&first, &widget.compose(3)));
    }

    #[test]
    fn test_set_items_drops_cache() {
        let mut widget = LogoLoop::new(LoopConfig::default(), items()).unwrap();
        let first = widget.compose(2);
        widget.set_items(vec![ImageItem::new("z.svg").into()]);
        let second = widget.compose(2);
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second.copies()[0].child_elements().count(), 1);
    }

    #[test]
    fn test_custom_renderer_is_wrapped_in_list_item() {
        let widget = LogoLoop::new(LoopConfig::default(), items())
            .unwrap()
            .with_renderer(|item, key| {
                Element::new("div")
                    .class("card")
                    .attr("data-card", key)
                    .child(RenderNode::text(item.title().unwrap_or("?")))
                    .into()
            });
        let tree = widget.compose(2);
        for copy in tree.copies() {
            for li in copy.child_elements() {
                assert_eq!(li.tag, "li");
                assert!(li.has_class("logoloop__item"));
                assert_eq!(li.attribute("role"), Some("listitem"));
                let card = li.child_elements().next().expect("card");
                assert!(card.has_class("card"));
            }
        }
        // Links are the renderer's concern.
        assert!(tree.root().find(&|e| e.tag == "a").is_none());
    }

    #[test]
    fn test_renderer_runs_once_per_item_with_reference_keys() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let seen = keys.clone();
        let widget = LogoLoop::new(LoopConfig::default(), items())
            .unwrap()
            .with_renderer(move |_item, key| {
                seen.borrow_mut().push(key.to_string());
                Element::new("div").attr("data-card", key).into()
            });
        let tree = widget.compose(3);

        assert_eq!(*keys.borrow(), vec!["0-0", "0-1", "0-2"]);
        for copy in tree.copies() {
            let first = copy
                .child_elements()
                .next()
                .and_then(|li| li.child_elements().next())
                .expect("card");
            assert_eq!(first.attribute("data-card"), Some("0-0"));
        }
    }

    #[test]
    fn test_vertical_track_transform() {
        let widget = LogoLoop::new(
            LoopConfig::new().direction(LoopDirection::Up),
            items(),
        )
        .unwrap();
        let tree = widget.compose(2);
        let track = tree.track().expect("track");
        assert_eq!(
            track.style.get("transform").map(String::as_str),
            Some("translate3d(0, 0px, 0)")
        );
        assert!(tree.root().style.get("width").is_none());
    }
}
