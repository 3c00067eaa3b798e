//! Serializes Logoloop element trees to HTML.

mod escape_cache;

pub use escape_cache::*;

use logoloop_ui::{Element, LoopTree, RenderNode};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input", "meta", "link", "source"];

/// Renders element trees to HTML strings.
///
/// Escaped fragments are cached across renders; a loop repeats every item
/// string once per copy, so most lookups hit.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    cache: EscapeCache,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &EscapeCache {
        &self.cache
    }

    pub fn render_tree(&mut self, tree: &LoopTree) -> String {
        self.render_element(tree.root())
    }

    pub fn render_element(&mut self, element: &Element) -> String {
        let mut out = String::new();
        self.write_element(element, &mut out);
        out
    }

    fn write_node(&mut self, node: &RenderNode, out: &mut String) {
        match node {
            RenderNode::Element(element) => self.write_element(element, out),
            RenderNode::Text(text) => out.push_str(&self.cache.escape(text, EscapeMode::Text)),
        }
    }

    fn write_element(&mut self, element: &Element, out: &mut String) {
        out.push('<');
        out.push_str(&element.tag);

        if !element.classes.is_empty() {
            let classes = element.classes.join(" ");
            self.write_attribute("class", &classes, out);
        }
        for (name, value) in &element.attributes {
            self.write_attribute(name, value, out);
        }
        if !element.style.is_empty() {
            let style = element
                .style
                .iter()
                .map(|(property, value)| format!("{property}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            self.write_attribute("style", &style, out);
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
            if !element.children.is_empty() {
                log::warn!("<{}> cannot have children; dropping them", element.tag);
            }
            return;
        }
        for child in &element.children {
            self.write_node(child, out);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }

    fn write_attribute(&mut self, name: &str, value: &str, out: &mut String) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&self.cache.escape(value, EscapeMode::Attribute));
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_element() {
        let element = Element::new("a")
            .class("logoloop__link")
            .attr("href", "https://example.com/?a=1&b=2")
            .attr("aria-label", "\"Quoted\"")
            .child(Element::new("img").attr("src", "x.svg").attr("alt", ""))
            .child(RenderNode::text("<R&D>"));

        let html = HtmlRenderer::new().render_element(&element);
        assert_eq!(
            html,
            "<a class=\"logoloop__link\" href=\"https://example.com/?a=1&amp;b=2\" \
             aria-label=\"&quot;Quoted&quot;\"><img src=\"x.svg\" alt=\"\">&lt;R&amp;D&gt;</a>"
        );
    }

    #[test]
    fn test_style_serialization() {
        let element = Element::new("div")
            .style_entry("width", "100%")
            .style_entry("--logoloop-gap", "32px");
        let html = HtmlRenderer::new().render_element(&element);
        assert_eq!(html, "<div style=\"width: 100%; --logoloop-gap: 32px\"></div>");
    }
}
