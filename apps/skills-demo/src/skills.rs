//! Skill data and the card renderer used for each loop item.

use logoloop_ui::{Element, LoopItem, NodeItem, RenderNode};
use serde::Deserialize;

pub const ICON_SIZE: f32 = 56.0;

/// Outer width of one card, padding included.
pub const CARD_WIDTH: f32 = 220.0;

const SKILLS_JSON: &str = include_str!("skills.json");

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Icon {
    Glyph { glyph: String, color: String },
    Text { text: String, color: String },
}

#[derive(Clone, Debug, Deserialize)]
pub struct Skill {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub href: Option<String>,
    pub icon: Icon,
}

impl Skill {
    pub fn to_item(&self) -> LoopItem {
        log::trace!("skill item {}", self.id);
        let mut item = NodeItem::new(self.icon.to_node()).title(self.title.clone());
        if let Some(href) = &self.href {
            item = item.href(href.clone());
        }
        item.into()
    }
}

impl Icon {
    fn to_node(&self) -> RenderNode {
        match self {
            Icon::Glyph { glyph, color } => Element::new("span")
                .class("skill-icon")
                .attr("data-icon", glyph.as_str())
                .attr("aria-hidden", "true")
                .style_entry("color", color.as_str())
                .style_entry("font-size", format!("{}px", ICON_SIZE))
                .into(),
            Icon::Text { text, color } => Element::new("div")
                .style_entry("font-size", format!("{}px", ICON_SIZE * 0.6))
                .child(
                    Element::new("span")
                        .style_entry("font-weight", "700")
                        .style_entry("color", color.as_str())
                        .child(RenderNode::text(text.as_str())),
                )
                .into(),
        }
    }
}

pub fn load() -> anyhow::Result<Vec<Skill>> {
    let skills: Vec<Skill> = serde_json::from_str(SKILLS_JSON)?;
    log::debug!("loaded {} skills", skills.len());
    Ok(skills)
}

/// Card with the icon, linked when the skill has a page, and a caption.
pub fn skill_card(item: &LoopItem, _key: &str) -> RenderNode {
    let label = item.title().unwrap_or_default();
    let icon = match item {
        LoopItem::Node(node) => node.node.clone(),
        LoopItem::Image(_) => RenderNode::text(label),
    };

    let inner = match item.href() {
        Some(href) => Element::new("a")
            .class("flex items-center justify-center")
            .attr("href", href)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .attr("title", label)
            .attr("aria-label", label),
        None => Element::new("div")
            .class("flex items-center justify-center")
            .attr("role", "img")
            .attr("aria-label", label),
    }
    .child(icon);

    Element::new("div")
        .class("flex flex-col items-center")
        .style_entry("min-width", format!("{}px", CARD_WIDTH))
        .style_entry("padding", "8px")
        .style_entry("box-sizing", "border-box")
        .child(
            Element::new("div")
                .class("rounded-xl border border-slate-800 skill-card")
                .child(
                    Element::new("div")
                        .class("flex items-center justify-center")
                        .style_entry("width", "160px")
                        .style_entry("height", "140px")
                        .style_entry("padding", "12px")
                        .child(inner),
                ),
        )
        .child(
            Element::new("div")
                .class("mt-6 text-sm font-semibold text-gray-200 text-center")
                .child(RenderNode::text(label)),
        )
        .into()
}
