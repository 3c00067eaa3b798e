//! Class names, CSS variables and transforms derived from a [`LoopConfig`].

use indexmap::IndexMap;
use logoloop_foundation::{LoopConfig, Orientation};
use smallvec::SmallVec;

pub const ROOT_CLASS: &str = "logoloop";
pub const TRACK_CLASS: &str = "logoloop__track";
pub const LIST_CLASS: &str = "logoloop__list";
pub const ITEM_CLASS: &str = "logoloop__item";
pub const LINK_CLASS: &str = "logoloop__link";

pub const GAP_VAR: &str = "--logoloop-gap";
pub const ITEM_HEIGHT_VAR: &str = "--logoloop-logoHeight";
pub const FADE_COLOR_VAR: &str = "--logoloop-fadeColor";

/// Root class list, in order: base, orientation, fade, scale-on-hover, custom.
pub fn root_classes(config: &LoopConfig) -> SmallVec<[String; 5]> {
    let mut classes = SmallVec::new();
    classes.push(ROOT_CLASS.to_string());
    classes.push(
        match config.orientation() {
            Orientation::Horizontal => "logoloop--horizontal",
            Orientation::Vertical => "logoloop--vertical",
        }
        .to_string(),
    );
    if config.fade_out {
        classes.push("logoloop--fade".to_string());
    }
    if config.scale_on_hover {
        classes.push("logoloop--scale-hover".to_string());
    }
    if let Some(class_name) = config.class_name.as_deref().filter(|c| !c.is_empty()) {
        classes.push(class_name.to_string());
    }
    classes
}

pub fn css_variables(config: &LoopConfig) -> IndexMap<String, String> {
    let mut vars = IndexMap::new();
    vars.insert(GAP_VAR.to_string(), format!("{}px", config.gap));
    vars.insert(
        ITEM_HEIGHT_VAR.to_string(),
        format!("{}px", config.item_height),
    );
    if let Some(color) = config.fade_out_color.as_deref().filter(|c| !c.is_empty()) {
        vars.insert(FADE_COLOR_VAR.to_string(), color.to_string());
    }
    vars
}

/// Inline style of the region: width, the loop variables, then the custom
/// entries, later entries overriding earlier ones.
pub fn container_style(config: &LoopConfig) -> IndexMap<String, String> {
    let mut style = IndexMap::new();
    let vertical = config.orientation().is_vertical();
    if !(vertical && config.width.is_full()) {
        style.insert("width".to_string(), config.width.to_css());
    }
    style.extend(css_variables(config));
    style.extend(
        config
            .style
            .iter()
            .map(|(property, value)| (property.clone(), value.clone())),
    );
    style
}

/// CSS transform moving the track back by `offset` along its axis.
pub fn transform_css(orientation: Orientation, offset: f32) -> String {
    // Avoid printing `-0px` for the resting position.
    let shift = if offset == 0.0 { 0.0 } else { -offset };
    match orientation {
        Orientation::Horizontal => format!("translate3d({}px, 0, 0)", shift),
        Orientation::Vertical => format!("translate3d(0, {}px, 0)", shift),
    }
}
