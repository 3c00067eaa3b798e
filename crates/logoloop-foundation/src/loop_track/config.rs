//! Loop configuration.

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::geometry::Orientation;
use crate::error::ConfigError;

pub const DEFAULT_SPEED: f32 = 120.0;
pub const DEFAULT_ITEM_HEIGHT: f32 = 48.0;
pub const DEFAULT_GAP: f32 = 32.0;
pub const DEFAULT_ARIA_LABEL: &str = "Partner logos";

/// Nominal travel direction of the items on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LoopDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl LoopDirection {
    pub fn orientation(self) -> Orientation {
        match self {
            LoopDirection::Left | LoopDirection::Right => Orientation::Horizontal,
            LoopDirection::Up | LoopDirection::Down => Orientation::Vertical,
        }
    }

    pub fn is_vertical(self) -> bool {
        self.orientation().is_vertical()
    }

    /// Sign applied to the speed magnitude. Positive offsets move content
    /// toward the start edge, so `Left` and `Up` are `+1`.
    pub fn multiplier(self) -> f32 {
        match self {
            LoopDirection::Left | LoopDirection::Up => 1.0,
            LoopDirection::Right | LoopDirection::Down => -1.0,
        }
    }
}

/// What hovering the track does to motion.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HoverBehavior {
    /// Steer toward zero while hovered.
    Pause,
    /// Hover is ignored.
    Unaffected,
    /// Steer toward this velocity (px/s) while hovered.
    Speed(f32),
}

impl Default for HoverBehavior {
    fn default() -> Self {
        HoverBehavior::Pause
    }
}

impl HoverBehavior {
    /// Resolves the two-option form: an explicit hover speed wins over the
    /// pause flag.
    pub fn from_options(pause_on_hover: bool, hover_speed: Option<f32>) -> Self {
        match hover_speed {
            Some(speed) => HoverBehavior::Speed(speed),
            None if pause_on_hover => HoverBehavior::Pause,
            None => HoverBehavior::Unaffected,
        }
    }

    /// Target velocity while hovered, or `None` when hover has no effect.
    pub fn hover_target(self) -> Option<f32> {
        match self {
            HoverBehavior::Pause => Some(0.0),
            HoverBehavior::Unaffected => None,
            HoverBehavior::Speed(speed) => Some(speed),
        }
    }

    pub fn tracks_hover(self) -> bool {
        self.hover_target().is_some()
    }
}

/// A CSS length: plain pixels or any other CSS expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CssLength {
    Px(f32),
    Raw(String),
}

impl CssLength {
    pub fn full() -> Self {
        CssLength::Raw("100%".to_string())
    }

    pub fn to_css(&self) -> String {
        match self {
            CssLength::Px(px) => format!("{}px", px),
            CssLength::Raw(raw) => raw.clone(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.to_css() == "100%"
    }
}

impl Default for CssLength {
    fn default() -> Self {
        Self::full()
    }
}

impl From<f32> for CssLength {
    fn from(px: f32) -> Self {
        CssLength::Px(px)
    }
}

impl From<&str> for CssLength {
    fn from(raw: &str) -> Self {
        CssLength::Raw(raw.to_string())
    }
}

/// Configuration of one loop instance.
///
/// Supplied once per mount. Changing a layout-affecting field (the axis of
/// [`direction`](Self::direction), [`gap`](Self::gap) or
/// [`item_height`](Self::item_height)) invalidates measured geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopConfig {
    /// Speed in pixels per second. A negative value reverses `direction`.
    pub speed: f32,
    pub direction: LoopDirection,
    /// Track width. Ignored for vertical loops when it is `100%`.
    pub width: CssLength,
    pub item_height: f32,
    pub gap: f32,
    pub hover: HoverBehavior,
    /// Fade items out toward both edges.
    pub fade_out: bool,
    pub fade_out_color: Option<String>,
    pub scale_on_hover: bool,
    /// Accessible label of the surrounding region.
    pub aria_label: String,
    pub class_name: Option<String>,
    /// Extra inline style entries, applied after the loop's own variables.
    pub style: IndexMap<String, String>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            direction: LoopDirection::Left,
            width: CssLength::full(),
            item_height: DEFAULT_ITEM_HEIGHT,
            gap: DEFAULT_GAP,
            hover: HoverBehavior::Pause,
            fade_out: false,
            fade_out_color: None,
            scale_on_hover: false,
            aria_label: DEFAULT_ARIA_LABEL.to_string(),
            class_name: None,
            style: IndexMap::new(),
        }
    }
}

impl LoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn direction(mut self, direction: LoopDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn width(mut self, width: impl Into<CssLength>) -> Self {
        self.width = width.into();
        self
    }

    pub fn item_height(mut self, height: f32) -> Self {
        self.item_height = height;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn hover(mut self, hover: HoverBehavior) -> Self {
        self.hover = hover;
        self
    }

    /// Sets the hover behavior from the pause flag and optional hover speed.
    pub fn pause_on_hover(mut self, pause: bool, hover_speed: Option<f32>) -> Self {
        self.hover = HoverBehavior::from_options(pause, hover_speed);
        self
    }

    pub fn fade_out(mut self, color: Option<&str>) -> Self {
        self.fade_out = true;
        self.fade_out_color = color.map(str::to_string);
        self
    }

    pub fn scale_on_hover(mut self, enabled: bool) -> Self {
        self.scale_on_hover = enabled;
        self
    }

    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = label.into();
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn style_entry(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.direction.orientation()
    }

    /// Signed velocity in px/s: `|speed| * direction * sign(speed)`.
    pub fn target_velocity(&self) -> f32 {
        let speed_sign = if self.speed < 0.0 { -1.0 } else { 1.0 };
        self.speed.abs() * self.direction.multiplier() * speed_sign
    }

    /// Velocity the integrator steers toward given the hover state.
    pub fn effective_target_velocity(&self, hovered: bool) -> f32 {
        effective_target_velocity(self.target_velocity(), hovered, self.hover)
    }

    /// Whether switching from `self` to `other` invalidates measured geometry.
    pub fn layout_differs(&self, other: &LoopConfig) -> bool {
        self.orientation() != other.orientation()
            || self.gap != other.gap
            || self.item_height != other.item_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.is_finite() {
            return Err(ConfigError::NonFiniteSpeed(self.speed));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(ConfigError::InvalidGap(self.gap));
        }
        if !self.item_height.is_finite() || self.item_height <= 0.0 {
            return Err(ConfigError::InvalidItemHeight(self.item_height));
        }
        if let HoverBehavior::Speed(speed) = self.hover {
            if !speed.is_finite() {
                return Err(ConfigError::NonFiniteHoverSpeed(speed));
            }
        }
        Ok(())
    }
}

/// Hover override when hovered and the behavior defines one, otherwise `base`.
pub fn effective_target_velocity(base: f32, hovered: bool, hover: HoverBehavior) -> f32 {
    match (hovered, hover.hover_target()) {
        (true, Some(override_velocity)) => override_velocity,
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_signs() {
        let left = LoopConfig::new().speed(100.0).direction(LoopDirection::Left);
        let right = LoopConfig::new().speed(100.0).direction(LoopDirection::Right);
        let up = LoopConfig::new().speed(100.0).direction(LoopDirection::Up);
        let down = LoopConfig::new().speed(100.0).direction(LoopDirection::Down);

        assert_eq!(left.target_velocity(), 100.0);
        assert_eq!(right.target_velocity(), -100.0);
        assert_eq!(up.target_velocity(), 100.0);
        assert_eq!(down.target_velocity(), -100.0);
    }

    #[test]
    fn test_negative_speed_reverses_direction() {
        let config = LoopConfig::new().speed(-80.0).direction(LoopDirection::Left);
        assert_eq!(config.target_velocity(), -80.0);

        let config = LoopConfig::new().speed(-80.0).direction(LoopDirection::Right);
        assert_eq!(config.target_velocity(), 80.0);
    }

    #[test]
    fn test_hover_options() {
        assert_eq!(HoverBehavior::from_options(true, None), HoverBehavior::Pause);
        assert_eq!(HoverBehavior::from_options(false, None), HoverBehavior::Unaffected);
        assert_eq!(
            HoverBehavior::from_options(false, Some(20.0)),
            HoverBehavior::Speed(20.0)
        );
        assert_eq!(
            HoverBehavior::from_options(true, Some(0.0)),
            HoverBehavior::Speed(0.0)
        );
    }

    #[test]
    fn test_effective_target_velocity() {
        let paused = LoopConfig::new().speed(120.0);
        assert_eq!(paused.effective_target_velocity(true), 0.0);
        assert_eq!(paused.effective_target_velocity(false), 120.0);

        let slowed = LoopConfig::new().hover(HoverBehavior::Speed(30.0));
        assert_eq!(slowed.effective_target_velocity(true), 30.0);

        let ignored = LoopConfig::new().hover(HoverBehavior::Unaffected);
        assert_eq!(ignored.effective_target_velocity(true), 120.0);
    }

    #[test]
    fn test_layout_differs() {
        let base = LoopConfig::new();
        assert!(!base.layout_differs(&base.clone().speed(10.0)));
        assert!(!base.layout_differs(&base.clone().direction(LoopDirection::Right)));
        assert!(base.layout_differs(&base.clone().direction(LoopDirection::Up)));
        assert!(base.layout_differs(&base.clone().gap(8.0)));
        assert!(base.layout_differs(&base.clone().item_height(64.0)));
    }

    #[test]
    fn test_validate() {
        assert!(LoopConfig::new().validate().is_ok());
        assert_eq!(
            LoopConfig::new().speed(f32::NAN).validate().unwrap_err().to_string(),
            "speed must be a finite number of pixels per second, got NaN"
        );
        assert_eq!(
            LoopConfig::new().gap(-1.0).validate(),
            Err(ConfigError::InvalidGap(-1.0))
        );
        assert_eq!(
            LoopConfig::new().item_height(0.0).validate(),
            Err(ConfigError::InvalidItemHeight(0.0))
        );
        assert_eq!(
            LoopConfig::new()
                .hover(HoverBehavior::Speed(f32::INFINITY))
                .validate(),
            Err(ConfigError::NonFiniteHoverSpeed(f32::INFINITY))
        );
    }

    #[test]
    fn test_css_length() {
        assert_eq!(CssLength::from(48.0).to_css(), "48px");
        assert_eq!(CssLength::from(12.5).to_css(), "12.5px");
        assert!(CssLength::default().is_full());
        assert!(!CssLength::from("80vw").is_full());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_config() {
        let config: LoopConfig = serde_json::from_str(
            r#"{ "speed": 80, "direction": "up", "width": 320, "hover": { "speed": 12 } }"#,
        )
        .unwrap();
        assert_eq!(config.speed, 80.0);
        assert_eq!(config.direction, LoopDirection::Up);
        assert_eq!(config.width, CssLength::Px(320.0));
        assert_eq!(config.hover, HoverBehavior::Speed(12.0));
        assert_eq!(config.gap, DEFAULT_GAP);
    }
}
