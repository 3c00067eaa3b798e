//! Geometry behavior of a mounted loop: copy counts, re-measurement triggers
//! and the image gate.

use logoloop_foundation::{LoopStats, ResizeStrategy, ResizeTarget};
use logoloop_testing::{FakeHost, LoopTestRule, ResizeSubscription};
use logoloop_ui::{
    ImageId, ImageItem, LogoLoop, LoopConfig, LoopDirection, LoopItem, Orientation,
};

fn logos(count: usize) -> Vec<LoopItem> {
    (0..count)
        .map(|i| {
            ImageItem::new(format!("/logos/{i}.svg"))
                .alt(format!("Logo {i}"))
                .into()
        })
        .collect()
}

fn mounted_rule(host: FakeHost, config: LoopConfig, items: Vec<LoopItem>) -> LoopTestRule {
    let mut rule = LoopTestRule::new(host);
    rule.set_content(LogoLoop::new(config, items).expect("valid config"));
    rule
}

#[test]
fn test_five_items_fill_thousand_pixel_container_with_four_copies() {
    let host = FakeHost::new(1000.0, 48.0).with_item_extent(100.0);
    let rule = mounted_rule(host, LoopConfig::new().gap(20.0), logos(5));

    let state = rule.state();
    assert_eq!(state.sequence_extent(), 600.0);
    assert_eq!(state.copy_count(), 4);

    let tree = rule.host().tree().expect("rendered");
    assert_eq!(tree.copy_count(), 4);
    assert_eq!(tree.copies().len(), 4);
}

#[test]
fn test_copies_cover_viewport_after_every_resize() {
    let host = FakeHost::new(1000.0, 48.0).with_item_extent(90.0);
    let mut rule = mounted_rule(host, LoopConfig::new().gap(16.0), logos(3));
    let sequence = rule.state().sequence_extent();
    assert_eq!(sequence, 318.0);

    for width in [0.0f32, 1.0, 317.0, 318.0, 319.0, 1280.0, 1920.0, 7680.0] {
        rule.resize(width, 48.0);
        rule.advance_frames(1);
        let copies = rule.state().copy_count();
        assert!(copies >= 2);
        assert!(
            copies as f32 * sequence >= width + sequence,
            "{} copies do not cover {}px",
            copies,
            width
        );
        assert_eq!(rule.host().tree().expect("rendered").copy_count(), copies);
    }
}

#[test]
fn test_unchanged_remeasure_keeps_copy_count_and_tree() {
    let host = FakeHost::new(1280.0, 48.0);
    let mut rule = mounted_rule(host, LoopConfig::default(), logos(4));
    let copies = rule.state().copy_count();
    let renders = rule.host().render_count();

    rule.resize(1280.0, 48.0);
    rule.advance_frames(1);

    assert_eq!(rule.state().copy_count(), copies);
    assert_eq!(rule.host().render_count(), renders);
    assert_eq!(rule.state().stats().geometry_passes, 2);
}

#[test]
fn test_resize_bursts_collapse_into_one_pass() {
    let host = FakeHost::new(800.0, 48.0);
    let mut rule = mounted_rule(host, LoopConfig::default(), logos(4));
    let before = rule.state().stats();

    assert!(rule.mounted().notify_resize());
    assert!(!rule.mounted().notify_resize());
    assert!(!rule.mounted().notify_resize());
    rule.advance_frames(1);

    let after = rule.state().stats();
    assert_eq!(after.geometry_passes, before.geometry_passes + 1);
}

#[test]
fn test_growing_container_adds_copies() {
    let host = FakeHost::new(600.0, 48.0).with_item_extent(100.0);
    let mut rule = mounted_rule(host, LoopConfig::new().gap(20.0), logos(5));
    assert_eq!(rule.state().copy_count(), 3);

    rule.resize(2400.0, 48.0);
    rule.advance_frames(1);

    assert_eq!(rule.state().copy_count(), 6);
    assert_eq!(rule.host().tree().expect("rendered").copies().len(), 6);
}

#[test]
fn test_empty_sequence_keeps_initial_geometry() {
    let host = FakeHost::new(1000.0, 48.0);
    let rule = mounted_rule(host, LoopConfig::default(), Vec::new());

    let state = rule.state();
    assert_eq!(state.copy_count(), 2);
    assert_eq!(state.sequence_extent(), 0.0);
    assert_eq!(
        state.stats(),
        LoopStats {
            frames: 1,
            transform_writes: 0,
            geometry_passes: 0,
            skipped_geometry_passes: 1,
        }
    );
}

#[test]
fn test_vertical_loop_pins_container_to_parent() {
    let host = FakeHost::new(200.0, 0.0)
        .with_item_extent(50.0)
        .with_parent_height(499.2);
    let rule = mounted_rule(
        host,
        LoopConfig::new().direction(LoopDirection::Up),
        logos(5),
    );

    assert_eq!(rule.host().pinned_height(), Some(500.0));
    assert_eq!(rule.state().sequence_extent(), 410.0);
    assert_eq!(rule.state().copy_count(), 4);
}

#[test]
fn test_vertical_loop_moves_vertically_and_releases_pin_when_horizontal() {
    let host = FakeHost::new(200.0, 0.0)
        .with_item_extent(50.0)
        .with_parent_height(300.0);
    let mut rule = mounted_rule(
        host,
        LoopConfig::new().direction(LoopDirection::Up),
        logos(5),
    );
    rule.advance_frames(30);

    assert_eq!(rule.host().pinned_height(), Some(300.0));
    assert_eq!(rule.state().copy_count(), 3);
    let transforms = rule.host().transforms();
    assert!(transforms.len() > 1);
    assert!(transforms
        .iter()
        .all(|transform| transform.orientation == Orientation::Vertical));

    rule.mounted()
        .set_config(LoopConfig::new().direction(LoopDirection::Left))
        .expect("valid config");
    assert_eq!(rule.host().pinned_height(), None);
    let tree = rule.host().tree().expect("rendered");
    assert!(tree.root().has_class("logoloop--horizontal"));

    rule.advance_frames(5);
    assert_eq!(rule.host().pinned_height(), None);
    assert_eq!(
        rule.host().last_transform().map(|t| t.orientation),
        Some(Orientation::Horizontal)
    );
}

#[test]
fn test_geometry_waits_for_reference_images() {
    let host = FakeHost::new(1000.0, 48.0).with_pending_images();
    let mut rule = mounted_rule(host, LoopConfig::default(), logos(3));
    assert_eq!(rule.state().sequence_extent(), 0.0);

    rule.load_image(ImageId(0));
    rule.load_image(ImageId(1));
    rule.advance_frames(1);
    assert_eq!(rule.state().sequence_extent(), 0.0);

    rule.load_image(ImageId(2));
    rule.advance_frames(1);
    assert_eq!(rule.state().sequence_extent(), 396.0);
    assert_eq!(rule.state().copy_count(), 5);
}

#[test]
fn test_failed_image_does_not_block_geometry() {
    let host = FakeHost::new(1000.0, 48.0).with_pending_images();
    let mut rule = mounted_rule(host, LoopConfig::default(), logos(3));

    rule.load_image(ImageId(0));
    rule.load_image(ImageId(1));
    rule.fail_image(ImageId(2));
    rule.advance_frames(1);

    // The failed image stays unsized; the other two are measured.
    assert_eq!(rule.state().sequence_extent(), 264.0);
    assert_eq!(rule.state().copy_count(), 6);
}

#[test]
fn test_images_in_decorative_copies_are_not_awaited() {
    let host = FakeHost::new(1000.0, 48.0).with_pending_images();
    let mut rule = mounted_rule(host, LoopConfig::default(), logos(2));

    // Events for images outside the reference copy are ignored.
    rule.mounted()
        .notify_image(ImageId(7), logoloop_ui::ImageEvent::Loaded);
    rule.advance_frames(1);
    assert_eq!(rule.state().stats().geometry_passes, 0);

    rule.load_image(ImageId(0));
    rule.load_image(ImageId(1));
    rule.advance_frames(1);
    assert_eq!(rule.state().stats().geometry_passes, 1);
}

#[test]
fn test_resize_observer_targets() {
    let rule = mounted_rule(FakeHost::new(800.0, 48.0), LoopConfig::default(), logos(2));
    assert_eq!(rule.mounted().resize_strategy(), ResizeStrategy::Observe);
    assert_eq!(
        rule.host().subscription(),
        ResizeSubscription::Observing(vec![
            ResizeTarget::Container,
            ResizeTarget::ReferenceSequence
        ])
    );
}

#[test]
fn test_window_resize_fallback() {
    let host = FakeHost::new(800.0, 48.0).without_resize_observer();
    let mut rule = mounted_rule(host, LoopConfig::default(), logos(2));
    assert_eq!(rule.mounted().resize_strategy(), ResizeStrategy::WindowFallback);
    assert_eq!(rule.host().subscription(), ResizeSubscription::Window);

    rule.resize(3000.0, 48.0);
    rule.advance_frames(1);
    assert_eq!(rule.state().copy_count(), 14);

    rule.unmount();
    assert_eq!(rule.host().subscription(), ResizeSubscription::None);
}

#[test]
fn test_layout_config_change_remeasures() {
    let host = FakeHost::new(1000.0, 48.0).with_item_extent(100.0);
    let mut rule = mounted_rule(host, LoopConfig::new().gap(20.0), logos(5));
    rule.advance_frames(30);
    assert!(rule.state().offset() > 0.0);

    rule.mounted()
        .set_config(LoopConfig::new().gap(10.0))
        .expect("valid config");
    assert_eq!(rule.state().sequence_extent(), 0.0);
    // Copies stay rendered until the new measurement lands.
    assert_eq!(rule.host().tree().expect("rendered").copy_count(), 4);

    rule.advance_frames(1);
    assert_eq!(rule.state().sequence_extent(), 550.0);
    assert_eq!(rule.state().copy_count(), 4);
    assert_eq!(rule.state().offset(), 0.0);
    assert_eq!(rule.host().last_transform().map(|t| t.offset), Some(0.0));
}

#[test]
fn test_set_items_remeasures() {
    let host = FakeHost::new(1000.0, 48.0).with_item_extent(100.0);
    let mut rule = mounted_rule(host, LoopConfig::new().gap(20.0), logos(5));

    rule.mounted().set_items(logos(2));
    rule.advance_frames(1);

    assert_eq!(rule.state().sequence_extent(), 240.0);
    assert_eq!(rule.state().copy_count(), 7);
    let tree = rule.host().tree().expect("rendered");
    assert_eq!(tree.copies()[0].child_elements().count(), 2);
}
