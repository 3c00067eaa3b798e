//! Runs the tech-skills loop headlessly: mounts it, drives a few seconds of
//! frames with a hover in the middle, resizes the viewport and prints the
//! final markup.
//!
//! Usage: `skills-demo [viewport-width]`

mod preview_host;
mod skills;

use anyhow::Context;
use logoloop_core::{FrameClock, FrameScheduler, ManualFrameClock};
use logoloop_foundation::{PointerEventKind, PointerTarget, Size};
use logoloop_platform_web::{HoverTracker, HoverTransition, Rect, WebPlatform};
use logoloop_render_html::HtmlRenderer;
use logoloop_ui::{LogoLoop, LoopConfig, LoopDirection, LoopItem, MountedLoop};

use preview_host::PreviewHost;
use skills::{skill_card, CARD_WIDTH, ICON_SIZE};

const FRAME_MS: f64 = 1000.0 / 60.0;
const VIEWPORT_HEIGHT: f32 = 260.0;

fn skills_config() -> LoopConfig {
    LoopConfig::new()
        .speed(80.0)
        .direction(LoopDirection::Left)
        .item_height(ICON_SIZE)
        .gap(48.0)
        .pause_on_hover(true, Some(0.0))
        .scale_on_hover(true)
        .class_name("logoloop--smooth")
        .aria_label("Tech skills")
}

fn run_frames(
    mounted: &MountedLoop<PreviewHost>,
    scheduler: &FrameScheduler,
    clock: &ManualFrameClock,
    frames: usize,
) {
    for _ in 0..frames {
        clock.advance(FRAME_MS);
        scheduler.dispatch_frame(clock.now());
    }
    let state = mounted.state();
    log::info!(
        "t={:.0}ms offset={:.1}px velocity={:.1}px/s copies={}",
        clock.now().as_millis(),
        state.offset(),
        state.velocity(),
        state.copy_count()
    );
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();

    let width: f32 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid viewport width {:?}", arg))?,
        None => 1280.0,
    };

    let items: Vec<LoopItem> = skills::load()?.iter().map(|skill| skill.to_item()).collect();
    let widget = LogoLoop::new(skills_config(), items)?.with_renderer(skill_card);

    let scheduler = FrameScheduler::new();
    let clock = ManualFrameClock::new();
    let host = PreviewHost::new(Size::new(width, VIEWPORT_HEIGHT), CARD_WIDTH);
    let mounted = MountedLoop::mount(widget, host, scheduler.clone());
    scheduler.dispatch_frame(clock.now());

    println!(
        "mounted {} copies of a {}px sequence in a {}px viewport",
        mounted.state().copy_count(),
        mounted.state().sequence_extent(),
        width
    );

    run_frames(&mounted, &scheduler, &clock, 120);

    let platform = WebPlatform::default();
    let mut hover = HoverTracker::new();
    hover.set_track_bounds(Rect::new(0.0, 0.0, width, VIEWPORT_HEIGHT));
    let mut deliver = |kind: PointerEventKind, y: f64| {
        let event = platform.pointer_event(kind, PointerTarget::Outside, 200.0, y);
        match hover.on_event(&event) {
            Some(HoverTransition::Entered) => mounted.pointer_enter(),
            Some(HoverTransition::Left) => mounted.pointer_leave(),
            None => false,
        }
    };

    deliver(PointerEventKind::Move, 100.0);
    run_frames(&mounted, &scheduler, &clock, 90);
    println!("hovered: velocity {:.2}px/s", mounted.state().velocity());

    deliver(PointerEventKind::Move, 400.0);
    run_frames(&mounted, &scheduler, &clock, 90);
    println!("released: velocity {:.2}px/s", mounted.state().velocity());

    mounted.with_host_mut(|host| host.resize(Size::new(width * 2.0, VIEWPORT_HEIGHT)));
    mounted.notify_resize();
    run_frames(&mounted, &scheduler, &clock, 1);
    println!(
        "after resize to {}px: {} copies",
        width * 2.0,
        mounted.state().copy_count()
    );

    let (html, writes, transform) = mounted.with_host(|host| {
        let html = host
            .tree()
            .map(|tree| HtmlRenderer::new().render_tree(tree))
            .unwrap_or_default();
        (html, host.transform_writes(), host.last_transform())
    });
    let stats = mounted.state().stats();
    println!(
        "{} frames, {} transform writes on the host, last transform {}",
        stats.frames,
        writes,
        transform.map(|t| t.to_css()).unwrap_or_else(|| "none".to_string())
    );

    mounted.unmount();
    debug_assert!(!mounted.with_host(|host| host.is_observing()));
    println!("{}", html);
    Ok(())
}
