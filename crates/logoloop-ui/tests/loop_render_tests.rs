//! Rendered structure and accessibility of a mounted loop.

use logoloop_render_html::HtmlRenderer;
use logoloop_testing::{
    has_label, has_text, is_link_to, is_list, is_list_item, FakeHost, LoopTestRule,
};
use logoloop_ui::{
    Element, ImageItem, LogoLoop, LoopConfig, LoopItem, NodeItem, RenderNode, SemanticsRole,
};

fn partner_logos() -> Vec<LoopItem> {
    vec![
        ImageItem::new("/logos/acme.svg")
            .alt("Acme")
            .href("https://acme.example")
            .into(),
        ImageItem::new("/logos/globex.svg")
            .alt("Globex")
            .title("Globex Corporation")
            .href("https://globex.example")
            .into(),
        ImageItem::new("/logos/initech.svg")
            .alt("Initech")
            .aria_label("Initech home")
            .title("Initech")
            .href("https://initech.example")
            .into(),
        ImageItem::new("/logos/blank.svg")
            .href("https://blank.example")
            .into(),
        NodeItem::new(RenderNode::text("Umbrella")).into(),
    ]
}

fn mounted_rule(widget: LogoLoop) -> LoopTestRule {
    let host = FakeHost::new(1000.0, 48.0).with_item_extent(100.0);
    let mut rule = LoopTestRule::new(host);
    rule.set_content(widget);
    rule
}

#[test]
fn test_only_first_copy_is_accessible() {
    let rule = mounted_rule(LogoLoop::new(LoopConfig::default(), partner_logos()).unwrap());
    let copies = rule.state().copy_count();
    assert!(copies > 2);

    assert_eq!(rule.count_nodes(&is_list()), 1);
    assert_eq!(rule.count_nodes(&is_list_item()), 5);

    let tree = rule.host().tree().expect("rendered");
    let hidden = tree.copies().iter().filter(|copy| copy.is_aria_hidden()).count();
    assert_eq!(hidden, copies - 1);
}

#[test]
fn test_region_label() {
    let rule = mounted_rule(
        LogoLoop::new(
            LoopConfig::new().aria_label("Technologies I use"),
            partner_logos(),
        )
        .unwrap(),
    );
    let root = rule.semantics().expect("semantics");
    assert_eq!(root.role, SemanticsRole::Region);
    assert_eq!(root.label.as_deref(), Some("Technologies I use"));
}

#[test]
fn test_link_label_precedence() {
    let rule = mounted_rule(LogoLoop::new(LoopConfig::default(), partner_logos()).unwrap());

    let label_of = |href: &str| {
        rule.find_node(&is_link_to(href))
            .and_then(|node| node.label)
            .unwrap_or_else(|| panic!("no link to {}", href))
    };
    assert_eq!(label_of("https://acme.example"), "Acme");
    assert_eq!(label_of("https://globex.example"), "Globex Corporation");
    assert_eq!(label_of("https://initech.example"), "Initech home");
    assert_eq!(label_of("https://blank.example"), "logo link");
    rule.assert_exists(has_text("Umbrella"));
}

#[test]
fn test_links_open_externally() {
    let rule = mounted_rule(LogoLoop::new(LoopConfig::default(), partner_logos()).unwrap());
    let tree = rule.host().tree().expect("rendered");
    let links: Vec<_> = tree
        .root()
        .descendants()
        .into_iter()
        .filter(|element| element.tag == "a")
        .collect();
    assert_eq!(links.len(), 4 * tree.copy_count());
    for link in links {
        assert!(link.has_class("logoloop__link"));
        assert_eq!(link.attribute("target"), Some("_blank"));
        assert_eq!(link.attribute("rel"), Some("noreferrer noopener"));
    }
}

#[test]
fn test_custom_renderer_output_is_wrapped() {
    let widget = LogoLoop::new(LoopConfig::default(), partner_logos())
        .unwrap()
        .with_renderer(|item, _key| {
            Element::new("div")
                .class("skill-card")
                .child(RenderNode::text(item.accessible_label()))
                .into()
        });
    let rule = mounted_rule(widget);

    let tree = rule.host().tree().expect("rendered");
    for copy in tree.copies() {
        assert_eq!(copy.child_elements().count(), 5);
        for item in copy.child_elements() {
            assert_eq!(item.tag, "li");
            assert!(item.has_class("logoloop__item"));
            assert_eq!(item.attribute("role"), Some("listitem"));
            let mut children = item.child_elements();
            assert!(children.next().expect("card").has_class("skill-card"));
            assert!(children.next().is_none());
        }
    }
    rule.assert_exists(has_text("Initech home"));
    assert!(rule.find_node(&has_label("Acme")).is_none());
}

#[test]
fn test_html_output() {
    let widget = LogoLoop::new(
        LoopConfig::new().gap(20.0),
        vec![ImageItem::new("/a.svg").alt("A & B").into()],
    )
    .unwrap();
    let tree = widget.compose(2);
    let html = HtmlRenderer::new().render_tree(&tree);

    assert_eq!(
        html,
        concat!(
            "<div class=\"logoloop logoloop--horizontal\" role=\"region\" ",
            "aria-label=\"Partner logos\" ",
            "style=\"width: 100%; --logoloop-gap: 20px; --logoloop-logoHeight: 48px\">",
            "<div class=\"logoloop__track\" style=\"transform: translate3d(0px, 0, 0)\">",
            "<ul class=\"logoloop__list\" role=\"list\">",
            "<li class=\"logoloop__item\" role=\"listitem\">",
            "<img src=\"/a.svg\" alt=\"A &amp; B\" loading=\"lazy\" decoding=\"async\" ",
            "draggable=\"false\"></li></ul>",
            "<ul class=\"logoloop__list\" role=\"list\" aria-hidden=\"true\">",
            "<li class=\"logoloop__item\" role=\"listitem\">",
            "<img src=\"/a.svg\" alt=\"A &amp; B\" loading=\"lazy\" decoding=\"async\" ",
            "draggable=\"false\"></li></ul>",
            "</div></div>"
        )
    );
}

#[test]
fn test_rerender_on_copy_count_change_only() {
    let mut rule = mounted_rule(LogoLoop::new(LoopConfig::default(), partner_logos()).unwrap());
    // Initial render plus the re-render for the measured copy count.
    assert_eq!(rule.host().render_count(), 2);

    rule.advance_frames(60);
    assert_eq!(rule.host().render_count(), 2);

    rule.resize(4000.0, 48.0);
    rule.advance_frames(1);
    assert_eq!(rule.host().render_count(), 3);
}

#[test]
fn test_will_change_hint() {
    let rule = mounted_rule(LogoLoop::new(LoopConfig::default(), partner_logos()).unwrap());
    assert_eq!(rule.host().will_change().as_deref(), Some("transform"));
}
