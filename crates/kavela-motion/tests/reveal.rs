use anyhow::{Context, Result};
use kavela_dom::markers::{HIDDEN_CLASS, REVEAL_GROUP, REVEAL_ITEM, VISIBLE_CLASS};
use kavela_dom::{Document, Element, NodeId};
use kavela_motion::{
    GroupState, Page, PageOptions, Presentation, RevealConfig, RevealController, RevealEvent,
    discover_groups,
};

struct Fixture {
    page: Page,
    group: NodeId,
    items: Vec<NodeId>,
}

fn block(height: u32) -> Element {
    Element::new("div").with_attr("style", format!("height: {height}px"))
}

/// A 1000px spacer, then a 300px group holding `items` 50px items, then a
/// tall tail so the group can be scrolled through.
fn fixture(items: usize) -> Result<Fixture> {
    let mut doc = Document::default();
    let body = doc.root();
    doc.append(body, block(1000))?;
    let group = doc.append(body, block(300).with_attr(REVEAL_GROUP, ""))?;
    let items = (0..items)
        .map(|_| doc.append(group, block(50).with_attr(REVEAL_ITEM, "")))
        .collect::<Result<Vec<_>, _>>()?;
    doc.append(body, block(2000))?;
    let page = Page::new(
        doc,
        PageOptions {
            viewport_width: 800.0,
            viewport_height: 600.0,
            ..PageOptions::default()
        },
    )?;
    Ok(Fixture { page, group, items })
}

fn is_visible(page: &Page, node: NodeId) -> bool {
    page.document()
        .get(node)
        .is_some_and(|el| el.has_class(VISIBLE_CLASS) && !el.has_class(HIDDEN_CLASS))
}

fn is_hidden(page: &Page, node: NodeId) -> bool {
    page.document()
        .get(node)
        .is_some_and(|el| el.has_class(HIDDEN_CLASS) && !el.has_class(VISIBLE_CLASS))
}

#[test]
fn items_start_hidden_until_group_enters_viewport() -> Result<()> {
    let mut fx = fixture(3)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());

    assert!(fx.items.iter().all(|&item| is_hidden(&fx.page, item)));
    assert_eq!(
        fx.page.presentation(fx.items[0]),
        Some(Presentation::hidden(24.0))
    );
    fx.page.advance(1_000.0);
    assert!(fx.items.iter().all(|&item| is_hidden(&fx.page, item)));
    assert!(controller.is_observing());
    assert_eq!(fx.page.observed_target_count(), 1);
    Ok(())
}

#[test]
fn staggers_items_by_index() -> Result<()> {
    let mut fx = fixture(3)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());

    // Viewport 600..1200 shrunk by the -10% bottom margin to 600..1140.
    fx.page.scroll_to(600.0);
    assert!(is_visible(&fx.page, fx.items[0]));
    assert!(is_hidden(&fx.page, fx.items[1]));
    assert!(is_hidden(&fx.page, fx.items[2]));

    fx.page.advance(109.0);
    assert!(is_hidden(&fx.page, fx.items[1]));
    fx.page.advance(1.0);
    assert!(is_visible(&fx.page, fx.items[1]));
    assert!(is_hidden(&fx.page, fx.items[2]));
    fx.page.advance(110.0);
    assert!(is_visible(&fx.page, fx.items[2]));

    let revealed: Vec<(usize, f64)> = controller
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            RevealEvent::ItemRevealed { index, at_ms, .. } => Some((index, at_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(revealed, vec![(0, 0.0), (1, 110.0), (2, 220.0)]);
    assert!(controller.is_idle());
    Ok(())
}

#[test]
fn schedule_is_recorded_at_trigger() -> Result<()> {
    let mut fx = fixture(3)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());
    fx.page.advance(50.0);
    fx.page.scroll_to(600.0);

    let events = controller.drain_events();
    assert_eq!(
        events[0],
        RevealEvent::GroupTriggered {
            group: 0,
            node: fx.group,
            at_ms: 50.0
        }
    );
    let starts: Vec<f64> = events
        .iter()
        .filter_map(|event| match event {
            RevealEvent::ItemScheduled { start_ms, .. } => Some(*start_ms),
            _ => None,
        })
        .collect();
    assert_eq!(starts, vec![50.0, 160.0, 270.0]);
    assert!(controller.drain_events().is_empty());
    Ok(())
}

#[test]
fn below_threshold_does_not_trigger() -> Result<()> {
    let mut fx = fixture(2)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());

    // 30px of the 300px group inside the root: ratio 0.1 < 0.15.
    fx.page.scroll_to(490.0);
    assert_eq!(controller.groups()[0].state, GroupState::Pending);
    fx.page.scroll_to(600.0);
    assert_eq!(controller.groups()[0].state, GroupState::Triggered);
    Ok(())
}

#[test]
fn group_taller_than_viewport_still_triggers() -> Result<()> {
    let mut doc = Document::default();
    let body = doc.root();
    doc.append(body, block(1000))?;
    let group = doc.append(body, block(6000).with_attr(REVEAL_GROUP, ""))?;
    let item = doc.append(group, block(50).with_attr(REVEAL_ITEM, ""))?;
    doc.append(body, block(200))?;
    let mut page = Page::new(doc, PageOptions::default())?;
    let controller = RevealController::mount(&mut page, None, RevealConfig::default());

    while page.scroll_y() < page.max_scroll() {
        page.scroll_by(100.0);
        page.advance(16.0);
    }
    page.advance(1_000.0);

    let groups = controller.groups();
    assert!(groups[0].is_triggered());
    assert_eq!(groups[0].node, group);
    assert!(is_visible(&page, item));
    Ok(())
}

#[test]
fn group_triggers_at_most_once() -> Result<()> {
    let mut fx = fixture(2)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());

    fx.page.scroll_to(600.0);
    fx.page.advance(500.0);
    fx.page.scroll_to(0.0);
    fx.page.scroll_to(700.0);
    fx.page.advance(500.0);

    let triggers = controller
        .drain_events()
        .iter()
        .filter(|event| matches!(event, RevealEvent::GroupTriggered { .. }))
        .count();
    assert_eq!(triggers, 1);
    assert_eq!(fx.page.observer_count(), 0);
    assert_eq!(fx.page.observed_target_count(), 0);
    assert!(fx.items.iter().all(|&item| is_visible(&fx.page, item)));
    Ok(())
}

#[test]
fn unmount_cancels_pending_reveals() -> Result<()> {
    let mut fx = fixture(3)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());
    fx.page.scroll_to(600.0);
    assert_eq!(fx.page.pending_timer_count(), 2);

    controller.unmount();
    assert_eq!(fx.page.pending_timer_count(), 0);
    assert_eq!(fx.page.observer_count(), 0);

    fx.page.advance(1_000.0);
    assert!(is_visible(&fx.page, fx.items[0]));
    assert!(is_hidden(&fx.page, fx.items[1]));
    assert!(is_hidden(&fx.page, fx.items[2]));
    Ok(())
}

#[test]
fn dropping_before_trigger_releases_everything() -> Result<()> {
    let mut fx = fixture(2)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());
    assert_eq!(fx.page.observer_count(), 1);
    drop(controller);
    assert_eq!(fx.page.observer_count(), 0);

    fx.page.scroll_to(600.0);
    fx.page.advance(500.0);
    assert!(fx.items.iter().all(|&item| is_hidden(&fx.page, item)));
    Ok(())
}

#[test]
fn zero_item_group_triggers_and_releases() -> Result<()> {
    let mut fx = fixture(0)?;
    let controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());
    fx.page.scroll_to(600.0);

    let events = controller.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], RevealEvent::GroupTriggered { .. }));
    assert!(controller.is_idle());
    assert_eq!(fx.page.observer_count(), 0);
    Ok(())
}

#[test]
fn page_without_groups_stays_idle() -> Result<()> {
    let mut doc = Document::default();
    doc.append(doc.root(), block(2000).with_attr(REVEAL_ITEM, ""))?;
    let mut page = Page::new(doc, PageOptions::default())?;
    let controller = RevealController::mount(&mut page, None, RevealConfig::default());

    assert!(controller.groups().is_empty());
    assert!(controller.is_idle());
    assert_eq!(page.observer_count(), 0);
    assert_eq!(page.pending_timer_count(), 0);
    Ok(())
}

#[test]
fn zero_stagger_reveals_together() -> Result<()> {
    let mut fx = fixture(3)?;
    let config = RevealConfig {
        stagger_ms: 0,
        ..RevealConfig::default()
    };
    let controller = RevealController::mount(&mut fx.page, None, config);
    fx.page.scroll_to(600.0);
    assert!(fx.items.iter().all(|&item| is_visible(&fx.page, item)));
    assert_eq!(fx.page.pending_timer_count(), 0);
    assert!(controller.is_idle());
    Ok(())
}

#[test]
fn revealed_items_fade_in() -> Result<()> {
    let mut fx = fixture(1)?;
    let _controller = RevealController::mount(&mut fx.page, None, RevealConfig::default());
    fx.page.scroll_to(600.0);

    let start = fx.page.presentation(fx.items[0]).context("item presentation")?;
    assert_eq!(start.opacity, 0.0);
    fx.page.advance(300.0);
    let mid = fx.page.presentation(fx.items[0]).context("item presentation")?;
    assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
    assert!(mid.translate_y > 0.0 && mid.translate_y < 24.0);
    fx.page.advance(300.0);
    assert_eq!(fx.page.presentation(fx.items[0]), Some(Presentation::SHOWN));
    Ok(())
}

#[test]
fn nested_groups_keep_their_own_items() -> Result<()> {
    let mut doc = Document::default();
    let outer = doc.append(doc.root(), Element::new("section").with_attr(REVEAL_GROUP, ""))?;
    let first = doc.append(outer, Element::new("h2").with_attr(REVEAL_ITEM, ""))?;
    let inner = doc.append(
        outer,
        Element::new("div")
            .with_attr(REVEAL_GROUP, "")
            .with_attr(REVEAL_ITEM, ""),
    )?;
    let inner_item = doc.append(inner, Element::new("p").with_attr(REVEAL_ITEM, ""))?;
    let wrapper = doc.append(outer, Element::new("div"))?;
    let last = doc.append(wrapper, Element::new("p").with_attr(REVEAL_ITEM, ""))?;

    let groups = discover_groups(&doc, doc.root());
    assert_eq!(groups.len(), 2);
    let outer_items: Vec<(NodeId, usize)> =
        groups[0].items.iter().map(|i| (i.node, i.index)).collect();
    assert_eq!(outer_items, vec![(first, 0), (inner, 1), (last, 2)]);
    assert_eq!(groups[1].node, inner);
    assert_eq!(groups[1].items.len(), 1);
    assert_eq!(groups[1].items[0].node, inner_item);
    assert_eq!(groups[1].items[0].index, 0);
    Ok(())
}

#[test]
fn on_screen_groups_reveal_at_mount() -> Result<()> {
    let mut doc = Document::default();
    let group = doc.append(doc.root(), block(300).with_attr(REVEAL_GROUP, ""))?;
    let items = (0..3)
        .map(|_| doc.append(group, block(50).with_attr(REVEAL_ITEM, "")))
        .collect::<Result<Vec<_>, _>>()?;
    doc.append(doc.root(), block(2000))?;

    let mut staggered = Page::new(doc.clone(), PageOptions::default())?;
    let _default = RevealController::mount(&mut staggered, None, RevealConfig::default());
    assert!(is_visible(&staggered, items[0]));
    assert!(is_hidden(&staggered, items[2]));

    let mut instant = Page::new(doc, PageOptions::default())?;
    let config = RevealConfig {
        instant_above_fold: true,
        ..RevealConfig::default()
    };
    let controller = RevealController::mount(&mut instant, None, config);
    assert!(items.iter().all(|&item| is_visible(&instant, item)));
    assert!(controller.is_idle());
    assert_eq!(instant.observer_count(), 0);
    Ok(())
}

#[test]
fn scope_limits_discovery() -> Result<()> {
    let mut doc = Document::default();
    let main = doc.append(doc.root(), Element::new("main"))?;
    doc.append(main, block(100).with_attr(REVEAL_GROUP, ""))?;
    doc.append(doc.root(), block(100).with_attr(REVEAL_GROUP, ""))?;
    let mut page = Page::new(doc, PageOptions::default())?;

    let controller = RevealController::mount(&mut page, Some(main), RevealConfig::default());
    assert_eq!(controller.groups().len(), 1);
    Ok(())
}
