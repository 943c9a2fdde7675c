use super::*;

use std::time::Duration;

use casement_common::{keycode, CasementError, Event, EventKind, Rect, UnitSize, WindowKind};
use casement_config::MetricsConfig;
use casement_tiling::arrangement::method;
use casement_tiling::LayoutEngine;

use crate::controller::{Input, InputWatch, LineBuffer};
use crate::display::RenderOp;
use crate::testing::Rig;

// =============================================================================
// HELPERS
// =============================================================================

const BUFFER: u32 = 3;
const GRID: u32 = 4;
const GRAPHICS: u32 = 5;

fn open_root(rig: &mut Rig, kind: u32) -> WindowId {
    rig.session.open_window(None, 0, 0, kind, 7).unwrap()
}

// =============================================================================
// WINDOW TREE
// =============================================================================

#[test]
fn second_root_is_refused() {
    let mut rig = Rig::new();
    let root = open_root(&mut rig, BUFFER);
    assert_eq!(rig.session.open_window(None, 0, 0, BUFFER, 0), None);
    assert_eq!(rig.session.get_root(), Some(root));
    assert_eq!(rig.session.get_rock(root), Some(7));
}

#[test]
fn unknown_kind_and_pair_kind_are_refused() {
    let mut rig = Rig::new();
    assert_eq!(rig.session.open_window(None, 0, 0, 99, 0), None);
    assert_eq!(rig.session.open_window(None, 0, 0, 1, 0), None);
    assert!(rig.session.tree().is_empty());
}

#[test]
fn status_line_above_story() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let status = rig
        .session
        .open_window(Some(story), method::ABOVE | method::FIXED, 1, GRID, 2)
        .unwrap();

    let pair = rig.session.get_parent(status).unwrap();
    assert_eq!(rig.session.get_root(), Some(pair));
    assert_eq!(rig.session.get_parent(story), Some(pair));
    assert_eq!(rig.session.get_sibling(status), Some(story));
    assert_eq!(rig.session.get_type(pair), Some(WindowKind::Pair));
    assert_eq!(
        rig.session.get_arrangement(pair),
        Some((method::ABOVE, 1, Some(status)))
    );

    // One 16px grid row, a border, the rest to the story.
    assert_eq!(rig.session.get_size(status), Some((100, 1)));
    rig.session.flush().unwrap();
    assert_eq!(
        rig.log.placement(status),
        Some(Rect::new(0.0, 0.0, 800.0, 16.0))
    );
    assert_eq!(
        rig.log.placement(story),
        Some(Rect::new(0.0, 17.0, 800.0, 583.0))
    );
}

#[test]
fn split_of_unknown_window_fails_cleanly() {
    let mut rig = Rig::new();
    let root = open_root(&mut rig, BUFFER);
    rig.session.close_window(root);
    assert_eq!(rig.session.open_window(Some(root), 0, 0, GRID, 0), None);
    // The method is ignored when opening a root.
    assert!(rig.session.open_window(None, 0x40, 0, GRID, 0).is_some());
}

#[test]
fn closing_collapses_the_pair() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let status = rig
        .session
        .open_window(Some(story), method::ABOVE | method::FIXED, 1, GRID, 0)
        .unwrap();
    let pair = rig.session.get_parent(status).unwrap();

    assert!(rig.session.close_window(status));
    assert_eq!(rig.session.get_root(), Some(story));
    assert_eq!(rig.session.get_parent(story), None);
    assert_eq!(rig.session.get_type(pair), None);
    assert!(!rig.session.put_text(status, "gone"));
    assert!(!rig.session.close_window(status));

    rig.session.flush().unwrap();
    assert!(rig.log.ops().contains(&RenderOp::Remove(status)));
    assert_eq!(
        rig.log.placement(story),
        Some(Rect::new(0.0, 0.0, 800.0, 600.0))
    );
    assert_eq!(rig.session.get_size(story), Some((100, 37)));
}

#[test]
fn closing_a_key_resets_the_ancestor() {
    let mut rig = Rig::new();
    let a = open_root(&mut rig, BUFFER);
    let b = rig
        .session
        .open_window(Some(a), method::LEFT | method::FIXED, 10, GRID, 0)
        .unwrap();
    let outer = rig.session.get_parent(b).unwrap();
    let c = rig
        .session
        .open_window(Some(b), method::BELOW | method::FIXED, 2, GRID, 0)
        .unwrap();

    assert!(rig.session.close_window(c));
    assert_eq!(rig.session.get_parent(b), Some(outer));
    assert_eq!(rig.session.get_arrangement(outer).unwrap().2, Some(b));

    assert!(rig.session.close_window(b));
    assert_eq!(rig.session.get_root(), Some(a));
    rig.session.flush().unwrap();
    assert_eq!(rig.session.tree().check_invariants(), Ok(()));
}

#[test]
fn rearrange_validates_key_and_method() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let side = rig
        .session
        .open_window(Some(story), method::RIGHT | method::PROPORTIONAL, 30, GRAPHICS, 0)
        .unwrap();
    let pair = rig.session.get_parent(side).unwrap();

    assert!(!rig.session.set_arrangement(pair, 0x80, 1, None));
    assert!(!rig.session.set_arrangement(story, method::LEFT, 1, None));
    assert!(!rig.session.set_arrangement(pair, method::LEFT, 1, Some(pair)));

    assert!(rig.session.set_arrangement(pair, method::LEFT | method::PROPORTIONAL, 150, Some(story)));
    assert_eq!(
        rig.session.get_arrangement(pair),
        Some((method::LEFT | method::PROPORTIONAL, 100, Some(story)))
    );
    assert_eq!(rig.session.tree().pair(pair).unwrap().first, story);

    rig.session.flush().unwrap();
    assert_eq!(
        rig.log.placement(story),
        Some(Rect::new(0.0, 0.0, 799.0, 600.0))
    );
}

#[test]
fn iteration_visits_every_window() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    rig.session
        .open_window(Some(story), method::BELOW | method::FIXED, 3, GRID, 9)
        .unwrap();

    let mut seen = Vec::new();
    let mut cursor = None;
    while let Some((window, rock)) = rig.session.iterate_windows(cursor) {
        seen.push((window, rock));
        cursor = Some(window);
    }
    assert_eq!(seen.len(), 3);
    assert!(seen.contains(&(story, 7)));
}

#[test]
fn incremental_layout_matches_whole_tree_layout() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let status = rig
        .session
        .open_window(Some(story), method::ABOVE | method::FIXED, 2, GRID, 2)
        .unwrap();
    let map = rig
        .session
        .open_window(Some(story), method::RIGHT | method::PROPORTIONAL, 30, GRAPHICS, 3)
        .unwrap();
    let aside = rig
        .session
        .open_window(Some(map), method::BELOW | method::FIXED, 40, BUFFER, 4)
        .unwrap();
    assert!(rig.session.close_window(status));
    rig.session.flush().unwrap();

    let metrics = MetricsConfig::default();
    let reference = LayoutEngine::default().compute_tree(
        rig.session.tree(),
        Rect::new(0.0, 0.0, 800.0, 600.0),
        |kind| match kind {
            WindowKind::TextGrid => metrics.grid.into(),
            WindowKind::TextBuffer => metrics.buffer.into(),
            _ => UnitSize::PIXEL,
        },
    );
    assert_eq!(reference.windows.len(), rig.session.tree().len());
    for (window, rect) in &reference.windows {
        let controller = rig.session.tree().controller(*window).unwrap();
        assert_eq!(controller.bounds(), Some(*rect), "window {window}");
    }
    for leaf in [story, map, aside] {
        assert_eq!(rig.log.placement(leaf), reference.rect_of(leaf));
    }
}

// =============================================================================
// INPUT
// =============================================================================

#[test]
fn line_input_round_trip() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let buffer = LineBuffer::with_text("go ");
    assert!(rig.session.request_line_event(story, buffer.clone(), 20));
    rig.session.flush().unwrap();
    assert!(rig.log.is_watching(story));

    rig.user(|display| {
        display.deliver_text("go north");
    });
    let event = rig.session.select().unwrap();
    assert_eq!(event, Event::line_input(story, 8, keycode::RETURN));
    assert_eq!(buffer.contents(), "go north");
}

#[test]
fn cancelled_line_reports_what_was_typed() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let buffer = LineBuffer::new();
    rig.session.request_line_event(story, buffer.clone(), 20);
    rig.session.flush().unwrap();

    rig.log.set_partial(story, "op");
    assert!(rig.session.cancel_line_event(story));
    assert!(!rig.session.cancel_line_event(story));
    let event = rig.session.select().unwrap();
    assert_eq!(event, Event::line_input(story, 2, 0));
    assert_eq!(buffer.contents(), "op");
}

#[test]
fn requests_respect_window_kind() {
    let mut rig = Rig::new();
    let picture = open_root(&mut rig, GRAPHICS);
    assert!(!rig.session.request_char_event(picture));
    assert!(!rig.session.request_line_event(picture, LineBuffer::new(), 10));
    assert!(rig.session.request_mouse_event(picture));
    assert!(!rig.session.request_mouse_event(picture));

    let story = rig
        .session
        .open_window(Some(picture), method::BELOW | method::FIXED, 4, BUFFER, 0)
        .unwrap();
    assert!(!rig.session.request_mouse_event(story));
    assert!(rig.session.request_char_event(story));
    assert!(!rig.session.cancel_mouse_event(story));
    assert!(rig.session.cancel_char_event(story));
}

#[test]
fn custom_terminators_end_lines() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    assert!(rig.session.set_terminators(story, &[keycode::ESCAPE, 'x' as u32]));
    assert_eq!(rig.session.line_options(story).terminators, vec![keycode::ESCAPE]);
    assert!(rig.session.set_echo_line_event(story, false));
    assert!(!rig.session.line_options(story).echo);

    let buffer = LineBuffer::new();
    rig.session.request_line_event(story, buffer.clone(), 20);
    rig.session.flush().unwrap();
    rig.user(move |display| {
        let refused = display.deliver(
            story,
            Input::Line {
                text: "wait".into(),
                terminator: keycode::FUNC1,
            },
        );
        assert!(!refused);
        display.deliver(
            story,
            Input::Line {
                text: "wait".into(),
                terminator: keycode::ESCAPE,
            },
        );
    });
    let event = rig.session.select().unwrap();
    assert_eq!(event.val2, keycode::ESCAPE);
    let echo = rig.log.ops().iter().find_map(|op| match op {
        RenderOp::Watch(w, InputWatch::Line { echo, .. }) if *w == story => Some(*echo),
        _ => None,
    });
    assert_eq!(echo, Some(false));
}

#[test]
fn closing_a_window_drops_its_pending_request_silently() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let status = rig
        .session
        .open_window(Some(story), method::ABOVE | method::FIXED, 1, GRID, 0)
        .unwrap();
    rig.session.request_line_event(status, LineBuffer::new(), 10);
    rig.session.close_window(status);
    rig.session.flush().unwrap();
    assert!(!rig.log.is_watching(status));
    assert_eq!(rig.session.select_poll(), None);
    assert!(rig.session.display().surface().events().is_empty());
}

// =============================================================================
// EVENTS AND LIFETIME
// =============================================================================

#[test]
fn timer_interval_is_clamped_and_stoppable() {
    let mut rig = Rig::new();
    rig.session.request_timer_events(1);
    assert_eq!(rig.session.timer_interval(), Some(Duration::from_millis(10)));
    assert_eq!(rig.session.select().unwrap().kind, EventKind::Timer);

    rig.session.request_timer_events(0);
    assert_eq!(rig.session.timer_interval(), None);
}

#[test]
fn select_notices_an_interrupt_without_a_sentinel() {
    let rig = Rig::new();
    let events = Arc::clone(rig.session.display().surface().events());
    let interrupter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        events.interrupt();
    });
    assert!(matches!(rig.session.select(), Err(CasementError::Interrupted)));
    interrupter.join().unwrap();
    assert!(rig.session.display().surface().events().is_empty());
}

#[test]
fn resize_is_seen_by_poll() {
    let mut rig = Rig::new();
    open_root(&mut rig, GRID);
    rig.user(|display| display.resize(400, 160));
    assert_eq!(
        rig.session.select_poll().map(|e| e.kind),
        Some(EventKind::Arrange)
    );
    assert_eq!(rig.session.get_size(rig.session.get_root().unwrap()), Some((50, 10)));
}

#[test]
fn select_reports_interruption() {
    let rig = Rig::new();
    rig.user(Display::shutdown);
    assert!(matches!(rig.session.select(), Err(CasementError::Interrupted)));
    assert!(matches!(rig.session.select(), Err(CasementError::Interrupted)));
}

#[test]
fn finish_releases_every_window() {
    let mut rig = Rig::new();
    let story = open_root(&mut rig, BUFFER);
    let status = rig
        .session
        .open_window(Some(story), method::ABOVE | method::FIXED, 1, GRID, 0)
        .unwrap();
    rig.session.request_timer_events(50);
    rig.session.finish();

    assert!(rig.session.tree().is_empty());
    assert_eq!(rig.session.timer_interval(), None);
    let removed = rig.log.count(|op| matches!(op, RenderOp::Remove(_)));
    assert_eq!(removed, 2);
    assert!(rig.session.display().surface().controller(status).is_none());
    assert!(rig.session.display().root().is_none());
}

#[test]
fn version_is_exposed() {
    let rig = Rig::new();
    assert_eq!(rig.session.version(), casement_common::CAPABILITY_VERSION);
}
