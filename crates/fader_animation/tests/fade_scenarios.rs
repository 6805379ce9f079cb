//! End-to-end fade scenarios
//!
//! These tests drive the public call shapes against an in-memory document
//! and check:
//! - fades end in the right visibility state and call back exactly once
//! - fades on elements already in place are immediate no-ops
//! - replace never overlaps its two halves
//! - drift, waits and missing targets behave as documented

use fader_animation::{
    fade_in, fade_out, fade_replace, Animator, DirectionX, DirectionY, Document, ElementStyle,
    FadeController, FadeError, FadeHandle, FadeOptions, FadeStart, MissingTargetPolicy, RunPhase,
    VisibilityStrategy, Visibility, Zoom,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let count_clone = count.clone();
    (count, move || count_clone.set(count_clone.get() + 1))
}

fn animator_with(elements: &[(&str, ElementStyle)]) -> Animator {
    let mut doc = Document::new();
    for (id, style) in elements {
        doc.insert_with_id(*id, style.clone());
    }
    Animator::with_seed(doc, 2024)
}

fn style<'a>(animator: &'a Animator, id: &str) -> &'a ElementStyle {
    animator.tree().style_by_id(id).unwrap()
}

/// A 100ms fade-out in 20ms ticks hides the element and calls back once
///
/// Five steps bring opacity to zero at 100ms, but the threshold is only
/// checked before stepping, so the element hides on the sixth tick (120ms)
/// rather than the fifth.
#[test]
fn test_fade_out_short_scenario() {
    let mut animator = animator_with(&[("el", ElementStyle::default().with_display("block"))]);
    let (count, cb) = counter();

    let start = fade_out(
        &mut animator,
        "el",
        cb,
        &FadeOptions::new().fade(100).tick(20),
    );
    assert!(start.is_running());

    // Five opacity steps bring it to zero
    animator.advance(100);
    assert!(style(&animator, "el").opacity.abs() < 1e-6);
    assert_eq!(count.get(), 0);

    // The next tick observes the threshold and hides
    animator.advance(20);
    assert!(style(&animator, "el").is_display_none());
    assert_eq!(count.get(), 1);

    animator.advance(1_000);
    assert_eq!(count.get(), 1);
}

/// Fade-in shows the element with the configured display right away
#[test]
fn test_fade_in_flex_scenario() {
    let mut animator = animator_with(&[("el", ElementStyle::display_none())]);
    let (count, cb) = counter();

    fade_in(&mut animator, "el", cb, &FadeOptions::new().display("flex"));

    assert_eq!(style(&animator, "el").display, "flex");
    assert_eq!(style(&animator, "el").opacity, 0.0);

    animator.advance(120);
    let mid = style(&animator, "el").opacity;
    assert!(mid > 0.4 && mid < 0.6, "opacity halfway was {mid}");

    // 13 steps of 0.08, then one more tick to notice
    animator.advance(140);
    assert_eq!(count.get(), 0);
    animator.advance(20);
    assert_eq!(count.get(), 1);
    assert!(style(&animator, "el").opacity >= 1.0);
    assert_eq!(style(&animator, "el").display, "flex");
}

/// Fade-out eventually hides under either strategy
#[test]
fn test_fade_out_hides_under_each_strategy() {
    for strategy in [VisibilityStrategy::Display, VisibilityStrategy::Visibility] {
        let mut animator = animator_with(&[("el", ElementStyle::default())]);
        let (count, cb) = counter();

        fade_out(&mut animator, "el", cb, &FadeOptions::new().strategy(strategy));
        animator.run_until_idle(10_000);

        assert!(strategy.is_hidden(style(&animator, "el")));
        assert_eq!(count.get(), 1);
    }

    // Visibility strategy leaves display alone
    let mut animator = animator_with(&[("el", ElementStyle::default())]);
    fade_out(
        &mut animator,
        "el",
        || {},
        &FadeOptions::new().strategy(VisibilityStrategy::Visibility),
    );
    animator.run_until_idle(10_000);
    assert_eq!(style(&animator, "el").display, "block");
    assert_eq!(style(&animator, "el").visibility, Visibility::Hidden);
}

/// Fade-in under the visibility strategy unhides in place, then ramps
#[test]
fn test_fade_in_visibility_strategy() {
    let mut animator = animator_with(&[("el", ElementStyle::visibility_hidden())]);
    let (count, cb) = counter();

    let start = fade_in(
        &mut animator,
        "el",
        cb,
        &FadeOptions::new().strategy(VisibilityStrategy::Visibility),
    );
    assert!(start.is_running());

    // Visible before the first tick, display untouched
    assert_eq!(style(&animator, "el").visibility, Visibility::Visible);
    assert_eq!(style(&animator, "el").opacity, 0.0);
    assert_eq!(style(&animator, "el").display, "block");

    assert_eq!(animator.run_until_idle(10_000), 280);
    assert_eq!(count.get(), 1);
    assert!(style(&animator, "el").opacity >= 1.0);
    assert_eq!(style(&animator, "el").visibility, Visibility::Visible);
}

/// Fading out a hidden element is an immediate no-op
#[test]
fn test_fade_out_already_hidden_is_noop() {
    let hidden = ElementStyle::display_none().with_opacity(0.3);
    let mut animator = animator_with(&[("el", hidden.clone())]);
    let (count, cb) = counter();

    let start = fade_out(&mut animator, "el", cb, &FadeOptions::new());

    assert_eq!(start, FadeStart::Settled);
    assert_eq!(count.get(), 1);
    assert_eq!(style(&animator, "el"), &hidden);
    assert!(animator.is_idle());
}

/// Fading in a visible element is an immediate no-op
#[test]
fn test_fade_in_already_visible_is_noop() {
    let shown = ElementStyle::default().with_opacity(0.5);
    let mut animator = animator_with(&[("el", shown.clone())]);
    let (count, cb) = counter();

    let start = fade_in(&mut animator, "el", cb, &FadeOptions::new());

    assert_eq!(start, FadeStart::Settled);
    assert_eq!(count.get(), 1);
    assert_eq!(style(&animator, "el"), &shown);
}

/// Visibility strategy only looks at `visibility`
#[test]
fn test_visibility_strategy_ignores_display() {
    let mut animator = animator_with(&[("el", ElementStyle::display_none())]);
    let (count, cb) = counter();

    // Not hidden as far as the visibility strategy is concerned
    let start = fade_in(
        &mut animator,
        "el",
        cb,
        &FadeOptions::new().strategy(VisibilityStrategy::Visibility),
    );
    assert_eq!(start, FadeStart::Settled);
    assert_eq!(count.get(), 1);
}

/// Replace finishes the fade-out before the fade-in touches anything
#[test]
fn test_replace_is_sequential() {
    let mut animator = animator_with(&[
        ("a", ElementStyle::default()),
        ("b", ElementStyle::display_none().with_opacity(0.7)),
    ]);
    let order = Rc::new(RefCell::new(Vec::new()));
    let order_clone = order.clone();

    fade_replace(
        &mut animator,
        "a",
        "b",
        move || order_clone.borrow_mut().push("replaced"),
        &FadeOptions::new(),
    );

    // Step through the fade-out tick by tick
    let mut elapsed = 0;
    while !style(&animator, "a").is_display_none() {
        let b = style(&animator, "b");
        assert!(b.is_display_none());
        assert_eq!(b.opacity, 0.7);
        animator.advance(20);
        elapsed += 20;
        assert!(elapsed <= 280);
    }
    assert_eq!(elapsed, 280);

    // Fade-in starts from the fade-out's completion
    assert_eq!(style(&animator, "b").display, "block");
    assert_eq!(style(&animator, "b").opacity, 0.0);
    assert!(order.borrow().is_empty());

    animator.run_until_idle(10_000);
    assert_eq!(*order.borrow(), vec!["replaced"]);
    assert_eq!(animator.now_ms(), 560);
}

/// Replace waits once, before the fade-out
#[test]
fn test_replace_waits_once() {
    let mut animator = animator_with(&[
        ("a", ElementStyle::default()),
        ("b", ElementStyle::display_none()),
    ]);
    let (count, cb) = counter();

    let start = fade_replace(
        &mut animator,
        "a",
        "b",
        cb,
        &FadeOptions::new().wait(500).fade(100),
    );
    let run = start.run_id().unwrap();
    assert_eq!(animator.phase(run), RunPhase::Waiting);

    animator.advance(499);
    assert_eq!(style(&animator, "a").opacity, 1.0);
    assert_eq!(animator.phase(run), RunPhase::Waiting);

    // 500 wait + 120 out + 120 in
    assert_eq!(animator.run_until_idle(10_000), 241);
    assert_eq!(count.get(), 1);
    assert!(style(&animator, "a").is_display_none());
    assert_eq!(style(&animator, "b").display, "block");
}

/// Replace with an already hidden outgoing element goes straight to the fade-in
#[test]
fn test_replace_with_hidden_outgoing() {
    let mut animator = animator_with(&[
        ("a", ElementStyle::display_none()),
        ("b", ElementStyle::display_none()),
    ]);
    let (count, cb) = counter();

    fade_replace(&mut animator, "a", "b", cb, &FadeOptions::new().fade(100));
    assert_eq!(style(&animator, "b").display, "block");

    assert_eq!(animator.run_until_idle(10_000), 120);
    assert_eq!(count.get(), 1);
}

/// Fade-out then fade-in restores the original display value
#[test]
fn test_round_trip_restores_display() {
    let original = ElementStyle::default().with_display("block");
    let mut animator = animator_with(&[("el", original.clone())]);
    let (count, cb) = counter();
    let (count_in, cb_in) = counter();

    let mut fader = FadeController::new();
    fader.fade_out(&mut animator, "el", cb, None);
    animator.run_until_idle(10_000);
    assert!(style(&animator, "el").is_display_none());

    fader.fade_in(&mut animator, "el", cb_in, None);
    animator.run_until_idle(10_000);

    let after = style(&animator, "el");
    assert_eq!(after.display, original.display);
    assert_eq!(after.visibility, original.visibility);
    assert!(after.opacity >= 1.0 && after.opacity < 1.1);
    assert_eq!((count.get(), count_in.get()), (1, 1));
}

/// Left/down drift moves one pixel per opacity step, then resets
#[test]
fn test_drift_left_down() {
    let start = ElementStyle::default().with_position(0.0, 0.0);
    let mut animator = animator_with(&[("el", start)]);
    let (count, cb) = counter();

    fade_out(
        &mut animator,
        "el",
        cb,
        &FadeOptions::new()
            .direction_x(DirectionX::Left)
            .direction_y(DirectionY::Down),
    );

    // 250ms / 20ms takes 13 opacity steps
    animator.advance(13 * 20);
    assert_eq!(style(&animator, "el").left, -13.0);
    assert_eq!(style(&animator, "el").top, 13.0);
    assert_eq!(count.get(), 0);

    animator.advance(20);
    let done = style(&animator, "el");
    assert!(done.is_display_none());
    assert_eq!(done.left, 0.0);
    assert_eq!(done.top, 0.0);
    assert_eq!(done.scale, Some(1.0));
    assert_eq!(count.get(), 1);
}

/// Zoom grows the scale from identity
#[test]
fn test_zoom_in() {
    let mut animator = animator_with(&[("el", ElementStyle::default())]);

    fade_out(&mut animator, "el", || {}, &FadeOptions::new().fade(100).zoom(Zoom::In));
    animator.advance(100);
    assert!((style(&animator, "el").scale.unwrap() - 1.025).abs() < 1e-5);

    animator.advance(20);
    assert_eq!(style(&animator, "el").scale, Some(1.0));
}

/// Without drift options position and transform are left alone
#[test]
fn test_no_drift_keeps_position() {
    let placed = ElementStyle::default().with_position(40.0, 12.0);
    let mut animator = animator_with(&[("el", placed)]);

    fade_out(&mut animator, "el", || {}, &FadeOptions::new());
    animator.run_until_idle(10_000);

    let done = style(&animator, "el");
    assert_eq!((done.left, done.top), (40.0, 12.0));
    assert_eq!(done.scale, None);
}

/// Random drift is reproducible for a given seed
#[test]
fn test_random_drift_is_seeded() {
    let run = |seed| {
        let mut doc = Document::new();
        doc.insert_with_id("el", ElementStyle::default());
        let mut animator = Animator::with_seed(doc, seed);
        fade_out(
            &mut animator,
            "el",
            || {},
            &FadeOptions::new()
                .direction_x(DirectionX::Random)
                .direction_y(DirectionY::Random)
                .zoom(Zoom::Random),
        );
        animator.advance(100);
        let s = animator.tree().style_by_id("el").unwrap().clone();
        (s.left, s.top, s.scale)
    };

    assert_eq!(run(11), run(11));
}

/// A missing target is reported and never calls back
#[test]
fn test_missing_target() {
    let mut animator = animator_with(&[("el", ElementStyle::default())]);
    let (count, cb) = counter();

    let start = fade_out(&mut animator, "ghost", cb, &FadeOptions::new());

    assert_eq!(
        start,
        FadeStart::Rejected(FadeError::TargetNotFound("ghost".to_string()))
    );
    animator.run_until_idle(10_000);
    assert_eq!(count.get(), 0);
    assert!(animator.is_idle());
}

/// Missing targets can be configured to complete instead
#[test]
fn test_missing_target_complete_policy() {
    let mut animator = animator_with(&[("b", ElementStyle::display_none())]);
    let (count, cb) = counter();

    let start = fade_replace(
        &mut animator,
        "ghost",
        "b",
        cb,
        &FadeOptions::new().missing_target(MissingTargetPolicy::Complete),
    );
    assert!(start.is_rejected());

    // The fade-in still runs
    assert_eq!(style(&animator, "b").display, "block");
    animator.run_until_idle(10_000);
    assert_eq!(count.get(), 1);
}

/// The wait applies once per call, before the ramp
#[test]
fn test_wait_before_fade_in() {
    let mut animator = animator_with(&[("el", ElementStyle::display_none())]);
    let (count, cb) = counter();

    let mut fader = FadeController::new();
    fader.configure(&FadeOptions::new().wait(200).fade(100));
    fader.fade_in(&mut animator, "el", cb, None);

    animator.advance(199);
    assert!(style(&animator, "el").is_display_none());

    animator.advance(1);
    assert_eq!(style(&animator, "el").display, "block");
    assert_eq!(style(&animator, "el").opacity, 0.0);

    animator.run_until_idle(10_000);
    assert_eq!(count.get(), 1);
    assert_eq!(animator.now_ms(), 320);

    // The controller keeps its wait for the next call
    let (count, cb) = counter();
    fader.fade_out(&mut animator, "el", cb, None);
    assert_eq!(animator.run_until_idle(10_000), 320);
    assert_eq!(count.get(), 1);
}

/// Overlapping runs on one element are not coordinated
#[test]
fn test_overlapping_runs_both_complete() {
    let mut animator = animator_with(&[("el", ElementStyle::default())]);
    let (first, cb_first) = counter();
    let (second, cb_second) = counter();

    fade_out(&mut animator, "el", cb_first, &FadeOptions::new().fade(100));
    animator.advance(40);
    fade_out(&mut animator, "el", cb_second, &FadeOptions::new().fade(200));
    assert_eq!(animator.active_runs(), 2);

    animator.run_until_idle(10_000);
    assert_eq!((first.get(), second.get()), (1, 1));
    assert!(style(&animator, "el").is_display_none());
}

/// Loose option maps drive the same behaviour
#[test]
fn test_loose_options() {
    let mut animator = animator_with(&[("el", ElementStyle::default())]);
    let (count, cb) = counter();

    let options = FadeOptions::from_value(&serde_json::json!({
        "fadeTime": 100,
        "toggleVisibility": true,
        "directionX": "nowhere"
    }));
    fade_out(&mut animator, "el", cb, &options);

    assert_eq!(animator.run_until_idle(10_000), 120);
    let done = style(&animator, "el");
    assert!(done.is_visibility_hidden());
    assert!(!done.is_display_none());
    assert_eq!(count.get(), 1);
}

/// A completion callback chains a fade-in through the animator's handle
#[test]
fn test_callback_chains_next_fade() {
    let mut animator = animator_with(&[
        ("a", ElementStyle::default()),
        ("b", ElementStyle::display_none()),
    ]);
    let (count, cb) = counter();
    let options = FadeOptions::new().fade(100);

    let handle = animator.handle();
    let next = options.clone();
    fade_out(&mut animator, "a", move || handle.fade_in("b", cb, &next), &options);

    // The fade-in starts on the fade-out's completion tick
    animator.advance(100);
    assert!(style(&animator, "b").is_display_none());
    animator.advance(20);
    assert!(style(&animator, "a").is_display_none());
    assert_eq!(style(&animator, "b").display, "block");
    assert_eq!(style(&animator, "b").opacity, 0.0);
    assert!(!animator.is_idle());
    assert_eq!(count.get(), 0);

    animator.advance(120);
    assert_eq!(count.get(), 1);
    assert!(style(&animator, "b").opacity >= 1.0);
    assert!(animator.is_idle());
    assert_eq!(animator.now_ms(), 240);
}

/// Fades queued outside any callback start on the next advance
#[test]
fn test_handle_queues_until_advance() {
    let mut animator = animator_with(&[
        ("old", ElementStyle::default()),
        ("new", ElementStyle::display_none()),
    ]);
    let (count, cb) = counter();

    let handle: FadeHandle = animator.handle();
    handle.fade_replace("old", "new", cb, &FadeOptions::new().fade(100));
    assert_eq!(handle.pending(), 1);
    assert!(!animator.is_idle());

    assert_eq!(animator.run_until_idle(10_000), 240);
    assert_eq!(handle.pending(), 0);
    assert_eq!(count.get(), 1);
    assert!(style(&animator, "old").is_display_none());
    assert_eq!(style(&animator, "new").display, "block");
}
