use anyhow::Result;
use glide_motion::{
    AnimationStep, Document, Easing, FrameSnapshot, PlaybackEvent, PointerCapabilities,
    PointerMode, Property, PropertyValue, Rect, Repeat, ScrollRange, Stage, TimelinePlayer,
    TrackedTrigger, TriggerMode,
};
use std::cell::RefCell;
use std::rc::Rc;

const VIEWPORT_H: f64 = 800.0;
const DT: f64 = 1.0 / 60.0;

fn snapshot(frame: u32, scroll_y: f64) -> FrameSnapshot {
    FrameSnapshot::new(frame as f64 * DT, scroll_y, 1280.0, VIEWPORT_H)
}

#[test]
fn one_shot_trigger_fires_once_across_repeated_crossings() -> Result<()> {
    let mut doc = Document::new();
    let card = doc.insert("card", Rect::new(0.0, 1200.0, 600.0, 300.0));
    let mut stage = Stage::new(doc, PointerCapabilities::fine());
    let scope = stage.open_scope("projects");

    let fired = Rc::new(RefCell::new(0u32));
    let counter = fired.clone();
    stage.register_trigger(
        scope,
        TrackedTrigger::new(card)
            .start_threshold(0.2)
            .on_enter(move |_| *counter.borrow_mut() += 1),
    )?;

    let mut frame = 0;
    for _ in 0..4 {
        for scroll in [0.0, 900.0, 0.0, 1400.0] {
            stage.frame(snapshot(frame, scroll), DT);
            frame += 1;
        }
    }

    assert_eq!(*fired.borrow(), 1);
    Ok(())
}

#[test]
fn entrance_threshold_crossed_while_scrolling_to_thirty_percent() -> Result<()> {
    let mut doc = Document::new();
    // Visible fraction = (scroll + 800 - 1000) / 100 while entering.
    let el = doc.insert("heading", Rect::new(0.0, 1000.0, 400.0, 100.0));
    let mut stage = Stage::new(doc, PointerCapabilities::fine());
    let scope = stage.open_scope("about");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    stage.register_trigger(
        scope,
        TrackedTrigger::new(el)
            .start_threshold(0.2)
            .on_enter(move |e| sink.borrow_mut().push(e.fraction)),
    )?;

    for (frame, scroll) in (200..=230).map(|s| s as f64).enumerate() {
        stage.frame(snapshot(frame as u32, scroll), DT);
    }

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0] >= 0.2 && seen[0] < 0.21 + 1e-9);
    Ok(())
}

#[test]
fn playback_lands_on_to_values_at_delay_plus_duration() -> Result<()> {
    let mut doc = Document::new();
    let name = doc.insert("hero-name", Rect::new(0.0, 0.0, 800.0, 200.0));
    let step = AnimationStep::builder([name])
        .from_to(Property::Y, PropertyValue::percent(100.0), PropertyValue::percent(0.0))
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::RotateX, -90.0, 0.0)
        .duration(1.2)
        .delay(0.3)
        .ease_named("power3.out")
        .build()?;

    let mut player = TimelinePlayer::new();
    player.play(&step, &mut doc);
    // 90 frames of 1/60 s add up to delay + duration.
    for _ in 0..90 {
        player.update(DT, &mut doc);
    }

    assert_eq!(doc.property(name, &Property::Y), Some(&PropertyValue::percent(0.0)));
    assert_eq!(doc.scalar(name, &Property::Opacity), 1.0);
    assert_eq!(doc.scalar(name, &Property::RotateX), 0.0);
    Ok(())
}

#[test]
fn thirty_frames_at_thirty_fps_land_on_to_values() -> Result<()> {
    let mut doc = Document::new();
    let card = doc.insert("card", Rect::new(0.0, 0.0, 300.0, 300.0));
    let step = AnimationStep::builder([card])
        .from_to(Property::Opacity, 0.0, 1.0)
        .duration(1.0)
        .ease(Easing::Linear)
        .build()?;

    let mut player = TimelinePlayer::new();
    let handle = player.play(&step, &mut doc);
    for _ in 0..30 {
        player.update(1.0 / 30.0, &mut doc);
    }

    assert_eq!(doc.scalar(card, &Property::Opacity), 1.0);
    assert!(!player.is_active(handle));
    Ok(())
}

#[test]
fn linear_opacity_is_half_way_at_half_a_second() -> Result<()> {
    let mut doc = Document::new();
    let el = doc.insert("bio", Rect::default());
    let step = AnimationStep::builder([el])
        .from_to(Property::Opacity, 0.0, 1.0)
        .duration(1.0)
        .delay(0.0)
        .ease_named("linear")
        .build()?;

    let mut player = TimelinePlayer::new();
    player.play(&step, &mut doc);
    player.update(0.25, &mut doc);
    player.update(0.25, &mut doc);

    assert!((doc.scalar(el, &Property::Opacity) - 0.5).abs() < 1e-9);
    Ok(())
}

#[test]
fn cancel_at_half_duration_freezes_value() -> Result<()> {
    let mut doc = Document::new();
    let el = doc.insert("chip", Rect::default());
    let step = AnimationStep::builder([el])
        .from_to(Property::Scale, 0.8, 1.0)
        .duration(0.6)
        .ease(Easing::power(2, Default::default()))
        .build()?;

    let mut player = TimelinePlayer::new();
    let handle = player.play(&step, &mut doc);
    player.update(0.3, &mut doc);
    let at_half = doc.scalar(el, &Property::Scale);
    assert!(at_half > 0.8 && at_half < 1.0);

    assert!(player.cancel(handle));
    for _ in 0..60 {
        player.update(DT, &mut doc);
    }
    assert_eq!(doc.scalar(el, &Property::Scale), at_half);
    Ok(())
}

#[test]
fn scroll_progress_is_monotonic_and_reaches_both_ends() -> Result<()> {
    let mut doc = Document::new();
    let section = doc.insert("leadership", Rect::new(0.0, 2000.0, 1280.0, 1600.0));
    let mut stage = Stage::new(doc, PointerCapabilities::fine());
    let scope = stage.open_scope("leadership");

    let values = Rc::new(RefCell::new(Vec::new()));
    let sink = values.clone();
    stage.track_progress(scope, section, ScrollRange::default(), move |p| {
        sink.borrow_mut().push(p)
    });

    for frame in 0..500 {
        stage.frame(snapshot(frame, frame as f64 * 10.0), DT);
    }

    let values = values.borrow();
    assert!(values.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(values.first().copied(), Some(0.0));
    assert_eq!(values.last().copied(), Some(1.0));
    Ok(())
}

#[test]
fn coarse_pointer_never_invokes_subscribers() -> Result<()> {
    let mut stage = Stage::new(Document::new(), PointerCapabilities::coarse());
    let scope = stage.open_scope("cursor");

    let calls = Rc::new(RefCell::new(0u32));
    for mode in [PointerMode::Raw, PointerMode::Smoothed { time_constant: 0.08 }] {
        let calls = calls.clone();
        stage.subscribe_pointer(scope, mode, move |_| *calls.borrow_mut() += 1);
    }

    for frame in 0..120 {
        stage.pointer_moved(frame as f64 * 5.0, 300.0, frame as f64 * DT);
        stage.frame(snapshot(frame, 0.0), DT);
    }

    assert!(!stage.pointer().is_listening());
    assert_eq!(*calls.borrow(), 0);
    Ok(())
}

#[test]
fn staggered_cards_start_in_order() -> Result<()> {
    let mut doc = Document::new();
    let chips: Vec<_> = (0..4)
        .map(|i| doc.insert(format!("skill-{i}"), Rect::new(i as f64 * 90.0, 0.0, 80.0, 30.0)))
        .collect();
    let step = AnimationStep::builder(chips.clone())
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::Scale, 0.8, 1.0)
        .duration(0.4)
        .stagger(0.05)
        .ease_named("back.out(1.7)")
        .build()?;

    let mut player = TimelinePlayer::new();
    player.play(&step, &mut doc);
    player.update(0.12, &mut doc);

    let opacities: Vec<f64> = chips
        .iter()
        .map(|&c| doc.scalar(c, &Property::Opacity))
        .collect();
    assert!(opacities.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(opacities[3], 0.0);

    player.update(1.0, &mut doc);
    assert!(chips.iter().all(|&c| doc.scalar(c, &Property::Opacity) == 1.0));
    Ok(())
}

#[test]
fn repeat_entrance_reverses_when_scrolled_back() -> Result<()> {
    let mut doc = Document::new();
    let image = doc.insert("about-image", Rect::new(0.0, 1000.0, 500.0, 500.0));
    let mut stage = Stage::new(doc, PointerCapabilities::fine());
    let scope = stage.open_scope("about");

    let step = AnimationStep::builder([image])
        .from_to(Property::X, -50.0, 0.0)
        .from_to(Property::Opacity, 0.0, 1.0)
        .duration(1.0)
        .ease_named("power3.out")
        .build()?;
    stage.entrance(scope, image, 0.2, TriggerMode::Repeat, step)?;

    let mut frame = 0;
    let mut completed = 0;
    for scroll in [700.0, 0.0] {
        for _ in 0..90 {
            let report = stage.frame(snapshot(frame, scroll), DT);
            completed += report.events.iter().filter(|e| e.is_completed()).count();
            frame += 1;
        }
        let expected = if scroll > 0.0 { (0.0, 1.0) } else { (-50.0, 0.0) };
        assert_eq!(stage.document().scalar(image, &Property::X), expected.0);
        assert_eq!(stage.document().scalar(image, &Property::Opacity), expected.1);
    }

    assert_eq!(completed, 2);
    Ok(())
}

#[test]
fn replaying_a_step_never_stacks_runs() -> Result<()> {
    let mut doc = Document::new();
    let el = doc.insert("nav", Rect::default());
    let step = AnimationStep::builder([el])
        .from_to(Property::Y, -100.0, 0.0)
        .duration(1.0)
        .delay(1.5)
        .ease_named("power3.out")
        .build()?;

    let mut player = TimelinePlayer::new();
    let handles: Vec<_> = (0..5).map(|_| player.play(&step, &mut doc)).collect();

    assert_eq!(player.active_count(), 1);
    assert_eq!(player.playback_for_step(step.id()), handles.last().copied());
    let cancelled = player
        .drain_events()
        .filter(|e| matches!(e, PlaybackEvent::Cancelled { .. }))
        .count();
    assert_eq!(cancelled, 4);
    Ok(())
}

#[test]
fn forever_repeat_stops_only_on_dispose() -> Result<()> {
    let mut doc = Document::new();
    let stars = doc.insert("stars", Rect::new(0.0, 0.0, 1280.0, 800.0));
    let mut stage = Stage::new(doc, PointerCapabilities::fine());
    let scope = stage.open_scope("contact");

    let drift = AnimationStep::builder([stars])
        .from_to(Property::Y, 0.0, -800.0)
        .duration(20.0)
        .ease(Easing::Linear)
        .repeat(Repeat::Forever)
        .build()?;
    let handle = stage.play(scope, &drift);

    for frame in 0..3000 {
        stage.frame(snapshot(frame, 0.0), DT);
    }
    assert!(stage.player().is_active(handle));

    stage.dispose(scope);
    assert!(!stage.player().is_active(handle));
    let y = stage.document().scalar(stars, &Property::Y);
    for frame in 3000..3010 {
        stage.frame(snapshot(frame, 0.0), DT);
    }
    assert_eq!(stage.document().scalar(stars, &Property::Y), y);
    Ok(())
}
