//! Visual Effect State Machine Tests
//!
//! Covers delegate selection, layer ownership across transitions, and the scrim
//! fallback for unsupported blur radii.

mod common;

use common::{count, Call, MockBackend, MockPlatform, MockScope, MockShader, Op};
use frost_core::{
    BlurStyle, Brush, Capabilities, Color, EffectRuntime, EffectState, LiquidGlass, Progressive,
    Rect, Tint, VisualEffect,
};

fn area() -> Rect {
    Rect::from_xywh(10.0, 20.0, 200.0, 100.0)
}

fn style() -> BlurStyle {
    BlurStyle {
        blur_radius: 12.0,
        noise_factor: 0.0,
        ..Default::default()
    }
}

#[test]
fn unattached_effect_draws_nothing() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(style());

    assert_eq!(effect.state(), EffectState::NoEffect);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();
    assert!(scope.calls.is_empty());
    assert_eq!(platform.created, 0);
}

/// FullBlur keeps one content layer across frames.
#[test]
fn full_blur_retains_one_layer() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(2.0);
    let mut effect = VisualEffect::new(style());

    effect.attach(&mut platform);
    assert_eq!(effect.state(), EffectState::FullBlur);

    for _ in 0..3 {
        effect
            .draw(&runtime, &mut platform, &mut scope, area())
            .unwrap();
    }
    assert_eq!(platform.created, 1);
    assert_eq!(platform.live.len(), 1);
    assert_eq!(scope.records(), 3);
    assert_eq!(
        scope.calls[0],
        Call::Record {
            layer: 1,
            area: area(),
            scale: 1.0
        }
    );
    assert_eq!(runtime.cached_len(), 1);
}

/// Disabling releases the retained layer exactly once.
#[test]
fn disabling_switches_to_scrim_and_releases_layer() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(style());

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();

    effect.set_enabled(false, &mut platform);
    assert_eq!(effect.state(), EffectState::DegradedScrim);
    assert_eq!(platform.released, vec![1]);
    assert!(platform.live.is_empty());

    // Re-entering the same state is a no-op.
    effect.set_enabled(false, &mut platform);
    assert_eq!(platform.released, vec![1]);
}

#[test]
fn scrim_draws_background_and_fallback_tint() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::NONE);
    let mut scope = MockScope::new(1.0);
    let fallback = Color::new(0.1, 0.1, 0.1, 0.7);
    let mut effect = VisualEffect::new(BlurStyle {
        background_color: Color::WHITE,
        fallback_tint: Tint::color(fallback),
        tints: vec![Tint::color(Color::BLACK.with_alpha(0.2))],
        alpha: 0.9,
        ..style()
    });

    effect.attach(&mut platform);
    assert_eq!(effect.state(), EffectState::DegradedScrim);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();

    assert_eq!(
        scope.calls,
        vec![
            Call::Fill {
                brush: Brush::solid(Color::WHITE),
                masked: false,
                alpha: 1.0
            },
            Call::Fill {
                brush: Brush::solid(fallback),
                masked: false,
                alpha: 0.9
            },
        ]
    );
    assert_eq!(platform.created, 0);
}

#[test]
fn scrim_tints_follow_progressive_intensity() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::NONE);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(BlurStyle {
        tints: vec![Tint::color(Color::BLACK.with_alpha(0.5))],
        progressive: Some(Progressive::vertical(0.0, 1.0)),
        ..style()
    });

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();
    assert!(matches!(scope.calls[..], [Call::Fill { masked: true, .. }]));
}

#[test]
fn liquid_glass_uses_scoped_layers() {
    let runtime = EffectRuntime::new(MockBackend::with_runtime_shaders());
    let mut platform = MockPlatform::new(Capabilities::FULL);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(BlurStyle {
        liquid_glass: Some(LiquidGlass::default()),
        ..style()
    });

    effect.attach(&mut platform);
    assert_eq!(effect.state(), EffectState::LiquidGlass);
    for _ in 0..2 {
        effect
            .draw(&runtime, &mut platform, &mut scope, area())
            .unwrap();
        assert!(platform.live.is_empty());
    }
    assert_eq!(platform.created, 2);
    assert_eq!(platform.released, vec![1, 2]);
    assert_eq!(
        common::count_runtime(&scope.filters[0], "liquid_glass"),
        1
    );
}

#[test]
fn liquid_glass_without_runtime_shaders_is_full_blur() {
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut effect = VisualEffect::<u32>::new(BlurStyle {
        liquid_glass: Some(LiquidGlass::default()),
        ..style()
    });
    effect.attach(&mut platform);
    assert_eq!(effect.state(), EffectState::FullBlur);
}

/// An unsupported radius demotes the effect and still draws something.
#[test]
fn unsupported_radius_falls_back_to_scrim() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(BlurStyle {
        blur_radius: 12.0,
        tints: vec![Tint::color(Color::BLACK.with_alpha(0.3))],
        ..style()
    });

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();
    assert_eq!(platform.created, 1);

    // 12dp at density 40 is past the mock's 256px limit.
    let mut dense = MockScope::new(40.0);
    effect
        .draw(&runtime, &mut platform, &mut dense, area())
        .unwrap();
    assert_eq!(effect.state(), EffectState::DegradedScrim);
    assert!(effect.blur_failed());
    assert_eq!(platform.released, vec![1]);
    assert_eq!(dense.records(), 0);
    assert_eq!(dense.fills(), 1);

    // Stays degraded until the style changes.
    effect.capabilities_changed(&mut platform);
    assert_eq!(effect.state(), EffectState::DegradedScrim);
    effect.set_style(
        BlurStyle {
            blur_radius: 4.0,
            ..style()
        },
        &mut platform,
    );
    assert!(!effect.blur_failed());
    assert_eq!(effect.state(), EffectState::FullBlur);
}

#[test]
fn detach_releases_and_returns_to_no_effect() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(style());

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();
    effect.detach(&mut platform);

    assert_eq!(effect.state(), EffectState::NoEffect);
    assert!(!effect.is_attached());
    assert_eq!(platform.released, vec![1]);
    assert!(platform.live.is_empty());
}

#[test]
fn losing_blur_capability_degrades() {
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut effect = VisualEffect::<u32>::new(style());
    effect.attach(&mut platform);
    assert_eq!(effect.state(), EffectState::FullBlur);

    platform.caps = Capabilities::NONE;
    effect.capabilities_changed(&mut platform);
    assert_eq!(effect.state(), EffectState::DegradedScrim);

    platform.caps = Capabilities::BLUR_ONLY;
    effect.capabilities_changed(&mut platform);
    assert_eq!(effect.state(), EffectState::FullBlur);
}

/// Linear progressive blur without runtime shaders draws one band per layer.
#[test]
fn progressive_without_runtime_draws_bands() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(BlurStyle {
        blur_radius: 20.0,
        progressive: Some(Progressive::vertical(0.0, 1.0)),
        ..style()
    });

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();

    assert_eq!(scope.records(), 5);
    assert_eq!(platform.created, 5);
    assert_eq!(platform.peak_live, 1);
    assert!(platform.live.is_empty());
}

/// A band past the blur limit degrades the effect before anything is drawn.
#[test]
fn rejected_band_leaves_no_partial_output() {
    let runtime = EffectRuntime::new(MockBackend::with_max_radius(30.0));
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let background = Color::BLACK.with_alpha(0.5);
    let mut effect = VisualEffect::new(BlurStyle {
        blur_radius: 40.0,
        background_color: background,
        progressive: Some(Progressive::vertical(0.0, 1.0)),
        ..style()
    });

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();

    assert_eq!(effect.state(), EffectState::DegradedScrim);
    assert_eq!(scope.records(), 0);
    assert!(!scope.calls.iter().any(|c| matches!(c, Call::Draw { .. })));
    let background_fills = scope
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Fill { brush, .. } if *brush == Brush::solid(background)))
        .count();
    assert_eq!(background_fills, 1);
    assert_eq!(platform.created, 0);
}

#[test]
fn progressive_bands_fill_background_once() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(BlurStyle {
        blur_radius: 20.0,
        background_color: Color::WHITE,
        progressive: Some(Progressive::vertical(0.0, 1.0)),
        ..style()
    });

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();

    assert_eq!(scope.fills(), 1);
    assert!(matches!(scope.calls[0], Call::Fill { .. }));
    assert_eq!(scope.records(), 5);
}

/// The user mask limits every band, not only the weakest one.
#[test]
fn progressive_bands_honor_the_user_mask() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mask = Brush::vertical_gradient(&[Color::BLACK, Color::TRANSPARENT], 100.0);
    let mut effect = VisualEffect::new(BlurStyle {
        blur_radius: 20.0,
        mask: Some(mask.clone()),
        progressive: Some(Progressive::vertical(0.0, 1.0)),
        ..style()
    });

    effect.attach(&mut platform);
    effect
        .draw(&runtime, &mut platform, &mut scope, area())
        .unwrap();

    assert_eq!(scope.filters.len(), 5);
    for filter in &scope.filters {
        let user_masks = count(filter, &|op| *op == Op::Shader(MockShader::Brush(mask.clone())));
        assert_eq!(user_masks, 1);
    }
}

#[test]
fn empty_area_is_skipped() {
    let runtime = EffectRuntime::new(MockBackend::new());
    let mut platform = MockPlatform::new(Capabilities::BLUR_ONLY);
    let mut scope = MockScope::new(1.0);
    let mut effect = VisualEffect::new(style());
    effect.attach(&mut platform);
    effect
        .draw(
            &runtime,
            &mut platform,
            &mut scope,
            Rect::from_xywh(0.0, 0.0, 0.0, 10.0),
        )
        .unwrap();
    assert!(scope.calls.is_empty());
}
