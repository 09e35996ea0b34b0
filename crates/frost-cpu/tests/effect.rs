//! End-to-end drawing through `VisualEffect` on pixmaps.

use frost_core::{
    BlurStyle, Brush, Capabilities, Color, EffectRuntime, EffectState, LiquidGlass, Progressive,
    Rect, RenderEffectParams, Tint, VisualEffect,
};
use frost_cpu::{fill_pixmap, CpuBackend, CpuDrawScope, CpuPlatform, FilterNode};
use std::rc::Rc;
use tiny_skia::Pixmap;

/// White on the left half, black on the right.
fn split_content(size: u32) -> Pixmap {
    let mut content = Pixmap::new(size, size).unwrap();
    fill_pixmap(&mut content, &Brush::solid(Color::BLACK)).unwrap();
    let half = size as usize / 2;
    let white = tiny_skia::PremultipliedColorU8::from_rgba(255, 255, 255, 255).unwrap();
    for (i, px) in content.pixels_mut().iter_mut().enumerate() {
        if i % (size as usize) < half {
            *px = white;
        }
    }
    content
}

fn style(json: &str) -> BlurStyle {
    BlurStyle::from_json(json).expect("valid style")
}

#[test]
fn full_blur_softens_edges() {
    let runtime = EffectRuntime::new(CpuBackend::new());
    let mut platform = CpuPlatform::new();
    let content = split_content(32);
    let mut target = content.clone();
    let mut effect = VisualEffect::new(style(r#"{ "blur_radius": 4, "noise_factor": 0 }"#));

    effect.attach(&mut platform);
    assert_eq!(effect.state(), EffectState::FullBlur);
    {
        let mut scope = CpuDrawScope::new(&content, &mut target, 1.0);
        effect
            .draw(&runtime, &mut platform, &mut scope, Rect::from_xywh(0.0, 0.0, 32.0, 32.0))
            .unwrap();
    }

    let edge = target.pixel(16, 16).unwrap().red();
    assert!(edge > 20 && edge < 235, "edge = {edge}");
    assert!(target.pixel(0, 16).unwrap().red() >= 250);
    assert_eq!(platform.live_layers(), 1);

    effect.detach(&mut platform);
    assert_eq!(platform.live_layers(), 0);
}

#[test]
fn downsampled_input_still_covers_area() {
    let runtime = EffectRuntime::new(CpuBackend::new());
    let mut platform = CpuPlatform::new();
    let content = split_content(32);
    let mut target = Pixmap::new(32, 32).unwrap();
    let mut effect = VisualEffect::new(style(
        r#"{ "blur_radius": 2, "noise_factor": 0, "input_scale": 0.5 }"#,
    ));

    effect.attach(&mut platform);
    let mut scope = CpuDrawScope::new(&content, &mut target, 1.0);
    effect
        .draw(&runtime, &mut platform, &mut scope, Rect::from_xywh(0.0, 0.0, 32.0, 32.0))
        .unwrap();
    drop(scope);

    assert!(target.pixel(2, 2).unwrap().alpha() > 200);
    assert!(target.pixel(29, 29).unwrap().alpha() > 200);
    effect.detach(&mut platform);
}

#[test]
fn scrim_without_blur_capability() {
    let runtime = EffectRuntime::new(CpuBackend::new());
    let mut platform = CpuPlatform::with_capabilities(Capabilities::NONE);
    let content = split_content(16);
    let mut target = Pixmap::new(16, 16).unwrap();
    let mut effect = VisualEffect::new(style(
        r##"{ "background_color": "#00FF00", "fallback_tint": { "type": "color", "color": "#FF000080" } }"##,
    ));

    effect.attach(&mut platform);
    assert_eq!(effect.state(), EffectState::DegradedScrim);
    let mut scope = CpuDrawScope::new(&content, &mut target, 1.0);
    effect
        .draw(&runtime, &mut platform, &mut scope, Rect::from_xywh(0.0, 0.0, 16.0, 16.0))
        .unwrap();
    drop(scope);

    let px = target.pixel(8, 8).unwrap();
    assert_eq!(px.alpha(), 255);
    assert!(px.red() > 100 && px.green() > 100 && px.blue() == 0);
    assert_eq!(platform.created_layers(), 0);
}

/// Liquid glass needs runtime shaders; tiny-skia has none, so the glass stage is
/// dropped and the style draws as a plain blur.
#[test]
fn liquid_glass_degrades_to_blur() {
    let runtime = EffectRuntime::new(CpuBackend::new());
    let params = RenderEffectParams {
        blur_radius: 6.0,
        content_size: glam::Vec2::new(32.0, 32.0),
        liquid_glass: Some(LiquidGlass::default()),
        ..Default::default()
    };
    let filter = runtime.get_or_build(&params).unwrap();
    let filter = filter.filter().unwrap();
    assert!(matches!(filter.as_ref(), FilterNode::Blur { .. }));
    assert_eq!(filter.stages(), 1);
}

#[test]
fn progressive_bands_hold_one_layer_at_a_time() {
    let runtime = EffectRuntime::new(CpuBackend::new());
    let mut platform = CpuPlatform::new();
    let content = split_content(32);
    let mut target = Pixmap::new(32, 32).unwrap();
    let mut effect = VisualEffect::new(BlurStyle {
        blur_radius: 16.0,
        noise_factor: 0.0,
        progressive: Some(Progressive::vertical(0.0, 1.0)),
        ..Default::default()
    });

    effect.attach(&mut platform);
    let mut scope = CpuDrawScope::new(&content, &mut target, 1.0);
    effect
        .draw(&runtime, &mut platform, &mut scope, Rect::from_xywh(0.0, 0.0, 32.0, 32.0))
        .unwrap();
    drop(scope);

    assert_eq!(platform.created_layers(), 4);
    assert_eq!(platform.peak_layers(), 1);
    assert_eq!(platform.live_layers(), 0);

    // The weak end stays sharper than the strong end.
    let top = target.pixel(20, 1).unwrap().red();
    let bottom = target.pixel(20, 30).unwrap().red();
    assert!(top.abs_diff(128) > bottom.abs_diff(128), "top {top}, bottom {bottom}");
    effect.detach(&mut platform);
}

#[test]
fn oversized_radius_falls_back_to_scrim() {
    let runtime = EffectRuntime::new(CpuBackend::with_max_blur_radius(10.0));
    let mut platform = CpuPlatform::new();
    let content = split_content(16);
    let mut target = Pixmap::new(16, 16).unwrap();
    let mut effect = VisualEffect::new(BlurStyle {
        blur_radius: 40.0,
        tints: vec![Tint::color(Color::new(0.0, 0.0, 1.0, 1.0))],
        ..Default::default()
    });

    effect.attach(&mut platform);
    let mut scope = CpuDrawScope::new(&content, &mut target, 1.0);
    effect
        .draw(&runtime, &mut platform, &mut scope, Rect::from_xywh(0.0, 0.0, 16.0, 16.0))
        .unwrap();
    drop(scope);

    assert_eq!(effect.state(), EffectState::DegradedScrim);
    assert_eq!(target.pixel(3, 3).unwrap().blue(), 255);
    assert_eq!(platform.live_layers(), 0);
}

#[test]
fn cached_chains_are_shared() {
    let runtime = EffectRuntime::new(CpuBackend::new());
    let params = RenderEffectParams {
        blur_radius: 8.0,
        content_size: glam::Vec2::new(64.0, 64.0),
        ..Default::default()
    };
    let a = runtime.get_or_build(&params).unwrap();
    let b = runtime.get_or_build(&params.clone()).unwrap();
    assert!(Rc::ptr_eq(a.filter().unwrap(), b.filter().unwrap()));
}
