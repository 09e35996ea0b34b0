//! Style Parsing Tests

use frost_core::{
    BlendMode, BlurStyle, Brush, Color, ColorFilter, EdgeTreatment, EffectError, Easing,
    Progressive, TileMode, Tint,
};
use glam::Vec2;

const STYLE: &str = r##"{
    "blur_radius": 24,
    "noise_factor": 0.08,
    "input_scale": 0.5,
    "blurred_edge_treatment": "unbounded",
    "background_color": "#101418",
    "tints": [
        { "type": "color", "color": "#FFFFFF33" },
        {
            "type": "color",
            "color": { "r": 0.2, "g": 0.4, "b": 1.0, "a": 0.25 },
            "blend_mode": "color_dodge",
            "color_filter": { "type": "blend", "color": "#00000010", "mode": "multiply" }
        },
        {
            "type": "brush",
            "brush": {
                "type": "linear_gradient",
                "start": [0, 0],
                "end": [0, 64],
                "stops": [
                    { "offset": 0.0, "color": "#000000AA" },
                    { "offset": 1.0, "color": "#00000000" }
                ]
            },
            "alpha": 0.5,
            "blend_mode": "bogus"
        }
    ],
    "fallback_tint": { "type": "color", "color": "#202020E6" },
    "progressive": {
        "type": "linear_gradient",
        "easing": "ease_in",
        "start_intensity": 0.0,
        "end_intensity": 1.0
    }
}"##;

#[test]
fn parses_full_style() {
    let style = BlurStyle::from_json(STYLE).expect("style should parse");
    assert_eq!(style.blur_radius, 24.0);
    assert_eq!(style.blurred_edge_treatment, EdgeTreatment::Unbounded);
    assert_eq!(style.background_color, Color::from_rgba8(0x10, 0x14, 0x18, 0xFF));
    assert_eq!(style.tints.len(), 3);
    assert!(style.blur_enabled);

    match &style.tints[1] {
        Tint::Color {
            blend_mode,
            color_filter,
            ..
        } => {
            assert_eq!(*blend_mode, BlendMode::ColorDodge);
            assert!(matches!(
                color_filter,
                Some(ColorFilter::Blend { mode: BlendMode::Multiply, .. })
            ));
        }
        other => panic!("unexpected tint {other:?}"),
    }

    // Unknown blend modes degrade to src-over.
    assert_eq!(style.tints[2].blend_mode(), BlendMode::SrcOver);
    assert!(matches!(
        &style.tints[2],
        Tint::Brush { brush: Brush::LinearGradient { tile_mode: TileMode::Clamp, .. }, alpha, .. } if *alpha == 0.5
    ));

    assert!(matches!(
        style.progressive,
        Some(Progressive::LinearGradient {
            easing: Easing::EaseIn,
            prefer_performance: false,
            ..
        })
    ));
}

#[test]
fn style_converts_to_params() {
    let style = BlurStyle::from_json(STYLE).unwrap();
    let params = style.to_params(Vec2::new(320.0, 64.0), Vec2::new(0.0, 480.0), 2.0);
    assert_eq!(params.scale, 0.5);
    assert_eq!(params.blur_tile_mode, TileMode::Decal);
    assert_eq!(params.scaled_blur_radius(), 24.0);
    assert_eq!(params.layer_size(), Vec2::new(160.0, 32.0));
    assert_eq!(params.content_rect().top(), 480.0);
    assert_eq!(params.tints, style.tints);
}

#[test]
fn malformed_json_is_reported() {
    let err = BlurStyle::from_json("{ \"blur_radius\": ").unwrap_err();
    assert!(matches!(err, EffectError::Json(_)));
}

#[test]
fn invalid_color_is_rejected() {
    let err = BlurStyle::from_json(r##"{ "background_color": "#12" }"##).unwrap_err();
    assert!(matches!(err, EffectError::Json(_)));
}

#[test]
fn nan_scale_is_rejected() {
    let style = BlurStyle {
        input_scale: f32::NAN,
        ..Default::default()
    };
    assert!(matches!(style.validate(), Err(EffectError::InvalidStyle(_))));
}
