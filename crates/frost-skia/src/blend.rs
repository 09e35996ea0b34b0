use frost_core::BlendMode;
use skia_safe::BlendMode as SkBlendMode;

/// Maps a Frost blend mode onto Skia's. Skia covers the whole vocabulary.
pub fn to_skia(mode: BlendMode) -> SkBlendMode {
    match mode {
        BlendMode::Clear => SkBlendMode::Clear,
        BlendMode::Src => SkBlendMode::Src,
        BlendMode::Dst => SkBlendMode::Dst,
        BlendMode::SrcOver => SkBlendMode::SrcOver,
        BlendMode::DstOver => SkBlendMode::DstOver,
        BlendMode::SrcIn => SkBlendMode::SrcIn,
        BlendMode::DstIn => SkBlendMode::DstIn,
        BlendMode::SrcOut => SkBlendMode::SrcOut,
        BlendMode::DstOut => SkBlendMode::DstOut,
        BlendMode::SrcAtop => SkBlendMode::SrcATop,
        BlendMode::DstAtop => SkBlendMode::DstATop,
        BlendMode::Xor => SkBlendMode::Xor,
        BlendMode::Plus => SkBlendMode::Plus,
        BlendMode::Modulate => SkBlendMode::Modulate,
        BlendMode::Screen => SkBlendMode::Screen,
        BlendMode::Overlay => SkBlendMode::Overlay,
        BlendMode::Darken => SkBlendMode::Darken,
        BlendMode::Lighten => SkBlendMode::Lighten,
        BlendMode::ColorDodge => SkBlendMode::ColorDodge,
        BlendMode::ColorBurn => SkBlendMode::ColorBurn,
        BlendMode::HardLight => SkBlendMode::HardLight,
        BlendMode::SoftLight => SkBlendMode::SoftLight,
        BlendMode::Difference => SkBlendMode::Difference,
        BlendMode::Exclusion => SkBlendMode::Exclusion,
        BlendMode::Multiply => SkBlendMode::Multiply,
        BlendMode::Hue => SkBlendMode::Hue,
        BlendMode::Saturation => SkBlendMode::Saturation,
        BlendMode::Color => SkBlendMode::Color,
        BlendMode::Luminosity => SkBlendMode::Luminosity,
    }
}

/// Reverse mapping; modes Frost does not name fall back to `SrcOver`.
pub fn from_skia(mode: SkBlendMode) -> BlendMode {
    #[allow(unreachable_patterns)]
    match mode {
        SkBlendMode::Clear => BlendMode::Clear,
        SkBlendMode::Src => BlendMode::Src,
        SkBlendMode::Dst => BlendMode::Dst,
        SkBlendMode::SrcOver => BlendMode::SrcOver,
        SkBlendMode::DstOver => BlendMode::DstOver,
        SkBlendMode::SrcIn => BlendMode::SrcIn,
        SkBlendMode::DstIn => BlendMode::DstIn,
        SkBlendMode::SrcOut => BlendMode::SrcOut,
        SkBlendMode::DstOut => BlendMode::DstOut,
        SkBlendMode::SrcATop => BlendMode::SrcAtop,
        SkBlendMode::DstATop => BlendMode::DstAtop,
        SkBlendMode::Xor => BlendMode::Xor,
        SkBlendMode::Plus => BlendMode::Plus,
        SkBlendMode::Modulate => BlendMode::Modulate,
        SkBlendMode::Screen => BlendMode::Screen,
        SkBlendMode::Overlay => BlendMode::Overlay,
        SkBlendMode::Darken => BlendMode::Darken,
        SkBlendMode::Lighten => BlendMode::Lighten,
        SkBlendMode::ColorDodge => BlendMode::ColorDodge,
        SkBlendMode::ColorBurn => BlendMode::ColorBurn,
        SkBlendMode::HardLight => BlendMode::HardLight,
        SkBlendMode::SoftLight => BlendMode::SoftLight,
        SkBlendMode::Difference => BlendMode::Difference,
        SkBlendMode::Exclusion => BlendMode::Exclusion,
        SkBlendMode::Multiply => BlendMode::Multiply,
        SkBlendMode::Hue => BlendMode::Hue,
        SkBlendMode::Saturation => BlendMode::Saturation,
        SkBlendMode::Color => BlendMode::Color,
        SkBlendMode::Luminosity => BlendMode::Luminosity,
        _ => BlendMode::SrcOver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_round_trips() {
        for mode in BlendMode::ALL {
            assert_eq!(from_skia(to_skia(mode)), mode, "{}", mode.name());
        }
    }
}
