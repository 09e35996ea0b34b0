use frost_core::{BlendMode, TileMode};
use tiny_skia::SpreadMode;

pub fn to_tiny_skia(mode: BlendMode) -> tiny_skia::BlendMode {
    use tiny_skia::BlendMode as T;
    match mode {
        BlendMode::Clear => T::Clear,
        BlendMode::Src => T::Source,
        BlendMode::Dst => T::Destination,
        BlendMode::SrcOver => T::SourceOver,
        BlendMode::DstOver => T::DestinationOver,
        BlendMode::SrcIn => T::SourceIn,
        BlendMode::DstIn => T::DestinationIn,
        BlendMode::SrcOut => T::SourceOut,
        BlendMode::DstOut => T::DestinationOut,
        BlendMode::SrcAtop => T::SourceAtop,
        BlendMode::DstAtop => T::DestinationAtop,
        BlendMode::Xor => T::Xor,
        BlendMode::Plus => T::Plus,
        BlendMode::Modulate => T::Modulate,
        BlendMode::Screen => T::Screen,
        BlendMode::Overlay => T::Overlay,
        BlendMode::Darken => T::Darken,
        BlendMode::Lighten => T::Lighten,
        BlendMode::ColorDodge => T::ColorDodge,
        BlendMode::ColorBurn => T::ColorBurn,
        BlendMode::HardLight => T::HardLight,
        BlendMode::SoftLight => T::SoftLight,
        BlendMode::Difference => T::Difference,
        BlendMode::Exclusion => T::Exclusion,
        BlendMode::Multiply => T::Multiply,
        BlendMode::Hue => T::Hue,
        BlendMode::Saturation => T::Saturation,
        BlendMode::Color => T::Color,
        BlendMode::Luminosity => T::Luminosity,
    }
}

pub fn from_tiny_skia(mode: tiny_skia::BlendMode) -> BlendMode {
    use tiny_skia::BlendMode as T;
    match mode {
        T::Clear => BlendMode::Clear,
        T::Source => BlendMode::Src,
        T::Destination => BlendMode::Dst,
        T::SourceOver => BlendMode::SrcOver,
        T::DestinationOver => BlendMode::DstOver,
        T::SourceIn => BlendMode::SrcIn,
        T::DestinationIn => BlendMode::DstIn,
        T::SourceOut => BlendMode::SrcOut,
        T::DestinationOut => BlendMode::DstOut,
        T::SourceAtop => BlendMode::SrcAtop,
        T::DestinationAtop => BlendMode::DstAtop,
        T::Xor => BlendMode::Xor,
        T::Plus => BlendMode::Plus,
        T::Modulate => BlendMode::Modulate,
        T::Screen => BlendMode::Screen,
        T::Overlay => BlendMode::Overlay,
        T::Darken => BlendMode::Darken,
        T::Lighten => BlendMode::Lighten,
        T::ColorDodge => BlendMode::ColorDodge,
        T::ColorBurn => BlendMode::ColorBurn,
        T::HardLight => BlendMode::HardLight,
        T::SoftLight => BlendMode::SoftLight,
        T::Difference => BlendMode::Difference,
        T::Exclusion => BlendMode::Exclusion,
        T::Multiply => BlendMode::Multiply,
        T::Hue => BlendMode::Hue,
        T::Saturation => BlendMode::Saturation,
        T::Color => BlendMode::Color,
        T::Luminosity => BlendMode::Luminosity,
    }
}

/// Gradient spread for a tile mode. tiny-skia has no decal spread; it pads.
pub fn spread_mode(tile_mode: TileMode) -> SpreadMode {
    match tile_mode {
        TileMode::Clamp | TileMode::Decal => SpreadMode::Pad,
        TileMode::Repeat => SpreadMode::Repeat,
        TileMode::Mirror => SpreadMode::Reflect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_round_trips() {
        for mode in BlendMode::ALL {
            assert_eq!(from_tiny_skia(to_tiny_skia(mode)), mode);
        }
    }
}
