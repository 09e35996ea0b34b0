//! Abstract blend-mode vocabulary shared by every backend.
//!
//! The 29 modes are the Porter-Duff operators plus the separable and
//! non-separable blend modes. Backends translate them with their own total
//! mappings; anything that cannot be mapped degrades to [`BlendMode::SrcOver`].

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Clear,
    Src,
    Dst,
    #[default]
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
    Plus,
    Modulate,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 29] = [
        BlendMode::Clear,
        BlendMode::Src,
        BlendMode::Dst,
        BlendMode::SrcOver,
        BlendMode::DstOver,
        BlendMode::SrcIn,
        BlendMode::DstIn,
        BlendMode::SrcOut,
        BlendMode::DstOut,
        BlendMode::SrcAtop,
        BlendMode::DstAtop,
        BlendMode::Xor,
        BlendMode::Plus,
        BlendMode::Modulate,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Multiply,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    /// The snake_case name used in style files.
    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Clear => "clear",
            BlendMode::Src => "src",
            BlendMode::Dst => "dst",
            BlendMode::SrcOver => "src_over",
            BlendMode::DstOver => "dst_over",
            BlendMode::SrcIn => "src_in",
            BlendMode::DstIn => "dst_in",
            BlendMode::SrcOut => "src_out",
            BlendMode::DstOut => "dst_out",
            BlendMode::SrcAtop => "src_atop",
            BlendMode::DstAtop => "dst_atop",
            BlendMode::Xor => "xor",
            BlendMode::Plus => "plus",
            BlendMode::Modulate => "modulate",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color_dodge",
            BlendMode::ColorBurn => "color_burn",
            BlendMode::HardLight => "hard_light",
            BlendMode::SoftLight => "soft_light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Multiply => "multiply",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }

    /// Parses a mode name. `"normal"` is accepted as an alias for `src_over`;
    /// unknown names fall back to `src_over`.
    pub fn from_name(name: &str) -> BlendMode {
        if name == "normal" {
            return BlendMode::SrcOver;
        }
        match BlendMode::ALL.iter().find(|m| m.name() == name) {
            Some(mode) => *mode,
            None => {
                warn!("Unknown blend mode '{}', using src_over", name);
                BlendMode::SrcOver
            }
        }
    }

    /// Looks a mode up by its position in [`BlendMode::ALL`], falling back to `src_over`.
    pub fn from_index(index: usize) -> BlendMode {
        BlendMode::ALL.get(index).copied().unwrap_or_else(|| {
            warn!("Blend mode index {} out of range, using src_over", index);
            BlendMode::SrcOver
        })
    }
}

impl<'de> Deserialize<'de> for BlendMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(BlendMode::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_parse_back() {
        let names: HashSet<&str> = BlendMode::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), 29);
        for mode in BlendMode::ALL {
            assert_eq!(BlendMode::from_name(mode.name()), mode);
        }
    }

    #[test]
    fn unknown_values_fall_back_to_src_over() {
        assert_eq!(BlendMode::from_name("plasma"), BlendMode::SrcOver);
        assert_eq!(BlendMode::from_index(400), BlendMode::SrcOver);
        assert_eq!(BlendMode::from_name("normal"), BlendMode::SrcOver);
    }

    #[test]
    fn deserializes_unknown_name_without_error() {
        let mode: BlendMode = serde_json::from_str("\"hyper_light\"").unwrap();
        assert_eq!(mode, BlendMode::SrcOver);
        let mode: BlendMode = serde_json::from_str("\"color_dodge\"").unwrap();
        assert_eq!(mode, BlendMode::ColorDodge);
    }
}
