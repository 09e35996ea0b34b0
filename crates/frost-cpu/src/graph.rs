//! The filter graph built by [`crate::CpuBackend`].
//!
//! Nodes are immutable and reference-counted, so chains built from the same
//! stages share them and cached handles can be compared with `Rc::ptr_eq`.

use frost_core::{BlendMode, Brush, ColorFilter, Rect, TileMode};
use std::rc::Rc;
use tiny_skia::Pixmap;

pub type CpuFilter = Rc<FilterNode>;

/// Paint sources evaluated when a shader node is rasterized.
#[derive(Clone, Debug)]
pub enum CpuShader {
    Brush(Brush),
    /// Repeat-tiled grain, kept only where `mask` is opaque.
    Noise {
        texture: Rc<Pixmap>,
        mask: Option<Brush>,
    },
}

#[derive(Debug)]
pub enum FilterNode {
    Blur {
        radius_x: f32,
        radius_y: f32,
        sigma_x: f32,
        sigma_y: f32,
        tile_mode: TileMode,
        input: Option<CpuFilter>,
        crop: Option<Rect>,
    },
    ColorFilter {
        filter: ColorFilter,
        input: Option<CpuFilter>,
        crop: Option<Rect>,
    },
    Blend {
        mode: BlendMode,
        background: Option<CpuFilter>,
        foreground: Option<CpuFilter>,
        crop: Option<Rect>,
    },
    Offset {
        dx: f32,
        dy: f32,
        input: Option<CpuFilter>,
        crop: Option<Rect>,
    },
    Shader {
        shader: CpuShader,
        crop: Option<Rect>,
    },
    /// `then` evaluated with the output of `first` as its source.
    Chain { first: CpuFilter, then: CpuFilter },
}

impl FilterNode {
    /// Short stage name, used by logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterNode::Blur { .. } => "blur",
            FilterNode::ColorFilter { .. } => "color_filter",
            FilterNode::Blend { .. } => "blend",
            FilterNode::Offset { .. } => "offset",
            FilterNode::Shader { .. } => "shader",
            FilterNode::Chain { .. } => "chain",
        }
    }

    /// Direct inputs of this node, in evaluation order.
    pub fn inputs(&self) -> Vec<&CpuFilter> {
        match self {
            FilterNode::Blur { input, .. }
            | FilterNode::ColorFilter { input, .. }
            | FilterNode::Offset { input, .. } => input.iter().collect(),
            FilterNode::Blend {
                background,
                foreground,
                ..
            } => background.iter().chain(foreground.iter()).collect(),
            FilterNode::Shader { .. } => Vec::new(),
            FilterNode::Chain { first, then } => vec![first, then],
        }
    }

    /// Number of nodes of `kind` in the graph rooted here.
    pub fn count(&self, kind: &str) -> usize {
        let own = usize::from(self.kind() == kind);
        own + self.inputs().iter().map(|n| n.count(kind)).sum::<usize>()
    }

    /// Total number of nodes in the graph rooted here.
    pub fn stages(&self) -> usize {
        1 + self.inputs().iter().map(|n| n.stages()).sum::<usize>()
    }
}
