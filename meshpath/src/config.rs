use crate::error::{PathError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNDO_STEPS: usize = 32;
pub const DEFAULT_MAX_REDISPATCH: usize = 8;
pub const MAX_UNDO_STEPS: usize = 1024;

pub const POINT_SIZE_RANGE: (f32, f32) = (1.0, 10.0);
pub const LINE_WIDTH_RANGE: (f32, f32) = (1.0, 10.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    None,
    Extend,
    Subtract,
    Invert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkMode {
    None,
    Mark,
    Clear,
    Toggle,
}

/// How the finalized element sets are written back to the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupOptions {
    pub select: SelectMode,
    pub seam: MarkMode,
    pub sharp: MarkMode,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        MarkupOptions { select: SelectMode::Extend, seam: MarkMode::None, sharp: MarkMode::None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    fn is_unit(&self) -> bool {
        [self.r, self.g, self.b, self.a].iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }
}

/// Overlay preferences handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawStyle {
    pub control_element: Rgba,
    pub active_path_control_element: Rgba,
    pub active_control_element: Rgba,
    pub path: Rgba,
    pub active_path: Rgba,
    /// Vertex size in pixels
    pub point_size: f32,
    /// Edge width in pixels
    pub line_width: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        DrawStyle {
            control_element: Rgba::new(0.622574, 0.685957, 0.666101, 1.0),
            active_path_control_element: Rgba::new(0.969922, 0.969922, 0.969922, 1.0),
            active_control_element: Rgba::new(0.039087, 0.331906, 0.940392, 1.0),
            path: Rgba::new(0.0, 0.7, 1.0, 1.0),
            active_path: Rgba::new(1.0, 0.1, 0.1, 1.0),
            point_size: 4.0,
            line_width: 3.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Capacity of both undo and redo stacks, fixed when a session starts.
    pub undo_steps: usize,
    /// Upper bound on event re-dispatch within a single interaction.
    pub max_redispatch: usize,
    pub mark_select: SelectMode,
    pub mark_seam: MarkMode,
    pub mark_sharp: MarkMode,
    pub draw: DrawStyle,
}

impl Default for ToolConfig {
    fn default() -> Self {
        let markup = MarkupOptions::default();
        ToolConfig {
            undo_steps: DEFAULT_UNDO_STEPS,
            max_redispatch: DEFAULT_MAX_REDISPATCH,
            mark_select: markup.select,
            mark_seam: markup.seam,
            mark_sharp: markup.sharp,
            draw: DrawStyle::default(),
        }
    }
}

impl ToolConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: ToolConfig = serde_json::from_str(s).map_err(|e| PathError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Self> {
        let cfg: ToolConfig = serde_json::from_value(v).map_err(|e| PathError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.undo_steps > MAX_UNDO_STEPS {
            return Err(PathError::Config(format!("undo_steps {} exceeds {}", self.undo_steps, MAX_UNDO_STEPS)));
        }
        if self.max_redispatch == 0 {
            return Err(PathError::Config("max_redispatch must be at least 1".into()));
        }
        let in_range = |v: f32, (lo, hi): (f32, f32)| v.is_finite() && v >= lo && v <= hi;
        if !in_range(self.draw.point_size, POINT_SIZE_RANGE) {
            return Err(PathError::Config(format!("point_size {} out of range", self.draw.point_size)));
        }
        if !in_range(self.draw.line_width, LINE_WIDTH_RANGE) {
            return Err(PathError::Config(format!("line_width {} out of range", self.draw.line_width)));
        }
        let colors = [
            ("control_element", self.draw.control_element),
            ("active_path_control_element", self.draw.active_path_control_element),
            ("active_control_element", self.draw.active_control_element),
            ("path", self.draw.path),
            ("active_path", self.draw.active_path),
        ];
        for (name, c) in colors {
            if !c.is_unit() {
                return Err(PathError::Config(format!("color '{}' components must be in 0..=1", name)));
            }
        }
        Ok(())
    }

    pub fn markup(&self) -> MarkupOptions {
        MarkupOptions { select: self.mark_select, seam: self.mark_seam, sharp: self.mark_sharp }
    }
}
