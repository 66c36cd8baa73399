use serde_json::Value;

use crate::colour::parse::{Colour, parse_colour};
use crate::factory::frame::FrameWidgets;
use crate::foundation::core::GridDimensions;
use crate::foundation::error::{CardError, CardResult};

/// Widget type carrying the canvas configuration.
pub const CANVAS_OPTIONS: &str = "builtin.canvasoptions";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Pixel format of the frame canvas.
pub enum ImageType {
    /// 16-bit non-premultiplied RGBA.
    #[default]
    Nrgba64,
    /// High dynamic range, linear float channels.
    Aces,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Frame dimensions in pixels.
pub struct FrameSize {
    #[serde(default)]
    pub w: u32,
    #[serde(default)]
    pub h: u32,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Per-frame canvas options, read from the single `builtin.canvasoptions` widget.
pub struct CanvasConfig {
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Output name parts.
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub frame_size: FrameSize,
    /// Zero means one row.
    #[serde(default)]
    pub grid_rows: u32,
    /// Zero means one column.
    #[serde(default)]
    pub grid_columns: u32,
    /// Background art, scaled to the frame.
    #[serde(default)]
    pub base_image: String,
    /// Segment map file.
    #[serde(default)]
    pub geometry: String,
    #[serde(default)]
    pub background_fill_color: String,
    #[serde(default)]
    pub image_type: ImageType,
    /// Grid line width in pixels, may be fractional.
    #[serde(default, alias = "linewidth")]
    pub line_width: f64,
    /// Grid line colour; no lines when unset.
    #[serde(default)]
    pub line_color: String,
    /// Bit depth hint for file writers; PNG output is always 16-bit.
    #[serde(default, alias = "filedepth")]
    pub file_depth: u32,
}

impl CanvasConfig {
    /// Build a configuration for a plain canvas.
    pub fn new(width: u32, height: u32, rows: u32, cols: u32) -> Self {
        Self {
            kind: CANVAS_OPTIONS.to_string(),
            frame_size: FrameSize {
                w: width,
                h: height,
            },
            grid_rows: rows,
            grid_columns: cols,
            ..Self::default()
        }
    }

    /// Read and validate the canvas options of one frame.
    pub fn from_widgets(widgets: &FrameWidgets) -> CardResult<Self> {
        let found: Vec<_> = widgets.with_tag(CANVAS_OPTIONS).collect();
        let [widget] = found.as_slice() else {
            return Err(CardError::CanvasOptions { count: found.len() });
        };

        let config: CanvasConfig = serde_json::from_value(Value::Object(widget.data.clone()))
            .map_err(|e| CardError::unmarshal(&widget.key, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Frame size must be non-zero and every grid cell at least one pixel.
    pub fn validate(&self) -> CardResult<()> {
        let FrameSize { w, h } = self.frame_size;
        if w == 0 || h == 0 {
            return Err(CardError::canvas(format!("frame size {w}x{h} is empty")));
        }
        let grid = self.grid();
        if grid.rows > h || grid.cols > w {
            return Err(CardError::canvas(format!(
                "{} rows by {} columns do not fit a {w}x{h} frame",
                grid.rows, grid.cols
            )));
        }
        Ok(())
    }

    pub fn grid(&self) -> GridDimensions {
        GridDimensions::new(self.grid_rows, self.grid_columns)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.frame_size.w, self.frame_size.h)
    }

    /// Parsed `backgroundFillColor`; transparent when unset.
    pub fn fill_colour(&self) -> Colour {
        parse_colour(&self.background_fill_color)
    }

    pub fn line_colour(&self) -> Colour {
        parse_colour(&self.line_color)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/canvas.rs"]
mod tests;
