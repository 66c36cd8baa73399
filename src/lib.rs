//! testcard lays out broadcast test cards from declarative factory files.
//!
//! A run resolves a factory tree into ordered widget instructions per frame,
//! binds grid aliases, turns grid expressions into pixel areas and
//! composites painted widgets over the frame's base canvas:
//!
//! - Open a [`CardSession`] over a factory file
//! - Register [`WidgetPainter`]s for the widget types you draw
//! - Render single frames, or all frames on a rayon pool
//!
//! Segment maps (TPIG) split a canvas into named, tagged regions that
//! [`carve`] cuts out of a finished frame.
#![forbid(unsafe_code)]

mod colour;
mod config;
mod factory;
mod foundation;
mod grid;
mod render;
mod tpig;

pub use crate::foundation::core::{GridDimensions, PixelRect, Point};
pub use crate::foundation::error::{CardError, CardResult};
pub use crate::foundation::lines::{SourceKey, SourceLines, content_digest};

pub use crate::colour::parse::{Colour, named_colour, parse_colour};
pub use crate::config::canvas::{CANVAS_OPTIONS, CanvasConfig, FrameSize, ImageType};
pub use crate::factory::frame::{AliasIdentity, FrameWidgets, MAX_GENERATED, WidgetInstruction};
pub use crate::factory::loader::{ByteLoader, FsLoader, is_remote, join_uri};
pub use crate::factory::model::{ArgDecl, Document, Factory, GenerateRule, Include, decode_document};
pub use crate::factory::resolve::{MAX_INCLUDE_DEPTH, ResolvedConfig, resolve_factory};
pub use crate::factory::template::{Args, Update, substitute};
pub use crate::grid::alias::AliasRegistry;
pub use crate::grid::context::FrameContext;
pub use crate::grid::lines::draw_grid_lines;
pub use crate::grid::locate::{GridArea, locate};
pub use crate::render::artkey::{ArtBackground, ArtKeyMatch, art_key_gen, art_to_canvas, is_art_key};
pub use crate::render::canvas::{Canvas, Rgba16Image};
pub use crate::render::decode::{decode_image, encode_png16};
pub use crate::render::pipeline::{
    CardSession, FILL, FillPainter, Painters, RenderOpts, RenderThreading, WidgetPainter,
};
pub use crate::tpig::base::base_gen;
pub use crate::tpig::carve::{Carved, carve};
pub use crate::tpig::flatmap::{Destination, SegmentMap, flatmap};
pub use crate::tpig::segment::{Segment, SplicedGeometry, get_grid_geometry, splice};
