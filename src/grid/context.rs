use std::path::Path;

use crate::config::canvas::{CanvasConfig, ImageType};
use crate::factory::loader::{ByteLoader, join_uri};
use crate::foundation::core::GridDimensions;
use crate::foundation::error::CardResult;
use crate::grid::alias::AliasRegistry;
use crate::render::artkey::{ArtBackground, art_key_gen};
use crate::tpig::flatmap::flatmap;
use crate::tpig::segment::SplicedGeometry;

/// Everything one frame needs to locate and composite widgets.
///
/// Built once per frame and shared read-only between workers; the alias
/// registry is the only part written after construction.
#[derive(Debug)]
pub struct FrameContext {
    /// Canvas options of the frame.
    pub config: CanvasConfig,
    /// Aliases bound so far in this frame.
    pub aliases: AliasRegistry,
    /// Spliced grid with the segment map, when `geometry` is set.
    pub geometry: Option<SplicedGeometry>,
    /// Scaled `baseImage`, when set.
    pub background: Option<ArtBackground>,
    width: u32,
    height: u32,
}

impl FrameContext {
    /// Context without segment map or background art.
    pub fn new(config: CanvasConfig) -> Self {
        let (width, height) = config.size();
        Self {
            config,
            aliases: AliasRegistry::new(),
            geometry: None,
            background: None,
            width,
            height,
        }
    }

    /// Replace the alias registry.
    pub fn with_aliases(mut self, aliases: AliasRegistry) -> Self {
        self.aliases = aliases;
        self
    }

    #[tracing::instrument(skip_all, fields(geometry = %config.geometry, base_image = %config.base_image))]
    /// Load the segment map and background art named by `config`.
    ///
    /// A segment map defines the canvas size; a different `frameSize` is
    /// overridden with a warning.
    pub fn prepare(
        config: CanvasConfig,
        aliases: AliasRegistry,
        base_dir: &Path,
        loader: &dyn ByteLoader,
    ) -> CardResult<Self> {
        config.validate()?;
        let mut ctx = Self::new(config).with_aliases(aliases);

        if !ctx.config.geometry.trim().is_empty() {
            let uri = join_uri(base_dir, &ctx.config.geometry);
            let destination = flatmap(&loader.load_bytes(&uri)?, &uri)?;
            let map = destination.map;
            if (map.width, map.height) != ctx.config.size() {
                tracing::warn!(
                    frame_w = ctx.config.frame_size.w,
                    frame_h = ctx.config.frame_size.h,
                    map_w = map.width,
                    map_h = map.height,
                    "segment map size overrides frameSize"
                );
                ctx.config.frame_size.w = map.width;
                ctx.config.frame_size.h = map.height;
                ctx.config.validate()?;
            }
            ctx.width = map.width;
            ctx.height = map.height;
            let (cw, ch) = ctx.cell_size();
            ctx.geometry = Some(SplicedGeometry::new(Some(map), cw, ch, ctx.size())?);
        }

        if !ctx.config.base_image.trim().is_empty() {
            let uri = join_uri(base_dir, &ctx.config.base_image);
            ctx.background = Some(art_key_gen(&loader.load_bytes(&uri)?, ctx.size())?);
        }
        Ok(ctx)
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn grid(&self) -> GridDimensions {
        self.config.grid()
    }

    /// Grid cell size, integer truncated.
    pub fn cell_size(&self) -> (u32, u32) {
        self.grid().cell_size(self.width, self.height)
    }

    pub fn format(&self) -> ImageType {
        self.config.image_type
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/context.rs"]
mod tests;
