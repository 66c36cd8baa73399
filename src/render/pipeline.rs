use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::colour::parse::parse_colour;
use crate::config::canvas::{CANVAS_OPTIONS, CanvasConfig};
use crate::factory::frame::{FrameWidgets, WidgetInstruction};
use crate::factory::loader::{ByteLoader, parent_dir};
use crate::factory::resolve::{ResolvedConfig, resolve_factory};
use crate::foundation::core::Point;
use crate::foundation::error::{CardError, CardResult};
use crate::grid::alias::AliasRegistry;
use crate::grid::context::FrameContext;
use crate::grid::locate::{GridArea, locate};
use crate::render::canvas::Canvas;
use crate::tpig::base::base_gen;

/// Widget type drawn by [`FillPainter`].
pub const FILL: &str = "builtin.fill";

/// Draws one widget type.
///
/// Painters run on rayon workers and must not rely on call order.
pub trait WidgetPainter: Send + Sync {
    /// Pixels of `widget`, sized to `area`.
    fn paint(&self, widget: &WidgetInstruction, area: &GridArea, ctx: &FrameContext) -> CardResult<Canvas>;
}

/// Fills the whole area with the widget's `colour` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct FillPainter;

impl WidgetPainter for FillPainter {
    fn paint(&self, widget: &WidgetInstruction, area: &GridArea, ctx: &FrameContext) -> CardResult<Canvas> {
        let colour = widget.field_str("colour").map(parse_colour).unwrap_or_default();
        Ok(Canvas::new(ctx.format(), area.width(), area.height(), colour))
    }
}

/// Painters keyed by widget `type`.
#[derive(Clone, Default)]
pub struct Painters {
    by_type: HashMap<String, Arc<dyn WidgetPainter>>,
}

impl Painters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the painters shipped with the crate.
    pub fn builtin() -> Self {
        Self::new().with(FILL, FillPainter)
    }

    /// Register `painter` for `kind`, replacing any previous one.
    pub fn with(mut self, kind: impl Into<String>, painter: impl WidgetPainter + 'static) -> Self {
        self.by_type.insert(kind.into(), Arc::new(painter));
        self
    }

    pub fn get(&self, kind: &str) -> Option<&dyn WidgetPainter> {
        self.by_type.get(kind).map(|p| &**p)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for Painters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.by_type.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("Painters").field("kinds", &kinds).finish()
    }
}

/// How frames of a session are scheduled.
#[derive(Clone, Debug, Default)]
pub struct RenderThreading {
    /// Render frames concurrently on a dedicated pool.
    pub parallel: bool,
    /// Pool size; rayon's default when unset.
    pub threads: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Locate and paint the widgets of a frame on rayon workers.
    pub parallel_widgets: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            parallel_widgets: true,
        }
    }
}

/// A resolved factory ready to render.
///
/// Every frame gets its own alias registry, context and canvas, so frames can
/// render concurrently from one session.
pub struct CardSession {
    config: ResolvedConfig,
    base_dir: PathBuf,
    loader: Arc<dyn ByteLoader>,
    painters: Painters,
    opts: RenderOpts,
}

impl fmt::Debug for CardSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardSession")
            .field("path", &self.config.path())
            .field("frames", &self.config.frame_count())
            .field("base_dir", &self.base_dir)
            .field("painters", &self.painters)
            .field("opts", &self.opts)
            .finish()
    }
}

struct Painted {
    image: Canvas,
    origin: Point,
}

impl CardSession {
    /// Resolve the factory at `path`.
    ///
    /// `base_dir` anchors relative includes, segment maps and base images; it
    /// defaults to the directory of `path`.
    pub fn open(
        path: &str,
        base_dir: Option<&Path>,
        loader: Arc<dyn ByteLoader>,
        painters: Painters,
        opts: RenderOpts,
    ) -> CardResult<Self> {
        let config = resolve_factory(path, base_dir, loader.as_ref())?;
        let base_dir = base_dir.map_or_else(|| parent_dir(path).to_path_buf(), Path::to_path_buf);
        Ok(Self {
            config,
            base_dir,
            loader,
            painters,
            opts,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.config.frame_count()
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Widgets of `frame` in compositing order, resolved against a fresh registry.
    pub fn widgets(&self, frame: usize) -> CardResult<FrameWidgets> {
        self.config.frame_widgets(frame, &AliasRegistry::new())
    }

    #[tracing::instrument(skip(self), fields(path = %self.config.path()))]
    /// Render one frame.
    ///
    /// Widgets without a location or a painter are skipped. Geometry and paint
    /// failures of all widgets are reported together and no canvas is returned.
    pub fn render_frame(&self, frame: usize) -> CardResult<Canvas> {
        let registry = AliasRegistry::new();
        let widgets = self.config.frame_widgets(frame, &registry)?;
        let config = CanvasConfig::from_widgets(&widgets)?;
        let ctx = FrameContext::prepare(config, registry, &self.base_dir, self.loader.as_ref())?;
        let mut canvas = base_gen(&ctx, None)?;

        let drawable: Vec<&WidgetInstruction> = widgets
            .iter()
            .filter(|w| w.tag != CANVAS_OPTIONS)
            .collect();
        let results: Vec<CardResult<Option<Painted>>> = if self.opts.parallel_widgets {
            drawable
                .par_iter()
                .map(|widget| self.paint_widget(widget, &ctx))
                .collect()
        } else {
            drawable
                .iter()
                .map(|widget| self.paint_widget(widget, &ctx))
                .collect()
        };

        let mut painted = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(Some(p)) => painted.push(p),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }
        if let Some(err) = CardError::collect(errors) {
            return Err(err);
        }

        for p in &painted {
            canvas.draw_over(&p.image, p.origin);
        }
        tracing::debug!(frame, widgets = painted.len(), "frame composited");
        Ok(canvas)
    }

    /// Render every frame, in frame order.
    pub fn render_frames(&self, threading: &RenderThreading) -> CardResult<Vec<Canvas>> {
        let frames = 0..self.frame_count();
        if !threading.parallel {
            return frames.map(|frame| self.render_frame(frame)).collect();
        }

        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            frames
                .into_par_iter()
                .map(|frame| self.render_frame(frame))
                .collect()
        })
    }

    fn paint_widget(&self, widget: &WidgetInstruction, ctx: &FrameContext) -> CardResult<Option<Painted>> {
        let Some(location) = widget.grid_location() else {
            tracing::warn!(widget = %widget.key, "widget has no grid location, skipped");
            return Ok(None);
        };
        let area = locate(location, widget.grid_alias().unwrap_or_default(), ctx)?;

        let Some(painter) = self.painters.get(&widget.tag) else {
            tracing::warn!(widget = %widget.key, kind = %widget.tag, "no painter for widget type, skipped");
            return Ok(None);
        };
        let image = painter.paint(widget, &area, ctx)?;
        Ok(Some(Painted {
            image,
            origin: area.origin,
        }))
    }
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardError::Other(anyhow::anyhow!(
            "render threading 'threads' must be >= 1 when set"
        )));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .context("build rayon thread pool")
        .map_err(CardError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
