use crate::foundation::core::Point;
use crate::foundation::error::{CardError, CardResult};
use crate::grid::context::FrameContext;
use crate::grid::lines::draw_grid_lines;
use crate::render::canvas::Canvas;

/// Starting canvas of a frame.
///
/// `prior` is kept as is (converted to the frame format) and must match the
/// frame size. Otherwise a new canvas is filled with `backgroundFillColor`.
/// Background art, when loaded, is drawn over either, then the grid lines.
pub fn base_gen(ctx: &FrameContext, prior: Option<Canvas>) -> CardResult<Canvas> {
    let (width, height) = ctx.size();
    let mut canvas = match prior {
        Some(prior) if prior.dimensions() != (width, height) => {
            let (pw, ph) = prior.dimensions();
            return Err(CardError::canvas(format!(
                "base canvas is {pw}x{ph} but the frame is {width}x{height}"
            )));
        }
        Some(prior) if prior.format() == ctx.format() => prior,
        Some(prior) => prior.to_format(ctx.format()),
        None => Canvas::new(ctx.format(), width, height, ctx.config.fill_colour()),
    };

    if let Some(background) = &ctx.background {
        canvas.draw_over(&background.canvas(), Point::ZERO);
    }
    draw_grid_lines(&mut canvas, ctx);
    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/tpig/base.rs"]
mod tests;
