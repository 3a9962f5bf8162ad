use crate::assets::color::Rgba8;
use crate::foundation::error::{AnimpackError, AnimpackResult};
use crate::foundation::math::composite_over_in_place;

/// A rendered frame in RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn validate(&self) -> AnimpackResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AnimpackError::validation(
                "frame width/height must be non-zero",
            ));
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(self.data.len()) {
            return Err(AnimpackError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}

/// Largest raster edge we agree to allocate.
const MAX_DIM: u32 = 16_384;

/// Rasterize an SVG tree into a premultiplied frame of `width`x`height`, scaled to fit
/// exactly, over `background`.
pub fn rasterize_svg(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
    background: Rgba8,
) -> AnimpackResult<FrameRGBA> {
    if width > MAX_DIM || height > MAX_DIM {
        return Err(AnimpackError::validation(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| AnimpackError::validation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());

    let mut data = pixmap.take();
    if background.a != 0 {
        composite_over_in_place(&mut data, background.to_array());
    }

    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    })
}

/// Natural pixel size of an SVG (its `width`/`height`, rounded up).
pub fn svg_natural_size(tree: &usvg::Tree) -> AnimpackResult<(u32, u32)> {
    fn to_px(v: f32) -> AnimpackResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(AnimpackError::validation("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }
    let size = tree.size();
    Ok((to_px(size.width())?, to_px(size.height())?))
}
