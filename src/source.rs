//! Finite, ordered frame inputs.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::color::Rgba8;
use crate::assets::decode::{load_svg, svg_fontdb};
use crate::foundation::core::Canvas;
use crate::foundation::error::{AnimpackError, AnimpackResult};
use crate::render::{FrameRGBA, rasterize_svg, svg_natural_size};

/// One input frame, either already encoded or still raw pixels.
#[derive(Clone, Debug)]
pub enum SourceFrame {
    /// A complete still PNG.
    Encoded(Vec<u8>),
    /// Pixels that still need a still-image encoder.
    Raster(FrameRGBA),
}

/// Random-access frame input with a fixed frame count.
pub trait FrameSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size every frame is produced at, when the source fixes one. Encoded sources return
    /// `None`; their geometry is read from each frame's own header.
    fn nominal_size(&mut self) -> AnimpackResult<Option<Canvas>>;

    fn frame(&mut self, index: u32) -> AnimpackResult<SourceFrame>;
}

/// Already-encoded PNG files, read lazily in order.
#[derive(Clone, Debug)]
pub struct PngSequence {
    paths: Vec<PathBuf>,
}

impl PngSequence {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    fn path(&self, index: u32) -> AnimpackResult<&Path> {
        self.paths
            .get(index as usize)
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                AnimpackError::validation(format!(
                    "frame {index} out of range (sequence has {})",
                    self.paths.len()
                ))
            })
    }
}

impl FrameSource for PngSequence {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn nominal_size(&mut self) -> AnimpackResult<Option<Canvas>> {
        Ok(None)
    }

    fn frame(&mut self, index: u32) -> AnimpackResult<SourceFrame> {
        let path = self.path(index)?;
        let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        Ok(SourceFrame::Encoded(bytes))
    }
}

/// SVG files rasterized one at a time.
#[derive(Clone)]
pub struct SvgSequence {
    paths: Vec<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    background: Rgba8,
    size: Option<Canvas>,
    first_tree: Option<Arc<usvg::Tree>>,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgSequence {
    /// `width`/`height` override the raster size; when only one is given the other follows the
    /// first SVG's aspect ratio.
    pub fn new(
        paths: Vec<PathBuf>,
        width: Option<u32>,
        height: Option<u32>,
        background: Option<Rgba8>,
    ) -> Self {
        let fontdb = svg_fontdb(paths.first().and_then(|p| p.parent()));
        Self {
            paths,
            width,
            height,
            background: background.unwrap_or(Rgba8::TRANSPARENT),
            size: None,
            first_tree: None,
            fontdb,
        }
    }

    fn load(&self, index: u32) -> AnimpackResult<Arc<usvg::Tree>> {
        let path = self.paths.get(index as usize).ok_or_else(|| {
            AnimpackError::validation(format!(
                "frame {index} out of range (sequence has {})",
                self.paths.len()
            ))
        })?;
        load_svg(path, &self.fontdb)
    }

    /// Raster size shared by every frame, resolved from the first SVG on first use.
    fn canvas(&mut self) -> AnimpackResult<Canvas> {
        if let Some(size) = self.size {
            return Ok(size);
        }
        let tree = self.load(0)?;
        let (nw, nh) = svg_natural_size(&tree)?;
        let scale = |v: u32, num: u32, den: u32| -> u32 {
            ((f64::from(v) * f64::from(num) / f64::from(den)).round() as u32).max(1)
        };
        let (w, h) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, scale(nh, w, nw)),
            (None, Some(h)) => (scale(nw, h, nh), h),
            (None, None) => (nw, nh),
        };
        let size = Canvas::new(w, h)?;
        self.size = Some(size);
        self.first_tree = Some(tree);
        Ok(size)
    }
}

impl FrameSource for SvgSequence {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn nominal_size(&mut self) -> AnimpackResult<Option<Canvas>> {
        self.canvas().map(Some)
    }

    fn frame(&mut self, index: u32) -> AnimpackResult<SourceFrame> {
        let size = self.canvas()?;
        let tree = match (index, &self.first_tree) {
            (0, Some(t)) => Arc::clone(t),
            _ => self.load(index)?,
        };
        Ok(SourceFrame::Raster(rasterize_svg(
            &tree,
            size.width,
            size.height,
            self.background,
        )?))
    }
}

/// Input file kind, by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Png,
    Svg,
}

impl InputKind {
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

/// Expand CLI inputs into an ordered frame list.
///
/// A single directory expands to its `.png`/`.svg` files in natural name order
/// (`frame-2` before `frame-10`). Explicit file lists keep the order given.
pub fn collect_inputs(inputs: &[PathBuf]) -> AnimpackResult<(InputKind, Vec<PathBuf>)> {
    let paths = match inputs {
        [dir] if dir.is_dir() => {
            let mut files = Vec::new();
            let entries = std::fs::read_dir(dir)
                .with_context(|| format!("read input directory '{}'", dir.display()))?;
            for entry in entries {
                let path = entry
                    .with_context(|| format!("read input directory '{}'", dir.display()))?
                    .path();
                if path.is_file() && InputKind::of(&path).is_some() {
                    files.push(path);
                }
            }
            files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
            files
        }
        _ => inputs.to_vec(),
    };

    let Some(first) = paths.first() else {
        return Err(AnimpackError::validation("no input frames found"));
    };
    let kind = InputKind::of(first).ok_or_else(|| {
        AnimpackError::validation(format!(
            "unsupported input '{}' (expected .png or .svg)",
            first.display()
        ))
    })?;
    if let Some(other) = paths.iter().find(|p| InputKind::of(p) != Some(kind)) {
        return Err(AnimpackError::validation(format!(
            "input '{}' does not match the {kind:?} inputs before it",
            other.display()
        )));
    }

    Ok((kind, paths))
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compare names treating runs of ASCII digits as numbers.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let da = a.iter().take_while(|c| c.is_ascii_digit()).count();
                let db = b.iter().take_while(|c| c.is_ascii_digit()).count();
                let (na, nb) = (trim_zeros(&a[..da]), trim_zeros(&b[..db]));
                let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                if ord != Ordering::Equal {
                    return ord;
                }
                a = &a[da..];
                b = &b[db..];
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(y);
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let n = digits.iter().take_while(|&&c| c == b'0').count();
    &digits[n..]
}
