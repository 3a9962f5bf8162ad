use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::AnimpackResult;

/// Font database for SVG `<text>`: system fonts plus any font files found next to the inputs.
pub fn svg_fontdb(resources_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    if let Some(dir) = resources_dir {
        load_fonts_from_dir(&mut db, dir);
        load_fonts_from_dir(&mut db, &dir.join("fonts"));
    }
    tracing::debug!(faces = db.len(), "svg font database ready");

    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            .unwrap_or(false);
        if path.is_file() && is_font {
            let _ = db.load_font_file(&path);
        }
    }
}

fn svg_options(
    resources_dir: Option<&Path>,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> usvg::Options<'static> {
    usvg::Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        fontdb: Arc::clone(fontdb),
        ..usvg::Options::default()
    }
}

pub fn parse_svg(
    bytes: &[u8],
    fontdb: &Arc<usvg::fontdb::Database>,
) -> AnimpackResult<Arc<usvg::Tree>> {
    let opts = svg_options(None, fontdb);
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(Arc::new(tree))
}

pub fn load_svg(
    path: &Path,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> AnimpackResult<Arc<usvg::Tree>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read svg '{}'", path.display()))?;
    let opts = svg_options(path.parent(), fontdb);
    let tree = usvg::Tree::from_data(&bytes, &opts)
        .with_context(|| format!("parse svg '{}'", path.display()))?;
    Ok(Arc::new(tree))
}
