//! Figure output.
//!
//! Figures are drawn as SVG and written twice: the SVG itself and a PDF
//! rendition converted with `svg2pdf`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use svg2pdf::usvg::{self, fontdb};
use svg2pdf::{ConversionOptions, PageOptions};

use super::{Error, Format, write_bytes, write_text};

static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

fn fonts() -> Arc<fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Converts an SVG document to a single-page PDF.
///
/// `path` only names the figure in errors.
pub fn svg_to_pdf(svg: &str, path: &Path) -> Result<Vec<u8>, Error> {
    let mut options = usvg::Options::default();
    options.fontdb = fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| Error::convert(path, Format::Pdf, e.to_string()))?;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| Error::convert(path, Format::Pdf, format!("{e:?}")))
}

/// Writes `<stem>.pdf` and `<stem>.svg` into `dir` and returns the PDF path.
pub fn write_figure(dir: &Path, stem: &str, svg: &str) -> Result<PathBuf, Error> {
    let pdf_path = dir.join(format!("{stem}.pdf"));
    let pdf = svg_to_pdf(svg, &pdf_path)?;
    write_bytes(&pdf_path, &pdf)?;
    write_text(&dir.join(format!("{stem}.svg")), svg)?;
    Ok(pdf_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20"><rect width="20" height="20" fill="red"/></svg>"#;

    #[test]
    fn converts_svg_to_pdf() {
        let pdf = svg_to_pdf(SQUARE, Path::new("square.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn writes_both_renditions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_figure(dir.path(), "square", SQUARE).unwrap();
        assert_eq!(path.file_name().unwrap(), "square.pdf");
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
        assert_eq!(
            fs::read_to_string(dir.path().join("square.svg")).unwrap(),
            SQUARE
        );
    }

    #[test]
    fn malformed_svg_is_a_conversion_error() {
        let err = svg_to_pdf("<svg", Path::new("broken.pdf")).unwrap_err();
        assert!(matches!(
            err,
            Error::Convert { format: Format::Pdf, ref path, .. } if path.ends_with("broken.pdf")
        ));
    }
}
