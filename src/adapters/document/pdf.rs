//! Built-in PDF renderer
//!
//! Writes a plain PDF 1.4 file by hand: A4 portrait pages, the standard
//! Helvetica fonts, a title block on the first page, a repeated table
//! header, and a "Page i of n" footer. Text outside printable ASCII is
//! replaced with `?` since only the base-14 fonts are available.

use super::traits::{Document, DocumentRenderer};
use crate::domain::RenderFailure;
use std::fmt::Write as _;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const TITLE_SIZE: f32 = 14.0;
const META_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 8.0;
const LINE_GAP: f32 = 4.0;
/// Narrowest column that still fits a few characters
const MIN_COLUMN_WIDTH: f32 = 28.0;

/// Paginated PDF renderer
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    rows_per_page: usize,
}

impl PdfRenderer {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// Lay out every page's content stream
    fn layout(&self, document: &Document) -> Result<Vec<String>, RenderFailure> {
        if document.columns.is_empty() {
            return Err(RenderFailure::Layout("document has no columns".to_string()));
        }

        let usable = PAGE_WIDTH - 2.0 * MARGIN;
        let column_width = usable / document.columns.len() as f32;
        if column_width < MIN_COLUMN_WIDTH {
            return Err(RenderFailure::Layout(format!(
                "{} columns do not fit on one page",
                document.columns.len()
            )));
        }
        // Helvetica averages roughly half an em per glyph
        let max_chars = ((column_width - 4.0) / (TABLE_SIZE * 0.5)).floor() as usize;

        let chunks: Vec<&[Vec<String>]> = if document.rows.is_empty() {
            vec![&document.rows[..]]
        } else {
            document.rows.chunks(self.rows_per_page).collect()
        };
        let page_count = chunks.len();

        let mut pages = Vec::with_capacity(page_count);
        for (index, rows) in chunks.into_iter().enumerate() {
            let mut stream = String::new();
            let mut y = PAGE_HEIGHT - MARGIN;

            if index == 0 {
                y -= TITLE_SIZE;
                text(&mut stream, "F2", TITLE_SIZE, MARGIN, y, &document.title);
                y -= LINE_GAP * 2.0;
                for line in &document.metadata {
                    y -= META_SIZE + LINE_GAP;
                    text(&mut stream, "F1", META_SIZE, MARGIN, y, line);
                }
                y -= LINE_GAP * 3.0;
            }

            y -= TABLE_SIZE + LINE_GAP;
            for (col, label) in document.columns.iter().enumerate() {
                let x = MARGIN + col as f32 * column_width;
                text(&mut stream, "F2", TABLE_SIZE, x, y, &truncate(label, max_chars));
            }
            rule(&mut stream, y - 2.0);

            for row in rows {
                y -= TABLE_SIZE + LINE_GAP;
                if y < MARGIN + 2.0 * META_SIZE {
                    return Err(RenderFailure::Layout(format!(
                        "{} rows per page overflow the page",
                        self.rows_per_page
                    )));
                }
                for (col, cell) in row.iter().take(document.columns.len()).enumerate() {
                    let x = MARGIN + col as f32 * column_width;
                    text(&mut stream, "F1", TABLE_SIZE, x, y, &truncate(cell, max_chars));
                }
            }

            let mut footer = format!("Page {} of {}", index + 1, page_count);
            if let Some(extra) = &document.footer {
                footer = format!("{extra}    {footer}");
            }
            text(&mut stream, "F1", META_SIZE - 2.0, MARGIN, MARGIN / 2.0, &footer);

            pages.push(stream);
        }

        Ok(pages)
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(30)
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderFailure> {
        let pages = self.layout(document)?;
        let bytes = assemble(&pages);
        if bytes.is_empty() {
            return Err(RenderFailure::Empty);
        }
        Ok(bytes)
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

fn text(stream: &mut String, font: &str, size: f32, x: f32, y: f32, value: &str) {
    let _ = writeln!(
        stream,
        "BT /{font} {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET",
        escape(value)
    );
}

fn rule(stream: &mut String, y: f32) {
    let _ = writeln!(
        stream,
        "0.5 w {:.2} {y:.2} m {:.2} {y:.2} l S",
        MARGIN,
        PAGE_WIDTH - MARGIN
    );
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}~")
    }
}

/// Escape a PDF literal string
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Write the object graph and cross-reference table
fn assemble(pages: &[String]) -> Vec<u8> {
    // 1 catalog, 2 page tree, 3 regular font, 4 bold font, then page/content pairs
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + i * 2).collect();
    let mut objects: Vec<String> = Vec::with_capacity(4 + pages.len() * 2);

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (page_id, content) in page_ids.iter().zip(pages) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = writeln!(out, "{} 0 obj\n{body}\nendobj", index + 1);
    }

    let xref_offset = out.len();
    let _ = writeln!(out, "xref\n0 {}\n0000000000 65535 f ", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(out, "{offset:010} 00000 n ");
    }
    let _ = writeln!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF",
        objects.len() + 1
    );

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(rows: usize) -> Document {
        Document {
            title: "Attendance Report".to_string(),
            metadata: vec!["Period: 2025-01-06 to 2025-01-10".to_string()],
            columns: vec!["Student".to_string(), "Class".to_string(), "Rate".to_string()],
            rows: (0..rows)
                .map(|i| vec![format!("Student {i}"), "Math 7-A".to_string(), "90.0".to_string()])
                .collect(),
            footer: Some("Teacher Portal".to_string()),
        }
    }

    #[test]
    fn test_renders_valid_pdf_shell() {
        let bytes = PdfRenderer::new(30).render(&document(3)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("(Attendance Report) Tj"));
        assert!(text.contains("(Teacher Portal    Page 1 of 1) Tj"));
    }

    #[test]
    fn test_paginates_rows() {
        let bytes = PdfRenderer::new(10).render(&document(25)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("/Count 3"));
        assert!(text.contains("Page 3 of 3"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = PdfRenderer::new(30).render(&document(2)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let xref_at: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(text[xref_at..].starts_with("xref"));

        let first_entry = text[xref_at..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(text[offset..].starts_with("1 0 obj"));
    }

    #[test]
    fn test_layout_failures() {
        let mut doc = document(1);
        doc.columns.clear();
        assert!(matches!(
            PdfRenderer::default().render(&doc),
            Err(RenderFailure::Layout(_))
        ));

        let mut wide = document(1);
        wide.columns = (0..40).map(|i| format!("c{i}")).collect();
        assert!(PdfRenderer::default().render(&wide).is_err());

        assert!(PdfRenderer::new(200).render(&document(200)).is_err());
    }

    #[test]
    fn test_escape_and_truncate() {
        assert_eq!(escape("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape("Peña"), "Pe?a");
        assert_eq!(truncate("abcdef", 4), "abc~");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
