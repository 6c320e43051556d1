//! Delimited-text rendering
//!
//! Header row of column labels, then one line per detail row. Lines end
//! with CRLF.

use crate::core::report::ReportDataset;

/// UTF-8 byte-order mark; spreadsheet apps need it to detect the charset
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Quote a field when it holds the delimiter, a quote or a line break
///
/// ```
/// use classroll::core::export::delimited::escape_field;
///
/// assert_eq!(escape_field("plain", ','), "plain");
/// assert_eq!(escape_field("Reyes, Ana", ','), "\"Reyes, Ana\"");
/// assert_eq!(escape_field("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_line<'a, I>(out: &mut String, fields: I, delimiter: char)
where
    I: IntoIterator<Item = &'a str>,
{
    let line: Vec<String> = fields
        .into_iter()
        .map(|f| escape_field(f, delimiter))
        .collect();
    out.push_str(&line.join(&delimiter.to_string()));
    out.push_str("\r\n");
}

/// Render `dataset` with `delimiter`, optionally prefixed by [`UTF8_BOM`]
pub fn render(dataset: &ReportDataset, delimiter: char, bom: bool) -> Vec<u8> {
    let mut text = String::new();
    push_line(&mut text, dataset.labels(), delimiter);
    for row in dataset.text_rows() {
        push_line(&mut text, row.iter().map(String::as_str), delimiter);
    }

    let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if bom {
        bytes.extend_from_slice(UTF8_BOM);
    }
    bytes.extend_from_slice(text.as_bytes());
    bytes
}
