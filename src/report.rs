//! Medicine-analysis PDF export via `printpdf`.

use std::io::BufWriter;

use printpdf::*;

use crate::models::MedicineCount;

#[derive(Debug, thiserror::Error)]
#[error("PDF generation failed: {0}")]
pub struct ReportError(String);

/// Render the medicine-frequency aggregation as an A4 report, adding pages
/// as needed. Returns PDF bytes.
pub fn generate_analysis_pdf(counts: &[MedicineCount]) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new("Medicine Analysis", Mm(210.0), Mm(297.0), "Layer 1");
    let mut layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError(format!("font error: {e}")))?;

    let mut y = Mm(280.0);

    // Title
    layer.use_text("Medicine Analysis", 14.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(
        format!("Generated: {}", chrono::Utc::now().format("%Y-%m-%d")),
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    if counts.is_empty() {
        layer.use_text("No saved prescriptions yet.", 10.0, Mm(20.0), y, &font);
    } else {
        layer.use_text("MEDICINE", 10.0, Mm(20.0), y, &bold);
        layer.use_text("TIMES PRESCRIBED", 10.0, Mm(140.0), y, &bold);
        y -= Mm(6.0);

        for entry in counts {
            if y < Mm(15.0) {
                let (page, layer_idx) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
                layer = doc.get_page(page).get_layer(layer_idx);
                y = Mm(280.0);
                layer.use_text("MEDICINE", 10.0, Mm(20.0), y, &bold);
                layer.use_text("TIMES PRESCRIBED", 10.0, Mm(140.0), y, &bold);
                y -= Mm(6.0);
            }
            let name_line = wrap_text(&entry.name, 70).remove(0);
            layer.use_text(&name_line, 9.0, Mm(20.0), y, &font);
            layer.use_text(entry.count.to_string(), 9.0, Mm(140.0), y, &font);
            y -= Mm(5.5);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError(format!("buffer error: {e}")))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_pdf_bytes() {
        let counts = vec![
            MedicineCount { name: "Napa 500 mg".into(), count: 3 },
            MedicineCount { name: "Seclo 20 mg".into(), count: 1 },
        ];
        let bytes = generate_analysis_pdf(&counts).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_counts_still_produce_a_document() {
        let bytes = generate_analysis_pdf(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    // Page objects in the serialized output; one per rendered page plus
    // the page-tree node.
    fn page_object_count(bytes: &[u8]) -> usize {
        bytes.windows(b"/Type/Page".len()).filter(|w| *w == b"/Type/Page").count()
    }

    #[test]
    fn long_listings_continue_on_further_pages() {
        let counts: Vec<MedicineCount> = (0..120)
            .map(|i| MedicineCount { name: format!("Medicine {i}"), count: 1 })
            .collect();

        let one_page = generate_analysis_pdf(&counts[..1]).unwrap();
        let multi_page = generate_analysis_pdf(&counts).unwrap();
        assert!(multi_page.starts_with(b"%PDF"));
        assert!(page_object_count(&multi_page) > page_object_count(&one_page));
    }

    #[test]
    fn wrap_text_splits_long_lines() {
        let lines = wrap_text("one two three four five", 10);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 10));
    }

    #[test]
    fn wrap_text_empty_input_yields_one_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
