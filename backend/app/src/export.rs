use std::fmt;

use scanflow_core::DocumentRecord;

const RULE_WIDTH: usize = 60;

/// Render a record as a plain-text printable page.
pub fn render_printable(record: &DocumentRecord) -> String {
    PrintablePage(record).to_string()
}

/// Printable layout of a record: header block, summary, extracted text,
/// then a signature line. Images are never inlined.
pub struct PrintablePage<'a>(pub &'a DocumentRecord);

impl fmt::Display for PrintablePage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "{}", record.title)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Category: {}", record.category)?;
        writeln!(f, "Captured: {}", record.timestamp.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(f, "Id:       {}", record.id)?;
        writeln!(f)?;

        writeln!(f, "Summary")?;
        writeln!(f, "{thin}")?;
        writeln!(f, "{}", record.summary.trim())?;
        writeln!(f)?;

        writeln!(f, "Extracted text")?;
        writeln!(f, "{thin}")?;
        match record.extracted_text.trim() {
            "" => writeln!(f, "(no text detected)")?,
            text => writeln!(f, "{text}")?,
        }
        writeln!(f)?;

        writeln!(f, "{thin}")?;
        writeln!(f, "{}", if record.is_signed() { "Signed" } else { "Not signed" })
    }
}
