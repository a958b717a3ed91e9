//! Fixer: applies the line edits carried by diagnostics.
//!
//! Only diagnostics with both a line and a fix participate. Lines are visited
//! in descending order; edits that share a line are applied in detection
//! order to the line's current text. Edits never insert or delete lines, so
//! line numbers stay valid throughout. Callers re-run the rule engine on the
//! result to get an accurate report.

use crate::models::{Diagnostic, Fix};
use tracing::debug;

/// The fixable subset of a document's diagnostics, ordered for application.
#[derive(Debug, Default)]
pub struct FixPlan<'a> {
    edits: Vec<(usize, &'a Fix)>,
}

impl<'a> FixPlan<'a> {
    pub fn new(diagnostics: &'a [Diagnostic]) -> Self {
        let mut edits: Vec<(usize, &Fix)> = diagnostics
            .iter()
            .filter_map(|d| Some((d.line?, d.fix.as_ref()?)))
            .collect();
        // Stable: ties keep detection order.
        edits.sort_by(|a, b| b.0.cmp(&a.0));
        Self { edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Apply every edit to `text`, preserving line endings.
    pub fn apply(&self, text: &str) -> String {
        if self.edits.is_empty() {
            return text.to_string();
        }
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let last = lines.len() - 1;
        for (line, fix) in &self.edits {
            let Some((idx, slot)) = line
                .checked_sub(1)
                .and_then(|i| lines.get_mut(i).map(|slot| (i, slot)))
            else {
                debug!(line, "fix targets a line outside the document");
                continue;
            };
            // A `\r` is a line ending only when a `\n` follows it.
            let (body, eol) = match slot.strip_suffix('\r') {
                Some(body) if idx < last => (body, "\r"),
                _ => (slot.as_str(), ""),
            };
            let fixed = format!("{}{eol}", fix.apply(body));
            *slot = fixed;
        }
        lines.join("\n")
    }
}

/// Apply all fixable diagnostics to `text`.
pub fn apply(text: &str, diagnostics: &[Diagnostic]) -> String {
    FixPlan::new(diagnostics).apply(text)
}
