//! Code-to-label tables for enumerated profile fields

use crate::schema::CodeOrLabel;

/// Ordered `(code, label)` pairs of one enumerated field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTable(pub &'static [(i64, &'static str)]);

impl LabelTable {
    pub fn get(&self, code: i64) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    /// Label of code 0, used for codes the table does not know
    pub fn fallback(&self) -> Option<&'static str> {
        self.get(0)
    }
}

pub const HRV_STATUS: LabelTable = LabelTable(&[
    (0, "none"),
    (1, "poor"),
    (2, "low"),
    (3, "unbalanced"),
    (4, "balanced"),
]);

pub const SLEEP_LEVEL: LabelTable = LabelTable(&[
    (0, "unmeasurable"),
    (1, "awake"),
    (2, "light"),
    (3, "deep"),
    (4, "rem"),
]);

/// Resolve a code through `table`; labels pass through unchanged
pub fn resolve_label(value: &CodeOrLabel, table: &LabelTable) -> String {
    match value {
        CodeOrLabel::Label(label) => label.clone(),
        CodeOrLabel::Code(code) => table
            .get(*code)
            .or_else(|| table.fallback())
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string()),
    }
}
