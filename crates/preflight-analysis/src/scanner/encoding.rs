//! Encoding inspection: byte-order marks and stray control characters.

use super::types::EncodingWarning;

pub(crate) const BOM: char = '\u{FEFF}';

/// C0 controls other than tab, LF, and CR.
fn is_invalid_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}')
}

/// Inspect decoded text for non-fatal encoding problems.
pub fn inspect(text: &str) -> Vec<EncodingWarning> {
    let mut warnings = Vec::new();

    if text.starts_with(BOM) {
        warnings.push(EncodingWarning::ByteOrderMark);
    }

    let mut count = 0usize;
    let mut first_line = None;
    for (idx, line) in text.split('\n').enumerate() {
        let bad = line.chars().filter(|&c| is_invalid_control(c)).count();
        if bad > 0 {
            count += bad;
            first_line.get_or_insert(idx as u32 + 1);
        }
    }
    if let Some(first_line) = first_line {
        warnings.push(EncodingWarning::ControlCharacters { count, first_line });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_has_no_warnings() {
        assert!(inspect("function a() {\n\treturn 1;\r\n}\n").is_empty());
    }

    #[test]
    fn test_bom_detected() {
        assert_eq!(inspect("\u{FEFF}var x;"), vec![EncodingWarning::ByteOrderMark]);
    }

    #[test]
    fn test_control_characters_counted_with_first_line() {
        let warnings = inspect("ok\nbad\u{07}\nworse\u{00}\u{1B}\n");
        assert_eq!(
            warnings,
            vec![EncodingWarning::ControlCharacters {
                count: 3,
                first_line: 2
            }]
        );
    }
}
