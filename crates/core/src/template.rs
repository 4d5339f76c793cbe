use crate::extract::FieldValues;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Character that introduces a field code inside a template.
pub const ESCAPE: char = '\\';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Index,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    /// Codes are case-sensitive: `h` is Hour, `H` is not a field.
    pub fn from_code(code: char) -> Option<Field> {
        match code {
            'i' => Some(Field::Index),
            'Y' => Some(Field::Year),
            'M' => Some(Field::Month),
            'D' => Some(Field::Day),
            'h' => Some(Field::Hour),
            'm' => Some(Field::Minute),
            's' => Some(Field::Second),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Field::Index => 'i',
            Field::Year => 'Y',
            Field::Month => 'M',
            Field::Day => 'D',
            Field::Hour => 'h',
            Field::Minute => 'm',
            Field::Second => 's',
        }
    }

    /// Zero-padded width used when composing the field. Index is padded by the caller.
    pub fn canonical_width(self) -> usize {
        match self {
            Field::Year => 4,
            Field::Index => 1,
            _ => 2,
        }
    }
}

/// Location of a field's digits inside a name, counted in characters of the stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub field: Field,
    pub start: usize,
    pub len: usize,
}

impl FieldSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Field { field: Field, width: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("テンプレートが空です")]
    Empty,
    #[error("未対応のフィールドコードです: \\{0}")]
    UnknownField(char),
    #[error("エスケープ文字 \\ の後にフィールドコードがありません")]
    UnterminatedEscape,
    #[error("フィールドが重複しています: \\{}", .0.code())]
    DuplicateField(Field),
    #[error("旧テンプレートに存在しないフィールドです: \\{}", .0.code())]
    MissingSourceField(Field),
}

pub fn validate_template(input: &str) -> Result<(), TemplateError> {
    parse_template(input).map(|_| ())
}

pub fn parse_template(input: &str) -> Result<Vec<TemplatePart>, TemplateError> {
    if input.is_empty() {
        return Err(TemplateError::Empty);
    }

    let chars: Vec<char> = input.chars().collect();
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut seen = BTreeSet::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch != ESCAPE {
            literal.push(ch);
            i += 1;
            continue;
        }

        let code = *chars.get(i + 1).ok_or(TemplateError::UnterminatedEscape)?;
        let field = Field::from_code(code).ok_or(TemplateError::UnknownField(code))?;
        i += 2;

        // `\YYYY` and `\Y\Y\Y\Y` both mean a four character year.
        let mut width = 1;
        loop {
            match chars.get(i) {
                Some(&next) if next == code => i += 1,
                Some(&ESCAPE) if chars.get(i + 1) == Some(&code) => i += 2,
                _ => break,
            }
            width += 1;
        }

        if !seen.insert(field) {
            return Err(TemplateError::DuplicateField(field));
        }
        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
        }
        parts.push(TemplatePart::Field { field, width });
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }

    Ok(parts)
}

/// Parses a template describing existing names into the span each field occupies.
pub fn parse_field_spans(input: &str) -> Result<BTreeMap<Field, FieldSpan>, TemplateError> {
    let mut spans = BTreeMap::new();
    let mut offset = 0;

    for part in parse_template(input)? {
        match part {
            TemplatePart::Literal(s) => offset += s.chars().count(),
            TemplatePart::Field { field, width } => {
                spans.insert(
                    field,
                    FieldSpan {
                        field,
                        start: offset,
                        len: width,
                    },
                );
                offset += width;
            }
        }
    }

    Ok(spans)
}

/// Composes a stem. An index written as a single `\i` is padded to `auto_index_width`,
/// a longer run of `i` fixes the width itself.
pub fn render_template(
    parts: &[TemplatePart],
    values: &FieldValues,
    index: usize,
    auto_index_width: usize,
) -> String {
    let mut output = String::new();
    for part in parts {
        match part {
            TemplatePart::Literal(s) => output.push_str(s),
            TemplatePart::Field {
                field: Field::Index,
                width,
            } => {
                let width = if *width > 1 { *width } else { auto_index_width };
                output.push_str(&format!("{:0width$}", index, width = width));
            }
            TemplatePart::Field { field, .. } => {
                let value = values.get(field).copied().unwrap_or_default();
                output.push_str(&format!(
                    "{:0width$}",
                    value,
                    width = field.canonical_width()
                ));
            }
        }
    }

    output
}

pub(crate) fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(Field, u32)]) -> FieldValues {
        pairs.iter().copied().collect()
    }

    #[test]
    fn parse_template_ok() {
        let parsed = parse_template(r"\YYYY-\MM-\DD (\i)").expect("must parse");
        assert_eq!(
            parsed,
            vec![
                TemplatePart::Field {
                    field: Field::Year,
                    width: 4
                },
                TemplatePart::Literal("-".to_string()),
                TemplatePart::Field {
                    field: Field::Month,
                    width: 2
                },
                TemplatePart::Literal("-".to_string()),
                TemplatePart::Field {
                    field: Field::Day,
                    width: 2
                },
                TemplatePart::Literal(" (".to_string()),
                TemplatePart::Field {
                    field: Field::Index,
                    width: 1
                },
                TemplatePart::Literal(")".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_escapes_merge_into_one_field() {
        let a = parse_template(r"IMG_\Y\Y\Y\Y\M\M").expect("must parse");
        let b = parse_template(r"IMG_\YYYY\MM").expect("must parse");
        assert_eq!(a, b);
    }

    #[test]
    fn parse_template_invalid_unknown() {
        let err = parse_template(r"IMG_\HH").expect_err("must fail");
        assert_eq!(err, TemplateError::UnknownField('H'));
    }

    #[test]
    fn codes_are_case_sensitive() {
        let parsed = parse_template(r"\hh\mm\ss").expect("must parse");
        let fields: Vec<Field> = parsed
            .iter()
            .filter_map(|p| match p {
                TemplatePart::Field { field, .. } => Some(*field),
                TemplatePart::Literal(_) => None,
            })
            .collect();
        assert_eq!(fields, vec![Field::Hour, Field::Minute, Field::Second]);
        assert!(parse_template(r"\SS").is_err());
        assert!(parse_template(r"\yyyy").is_err());
    }

    #[test]
    fn parse_template_invalid_trailing_escape() {
        let err = parse_template(r"IMG_\YYYY\").expect_err("must fail");
        assert_eq!(err, TemplateError::UnterminatedEscape);
    }

    #[test]
    fn parse_template_rejects_double_escape() {
        let err = parse_template(r"a\\b").expect_err("must fail");
        assert_eq!(err, TemplateError::UnknownField('\\'));
    }

    #[test]
    fn parse_template_rejects_duplicate_field() {
        let err = parse_template(r"\YYYY_\MM_\YYYY").expect_err("must fail");
        assert_eq!(err, TemplateError::DuplicateField(Field::Year));
    }

    #[test]
    fn parse_template_invalid_empty() {
        assert_eq!(parse_template(""), Err(TemplateError::Empty));
    }

    #[test]
    fn spans_accumulate_offsets_across_literals() {
        let spans = parse_field_spans(r"IMG_\YYYY\MM\DD_\hh\mm\ss").expect("must parse");
        let expect = [
            (Field::Year, 4, 4),
            (Field::Month, 8, 2),
            (Field::Day, 10, 2),
            (Field::Hour, 13, 2),
            (Field::Minute, 15, 2),
            (Field::Second, 17, 2),
        ];
        assert_eq!(spans.len(), expect.len());
        for (field, start, len) in expect {
            let span = spans[&field];
            assert_eq!((span.start, span.len), (start, len), "{field:?}");
        }
    }

    #[test]
    fn spans_count_characters_not_bytes() {
        let spans = parse_field_spans(r"写真_\YYYY").expect("must parse");
        assert_eq!(spans[&Field::Year].start, 3);
    }

    #[test]
    fn render_pads_fields_to_canonical_width() {
        let parts = parse_template(r"\Y-\M-\D \h.\m.\s").expect("must parse");
        let rendered = render_template(
            &parts,
            &values(&[
                (Field::Year, 987),
                (Field::Month, 1),
                (Field::Day, 5),
                (Field::Hour, 0),
                (Field::Minute, 7),
                (Field::Second, 9),
            ]),
            1,
            1,
        );
        assert_eq!(rendered, "0987-01-05 00.07.09");
    }

    #[test]
    fn render_ignores_template_width_for_date_fields() {
        let parts = parse_template(r"\YY\MMMM").expect("must parse");
        let rendered = render_template(
            &parts,
            &values(&[(Field::Year, 2023), (Field::Month, 3)]),
            1,
            1,
        );
        assert_eq!(rendered, "202303");
    }

    #[test]
    fn render_index_width_auto_or_fixed() {
        let auto = parse_template(r"x_\i").expect("must parse");
        let fixed = parse_template(r"x_\iii").expect("must parse");
        let empty = FieldValues::new();
        assert_eq!(render_template(&auto, &empty, 7, 2), "x_07");
        assert_eq!(render_template(&fixed, &empty, 7, 2), "x_007");
        assert_eq!(render_template(&fixed, &empty, 1234, 2), "x_1234");
    }

    #[test]
    fn digit_count_handles_boundaries() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(100), 3);
    }
}
