use crate::template::{Field, FieldSpan};
use std::collections::BTreeMap;

/// Values read out of one name. Holds every non-index field of the source template.
pub type FieldValues = BTreeMap<Field, u32>;

/// Reads every non-index field from `stem`. `None` means the name does not fit the
/// template and should be left alone.
pub fn extract_field_values(
    stem: &str,
    spans: &BTreeMap<Field, FieldSpan>,
) -> Option<FieldValues> {
    let chars: Vec<char> = stem.chars().collect();
    let mut values = FieldValues::new();

    for span in spans.values() {
        if span.field == Field::Index {
            continue;
        }
        let digits = chars.get(span.start..span.end())?;
        values.insert(span.field, parse_digits(digits)?);
    }

    Some(values)
}

fn parse_digits(digits: &[char]) -> Option<u32> {
    if digits.is_empty() || !digits.iter().all(char::is_ascii_digit) {
        return None;
    }
    digits.iter().collect::<String>().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse_field_spans;

    #[test]
    fn extracts_date_fields() {
        let spans = parse_field_spans(r"IMG_\YYYY\MM\DD").expect("must parse");
        let values = extract_field_values("IMG_20230115", &spans).expect("must match");
        assert_eq!(values.get(&Field::Year), Some(&2023));
        assert_eq!(values.get(&Field::Month), Some(&1));
        assert_eq!(values.get(&Field::Day), Some(&15));
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn trailing_text_after_last_span_is_allowed() {
        let spans = parse_field_spans(r"IMG_\YYYY\MM\DD").expect("must parse");
        assert!(extract_field_values("IMG_20230115_edited", &spans).is_some());
    }

    #[test]
    fn short_stem_is_a_mismatch() {
        let spans = parse_field_spans(r"IMG_\YYYY\MM\DD").expect("must parse");
        assert_eq!(extract_field_values("IMG_202301", &spans), None);
    }

    #[test]
    fn non_numeric_span_is_a_mismatch() {
        let spans = parse_field_spans(r"IMG_\YYYY\MM\DD").expect("must parse");
        assert_eq!(extract_field_values("IMG_2023O115", &spans), None);
        assert_eq!(extract_field_values("IMG_+0230115", &spans), None);
    }

    #[test]
    fn index_span_is_never_parsed() {
        let spans = parse_field_spans(r"\YYYY_\ii").expect("must parse");
        let values = extract_field_values("2023_ab", &spans).expect("must match");
        assert_eq!(values.len(), 1);
        assert!(!values.contains_key(&Field::Index));
    }

    #[test]
    fn multibyte_literals_keep_char_offsets() {
        let spans = parse_field_spans(r"写真_\YYYY").expect("must parse");
        let values = extract_field_values("写真_1999", &spans).expect("must match");
        assert_eq!(values.get(&Field::Year), Some(&1999));
    }
}
