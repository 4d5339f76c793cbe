use crate::changer::BatchNameChanger;
use crate::extract::{extract_field_values, FieldValues};
use crate::path_name::PathName;
use crate::template::{
    digit_count, parse_field_spans, parse_template, render_template, Field, FieldSpan,
    TemplateError, TemplatePart,
};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Renames files whose stem follows `old_template` into `new_template`.
///
/// The index restarts at 1 whenever a file's date/time values differ from the previous
/// converted file, so files sharing a timestamp are numbered `1, 2, ...` within it.
#[derive(Debug, Clone)]
pub struct TemplateConverter {
    spans: BTreeMap<Field, FieldSpan>,
    parts: Vec<TemplatePart>,
}

impl TemplateConverter {
    pub fn new(old_template: &str, new_template: &str) -> Result<Self, TemplateError> {
        let spans = parse_field_spans(old_template)?;
        let parts = parse_template(new_template)?;

        for part in &parts {
            if let TemplatePart::Field { field, .. } = part {
                if *field != Field::Index && !spans.contains_key(field) {
                    return Err(TemplateError::MissingSourceField(*field));
                }
            }
        }

        Ok(Self { spans, parts })
    }

    pub fn extract(&self, stem: &str) -> Option<FieldValues> {
        extract_field_values(stem, &self.spans)
    }

    pub fn compose(&self, values: &FieldValues, index: usize, auto_index_width: usize) -> String {
        render_template(&self.parts, values, index, auto_index_width)
    }
}

impl BatchNameChanger for TemplateConverter {
    fn change_names<P, F>(&self, path_names: &[P], mut change_name: F) -> Result<usize>
    where
        P: AsRef<Path>,
        F: FnMut(&Path, &Path) -> Result<()>,
    {
        let auto_index_width = digit_count(path_names.len());
        let mut previous: Option<FieldValues> = None;
        let mut index = 0usize;
        let mut changed = 0usize;

        for path in path_names {
            let path = path.as_ref();
            let Some(name) = PathName::parse(path) else {
                debug!(path = %path.display(), "ファイル名を解釈できないためスキップします");
                continue;
            };
            let Some(values) = self.extract(name.stem) else {
                debug!(path = %path.display(), "旧テンプレートに一致しないためスキップします");
                continue;
            };

            index = if previous.as_ref() == Some(&values) {
                index + 1
            } else {
                1
            };
            let target = name.with_stem(&self.compose(&values, index, auto_index_width));
            previous = Some(values);

            if target == path {
                continue;
            }
            change_name(path, &target)?;
            changed += 1;
        }

        Ok(changed)
    }
}
