use crate::changer::BatchNameChanger;
use crate::path_name::file_name_start;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

const OPENING_BRACKET: u8 = b'(';
const CLOSING_BRACKET: u8 = b')';

/// Pads numbers like `(1)` … `(10)` into `(01)` … `(10)` so that name order matches
/// number order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalFormatter;

impl BatchNameChanger for OrdinalFormatter {
    fn change_names<P, F>(&self, path_names: &[P], mut change_name: F) -> Result<usize>
    where
        P: AsRef<Path>,
        F: FnMut(&Path, &Path) -> Result<()>,
    {
        let names: Vec<Option<&str>> = path_names.iter().map(|p| p.as_ref().to_str()).collect();
        let mut changed = 0usize;
        let mut i = 0usize;

        while i < names.len() {
            let Some((name, (prefix_len, digit_len))) = names[i]
                .and_then(|name| find_number_in_brackets(name).map(|found| (name, found)))
            else {
                i += 1;
                continue;
            };
            let prefix = &name[..prefix_len];
            let (last, max_digit_len) = find_last_with_same_prefix(&names, prefix, i, digit_len);
            debug!(prefix, first = i, last, max_digit_len, "連番グループを検出しました");

            if max_digit_len > 1 {
                for (old_path, name) in path_names[i..=last].iter().zip(&names[i..=last]) {
                    let Some(new_name) = name.and_then(|n| pad_number(n, prefix_len, max_digit_len))
                    else {
                        continue;
                    };
                    if Some(new_name.as_str()) == *name {
                        continue;
                    }
                    change_name(old_path.as_ref(), Path::new(&new_name))?;
                    changed += 1;
                }
            }
            i = last + 1;
        }

        Ok(changed)
    }
}

/// First `(digits)` group in the file-name portion: `(prefix length including the
/// bracket, digit count)`.
fn find_number_in_brackets(path_name: &str) -> Option<(usize, usize)> {
    let bytes = path_name.as_bytes();
    (file_name_start(path_name)..bytes.len())
        .filter(|&i| bytes[i] == OPENING_BRACKET)
        .find_map(|i| digit_run_at(path_name, i + 1).map(|digits| (i + 1, digits)))
}

/// Length of the digit run starting at `start`, if it is closed by a bracket.
fn digit_run_at(path_name: &str, start: usize) -> Option<usize> {
    let rest = path_name.as_bytes().get(start..)?;
    let len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    (len > 0 && rest.get(len) == Some(&CLOSING_BRACKET)).then_some(len)
}

fn find_last_with_same_prefix(
    names: &[Option<&str>],
    prefix: &str,
    first: usize,
    first_digit_len: usize,
) -> (usize, usize) {
    let mut last = first;
    let mut max_digit_len = first_digit_len;

    for (index, name) in names.iter().enumerate().skip(first + 1) {
        // The bracket must sit in this name's file-name portion, not in a subfolder.
        let digits = name
            .filter(|n| n.starts_with(prefix) && file_name_start(n) < prefix.len())
            .and_then(|n| digit_run_at(n, prefix.len()));
        let Some(digits) = digits else {
            break;
        };
        last = index;
        max_digit_len = max_digit_len.max(digits);
    }

    (last, max_digit_len)
}

fn pad_number(path_name: &str, prefix_len: usize, max_digit_len: usize) -> Option<String> {
    let digits = digit_run_at(path_name, prefix_len)?;
    let mut out = String::with_capacity(path_name.len() + max_digit_len - digits);
    out.push_str(&path_name[..prefix_len]);
    out.extend(std::iter::repeat('0').take(max_digit_len - digits));
    out.push_str(&path_name[prefix_len..]);
    Some(out)
}
