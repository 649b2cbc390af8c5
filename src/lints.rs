use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use ariadne::{Color, Fmt, Label, ReportKind};
use puffjson::{Value, ValueKind};
use tracing::*;

use crate::report::{DiagnosticReport, Diagnostics, Input};

/// Warn about every object member whose key was already used earlier in the same object. The
/// decoder keeps all of them in order, but anything that later loads the document into a map will
/// silently drop one side.
pub fn lint_duplicate_keys<'a>(input: &'a Input, root: &Value, diag: &mut Diagnostics<'a>) {
    let mut stack = vec![root];
    while let Some(value) = stack.pop() {
        match value.kind() {
            ValueKind::Array => {
                if let Ok(values) = value.as_array() {
                    stack.extend(values.iter().rev());
                }
            }
            ValueKind::Object => {
                let Ok(members) = value.as_object() else {
                    continue;
                };
                let mut first_seen = BTreeMap::new();
                for (key, _) in members {
                    let Ok(name) = key.as_bytes() else {
                        continue;
                    };
                    match first_seen.entry(name) {
                        Entry::Vacant(entry) => {
                            entry.insert(key);
                        }
                        Entry::Occupied(entry) => {
                            let name = String::from_utf8_lossy(name);
                            debug!(key = %name, first = ?entry.get().span(), later = ?key.span());
                            diag.push(duplicate_key(input, &name, entry.get(), key));
                        }
                    }
                }
                stack.extend(members.iter().rev().map(|(_, member_val)| member_val));
            }
            _ => {}
        }
    }
}

fn duplicate_key<'a>(
    input: &'a Input,
    name: &str,
    first: &Value,
    later: &Value,
) -> DiagnosticReport<'a> {
    let path = &input.path;
    let later_range = input.char_range(later.span());
    DiagnosticReport::build(ReportKind::Warning, path, later_range.start)
        .with_message(format!("duplicate key \"{}\"", name.fg(Color::Blue)))
        .with_label(
            Label::new((path, input.char_range(first.span())))
                .with_message(format!("key \"{}\" first defined here", name.fg(Color::Blue)))
                .with_color(Color::Yellow),
        )
        .with_label(
            Label::new((path, later_range))
                .with_message(format!("key \"{}\" later redefined here", name.fg(Color::Blue)))
                .with_color(Color::Yellow),
        )
        .with_note("both members are kept; consumers that build a map usually keep only one")
        .finish()
}
