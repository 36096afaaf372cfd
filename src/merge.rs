//! The merge module decides what a DR-carrying tag value should look like after a new score is
//! applied. It knows nothing about audio containers; adapters feed it plain strings.

use crate::common::{DrScore, TagField, DR_PREFIX};

/// Merges `dr` into an existing tag value for `field`.
///
/// Returns `None` when the value already carries exactly this score and nothing needs writing.
/// Otherwise returns the new value: every part that is not a DR part, in its original order,
/// followed by the new DR part.
///
/// When the existing value carries several DR parts, only the first one is compared against the
/// new score, but all of them are dropped on rebuild. A value like `DR 3, DR 3, Live` therefore
/// collapses to `Live, DR 3` even though the score did not change.
pub fn merge_tag_value(existing: Option<&str>, dr: DrScore, field: TagField) -> Option<String> {
    let dr_text = dr.to_string();
    let existing = match existing {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Some(dr_text),
    };

    let sep = field.separator();
    let parts = split_tag_value(existing, sep);

    let dr_parts: Vec<&str> = parts.iter().copied().filter(|p| p.starts_with(DR_PREFIX)).collect();
    if dr_parts.len() == 1 && dr_parts[0] == dr_text {
        return None;
    }

    let mut rebuilt: Vec<&str> = parts.into_iter().filter(|p| !p.starts_with(DR_PREFIX)).collect();
    rebuilt.push(&dr_text);
    Some(rebuilt.join(sep))
}

/// Splits on the full separator (comma or semicolon plus a space). A bare comma inside a part, as
/// in `1,000 copies`, is part of the opaque text.
fn split_tag_value<'a>(value: &'a str, sep: &str) -> Vec<&'a str> {
    let value = value.trim_end();
    let value = value.strip_suffix(sep.trim_end()).unwrap_or(value);
    value.split(sep).map(str::trim).collect()
}
