//! Display-name normalization for audio listings
//!
//! The media API reports machine-generated filenames (path segments,
//! URL-encoding, underscore separators, a generated suffix appended at
//! upload time). [`display_name`] derives the human-readable label shown in
//! the playlist. It is a pure function of the three raw inputs so the exact
//! rules can be tested in isolation.

use percent_encoding::percent_decode_str;

/// Number of trailing characters stripped from the base name.
///
/// Matches the length of the suffix the upload tooling appends to every
/// track. Deliberately a fixed count, not a pattern: do not generalize this
/// without checking the deployed naming convention.
const GENERATED_SUFFIX_LEN: usize = 6;

/// Derives the display name for a track
///
/// # Arguments
///
/// * `raw_name` - provider-reported original filename (or filename), if any
/// * `public_id` - the opaque identifier, used when no filename was reported
/// * `format` - the provider format tag, used when the name carries no
///   extension of its own
///
/// The pipeline: URL-decode (keeping the raw value on decode failure), keep
/// the last path segment, turn underscore runs into single spaces, collapse
/// whitespace, collapse dash runs, split off the trailing extension (or take
/// it from the format tag), strip the generated suffix from the base, and
/// reassemble.
pub fn display_name(raw_name: Option<&str>, public_id: &str, format: Option<&str>) -> String {
    let name = match raw_name {
        Some(raw) if !raw.is_empty() => raw,
        _ => public_id,
    };

    // URL-decode; a name that does not decode to UTF-8 is kept as-is.
    let name = match percent_decode_str(name).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => name.to_string(),
    };

    // Keep only the last path segment if any
    let name = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    // Replace underscores with spaces and collapse whitespace
    let name = name.replace('_', " ");
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");

    // Collapse repeated dashes
    let name = collapse_dashes(&name);

    // Separate extension if present (e.g. from the original filename)
    let (base, ext) = match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => {
            (name[..pos].to_string(), name[pos..].to_string())
        }
        _ => (
            name.clone(),
            format.map(|f| format!(".{f}")).unwrap_or_default(),
        ),
    };

    // Strip the generated suffix; short bases disappear entirely
    let base_len = base.chars().count();
    let base = if base_len > GENERATED_SUFFIX_LEN {
        base.chars()
            .take(base_len - GENERATED_SUFFIX_LEN)
            .collect::<String>()
    } else {
        String::new()
    };

    format!("{}{}", base.trim(), ext)
}

/// Collapses runs of `-` into a single dash, preserving position
fn collapse_dashes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_dash = false;
    for c in name.chars() {
        if c == '-' {
            if !previous_dash {
                out.push(c);
            }
            previous_dash = true;
        } else {
            out.push(c);
            previous_dash = false;
        }
    }
    out
}
