// src/utils/span_debug.rs
use std::fs;
use std::path::Path;
use crate::extractors::theorem::TheoremSpan;
use crate::utils::error::StorageError;

/// Returns a copy of `text` with a marker line before each span start and after
/// each span end. Offsets are taken as-is, so `text` must be the working text the
/// spans were extracted from.
pub fn render_span_markers(text: &str, spans: &[TheoremSpan]) -> String {
    // (offset, is_start, marker); ends sort before starts at the same offset
    let mut inserts: Vec<(usize, bool, String)> = Vec::with_capacity(spans.len() * 2);
    for span in spans {
        inserts.push((span.start_offset, true, format!("\n%% >>> {}\n", span.display_label)));
        inserts.push((span.end_offset, false, format!("\n%% <<< {}\n", span.display_label)));
    }
    inserts.sort_by_key(|(offset, is_start, _)| (*offset, *is_start));

    let mut out = String::with_capacity(text.len() + inserts.len() * 32);
    let mut last_pos = 0;
    for (offset, _, marker) in inserts {
        if offset > text.len() || !text.is_char_boundary(offset) {
            tracing::warn!("Skipping debug marker at invalid offset {}", offset);
            continue;
        }
        if offset > last_pos {
            out.push_str(&text[last_pos..offset]);
            last_pos = offset;
        }
        out.push_str(&marker);
    }
    if last_pos < text.len() {
        out.push_str(&text[last_pos..]);
    }
    out
}

/// Writes the annotated working text, preceded by the harvested custom commands.
pub fn save_debug_latex(
    path: &Path,
    text: &str,
    spans: &[TheoremSpan],
    custom_commands: &str,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut debug_tex = String::from("%% --- harvested custom commands ---\n");
    for line in custom_commands.lines() {
        debug_tex.push_str("%% ");
        debug_tex.push_str(line);
        debug_tex.push('\n');
    }
    debug_tex.push_str("%% --- working text ---\n");
    debug_tex.push_str(&render_span_markers(text, spans));

    fs::write(path, debug_tex)?;
    tracing::info!("Saved debug LaTeX to {}", path.display());
    Ok(())
}
