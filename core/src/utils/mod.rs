pub(crate) mod macros;

/// Appends `pattern` to `out`, with its first `%s` slot replaced by `glyph`.
///
/// Patterns without a slot are copied verbatim.
pub(crate) fn fill_slot(out: &mut String, pattern: &str, glyph: &str) {
    match pattern.split_once("%s") {
        Some((before, after)) => {
            out.push_str(before);
            out.push_str(glyph);
            out.push_str(after);
        }
        None => out.push_str(pattern),
    }
}

/// Renders a control sequence name back into source form.
#[inline]
pub(crate) fn control_sequence(name: &str) -> String {
    format!("\\{name}")
}
