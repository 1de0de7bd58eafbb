/// Returns the first balanced `{...}` span in `text`.
///
/// Braces inside JSON string literals are ignored, so `{"a": "}"}` is found
/// whole. An opening brace that never closes is skipped in favour of the
/// earliest one that does. Returns `None` when no opening brace is ever
/// closed. Runs in a single pass over `text`.
pub fn first_json_object(text: &str) -> Option<&str> {
    // Positions of currently unclosed '{', outermost first.
    let mut open: Vec<usize> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push(idx),
            '}' => {
                let Some(start) = open.pop() else {
                    continue;
                };
                if best.map_or(true, |(best_start, _)| start < best_start) {
                    best = Some((start, idx));
                }
                if open.is_empty() {
                    break;
                }
            }
            _ => {}
        }
    }

    best.map(|(start, end)| &text[start..=end])
}
