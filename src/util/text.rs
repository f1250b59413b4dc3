// Collapse any whitespace run into a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws && !buf.is_empty() { buf.push(' '); }
            in_ws = true;
        } else {
            buf.push(ch);
            in_ws = false;
        }
    }
    if buf.ends_with(' ') { buf.pop(); }
    buf
}

// Clip to at most `max` chars, appending an ellipsis when something was cut.
pub fn preview(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}
