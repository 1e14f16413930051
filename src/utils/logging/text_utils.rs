//! Text wrapping for console log lines

/// Bullet prefixes that continuation lines are aligned under.
const BULLETS: &[&str] = &["  - ", "  -> "];

/// Wraps each line of `text` at word boundaries so no line exceeds `max_width`.
///
/// A leading bullet (`"  - "` or `"  -> "`) stays on the first line and the
/// continuation lines are indented to the bullet's width.
pub fn wrap_text(text: &str, max_width: usize) -> String {
    let mut out: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.chars().count() <= max_width {
            out.push(line.to_string());
            continue;
        }

        let bullet = BULLETS
            .iter()
            .find(|b| line.starts_with(*b))
            .copied()
            .unwrap_or("");
        let body = &line[bullet.len()..];
        let indent = " ".repeat(bullet.len());

        let mut current = String::from(bullet);
        let mut current_has_word = false;

        for word in body.split_whitespace() {
            let needed = current.chars().count()
                + word.chars().count()
                + usize::from(current_has_word);

            if current_has_word && needed > max_width {
                out.push(std::mem::replace(&mut current, indent.clone()));
                current_has_word = false;
            }

            if current_has_word {
                current.push(' ');
            }
            current.push_str(word);
            current_has_word = true;
        }

        if current_has_word {
            out.push(current);
        }
    }

    out.join("\n")
}
