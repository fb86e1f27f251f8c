pub const GLYPH_HEIGHT: usize = 5;
pub const GLYPH_WIDTH: usize = 5;

/// Five-row block glyph for a reel character. Anything without a glyph
/// renders as `?`.
pub fn glyph(ch: char) -> [&'static str; GLYPH_HEIGHT] {
    match ch {
        '0' => ["█████", "█   █", "█   █", "█   █", "█████"],
        '1' => ["  ██ ", "   █ ", "   █ ", "   █ ", "  ███"],
        '2' => ["█████", "    █", "█████", "█    ", "█████"],
        '3' => ["█████", "    █", " ████", "    █", "█████"],
        '4' => ["█   █", "█   █", "█████", "    █", "    █"],
        '5' => ["█████", "█    ", "█████", "    █", "█████"],
        '6' => ["█████", "█    ", "█████", "█   █", "█████"],
        '7' => ["█████", "    █", "   █ ", "  █  ", "  █  "],
        '8' => ["█████", "█   █", "█████", "█   █", "█████"],
        '9' => ["█████", "█   █", "█████", "    █", "█████"],
        _ => ["█████", "    █", "  ███", "     ", "  █  "],
    }
}

/// Rows of `text` in block glyphs with one column between characters.
pub fn big_text_rows(text: &str) -> [String; GLYPH_HEIGHT] {
    let mut rows: [String; GLYPH_HEIGHT] = Default::default();
    for (i, ch) in text.chars().enumerate() {
        let g = glyph(ch);
        for (row, part) in rows.iter_mut().zip(g) {
            if i > 0 {
                row.push(' ');
            }
            row.push_str(part);
        }
    }
    rows
}

/// Columns needed to render `text` with [`big_text_rows`].
pub fn big_text_width(text: &str) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { n * GLYPH_WIDTH + (n - 1) }
}
