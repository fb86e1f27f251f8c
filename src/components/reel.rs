use crate::components::digits::{GLYPH_HEIGHT, big_text_rows, big_text_width};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::Widget;

/// The big number plus caption shown by each selector panel.
pub struct Reel<'a> {
    /// Year or team number; `None` renders the `????` placeholder.
    pub value: Option<String>,
    pub caption: &'a str,
    pub color: Color,
    pub spinning: bool,
}

impl Widget for Reel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let text = self.value.clone().unwrap_or_else(|| "????".to_string());
        let value_style = if self.spinning {
            Style::default().fg(self.color).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(self.color).add_modifier(Modifier::BOLD)
        };
        let caption_style = Style::default().fg(self.color);

        let fits_big = usize::from(area.width) >= big_text_width(&text)
            && usize::from(area.height) > GLYPH_HEIGHT;

        if fits_big {
            let top = area.y + area.height.saturating_sub(GLYPH_HEIGHT as u16 + 2) / 2;
            for (i, row) in big_text_rows(&text).into_iter().enumerate() {
                render_centered(
                    Line::from(Span::styled(row, value_style)),
                    area,
                    top + i as u16,
                    buf,
                );
            }
            render_centered(
                Line::from(Span::styled(self.caption, caption_style)),
                area,
                top + GLYPH_HEIGHT as u16 + 1,
                buf,
            );
            return;
        }

        let top = area.y + area.height.saturating_sub(2) / 2;
        render_centered(Line::from(Span::styled(text, value_style)), area, top, buf);
        render_centered(
            Line::from(Span::styled(self.caption, caption_style)),
            area,
            top + 1,
            buf,
        );
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.x + area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, limit: u16, buf: &mut Buffer) {
    let mut cx = x;
    for span in &line.spans {
        let run: String = span
            .content
            .chars()
            .take(usize::from(limit.saturating_sub(cx)))
            .collect();
        if run.is_empty() {
            break;
        }
        let width = run.chars().count() as u16;
        buf.set_string(cx, y, run, span.style);
        cx += width;
    }
}
