use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    clock::Clock,
    feedback::KeystrokeFeedback,
    highlight::{Highlight, Outcome},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl<C: Clock, F: KeystrokeFeedback> Widget for &App<C, F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let trainer = &self.trainer;
        let language = trainer.language();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // author and counts
                Constraint::Length(1), // padding
                Constraint::Min(1),    // reference text
                Constraint::Length(3), // writing box
                Constraint::Length(1), // timer or results
                Constraint::Length(1), // toggles and status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let (title, byline) = match trainer.current_text() {
            Some(text) => (
                text.title(language).to_string(),
                format!(
                    "{} ({} words, {} chars)",
                    text.author,
                    text.word_count(language),
                    text.char_count(language)
                ),
            ),
            None => ("No Texts Available".to_string(), String::new()),
        };

        Paragraph::new(Span::styled(title, bold_style.fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
        Paragraph::new(Span::styled(byline, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let content = trainer.current_content();
        let text = Paragraph::new(Line::from(highlight_spans(&trainer.highlights())))
            .alignment(if content.width() <= chunks[3].width as usize {
                // short texts sit centered
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false });
        text.render(chunks[3], buf);

        let box_style = if trainer.is_running() {
            Style::default().fg(Color::Yellow)
        } else {
            dim_style
        };
        let inner_width = chunks[4].width.saturating_sub(2) as usize;
        Paragraph::new(visible_tail(&self.writing_box, inner_width))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(box_style)
                    .title("type here"),
            )
            .render(chunks[4], buf);

        let results = if trainer.is_running() {
            Span::styled(
                format!("{:.1}s", trainer.elapsed_minutes() * 60.0),
                bold_style.add_modifier(Modifier::DIM),
            )
        } else if let Some(report) = trainer.report() {
            Span::styled(report.summary(), bold_style)
        } else {
            Span::styled("0.00 gross wpm   0.00 net wpm   0.00% acc   0 errors", dim_style)
        };
        Paragraph::new(results)
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        let status = match &self.status {
            Some(msg) => Span::styled(msg.clone(), Style::default().fg(Color::Red)),
            None => Span::styled(
                format!(
                    "text {}/{}   language: {}   ignore case: {}",
                    trainer.selected_index() + 1,
                    trainer.catalog().len(),
                    language,
                    if trainer.ignore_case() { "ON" } else { "OFF" }
                ),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ),
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        let legend = if trainer.is_running() {
            "(enter) stop / (ctrl-r) restart / (esc)ape"
        } else if trainer.can_start() {
            "(enter) start / (←→) text / (l)anguage / (i)gnore case / (esc)ape"
        } else {
            "(esc)ape"
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[7], buf);
    }
}

/// One styled span per reference character.
pub fn highlight_spans(highlights: &[Highlight]) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    highlights
        .iter()
        .map(|h| {
            let (text, mut style) = match h.outcome {
                Outcome::Correct => (h.char.to_string(), bold_style.fg(Color::Green)),
                Outcome::Incorrect => (
                    match h.char {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    bold_style.fg(Color::Red),
                ),
                Outcome::Pending => (h.char.to_string(), bold_style.add_modifier(Modifier::DIM)),
            };
            if h.current {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Span::styled(text, style)
        })
        .collect()
}

/// The trailing part of `s` that fits in `width` columns.
fn visible_tail(s: &str, width: usize) -> String {
    let mut used = 0;
    let mut tail = s
        .chars()
        .rev()
        .take_while(|c| {
            used += unicode_width::UnicodeWidthChar::width(*c).unwrap_or(0);
            used <= width
        })
        .collect::<Vec<_>>();
    tail.reverse();
    tail.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Language, PracticeText};
    use crate::clock::ManualClock;
    use crate::feedback::Silent;
    use crate::highlight::classify;
    use crate::trainer::Trainer;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn render(app: &App<ManualClock, Silent>) -> Buffer {
        let area = Rect::new(0, 0, 80, 16);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    #[test]
    fn spans_mark_caret_and_errors() {
        let spans = highlight_spans(&classify("a b", "ax", false));

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "·");
        assert_eq!(spans[1].style.fg, Some(Color::Red));
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        assert!(spans[2].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn visible_tail_keeps_end() {
        assert_eq!(visible_tail("hello world", 5), "world");
        assert_eq!(visible_tail("hi", 5), "hi");
        assert_eq!(visible_tail("", 5), "");
    }

    #[test]
    fn renders_title_and_counts() {
        let catalog = Catalog::new(vec![PracticeText::new("Anon", Language::English)
            .with_title(Language::English, "Greeting")
            .with_content(Language::English, "hello there")]);
        let app = App::new(Trainer::new(
            catalog,
            Language::English,
            false,
            ManualClock::new(),
            Silent,
        ));

        let text = buffer_text(&render(&app));
        assert!(text.contains("Greeting"));
        assert!(text.contains("Anon (2 words, 11 chars)"));
        assert!(text.contains("hello there"));
        assert!(text.contains("(enter) start"));
    }

    #[test]
    fn renders_empty_catalog() {
        let app = App::new(Trainer::new(
            Catalog::default(),
            Language::English,
            false,
            ManualClock::new(),
            Silent,
        ));

        let text = buffer_text(&render(&app));
        assert!(text.contains("No Texts Available"));
        assert!(text.contains("no practice texts are available"));
    }
}
