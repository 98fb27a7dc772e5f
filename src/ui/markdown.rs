use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::readme::{Block, Document};

use super::theme::Theme;

/// Flattens a parsed README into styled lines for a scrolling paragraph.
pub fn document_lines(doc: &Document, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in doc.blocks() {
        match block {
            Block::Heading { level, text } => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                let style = match level {
                    1 => theme.title_style().add_modifier(Modifier::UNDERLINED),
                    2 => theme.header_style(),
                    _ => Style::new().fg(theme.accent_alt).add_modifier(Modifier::BOLD),
                };
                lines.push(Line::from(Span::styled(text.clone(), style)));
            }
            Block::Paragraph { text } => {
                lines.push(Line::from(Span::styled(text.clone(), theme.value_style())));
                lines.push(Line::default());
            }
            Block::ListItem { depth, text, strong } => {
                let indent = "  ".repeat(*depth + 1);
                let mut spans = vec![Span::styled(
                    format!("{indent}• "),
                    Style::new().fg(theme.accent),
                )];
                match strong.as_deref().and_then(|s| text.strip_prefix(s).map(|rest| (s, rest))) {
                    Some((label, rest)) => {
                        spans.push(Span::styled(
                            label.to_string(),
                            theme.value_style().add_modifier(Modifier::BOLD),
                        ));
                        spans.push(Span::styled(rest.to_string(), theme.value_style()));
                    }
                    None => spans.push(Span::styled(text.clone(), theme.value_style())),
                }
                lines.push(Line::from(spans));
            }
            Block::CodeBlock { lang, text } => {
                if let Some(lang) = lang {
                    lines.push(Line::from(Span::styled(
                        format!("  ─ {lang}"),
                        theme.label_style(),
                    )));
                }
                let code = Style::new().fg(theme.accent_alt).bg(theme.bg_highlight);
                for line in text.lines() {
                    lines.push(Line::from(Span::styled(format!("  {line}"), code)));
                }
                lines.push(Line::default());
            }
            Block::Quote { text } => {
                lines.push(Line::from(vec![
                    Span::styled("  ▌ ", Style::new().fg(theme.border_focused)),
                    Span::styled(
                        text.clone(),
                        theme.label_style().add_modifier(Modifier::ITALIC),
                    ),
                ]));
                lines.push(Line::default());
            }
            Block::Rule => {
                lines.push(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::new().fg(theme.border),
                )));
            }
        }
    }

    lines
}
