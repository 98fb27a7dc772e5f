//! Markdown → ordered list of typed blocks.
//!
//! Inline formatting is flattened to plain text. Image alt text is dropped,
//! so a paragraph made only of badges disappears. The first bold span of a
//! list item is kept on the side, since READMEs use `**Name** - blurb` for
//! labelled entries.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    ListItem {
        /// 0 for top-level items.
        depth: usize,
        text: String,
        strong: Option<String>,
    },
    CodeBlock {
        lang: Option<String>,
        text: String,
    },
    Quote {
        text: String,
    },
    Rule,
}

impl Block {
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Block::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn parse(markdown: &str) -> Self {
        let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
        let mut builder = Builder::default();
        for event in Parser::new_ext(markdown, options) {
            builder.event(event);
        }
        Self {
            blocks: builder.blocks,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Text of the first heading.
    pub fn title(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Blocks under the first heading matching `name`, up to the next heading
    /// of the same or higher rank. Empty when no heading matches.
    ///
    /// Headings match on their normalized text (see [`normalize_heading`]):
    /// equal to `name`, or starting with it followed by more words.
    pub fn section(&self, name: &str) -> &[Block] {
        let wanted = normalize_heading(name);
        let Some((start, level)) = self.blocks.iter().enumerate().find_map(|(i, b)| match b {
            Block::Heading { level, text } if heading_matches(&normalize_heading(text), &wanted) => {
                Some((i, *level))
            }
            _ => None,
        }) else {
            return &[];
        };

        let body = &self.blocks[start + 1..];
        let end = body
            .iter()
            .position(|b| b.heading_level().is_some_and(|l| l <= level))
            .unwrap_or(body.len());
        &body[..end]
    }
}

fn heading_matches(heading: &str, wanted: &str) -> bool {
    heading == wanted
        || heading
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(' '))
}

/// Lowercases, drops pictographs and turns punctuation into word breaks:
/// `"🛠️ Tech-Stack:"` → `"tech stack"`.
pub fn normalize_heading(text: &str) -> String {
    let mapped: String = strip_pictographs(text)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    collapse_whitespace(&mapped)
}

/// Removes emoji and their joiners/selectors, then collapses whitespace.
pub fn strip_pictographs(text: &str) -> String {
    let kept: String = text.chars().filter(|c| !is_pictograph(*c)).collect();
    collapse_whitespace(&kept)
}

fn is_pictograph(c: char) -> bool {
    matches!(c as u32,
        0x1F000..=0x1FAFF   // emoji, symbols, flags
        | 0x2600..=0x27BF   // misc symbols, dingbats
        | 0x2B00..=0x2BFF   // arrows and stars
        | 0x2300..=0x23FF   // technical (⌛ ⏱)
        | 0xFE00..=0xFE0F   // variation selectors
        | 0x200D            // zero-width joiner
        | 0x20E3            // keycap
        | 0xE0020..=0xE007F // tags
    )
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    text: String,
    heading: Option<u8>,
    list_depth: usize,
    quote_depth: usize,
    image_depth: usize,
    strong: Option<String>,
    strong_text: Option<String>,
    code: Option<(Option<String>, String)>,
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.text(&code),
            Event::SoftBreak | Event::HardBreak => self.text(" "),
            Event::Rule => {
                self.flush_item();
                self.blocks.push(Block::Rule);
            }
            // Html, InlineHtml, TaskListMarker, footnotes, math
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.text.clear();
                self.heading = Some(level as u8);
            }
            Tag::Paragraph => {
                if self.list_depth > 0 || self.quote_depth > 0 {
                    self.text.push(' ');
                } else {
                    self.text.clear();
                }
            }
            Tag::List(_) => {
                // Text gathered so far belongs to the parent item.
                self.flush_item();
                self.list_depth += 1;
            }
            Tag::Item => {
                self.text.clear();
                self.strong = None;
            }
            Tag::Strong => {
                if self.list_depth > 0 && self.strong.is_none() {
                    self.strong_text = Some(String::new());
                }
            }
            Tag::Image { .. } => self.image_depth += 1,
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::BlockQuote(_) => {
                self.quote_depth += 1;
                self.text.clear();
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                let level = self.heading.take().unwrap_or(1);
                let text = self.take_text();
                if !text.is_empty() {
                    self.blocks.push(Block::Heading { level, text });
                }
            }
            TagEnd::Paragraph => {
                if self.list_depth > 0 || self.quote_depth > 0 {
                    return;
                }
                let text = self.take_text();
                if !text.is_empty() {
                    self.blocks.push(Block::Paragraph { text });
                }
            }
            TagEnd::Item => self.flush_item(),
            TagEnd::List(_) => self.list_depth = self.list_depth.saturating_sub(1),
            TagEnd::Strong => {
                if let Some(label) = self.strong_text.take() {
                    let label = collapse_whitespace(&label);
                    if !label.is_empty() {
                        self.strong = Some(label);
                    }
                }
            }
            TagEnd::Image => self.image_depth = self.image_depth.saturating_sub(1),
            TagEnd::CodeBlock => {
                if let Some((lang, text)) = self.code.take() {
                    self.blocks.push(Block::CodeBlock {
                        lang,
                        text: text.trim_end().to_string(),
                    });
                }
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                let text = self.take_text();
                if !text.is_empty() {
                    self.blocks.push(Block::Quote { text });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(text);
            return;
        }
        if self.image_depth > 0 {
            return;
        }
        self.text.push_str(text);
        if let Some(label) = self.strong_text.as_mut() {
            label.push_str(text);
        }
    }

    fn flush_item(&mut self) {
        if self.list_depth == 0 {
            return;
        }
        let text = self.take_text();
        let strong = self.strong.take();
        if !text.is_empty() {
            self.blocks.push(Block::ListItem {
                depth: self.list_depth - 1,
                text,
                strong,
            });
        }
    }

    fn take_text(&mut self) -> String {
        let text = collapse_whitespace(&self.text);
        self.text.clear();
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_blocks_in_order() {
        let doc = Document::parse(
            "# Title\n\nSome *intro* text.\n\n## Features\n\n- one\n- two\n\n```rust\nfn main() {}\n```\n\n---\n",
        );
        assert_eq!(
            doc.blocks(),
            &[
                Block::Heading { level: 1, text: "Title".into() },
                Block::Paragraph { text: "Some intro text.".into() },
                Block::Heading { level: 2, text: "Features".into() },
                Block::ListItem { depth: 0, text: "one".into(), strong: None },
                Block::ListItem { depth: 0, text: "two".into(), strong: None },
                Block::CodeBlock { lang: Some("rust".into()), text: "fn main() {}".into() },
                Block::Rule,
            ]
        );
    }

    #[test]
    fn badge_only_paragraphs_vanish() {
        let doc = Document::parse(
            "# App\n\n[![build](https://img.shields.io/b.svg)](https://ci) ![license](l.svg)\n\nReal text.\n",
        );
        assert_eq!(
            doc.blocks()[1],
            Block::Paragraph { text: "Real text.".into() }
        );
        assert_eq!(doc.blocks().len(), 2);
    }

    #[test]
    fn nested_lists_keep_depth_and_strong_label() {
        let doc = Document::parse("- **React** - UI\n  - hooks based\n- plain\n");
        assert_eq!(
            doc.blocks(),
            &[
                Block::ListItem {
                    depth: 0,
                    text: "React - UI".into(),
                    strong: Some("React".into())
                },
                Block::ListItem { depth: 1, text: "hooks based".into(), strong: None },
                Block::ListItem { depth: 0, text: "plain".into(), strong: None },
            ]
        );
    }

    #[test]
    fn loose_list_items_join_paragraphs() {
        let doc = Document::parse("- first line\n\n  second para\n\n- next\n");
        assert_eq!(
            doc.blocks()[0],
            Block::ListItem { depth: 0, text: "first line second para".into(), strong: None }
        );
    }

    #[test]
    fn section_matches_heading_with_emoji() {
        let doc = Document::parse(
            "# X\n\n## ✨ Features\n\n- a feature\n\n### Sub\n\n- deeper\n\n## 🛠️ Tech Stack\n\n- **Rust**\n",
        );
        let features = doc.section("features");
        assert_eq!(features.len(), 3, "{features:?}");
        assert!(matches!(&doc.section("Tech Stack")[0], Block::ListItem { strong: Some(s), .. } if s == "Rust"));
        assert!(doc.section("installation").is_empty());
    }

    #[test]
    fn section_prefix_needs_word_boundary() {
        let doc = Document::parse("## Featureset\n\n- x\n\n## Features & Highlights\n\n- y\n");
        assert!(matches!(&doc.section("features")[0], Block::ListItem { text, .. } if text == "y"));
    }

    #[test]
    fn normalizes_headings() {
        assert_eq!(normalize_heading("🛠️ Tech-Stack:"), "tech stack");
        assert_eq!(normalize_heading("  ✨✨ FEATURES  "), "features");
        assert_eq!(strip_pictographs("🔍 Smart search 🏙️"), "Smart search");
    }
}
