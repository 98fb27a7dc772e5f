use crate::catalog::Project;

use super::document::{Block, Document, strip_pictographs};

/// Features this short are usually stray words, not descriptions.
pub const MIN_FEATURE_CHARS: usize = 11;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadmeSummary {
    pub intro: Option<String>,
    pub tech_stack: Vec<String>,
    pub features: Vec<String>,
}

pub fn summarize(doc: &Document) -> ReadmeSummary {
    ReadmeSummary {
        intro: intro(doc),
        tech_stack: tech_stack(doc),
        features: features(doc),
    }
}

/// First non-empty paragraph before the second heading. The title heading
/// doesn't count, so the intro may sit right under it.
fn intro(doc: &Document) -> Option<String> {
    let mut headings = 0;
    for block in doc.blocks() {
        match block {
            Block::Heading { .. } => {
                headings += 1;
                if headings >= 2 {
                    return None;
                }
            }
            Block::Paragraph { text } => {
                let text = strip_pictographs(text);
                if !text.is_empty() {
                    return Some(text);
                }
            }
            _ => {}
        }
    }
    None
}

fn tech_stack(doc: &Document) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    for block in doc.section("tech stack") {
        let Block::ListItem { text, strong, .. } = block else {
            continue;
        };
        let label = match strong {
            Some(strong) => strip_pictographs(strong),
            None => strip_pictographs(label_before_separator(text)),
        };
        let label = label.trim_end_matches(':').trim().to_string();
        if !label.is_empty() && !stack.contains(&label) {
            stack.push(label);
        }
    }
    stack
}

fn label_before_separator(text: &str) -> &str {
    [": ", " - ", " – ", " — "]
        .iter()
        .filter_map(|sep| text.find(sep))
        .min()
        .map_or(text, |at| &text[..at])
}

fn features(doc: &Document) -> Vec<String> {
    doc.section("features")
        .iter()
        .filter_map(|block| match block {
            Block::ListItem { depth: 0, text, .. } => Some(strip_pictographs(text)),
            _ => None,
        })
        .filter(|f| f.chars().count() >= MIN_FEATURE_CHARS)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub problem: String,
    pub solution: Option<String>,
}

/// What a project page shows: catalog data, overridden by the README where
/// it has something to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetail {
    pub intro: String,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub challenges: Vec<Challenge>,
}

impl ProjectDetail {
    pub fn compose(project: &Project, summary: Option<&ReadmeSummary>) -> Self {
        let intro = summary
            .and_then(|s| s.intro.clone())
            .unwrap_or_else(|| {
                if project.full_description.is_empty() {
                    project.description.clone()
                } else {
                    project.full_description.clone()
                }
            });

        let mut technologies: Vec<String> = Vec::new();
        let readme_stack = summary.map(|s| s.tech_stack.as_slice()).unwrap_or_default();
        for tech in readme_stack.iter().chain(&project.technologies) {
            if !technologies.contains(tech) {
                technologies.push(tech.clone());
            }
        }

        let features = match summary {
            Some(s) if !s.features.is_empty() => s.features.clone(),
            _ => project.features.clone(),
        };

        let challenges = project
            .challenges
            .iter()
            .enumerate()
            .map(|(i, problem)| Challenge {
                problem: problem.clone(),
                solution: project.solutions.get(i).cloned(),
            })
            .collect();

        Self {
            intro,
            technologies,
            features,
            challenges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "\
# 🏝️ Tidewatch

[![CI](https://ci/badge.svg)](https://ci) ![MIT](https://img/mit.svg)

Tidewatch keeps harbour masters informed.

## ✨ Features

- 🌊 **Live charts** for every harbour
- Alerts
  - nested detail that is long enough
- 📈 Historical comparison view

## 🛠️ Tech Stack

- **Rust** - core services
- TypeScript: dashboard
- **Rust** again
- PostgreSQL

## Installation

Run it.
";

    fn project() -> Project {
        Project {
            id: "tidewatch".into(),
            title: "Tidewatch".into(),
            description: "short".into(),
            full_description: "long description".into(),
            technologies: vec!["PostgreSQL".into(), "React".into()],
            github: String::new(),
            demo: "#".into(),
            asset_folder: None,
            video: None,
            screenshots: vec![],
            features: vec!["catalog feature".into()],
            challenges: vec!["one".into(), "two".into()],
            solutions: vec!["fix one".into()],
        }
    }

    #[test]
    fn intro_skips_badges_and_title() {
        let summary = summarize(&Document::parse(README));
        assert_eq!(
            summary.intro.as_deref(),
            Some("Tidewatch keeps harbour masters informed.")
        );
    }

    #[test]
    fn intro_is_none_when_first_section_has_no_paragraph() {
        let summary = summarize(&Document::parse("# T\n\n## A\n\nlate paragraph\n"));
        assert_eq!(summary.intro, None);
    }

    #[test]
    fn tech_stack_uses_bold_labels_and_prefixes() {
        let summary = summarize(&Document::parse(README));
        assert_eq!(summary.tech_stack, vec!["Rust", "TypeScript", "PostgreSQL"]);
    }

    #[test]
    fn features_are_top_level_stripped_and_filtered() {
        let summary = summarize(&Document::parse(README));
        assert_eq!(
            summary.features,
            vec!["Live charts for every harbour", "Historical comparison view"]
        );
    }

    #[test]
    fn compose_prefers_readme() {
        let summary = summarize(&Document::parse(README));
        let detail = ProjectDetail::compose(&project(), Some(&summary));
        assert_eq!(detail.intro, "Tidewatch keeps harbour masters informed.");
        assert_eq!(
            detail.technologies,
            vec!["Rust", "TypeScript", "PostgreSQL", "React"]
        );
        assert_eq!(detail.features.len(), 2);
    }

    #[test]
    fn compose_falls_back_to_catalog() {
        let detail = ProjectDetail::compose(&project(), None);
        assert_eq!(detail.intro, "long description");
        assert_eq!(detail.technologies, vec!["PostgreSQL", "React"]);
        assert_eq!(detail.features, vec!["catalog feature"]);
        assert_eq!(
            detail.challenges,
            vec![
                Challenge { problem: "one".into(), solution: Some("fix one".into()) },
                Challenge { problem: "two".into(), solution: None },
            ]
        );

        let empty = ReadmeSummary::default();
        let detail = ProjectDetail::compose(&project(), Some(&empty));
        assert_eq!(detail.features, vec!["catalog feature"]);
    }
}
