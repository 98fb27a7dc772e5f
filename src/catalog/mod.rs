//! Portfolio content: profile, navigation, skills, experience, projects.
//!
//! Everything is plain ordered data. The renderer walks these records in
//! order; nothing here knows how it is drawn.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SAMPLE: &str = include_str!("sample.yml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("duplicate project id `{0}`")]
    DuplicateProject(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Home,
    About,
    Skills,
    Experience,
    Projects,
    Contact,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Home,
        Section::About,
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::Contact,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub location: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget<'a> {
    Section(Section),
    External(&'a str),
}

/// A navigation entry points either at a page section or an outside URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub name: String,
    pub section: Option<Section>,
    pub url: Option<String>,
}

impl NavLink {
    pub fn target(&self) -> Option<NavTarget<'_>> {
        match (self.section, self.url.as_deref()) {
            (Some(section), _) => Some(NavTarget::Section(section)),
            (None, Some(url)) => Some(NavTarget::External(url)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub title: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub demo: String,
    /// Folder under the assets directory; defaults to the id.
    pub asset_folder: Option<String>,
    /// Demo media file name inside the asset folder.
    pub video: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
}

impl Project {
    pub fn asset_dir(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join(self.asset_folder.as_deref().unwrap_or(&self.id))
    }

    /// Path of the demo media, if the project declares one and it exists.
    pub fn video_path(&self, assets_dir: &Path) -> Option<PathBuf> {
        let path = self.asset_dir(assets_dir).join(self.video.as_deref()?);
        path.is_file().then_some(path)
    }

    pub fn screenshot_paths(&self, assets_dir: &Path) -> Vec<PathBuf> {
        let dir = self.asset_dir(assets_dir);
        self.screenshots.iter().map(|s| dir.join(s)).collect()
    }

    /// The demo link is a placeholder when it is empty or `#`.
    pub fn has_demo(&self) -> bool {
        !self.demo.is_empty() && self.demo != "#"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub profile: Profile,
    #[serde(default)]
    pub nav: Vec<NavLink>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
}

impl Catalog {
    /// Loads the catalog at `path`, or the built-in sample when none is set.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let Some(path) = path else {
            return Self::sample();
        };
        let yaml = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_yaml(SAMPLE)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_yaml::from_str(yaml)?;

        if catalog.nav.is_empty() {
            catalog.nav = Section::ALL
                .iter()
                .map(|section| NavLink {
                    name: section.title().to_string(),
                    section: Some(*section),
                    url: None,
                })
                .collect();
        }

        let mut seen = HashSet::new();
        for project in &catalog.projects {
            if !seen.insert(project.id.as_str()) {
                return Err(CatalogError::DuplicateProject(project.id.clone()));
            }
        }

        Ok(catalog)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}
