//! Portfolio content: personal info, projects, skills and history.
//!
//! Every field is a plain string. Multi-value project fields are stored as
//! comma-delimited strings and read through [`DelimitedList`].

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioData {
    pub personal: PersonalInfo,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    pub github: String,
    pub summary: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub description: String,
    /// Long-form write-up shown on the project's own page.
    pub details: String,
    pub technologies: String,
    pub images: String,
    pub videos: String,
    pub features: String,
    pub demo_url: String,
    pub repo_url: String,
    pub date: String,
}

impl Project {
    pub fn technologies(&self) -> DelimitedList {
        DelimitedList::parse(&self.technologies)
    }

    pub fn images(&self) -> DelimitedList {
        DelimitedList::parse(&self.images)
    }

    pub fn videos(&self) -> DelimitedList {
        DelimitedList::parse(&self.videos)
    }

    pub fn features(&self) -> DelimitedList {
        DelimitedList::parse(&self.features)
    }

    /// Video URLs rewritten to their embeddable form.
    pub fn video_embeds(&self) -> Vec<String> {
        self.videos().iter().map(|v| embed_video_url(v)).collect()
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub name: String,
    /// Free text ("Advanced") or a percentage ("80", "80%").
    pub level: String,
    pub category: String,
}

impl Skill {
    /// Level as a percentage in `0..=100`, when it is numeric.
    pub fn percent(&self) -> Option<u8> {
        let raw = self.level.trim().trim_end_matches('%').trim();
        let value: f64 = raw.parse().ok()?;
        Some(value.clamp(0.0, 100.0).round() as u8)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub position: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    /// Blank means the position is current.
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub date: String,
}

/// A list stored as a single comma-delimited string.
///
/// Parsing splits on `,`, trims each entry and drops empty ones. This is the
/// only place such fields are split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimitedList(Vec<String>);

impl DelimitedList {
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Serialize back to the stored string form.
    pub fn to_field(&self) -> String {
        self.0.join(", ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for DelimitedList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::parse(
            &iter
                .into_iter()
                .map(|s| s.as_ref().replace(',', " "))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// URL-safe identifier for a project title.
///
/// Lowercases, collapses whitespace runs to a single `-` and strips every
/// character outside `[a-z0-9._-]`.
pub fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// The exported page generated for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPage {
    /// Index into `PortfolioData::projects`.
    pub index: usize,
    pub slug: String,
    pub filename: String,
}

impl ProjectPage {
    /// In-page anchor used by single-page exports.
    pub fn anchor(&self) -> String {
        format!("proyecto-{}", self.slug)
    }
}

/// Pages for every project with a non-blank title.
///
/// Titles whose slug comes out empty use the project's position instead, and
/// repeated slugs get a numeric suffix so no two projects share a file.
pub fn project_pages(projects: &[Project]) -> Vec<ProjectPage> {
    let mut used = HashSet::new();
    projects
        .iter()
        .enumerate()
        .filter(|(_, p)| p.has_title())
        .map(|(index, project)| {
            let base = match slug(&project.title) {
                s if s.is_empty() => format!("{}", index + 1),
                s => s,
            };
            let mut candidate = base.clone();
            let mut n = 2;
            while !used.insert(candidate.clone()) {
                candidate = format!("{}-{}", base, n);
                n += 1;
            }
            ProjectPage {
                index,
                filename: format!("proyecto-{}.html", candidate),
                slug: candidate,
            }
        })
        .collect()
}

static YOUTUBE_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.|m\.)?youtube\.com/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]+)")
        .expect("Invalid YouTube watch regex")
});

static YOUTU_BE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?youtu\.be/([A-Za-z0-9_-]+)").expect("Invalid youtu.be regex")
});

static VIMEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?vimeo\.com/(\d+)").expect("Invalid Vimeo regex")
});

/// Rewrite YouTube and Vimeo page URLs to their iframe embed form.
///
/// Any other URL is returned unchanged.
pub fn embed_video_url(url: &str) -> String {
    let url = url.trim();
    if let Some(caps) = YOUTUBE_WATCH.captures(url).or_else(|| YOUTU_BE.captures(url)) {
        return format!("https://www.youtube.com/embed/{}", &caps[1]);
    }
    if let Some(caps) = VIMEO.captures(url) {
        return format!("https://player.vimeo.com/video/{}", &caps[1]);
    }
    url.to_string()
}

/// True for URLs a `<video>` element can play directly.
pub fn is_direct_video(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    [".mp4", ".webm", ".ogg", ".mov"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_delimited_lists() {
        let list = DelimitedList::parse("React, Node.js, ");
        assert_eq!(list.clone().into_vec(), vec!["React", "Node.js"]);
        assert_eq!(list.to_field(), "React, Node.js");
        assert!(DelimitedList::parse(" , ,").is_empty());
    }

    #[test]
    fn collects_into_delimited_list() {
        let list: DelimitedList = ["Rust", " ", "Go"].into_iter().collect();
        assert_eq!(list.into_vec(), vec!["Rust", "Go"]);
    }

    #[test]
    fn slugs_titles() {
        assert_eq!(slug("My Cool Project!"), "my-cool-project");
        assert_eq!(slug("Beta "), "beta");
        assert_eq!(slug("  Spaced   Out\tTitle "), "spaced-out-title");
        assert_eq!(slug("v2.0_release"), "v2.0_release");
        assert_eq!(slug("Café Menu"), "caf-menu");
        assert_eq!(slug("My Cool Project!"), slug("My Cool Project!"));
    }

    #[test]
    fn project_pages_skip_blank_titles() {
        let projects = vec![
            Project { title: "Alpha".into(), ..Default::default() },
            Project { title: "   ".into(), ..Default::default() },
            Project { title: "Beta ".into(), ..Default::default() },
        ];

        let pages = project_pages(&projects);

        assert_eq!(
            pages.iter().map(|p| p.filename.as_str()).collect::<Vec<_>>(),
            vec!["proyecto-alpha.html", "proyecto-beta.html"]
        );
        assert_eq!(pages[1].index, 2);
        assert_eq!(pages[1].anchor(), "proyecto-beta");
    }

    #[test]
    fn project_pages_disambiguate_collisions() {
        let projects = vec![
            Project { title: "Alpha".into(), ..Default::default() },
            Project { title: "alpha".into(), ..Default::default() },
            Project { title: "!!!".into(), ..Default::default() },
        ];

        let pages = project_pages(&projects);

        assert_eq!(pages[0].filename, "proyecto-alpha.html");
        assert_eq!(pages[1].filename, "proyecto-alpha-2.html");
        assert_eq!(pages[2].filename, "proyecto-3.html");
    }

    #[test]
    fn rewrites_video_urls() {
        assert_eq!(
            embed_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_video_url("https://www.youtube.com/watch?feature=share&v=abc_123"),
            "https://www.youtube.com/embed/abc_123"
        );
        assert_eq!(
            embed_video_url("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_video_url("https://vimeo.com/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
        assert_eq!(
            embed_video_url("https://player.vimeo.com/video/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
        assert_eq!(
            embed_video_url("https://cdn.example.com/demo.mp4"),
            "https://cdn.example.com/demo.mp4"
        );
    }

    #[test]
    fn detects_direct_videos() {
        assert!(is_direct_video("https://cdn.example.com/demo.MP4?t=3"));
        assert!(!is_direct_video("https://www.youtube.com/embed/abc"));
    }

    #[test]
    fn skill_percent_reads_numbers() {
        let skill = |level: &str| Skill { level: level.into(), ..Default::default() };
        assert_eq!(skill("80").percent(), Some(80));
        assert_eq!(skill(" 65% ").percent(), Some(65));
        assert_eq!(skill("140").percent(), Some(100));
        assert_eq!(skill("Advanced").percent(), None);
    }

    #[test]
    fn deserializes_partial_portfolio() {
        let data: PortfolioData = serde_json::from_str(
            r#"{"personal": {"name": "Ada"}, "projects": [{"title": "Engine", "demoUrl": "x"}]}"#,
        )
        .unwrap();

        assert_eq!(data.personal.name, "Ada");
        assert_eq!(data.projects[0].demo_url, "x");
        assert!(data.skills.is_empty());
    }
}
