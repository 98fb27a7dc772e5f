mod common;

use folio::catalog::Catalog;
use folio::readme::document::strip_pictographs;
use folio::readme::extract::Challenge;
use folio::readme::{Block, Document, ProjectDetail, summarize};

use common::TIDEWATCH_README;

#[test]
fn readme_summary_pulls_intro_stack_and_features() {
    let doc = Document::parse(TIDEWATCH_README);
    let summary = summarize(&doc);

    assert_eq!(
        summary.intro.as_deref(),
        Some("Tidewatch turns raw tide tables into a harbour dashboard you can read at a glance.")
    );
    assert_eq!(summary.tech_stack, ["Frontend", "Node.js", "PostgreSQL"]);
    // Nested items and "Fast" (too short) are left out.
    assert_eq!(
        summary.features,
        [
            "Live tide charts for every configured harbour",
            "Alerts when readings cross a threshold",
        ]
    );
}

#[test]
fn readme_overrides_catalog_detail() {
    let catalog = Catalog::sample().unwrap();
    let project = catalog.project("tidewatch").unwrap();
    let doc = Document::parse(TIDEWATCH_README);
    let detail = ProjectDetail::compose(project, Some(&summarize(&doc)));

    assert!(detail.intro.starts_with("Tidewatch turns raw tide tables"));
    // README stack first, then catalog entries not already listed.
    assert_eq!(&detail.technologies[..3], ["Frontend", "Node.js", "PostgreSQL"]);
    assert!(detail.technologies.contains(&"TypeScript".to_string()));
    assert_eq!(
        detail
            .technologies
            .iter()
            .filter(|t| t.as_str() == "Node.js")
            .count(),
        1
    );
    assert_eq!(detail.features.len(), 2);

    assert_eq!(
        detail.challenges,
        [
            Challenge {
                problem: "Merging data feeds with different update rates".into(),
                solution: Some("Normalised every feed into a shared time series store".into()),
            },
            Challenge {
                problem: "Keeping the dashboard responsive on old tablets".into(),
                solution: Some("Rendered charts server-side and streamed diffs".into()),
            },
        ]
    );
}

#[test]
fn unmatched_solutions_stay_empty() {
    let catalog = Catalog::from_yaml(
        "profile: {name: A, headline: B, email: a@b.c}\nprojects:\n  - id: x\n    title: X\n    description: d\n    challenges: [one, two]\n    solutions: [fix one]\n",
    )
    .unwrap();
    let detail = ProjectDetail::compose(&catalog.projects[0], None);
    assert_eq!(detail.challenges[1].solution, None);
    assert_eq!(detail.intro, "d");
}

#[test]
fn catalog_detail_stands_alone_without_readme() {
    let catalog = Catalog::sample().unwrap();
    let project = catalog.project("tidewatch").unwrap();
    let detail = ProjectDetail::compose(project, None);

    assert_eq!(detail.intro, project.full_description);
    assert_eq!(detail.technologies, project.technologies);
    assert_eq!(detail.features, project.features);
}

#[test]
fn readme_without_sections_falls_back_per_field() {
    let catalog = Catalog::sample().unwrap();
    let project = catalog.project("tidewatch").unwrap();
    let doc = Document::parse("# Notes\n\n## Usage\n\nRun it.\n");
    let detail = ProjectDetail::compose(project, Some(&summarize(&doc)));

    assert_eq!(detail.intro, project.full_description);
    assert_eq!(detail.features, project.features);
    assert_eq!(detail.technologies, project.technologies);
}

#[test]
fn code_blocks_survive_for_the_documentation_view() {
    let doc = Document::parse(TIDEWATCH_README);
    assert_eq!(doc.title().map(strip_pictographs).as_deref(), Some("Tidewatch"));
    let started = doc.section("getting started");
    assert!(started.iter().any(
        |b| matches!(b, Block::CodeBlock { lang, text } if lang.as_deref() == Some("bash") && text.contains("npm install"))
    ));
}
