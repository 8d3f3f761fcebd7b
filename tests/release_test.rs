// tests/release_test.rs
use chrono::{DateTime, TimeZone, Utc};
use release_devkit::analyzer::{aggregate, compute_next, parse_changelog, ReleaseDetermination};
use release_devkit::config::{parse_projects, Project};
use release_devkit::domain::{
    ChangelogSection, CheckRun, CommitState, Headline, PullRequest, Release, Stability, Tag, User,
};
use release_devkit::host::MockHost;
use release_devkit::DevkitError;

fn merged(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap()
}

fn pull_request(number: u64, labels: &[&str], body: &str, day: u32) -> PullRequest {
    PullRequest {
        number,
        title: format!("Change {}", number),
        body: body.to_string(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        merged_at: merged(day),
        html_url: format!("https://github.com/sonata-project/lib/pull/{}", number),
        user: User {
            login: "alice".to_string(),
            html_url: "https://github.com/alice".to_string(),
        },
    }
}

fn project() -> Project {
    parse_projects("lib:\n  branches:\n    1.x: {}\n    4.x: {}\n")
        .unwrap()
        .remove(0)
}

fn host_with_release(tag: &str) -> MockHost {
    let mut host = MockHost::new();
    host.add_release(
        "1.x",
        Release {
            tag: Tag::parse(tag).unwrap(),
            published_at: merged(1),
        },
    );
    host.set_branch_head("1.x", "f00d");
    host.set_status("f00d", CommitState::Success);
    host
}

#[test]
fn test_tag_round_trip() {
    for s in ["0.1.0", "1.2.3", "12.0.7"] {
        assert_eq!(Tag::parse(s).unwrap().to_string(), s);
    }
}

#[test]
fn test_stability_precedence() {
    let label_sets: Vec<Vec<&str>> = vec![
        vec!["minor", "patch"],
        vec!["patch", "minor"],
        vec!["docs", "patch", "minor"],
        vec!["pedantic", "minor", "patch", "bug"],
    ];
    for labels in label_sets {
        assert_eq!(Stability::from_labels(&labels), Stability::Minor);
    }
}

#[test]
fn test_version_calculator_properties() {
    let tag = Tag::parse("1.1.0").unwrap();

    assert_eq!(compute_next(&tag, &[]).unwrap(), tag);
    assert_eq!(
        compute_next(&tag, &[Stability::Minor, Stability::Patch])
            .unwrap()
            .as_str(),
        "1.2.0"
    );
    assert_eq!(
        compute_next(&tag, &[Stability::Patch, Stability::Unknown])
            .unwrap()
            .as_str(),
        "1.1.1"
    );
    assert_eq!(
        compute_next(&tag, &[Stability::Pedantic, Stability::Unknown])
            .unwrap()
            .as_str(),
        "1.1.0"
    );
}

#[test]
fn test_changelog_parser_empty_without_fence() {
    let pr = pull_request(1, &[], "## Changelog\n### Added\n- no fence here", 2);
    assert!(parse_changelog(&pr).is_empty());
}

#[test]
fn test_changelog_aggregation_is_deterministic() {
    let bodies = [
        "## Changelog\n```markdown\n### Removed\n- dropped x\n### Added\n- added y\n```",
        "## Changelog\n```markdown\n### Fixed\n- fixed z\n### Added\n- added w\n```",
    ];
    let prs: Vec<PullRequest> = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| pull_request(i as u64 + 1, &[], body, 2))
        .collect();
    let maps: Vec<_> = prs.iter().map(parse_changelog).collect();

    let render = || {
        aggregate(
            "1.2.0",
            prs.iter().map(|pr| pr.number).zip(maps.iter()),
        )
        .changelog
        .as_markdown()
    };

    let first = render();
    assert_eq!(first, render());

    let headings: Vec<&str> = first.lines().filter(|l| l.starts_with("### ")).collect();
    assert_eq!(headings, vec!["### Added", "### Fixed", "### Removed"]);
}

#[test]
fn test_changelog_section_validation() {
    assert!(matches!(
        ChangelogSection::new("Bogus", vec!["- x".to_string()]),
        Err(DevkitError::Validation(_))
    ));
    for headline in Headline::ALL {
        assert!(ChangelogSection::new(headline.as_str(), vec!["- x".to_string()]).is_ok());
    }
}

#[test]
fn test_scenario_minor_and_patch() {
    let mut host = host_with_release("1.1.0");
    host.add_pull_request("1.x", pull_request(10, &["minor"], "", 2));
    host.add_pull_request("1.x", pull_request(11, &["patch"], "", 3));

    let project = project();
    let release = ReleaseDetermination::new(host, "sonata-project", "SonataCI")
        .determine(&project, project.branch("1.x").unwrap())
        .unwrap();

    assert_eq!(release.next_tag().as_str(), "1.2.0");
    let numbers: Vec<u64> = release
        .pull_requests()
        .iter()
        .map(|pr| pr.pull_request.number)
        .collect();
    assert_eq!(numbers, vec![10, 11]);
}

#[test]
fn test_scenario_patch_only() {
    let mut host = host_with_release("1.1.0");
    host.add_pull_request("1.x", pull_request(10, &["patch"], "", 2));

    let project = project();
    let release = ReleaseDetermination::new(host, "sonata-project", "SonataCI")
        .determine(&project, project.branch("1.x").unwrap())
        .unwrap();

    assert_eq!(release.next_tag().as_str(), "1.1.1");
    assert_eq!(release.stability(), Stability::Patch);
}

#[test]
fn test_scenario_no_baseline_release() {
    let mut host = MockHost::new();
    host.add_pull_request("4.x", pull_request(20, &["pedantic"], "", 2));

    let project = project();
    let release = ReleaseDetermination::new(host, "sonata-project", "SonataCI")
        .determine(&project, project.branch("4.x").unwrap())
        .unwrap();

    assert_eq!(release.current_tag().as_str(), "3.x");
    assert_eq!(release.next_tag().as_str(), "3.x");
}

#[test]
fn test_scenario_changelog_line() {
    let mut host = host_with_release("1.1.0");
    host.add_pull_request(
        "1.x",
        pull_request(
            42,
            &["patch"],
            "## Changelog\n```markdown\n### Changed\n- fixed a thing\n```",
            2,
        ),
    );

    let project = project();
    let release = ReleaseDetermination::new(host, "sonata-project", "SonataCI")
        .determine(&project, project.branch("1.x").unwrap())
        .unwrap();

    let changed = release.changelog().section(Headline::Changed).unwrap();
    assert_eq!(changed.lines().len(), 1);
    assert!(changed.lines()[0].starts_with("- [#42]("));
    assert!(changed.lines()[0].contains(") Fixed a thing (@alice)("));
}

#[test]
fn test_scenario_empty_pull_request_list() {
    let mut host = host_with_release("1.1.0");
    // Merged before the release, and one by the bot
    host.add_pull_request("1.x", pull_request(1, &["minor"], "", 1));
    let mut bot = pull_request(2, &["patch"], "", 5);
    bot.user.login = "SonataCI".to_string();
    host.add_pull_request("1.x", bot);

    let project = project();
    let err = ReleaseDetermination::new(host, "sonata-project", "SonataCI")
        .determine(&project, project.branch("1.x").unwrap())
        .unwrap_err();

    assert!(matches!(
        err,
        DevkitError::NoPullRequestsMergedSinceLastRelease { .. }
    ));
}

#[test]
fn test_check_runs_drive_status() {
    let mut host = host_with_release("1.1.0");
    host.add_pull_request("1.x", pull_request(10, &["patch"], "", 2));
    host.add_check_run(
        "f00d",
        CheckRun {
            name: "phpunit".to_string(),
            status: "completed".to_string(),
            conclusion: Some("failure".to_string()),
        },
    );

    let project = project();
    let release = ReleaseDetermination::new(host, "sonata-project", "SonataCI")
        .determine(&project, project.branch("1.x").unwrap())
        .unwrap();

    assert_eq!(release.status(), CommitState::Failure);
    assert_eq!(release.check_runs().len(), 1);
}
