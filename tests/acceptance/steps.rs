use crate::BoardWorld;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use kanban_board::board::{self, MilestoneExport, PauseLabels, RepositoryExport};
use kanban_board::github::records::{RawAssignee, RawIssue, RawIssueState, RawLabel, RawMilestone};
use regex::Regex;

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn issue(number: u64, state: RawIssueState, assignee: Option<String>, labels: &[String]) -> RawIssue {
    RawIssue {
        number,
        title: format!("Issue {number}"),
        url: format!("https://github.com/acme/widgets/issues/{number}"),
        state,
        assignee: assignee.map(|avatar_url| RawAssignee { avatar_url }),
        labels: labels
            .iter()
            .map(|name| RawLabel { name: name.clone() })
            .collect(),
        pull_request: None,
    }
}

fn add_issue(world: &mut BoardWorld, repository: &str, milestone: u64, record: RawIssue) {
    world.source = std::mem::take(&mut world.source).with_issue(repository, milestone, record);
}

fn repository<'a>(world: &'a BoardWorld, name: &str) -> &'a RepositoryExport {
    world
        .board
        .iter()
        .find(|repository| repository.name == name)
        .unwrap_or_else(|| panic!("Repository '{}' not on the board", name))
}

fn milestone<'a>(world: &'a BoardWorld, repository_name: &str, title: &str) -> &'a MilestoneExport {
    repository(world, repository_name)
        .milestones
        .iter()
        .find(|milestone| milestone.title == title)
        .unwrap_or_else(|| panic!("Milestone '{}' not found in '{}'", title, repository_name))
}

#[given(
    regex = r#"^repository "([^"]*)" has milestone "([^"]*)" numbered (\d+) with (\d+) open and (\d+) closed issues$"#
)]
async fn given_milestone(
    world: &mut BoardWorld,
    repository: String,
    title: String,
    number: u64,
    open: u64,
    closed: u64,
) {
    let record = RawMilestone {
        number,
        title,
        url: format!("https://github.com/{repository}/milestone/{number}"),
        open_issue_count: open,
        closed_issue_count: closed,
    };
    world.source = std::mem::take(&mut world.source).with_milestone(&repository, record);
}

#[given(regex = r#"^milestone (\d+) of "([^"]*)" has a closed issue numbered (\d+)$"#)]
async fn given_closed_issue(world: &mut BoardWorld, milestone: u64, repository: String, number: u64) {
    add_issue(
        world,
        &repository,
        milestone,
        issue(number, RawIssueState::Closed, None, &[]),
    );
}

#[given(regex = r#"^milestone (\d+) of "([^"]*)" has an unassigned open issue numbered (\d+)$"#)]
async fn given_queued_issue(world: &mut BoardWorld, milestone: u64, repository: String, number: u64) {
    add_issue(
        world,
        &repository,
        milestone,
        issue(number, RawIssueState::Open, None, &[]),
    );
}

#[given(
    regex = r#"^milestone (\d+) of "([^"]*)" has an open issue numbered (\d+) assigned to "([^"]*)"$"#
)]
async fn given_active_issue(
    world: &mut BoardWorld,
    milestone: u64,
    repository: String,
    number: u64,
    assignee: String,
) {
    add_issue(
        world,
        &repository,
        milestone,
        issue(number, RawIssueState::Open, Some(assignee), &[]),
    );
}

#[given(
    regex = r#"^milestone (\d+) of "([^"]*)" has an open issue numbered (\d+) assigned to "([^"]*)" labelled "([^"]*)"$"#
)]
async fn given_labelled_active_issue(
    world: &mut BoardWorld,
    milestone: u64,
    repository: String,
    number: u64,
    assignee: String,
    labels: String,
) {
    add_issue(
        world,
        &repository,
        milestone,
        issue(
            number,
            RawIssueState::Open,
            Some(assignee),
            &split_list(&labels),
        ),
    );
}

#[given(regex = r#"^milestone (\d+) of "([^"]*)" has a pull request numbered (\d+)$"#)]
async fn given_pull_request(world: &mut BoardWorld, milestone: u64, repository: String, number: u64) {
    let mut record = issue(number, RawIssueState::Open, None, &[]);
    record.pull_request = Some(serde_json::json!({
        "url": format!("https://api.github.com/repos/{repository}/pulls/{number}")
    }));
    add_issue(world, &repository, milestone, record);
}

#[given(regex = r#"^the data source fails for repository "([^"]*)"$"#)]
async fn given_failing_repository(world: &mut BoardWorld, repository: String) {
    world.source = std::mem::take(&mut world.source).with_failure(&repository, "connection reset");
}

#[given(regex = r#"^the pausing labels are "([^"]*)"$"#)]
async fn given_pausing_labels(world: &mut BoardWorld, labels: String) {
    world.pause_labels = split_list(&labels);
}

#[given("pausing labels ignore case")]
async fn given_ignore_label_case(world: &mut BoardWorld) {
    world.ignore_label_case = true;
}

#[given("the fixture file contains:")]
async fn given_fixture_file(world: &mut BoardWorld, step: &Step) {
    let content = step
        .docstring
        .as_ref()
        .expect("Expected docstring with fixture content");

    let dir = tempfile::tempdir().expect("Failed to create scratch directory");
    std::fs::write(dir.path().join("fixture.json"), content.trim())
        .expect("Failed to write fixture file");
    world.workdir = Some(dir);
}

#[when(regex = r#"^I build the board for "([^"]*)"$"#)]
async fn when_build_board(world: &mut BoardWorld, names: String) {
    let pause_labels = PauseLabels::new(world.pause_labels.clone(), !world.ignore_label_case);
    world.board = board::build(&split_list(&names), &world.source, &pause_labels).await;
}

#[when(regex = r#"^I run `kanban ([^`]*)` with the fixture$"#)]
async fn when_run_with_fixture(world: &mut BoardWorld, arguments: String) {
    let dir = world
        .workdir
        .as_ref()
        .expect("Fixture file must be written first")
        .path()
        .to_path_buf();

    let mut args: Vec<String> = std::iter::once("kanban".to_string())
        .chain(arguments.split_whitespace().map(str::to_string))
        .collect();
    args.push("--fixture".to_string());
    args.push(dir.join("fixture.json").display().to_string());

    let mut buffer: Vec<u8> = Vec::new();
    let writer_option: Option<&mut dyn std::io::Write> = Some(&mut buffer);
    let result = kanban_board::run::run(args, writer_option, Some(&dir)).await;

    world.captured_output = buffer;
    world.run_result = Some(result);
}

#[then(regex = r#"^the board lists repositories "([^"]*)"$"#)]
async fn then_board_lists(world: &mut BoardWorld, names: String) {
    let actual: Vec<String> = world.board.iter().map(|r| r.name.clone()).collect();
    assert_eq!(actual, split_list(&names));
}

#[then(regex = r#"^repository "([^"]*)" shows milestones "([^"]*)"$"#)]
async fn then_repository_has_milestones(world: &mut BoardWorld, name: String, titles: String) {
    let actual: Vec<String> = repository(world, &name)
        .milestones
        .iter()
        .map(|milestone| format!("{} #{}", milestone.title, milestone.number))
        .collect();
    assert_eq!(actual, split_list(&titles));
}

#[then(regex = r#"^repository "([^"]*)" has no milestones$"#)]
async fn then_repository_empty(world: &mut BoardWorld, name: String) {
    let repository = repository(world, &name);
    assert!(
        repository.milestones.is_empty(),
        "Expected no milestones in '{}', got {:?}",
        name,
        repository.milestones
    );
}

#[then(regex = r#"^repository "([^"]*)" does not show milestone "([^"]*)"$"#)]
async fn then_milestone_absent(world: &mut BoardWorld, name: String, title: String) {
    assert!(
        !repository(world, &name)
            .milestones
            .iter()
            .any(|milestone| milestone.title == title),
        "Milestone '{}' should not be on the board",
        title
    );
}

#[then(regex = r#"^the (queued|active|completed) issues of "([^"]*)" in "([^"]*)" are "([^"]*)"$"#)]
async fn then_bucket_is(
    world: &mut BoardWorld,
    state: String,
    title: String,
    name: String,
    expected: String,
) {
    let milestone = milestone(world, &name, &title);
    let bucket = match state.as_str() {
        "queued" => &milestone.issues.queued,
        "active" => &milestone.issues.active,
        _ => &milestone.issues.completed,
    };
    let actual: Vec<String> = bucket.iter().map(|issue| issue.title.clone()).collect();
    assert_eq!(actual, split_list(&expected));
}

#[then(regex = r#"^"([^"]*)" in "([^"]*)" of "([^"]*)" is (paused|not paused)$"#)]
async fn then_issue_paused(
    world: &mut BoardWorld,
    issue_title: String,
    title: String,
    name: String,
    status: String,
) {
    let milestone = milestone(world, &name, &title);
    let issue = milestone
        .issues
        .active
        .iter()
        .find(|issue| issue.title == issue_title)
        .unwrap_or_else(|| panic!("'{}' is not an active issue of '{}'", issue_title, title));
    assert_eq!(issue.paused, status == "paused");
}

#[then(regex = r#"^milestone "([^"]*)" of "([^"]*)" is (\d+(?:\.\d+)?)% complete$"#)]
async fn then_progress(world: &mut BoardWorld, title: String, name: String, progress: f64) {
    assert_eq!(milestone(world, &name, &title).progress, progress);
}

#[then("the command should succeed")]
async fn then_command_succeeds(world: &mut BoardWorld) {
    match &world.run_result {
        Some(Ok(())) => {}
        Some(Err(err)) => panic!("Command failed: {err:#}"),
        None => panic!("No command was run"),
    }
}

#[then(regex = r#"^the command should fail with "(.*)"$"#)]
async fn then_command_fails(world: &mut BoardWorld, expected: String) {
    match &world.run_result {
        Some(Err(err)) => assert!(
            format!("{err:#}").contains(&expected),
            "Expected error containing '{}', got '{:#}'",
            expected,
            err
        ),
        other => panic!("Expected failure, got {:?}", other.as_ref().map(|r| r.is_ok())),
    }
}

#[then("the output should be:")]
async fn then_output_should_be(world: &mut BoardWorld, step: &Step) {
    let expected = step
        .docstring
        .as_ref()
        .expect("Expected docstring with output");
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert_eq!(
        output.trim_end(),
        expected.trim(),
        "Expected output:\n---\n{}\n---\nbut got:\n---\n{}\n---",
        expected.trim(),
        output.trim_end()
    );
}

#[then(regex = r#"^the JSON output at "([^"]*)" should be (.*)$"#)]
async fn then_json_output_at(world: &mut BoardWorld, pointer: String, expected: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    let value: serde_json::Value = serde_json::from_str(&output).expect("Output is not JSON");
    let expected: serde_json::Value =
        serde_json::from_str(&expected).expect("Expected value is not JSON");
    assert_eq!(
        value.pointer(&pointer),
        Some(&expected),
        "Unexpected value at {} in:\n{}",
        pointer,
        output
    );
}

#[then(regex = r#"^the output should match "(.*)"$"#)]
async fn then_output_should_match(world: &mut BoardWorld, pattern: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    let re = Regex::new(&format!("(?m){pattern}")).expect("Invalid pattern");
    assert!(
        re.is_match(&output),
        "Output does not match '{}':\n{}",
        pattern,
        output
    );
}
