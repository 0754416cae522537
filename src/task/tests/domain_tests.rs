//! Canonical model invariants and synonym matching.

use super::at;
use crate::task::domain::{
    NewTask, ProviderId, Task, TaskDomainError, TaskId, TaskOrigin, TaskPatch, TaskPriority,
    TaskRecord, TaskStatus, UNTITLED_TASK,
};
use chrono::NaiveDate;
use rstest::{fixture, rstest};

#[fixture]
fn record() -> TaskRecord {
    TaskRecord {
        origin: TaskOrigin::Notion,
        provider_id: ProviderId::new("abc").expect("valid provider id"),
        title: "Write report".to_owned(),
        description: None,
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        due_date: None,
        created_at: at(9, 0),
        updated_at: None,
        labels: Vec::new(),
        project_name: None,
    }
}

#[rstest]
fn task_id_joins_origin_and_provider_id() {
    let provider_id = ProviderId::new("123").expect("valid provider id");

    assert_eq!(
        TaskId::derive(TaskOrigin::Todoist, &provider_id).as_str(),
        "todoist-123"
    );
}

#[rstest]
#[case("")]
#[case("   ")]
fn provider_id_rejects_blank_values(#[case] raw: &str) {
    assert_eq!(ProviderId::new(raw), Err(TaskDomainError::EmptyProviderId));
}

#[rstest]
#[case("notion", TaskOrigin::Notion)]
#[case("Todoist", TaskOrigin::Todoist)]
#[case(" NOTION ", TaskOrigin::Notion)]
fn origin_parses_case_insensitively(#[case] raw: &str, #[case] expected: TaskOrigin) {
    assert_eq!(TaskOrigin::try_from(raw), Ok(expected));
}

#[rstest]
fn origin_rejects_unknown_provider() {
    assert_eq!(
        TaskOrigin::try_from("jira"),
        Err(TaskDomainError::UnsupportedOrigin("jira".to_owned()))
    );
}

#[rstest]
#[case("Not started", Some(TaskStatus::Todo))]
#[case("backlog", Some(TaskStatus::Todo))]
#[case("In Review", Some(TaskStatus::InProgress))]
#[case("doing", Some(TaskStatus::InProgress))]
#[case("Completed", Some(TaskStatus::Done))]
#[case("  resolved ", Some(TaskStatus::Done))]
#[case("blocked", None)]
fn status_labels_match_synonyms(#[case] label: &str, #[case] expected: Option<TaskStatus>) {
    assert_eq!(TaskStatus::from_label(label), expected);
}

#[rstest]
#[case("Critical", Some(TaskPriority::Urgent))]
#[case("P1", Some(TaskPriority::High))]
#[case("normal", Some(TaskPriority::Medium))]
#[case("minor", Some(TaskPriority::Low))]
#[case("whenever", None)]
fn priority_labels_match_synonyms(#[case] label: &str, #[case] expected: Option<TaskPriority>) {
    assert_eq!(TaskPriority::from_label(label), expected);
}

#[rstest]
fn priority_orders_most_pressing_first() {
    let mut levels = vec![
        TaskPriority::Low,
        TaskPriority::Urgent,
        TaskPriority::Medium,
        TaskPriority::High,
    ];
    levels.sort();

    assert_eq!(
        levels,
        vec![
            TaskPriority::Urgent,
            TaskPriority::High,
            TaskPriority::Medium,
            TaskPriority::Low
        ]
    );
}

#[rstest]
fn from_record_substitutes_placeholder_for_blank_title(mut record: TaskRecord) {
    record.title = "   ".to_owned();

    let task = Task::from_record(record);

    assert_eq!(task.title(), UNTITLED_TASK);
}

#[rstest]
fn from_record_defaults_updated_at_to_created_at(record: TaskRecord) {
    let task = Task::from_record(record);

    assert_eq!(task.id().as_str(), "notion-abc");
    assert_eq!(task.updated_at(), task.created_at());
}

#[rstest]
fn from_record_drops_blank_optional_text(mut record: TaskRecord) {
    record.description = Some("  ".to_owned());
    record.project_name = Some(String::new());

    let task = Task::from_record(record);

    assert_eq!(task.description(), None);
    assert_eq!(task.project_name(), None);
}

#[rstest]
fn from_record_treats_empty_label_set_as_absent(mut record: TaskRecord) {
    record.labels = vec![" ".to_owned(), String::new()];

    let task = Task::from_record(record);

    assert_eq!(task.labels(), None);
}

#[rstest]
fn from_record_trims_labels(mut record: TaskRecord) {
    record.labels = vec![" work ".to_owned(), "home".to_owned()];

    let task = Task::from_record(record);

    assert_eq!(
        task.labels(),
        Some(&["work".to_owned(), "home".to_owned()][..])
    );
}

#[rstest]
fn into_record_round_trips_through_from_record(mut record: TaskRecord) {
    record.labels = vec!["work".to_owned()];
    record.updated_at = Some(at(10, 0));
    let task = Task::from_record(record);

    let rebuilt = Task::from_record(task.clone().into_record());

    assert_eq!(rebuilt, task);
}

#[rstest]
fn task_serializes_with_camel_case_keys_and_omits_absent_fields(record: TaskRecord) {
    let task = Task::from_record(record);

    let json = serde_json::to_value(&task).expect("task should serialize");

    assert_eq!(json["providerId"], "abc");
    assert_eq!(json["status"], "todo");
    assert!(json.get("description").is_none());
    assert!(json.get("labels").is_none());
}

#[rstest]
fn new_task_patch_sets_every_creation_field() {
    let due = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
    let input = NewTask::new("Ship")
        .with_status(TaskStatus::Done)
        .with_priority(TaskPriority::High)
        .with_due_date(due);

    let patch = input.as_patch();

    assert_eq!(patch.title.as_deref(), Some("Ship"));
    assert_eq!(patch.status, Some(TaskStatus::Done));
    assert_eq!(patch.priority, Some(TaskPriority::High));
    assert_eq!(patch.due_date, Some(due));
    assert_eq!(patch.labels, None);
}

#[rstest]
fn empty_patch_changes_nothing() {
    assert_eq!(TaskPatch::new(), TaskPatch::default());
    assert_eq!(TaskPatch::new().title, None);
}
