//! Ticket validator tests.

use ticket_desk_core::{
    ticket::Ticket,
    validator::{first_occurrences, validate_tickets, ValidationIssue},
};

fn batch(ids: &[&str]) -> Vec<Ticket> {
    ids.iter().map(|id| Ticket::new(*id)).collect()
}

#[test]
fn clean_batch_is_valid() {
    let report = validate_tickets(&batch(&["A", "B", "C"]));
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn duplicate_flagged_once_for_second_occurrence() {
    let report = validate_tickets(&batch(&["A", "B", "A"]));
    assert!(!report.valid);
    assert_eq!(report.errors, vec![ValidationIssue::DuplicateId { id: "A".into() }]);
    assert_eq!(report.error_messages(), vec!["Duplicate id: A".to_string()]);
}

#[test]
fn every_repeat_after_the_first_is_flagged() {
    let report = validate_tickets(&batch(&["A", "A", "B", "A", "B"]));
    assert_eq!(
        report.errors,
        vec![
            ValidationIssue::DuplicateId { id: "A".into() },
            ValidationIssue::DuplicateId { id: "A".into() },
            ValidationIssue::DuplicateId { id: "B".into() },
        ]
    );
}

#[test]
fn empty_id_reported_as_missing_by_position() {
    let report = validate_tickets(&batch(&["A", "", "B"]));
    assert!(!report.valid);
    assert_eq!(report.errors, vec![ValidationIssue::MissingId { position: 2 }]);
    assert_eq!(report.error_messages(), vec!["Row 2: missing id".to_string()]);
}

#[test]
fn repeated_empty_id_is_missing_and_duplicate() {
    let report = validate_tickets(&batch(&["", ""]));
    assert_eq!(
        report.errors,
        vec![
            ValidationIssue::MissingId { position: 1 },
            ValidationIssue::MissingId { position: 2 },
            ValidationIssue::DuplicateId { id: String::new() },
        ]
    );
}

#[test]
fn ids_are_compared_as_given() {
    let report = validate_tickets(&batch(&["A", "A ", " A"]));
    assert!(report.valid, "{:?}", report.errors);
}

#[test]
fn validation_leaves_the_batch_untouched() {
    let tickets = batch(&["A", "A"]);
    let before = tickets.clone();
    let _ = validate_tickets(&tickets);
    assert_eq!(tickets, before);
}

#[test]
fn first_occurrences_drops_repeats_and_blanks() {
    let mut tickets = batch(&["A", "B", "A", ""]);
    tickets[2].segment = "VIP".into();
    let kept = first_occurrences(&tickets);
    let ids: Vec<&str> = kept.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert_eq!(kept[0].segment, "", "first A must win over the later one");
}
