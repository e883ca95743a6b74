//! End-to-end pipeline tests against an in-memory store.

use ticket_desk_core::{
    config::DeskConfig,
    error::DeskError,
    event::DeskEvent,
    filter::TicketFilters,
    pipeline::DeskPipeline,
    store::DeskStore,
};

const TICKETS: &str = "id,segment,type,sentiment,priority,language,office\n\
                       1,VIP,Жалоба,Негативная,9,RU,Алматы\n\
                       2,Mass,Консультация,Нейтральная,5,KZ,Астана\n\
                       ,Mass,Спам,Нейтральная,2,RU,Астана\n\
                       3,Priority,Жалоба,Негативная,8,RU,Шымкент\n\
                       1,Mass,Спам,Позитивная,1,EN,Актобе\n";

const MANAGERS: &str = "id,ФИО,Офис,Навыки,Количество обращений в работе\n\
                        m1,Иванов А.С.,Алматы,\"VIP, ENG\",2\n\
                        m2,Петрова М.К.,Астана,KZ,0\n";

#[test]
fn import_reports_rows_errors_and_duplicates() {
    let pipeline = DeskPipeline::build_test().unwrap();
    let summary = pipeline.import_tickets(TICKETS, false).unwrap();

    assert_eq!(summary.rows_total, 5);
    assert_eq!(summary.rows_imported, 3);
    assert_eq!(summary.parse_errors.len(), 1);
    assert!(!summary.validation.valid);
    assert_eq!(summary.validation.error_messages(), vec!["Duplicate id: 1".to_string()]);

    // The first occurrence of a duplicate id is the one kept.
    let stored = pipeline.store().get_ticket("1").unwrap();
    assert_eq!(stored.segment, "VIP");

    let events = pipeline.store().events_for_batch(&summary.batch_id).unwrap();
    let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["batch_imported", "validation_failed"]);
    assert_eq!(
        events[0].event().unwrap(),
        DeskEvent::BatchImported {
            batch_id: summary.batch_id.clone(),
            rows_total: 5,
            rows_imported: 3,
            rows_rejected: 1,
        }
    );
}

#[test]
fn reimport_skips_known_ids_unless_replacing() {
    let pipeline = DeskPipeline::build_test().unwrap();
    pipeline.import_tickets(TICKETS, false).unwrap();

    let again = pipeline.import_tickets(TICKETS, false).unwrap();
    assert_eq!(again.rows_imported, 0);

    let replaced = pipeline
        .import_tickets("id,segment\n10,VIP\n", true)
        .unwrap();
    assert_eq!(replaced.rows_imported, 1);
    assert_eq!(pipeline.store().ticket_count().unwrap(), 1);
}

#[test]
fn file_store_keeps_tickets_across_reopen() {
    let path = std::env::temp_dir().join(format!("desk-{}.db", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().into_owned();

    let store = DeskStore::open(&path).unwrap();
    store.migrate().unwrap();
    let pipeline = DeskPipeline::new(store, DeskConfig::default());
    assert_eq!(pipeline.import_tickets(TICKETS, false).unwrap().rows_imported, 3);
    drop(pipeline);

    let reopened = DeskStore::open(&path).unwrap();
    reopened.migrate().unwrap();
    assert_eq!(reopened.ticket_count().unwrap(), 3);
    drop(reopened);

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

#[test]
fn memory_path_opens_like_a_file() {
    let store = DeskStore::open(":memory:").unwrap();
    store.migrate().unwrap();
    assert_eq!(store.ticket_count().unwrap(), 0);
}

#[test]
fn missing_ticket_is_a_typed_error() {
    let pipeline = DeskPipeline::build_test().unwrap();
    match pipeline.store().get_ticket("nope") {
        Err(DeskError::TicketNotFound { id }) => assert_eq!(id, "nope"),
        other => panic!("expected TicketNotFound, got {other:?}"),
    }
}

#[test]
fn distribute_assigns_round_robin_and_bumps_workload() {
    let pipeline = DeskPipeline::build_test().unwrap();
    pipeline.import_tickets(TICKETS, false).unwrap();
    let roster = pipeline.import_managers(MANAGERS, false).unwrap();
    assert_eq!(roster.rows_imported, 2);

    let result = pipeline.distribute().unwrap();
    let pairs: Vec<(&str, &str)> = result
        .assignments
        .iter()
        .map(|a| (a.ticket_id.as_str(), a.manager_id.as_str()))
        .collect();
    assert_eq!(pairs, vec![("1", "m1"), ("2", "m2"), ("3", "m1")]);

    let config = &pipeline.config;
    let t3 = pipeline.store().get_ticket("3").unwrap();
    assert_eq!(t3.manager, "Иванов А.С.");
    assert_eq!(t3.status, config.status_assigned);

    let managers = pipeline.store().all_managers().unwrap();
    assert_eq!(managers[0].skills, vec!["VIP", "ENG"]);
    assert_eq!(managers[0].active_requests, 4);
    assert_eq!(managers[1].active_requests, 1);

    // Nothing left to hand out on a second run.
    assert!(pipeline.distribute().unwrap().assignments.is_empty());
}

#[test]
fn distribute_without_roster_reports_unassigned() {
    let pipeline = DeskPipeline::build_test().unwrap();
    pipeline.import_tickets(TICKETS, false).unwrap();

    let result = pipeline.distribute().unwrap();
    assert!(result.assignments.is_empty());
    assert_eq!(result.unassigned, vec!["1", "2", "3"]);
    assert_eq!(pipeline.store().unassigned_tickets(&pipeline.config).unwrap().len(), 3);
}

#[test]
fn query_and_stats_read_stored_tickets() {
    let pipeline = DeskPipeline::build_test().unwrap();
    pipeline.import_tickets(TICKETS, false).unwrap();

    let filters = TicketFilters {
        ticket_type: vec!["жалоба".into()],
        priority_range: vec!["Высокий (8–10)".into()],
        ..TicketFilters::default()
    };
    let found = pipeline.query(&filters).unwrap();
    let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);

    let stats = pipeline.stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.processed, 0);
    assert_eq!(stats.unassigned, 3);
    assert_eq!(stats.by_type.get("Жалоба"), Some(&2));
    assert_eq!(stats.by_language.get("RU"), Some(&2));
    assert_eq!(stats.by_office.get("Астана"), Some(&1));
}
