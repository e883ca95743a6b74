//! CSV decoder + ticket normalizer tests.

use ticket_desk_core::{
    csv_decoder::CsvRow,
    normalizer::{normalize_row, parse_tickets_csv, HeaderIndex, IngestIssue},
};

const HEADER: &str = "id,segment,type,sentiment,priority,language,office,manager,status,aiSummary";

#[test]
fn well_formed_rows_all_import() {
    let text = format!(
        "{HEADER}\n\
         1,VIP,Жалоба,Негативная,9,RU,Алматы,,Новое,Связаться с клиентом.\n\
         2,Mass,Консультация,Нейтральная,5,KZ,Астана,,Новое,\n\
         3,Priority,Претензия,Позитивная,7,EN,Шымкент,,Новое,\n"
    );
    let import = parse_tickets_csv(&text);

    assert_eq!(import.tickets.len(), 3);
    assert!(import.errors.is_empty());
    assert_eq!(import.total_rows, 3);

    let first = &import.tickets[0];
    assert_eq!(first.id, "1");
    assert_eq!(first.segment, "VIP");
    assert_eq!(first.ticket_type, "Жалоба");
    assert_eq!(first.priority, 9);
    assert_eq!(first.ai_summary.as_deref(), Some("Связаться с клиентом."));
    assert_eq!(import.tickets[1].ai_summary, None);
}

#[test]
fn row_without_id_is_reported_by_line() {
    let text = format!("{HEADER}\n1,VIP\n,Mass\n3,Priority\n");
    let import = parse_tickets_csv(&text);

    let ids: Vec<&str> = import.tickets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(import.errors, vec![IngestIssue::MissingId { line: 3 }]);
    assert_eq!(import.total_rows, 3);
    assert_eq!(
        import.error_messages(),
        vec!["Line 3: could not map row (id is required)".to_string()]
    );
}

#[test]
fn localized_headers_match_case_insensitively() {
    let text = "ID обращения,Сегмент,ТИП,Тональность,Приоритет,Язык,Офис,Менеджер,Статус,ИИ Summary\n\
                42,VIP,Спам,Нейтральная,3,KZ,Актобе,Омаров Б.К.,Назначено,Спам-рассылка\n";
    let import = parse_tickets_csv(text);

    assert_eq!(import.tickets.len(), 1);
    let t = &import.tickets[0];
    assert_eq!(t.id, "42");
    assert_eq!(t.segment, "VIP");
    assert_eq!(t.ticket_type, "Спам");
    assert_eq!(t.priority, 3);
    assert_eq!(t.language, "KZ");
    assert_eq!(t.office, "Актобе");
    assert_eq!(t.manager, "Омаров Б.К.");
    assert_eq!(t.status, "Назначено");
    assert_eq!(t.ai_summary.as_deref(), Some("Спам-рассылка"));
}

#[test]
fn missing_columns_default_to_empty_and_zero() {
    let import = parse_tickets_csv("id,priority\n7,high\n8,\n");
    assert_eq!(import.tickets.len(), 2);
    for t in &import.tickets {
        assert_eq!(t.priority, 0);
        assert_eq!(t.segment, "");
        assert_eq!(t.office, "");
        assert_eq!(t.ai_summary, None);
    }
}

#[test]
fn quoted_office_with_comma_is_one_field() {
    let import = parse_tickets_csv("id,office,segment\n1,\"Алматы, офис 2\",VIP\n");
    assert_eq!(import.tickets[0].office, "Алматы, офис 2");
    assert_eq!(import.tickets[0].segment, "VIP");
}

#[test]
fn blank_lines_between_rows_are_ignored() {
    let import = parse_tickets_csv("id,segment\n\n1,VIP\n   \n\n2,Mass\n\n");
    assert_eq!(import.tickets.len(), 2);
    assert!(import.errors.is_empty());
    assert_eq!(import.total_rows, 2);
}

#[test]
fn header_only_file_yields_single_error() {
    for text in ["", "   \n", "id,segment,type\n", "id,segment\n\n\n"] {
        let import = parse_tickets_csv(text);
        assert!(import.tickets.is_empty(), "{text:?}");
        assert_eq!(import.errors, vec![IngestIssue::EmptyFile], "{text:?}");
        assert_eq!(import.total_rows, 0, "{text:?}");
    }
}

#[test]
fn line_numbers_account_for_header_for_every_row() {
    let text = format!("{HEADER}\n,a\n,b\n,c\n");
    let import = parse_tickets_csv(&text);
    assert_eq!(
        import.errors,
        vec![
            IngestIssue::MissingId { line: 2 },
            IngestIssue::MissingId { line: 3 },
            IngestIssue::MissingId { line: 4 },
        ]
    );
}

#[test]
fn errors_serialize_as_messages() {
    let import = parse_tickets_csv("id,segment\n,VIP\n2,Mass\n");
    let json = serde_json::to_value(&import).unwrap();
    assert_eq!(json["totalRows"], 2);
    assert_eq!(json["errors"][0], "Line 2: could not map row (id is required)");
    assert_eq!(json["tickets"][0]["id"], "2");
    assert_eq!(json["tickets"][0]["type"], "");
}

#[test]
fn comma_only_rows_count_but_keep_line_numbers() {
    let import = parse_tickets_csv("id,segment\n,,\n,VIP\n");
    assert!(import.tickets.is_empty());
    assert_eq!(import.errors, vec![IngestIssue::MissingId { line: 3 }]);
    assert_eq!(import.total_rows, 2);
}

#[test]
fn unclosed_quote_is_reported_and_later_rows_survive() {
    let import =
        parse_tickets_csv("id,office,segment\n1,\"Алматы,VIP\n2,Астана,Mass\n3,Шымкент,VIP\n");

    let ids: Vec<&str> = import.tickets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(import.tickets[1].office, "Астана");
    assert_eq!(import.tickets[2].segment, "VIP");
    assert_eq!(import.errors, vec![IngestIssue::UnterminatedQuote { line: 2 }]);
    assert_eq!(import.total_rows, 3);
}

#[test]
fn single_row_normalizes_against_its_header() {
    let header: Vec<String> = ["ID", "Приоритет", "Офис"].map(String::from).to_vec();
    let headers = HeaderIndex::new(&header);
    let row = |fields: &[&str]| CsvRow {
        line: 2,
        fields: fields.iter().map(|f| f.to_string()).collect(),
    };

    let ticket = normalize_row(&headers, &row(&["15", "8.5", "Алматы"])).unwrap();
    assert_eq!(ticket.id, "15");
    assert_eq!(ticket.priority, 8);
    assert_eq!(ticket.office, "Алматы");
    assert_eq!(ticket.segment, "");

    assert_eq!(normalize_row(&headers, &row(&["", "5", "Астана"])), None);
    assert_eq!(normalize_row(&headers, &row(&["16"])).map(|t| t.priority), Some(0));
}
