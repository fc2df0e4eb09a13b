mod common;

#[cfg(test)]
pub mod model_tests {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use super::common::*;

    use youthhub::models::*;
    use youthhub::services::reports::{contributions_csv, grand_total, monthly_totals};

    fn row(member: &str, cents: i64, when: &str, week: &str) -> ContributionRow {
        ContributionRow {
            id: Uuid::new_v4(),
            member_id: seed_alice_id(),
            member_name: member.to_string(),
            member_email: "alice@test.com".to_string(),
            amount_cents: cents,
            date: parse_time(when),
            week: week.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_contribution_query_fields_match_columns() {
        assert_eq!(
            ContributionQuery::fields(),
            &["member_id", "week", "date", "amount_cents", "offset", "limit", "sort_by"]
        );
        assert_eq!(ContributionQuery::sortable_len(), 4);
    }

    #[test]
    fn test_contribution_query_is_empty_ignores_pagination() {
        let query = ContributionQuery {
            offset: Some(10),
            limit: Some(5),
            sort_by: Some(vec![Some(true)]),
            ..Default::default()
        };
        assert!(query.is_empty());

        let query = ContributionQuery {
            week: Some("2025-W3".into()),
            ..Default::default()
        };
        assert!(!query.is_empty());
    }

    #[test]
    fn test_member_update_is_empty() {
        let update = MemberUpdate {
            id: Uuid::new_v4(),
            name: None,
            email: None,
        };
        assert!(update.is_empty());

        let update = MemberUpdate {
            name: Some("Alice".into()),
            ..update
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_sermon_update_is_empty() {
        let update = SermonUpdate {
            title: None,
            description: None,
            date: None,
        };
        assert!(update.is_empty());

        let update = SermonUpdate {
            date: NaiveDate::from_ymd_opt(2025, 1, 5),
            ..update
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_user_iden_conversions() {
        let id = Uuid::new_v4();
        assert_eq!(UserIden::from(id), UserIden::Id(id));
        assert_eq!(
            UserIden::from("a@b.co"),
            UserIden::Email("a@b.co".to_string())
        );
        assert_eq!(UserIden::from(id).to_string(), format!("ID {id}"));
        assert_eq!(
            UserIden::from("a@b.co").to_string(),
            "email 'a@b.co'"
        );
    }

    #[test]
    fn test_event_type_parses_keys_and_labels() {
        assert_eq!("worship".parse::<EventType>(), Ok(EventType::Worship));
        assert_eq!("Special Event".parse::<EventType>(), Ok(EventType::Special));
        assert_eq!(" OTHER ".parse::<EventType>(), Ok(EventType::Other));
        assert!("picnic".parse::<EventType>().is_err());
        assert_eq!(EventType::Service.to_string(), "Service Project");
    }

    #[test]
    fn test_event_filter_falls_back_to_all() {
        assert_eq!(EventFilter::parse(None), EventFilter::All);
        assert_eq!(EventFilter::parse(Some("all")), EventFilter::All);
        assert_eq!(EventFilter::parse(Some("bogus")), EventFilter::All);
        assert_eq!(
            EventFilter::parse(Some("service")),
            EventFilter::Only(EventType::Service)
        );

        let filter = EventFilter::Only(EventType::Regular);
        assert!(filter.matches(EventType::Regular));
        assert!(!filter.matches(EventType::Special));
        assert!(EventFilter::All.matches(EventType::Other));
    }

    #[test]
    fn test_event_labels() {
        let event = Event {
            id: Uuid::new_v4(),
            title: "Youth Night".into(),
            description: "Games".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            location: "Hall".into(),
            event_type: EventType::Regular,
            created_at: Utc::now(),
        };

        assert_eq!(event.date_label(), "Jan 5, 2025");
        assert_eq!(event.when_label(), "Sun, Jan 5, 2025 at 18:00 - 20:00");
        assert_eq!(event.start_input(), "18:00");
        assert_eq!(event.type_label(), "Regular Meeting");
    }

    #[test]
    fn test_contribution_row_labels() {
        let row = row("Alice", 123_450, "2025-01-15 10:00:00+00", "2025-W3");
        assert_eq!(row.amount_label(), "$1,234.50");
        assert_eq!(row.date_label(), "Jan 15, 2025");
        assert_eq!(row.week_label(), "Week 3, 2025");
        assert_eq!(row.description_label(), "");

        let odd = ContributionRow {
            week: "sometime".into(),
            ..row
        };
        assert_eq!(odd.week_label(), "sometime");
    }

    #[test]
    fn test_monthly_report_from_rows() {
        let rows = vec![
            row("Alice", 1000, "2025-02-10 10:00:00+00", "2025-W7"),
            row("Alice", 2500, "2025-01-05 10:00:00+00", "2025-W2"),
            row("Bob", 500, "2025-01-20 10:00:00+00", "2025-W4"),
        ];

        let totals = monthly_totals(&rows);
        assert_eq!(
            totals,
            vec![
                MonthlyTotal {
                    month: "2025-01".into(),
                    total_cents: 3000
                },
                MonthlyTotal {
                    month: "2025-02".into(),
                    total_cents: 1000
                },
            ]
        );
        assert_eq!(grand_total(&totals), 4000);

        let csv = contributions_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "date,week,member,email,amount,description");
        assert!(lines[1].contains("Alice,alice@test.com,10.00"));
    }
}
