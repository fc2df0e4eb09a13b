use std::collections::BTreeMap;

use crate::common::format_amount;
use crate::models::{ContributionRow, MonthlyTotal};

/// Sums contributions per calendar month (`YYYY-MM`), oldest month first.
pub fn monthly_totals(rows: &[ContributionRow]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<String, i64> = BTreeMap::new();

    for row in rows {
        let month = row.date.format("%Y-%m").to_string();
        *months.entry(month).or_default() += row.amount_cents;
    }

    months
        .into_iter()
        .map(|(month, total_cents)| MonthlyTotal { month, total_cents })
        .collect()
}

pub fn grand_total(totals: &[MonthlyTotal]) -> i64 {
    totals.iter().map(|m| m.total_cents).sum()
}

pub const CSV_HEADER: &str = "date,week,member,email,amount,description";

/// Renders contributions as CSV, one line per row after the header.
pub fn contributions_csv(rows: &[ContributionRow]) -> String {
    let mut output = String::from(CSV_HEADER);
    output.push('\n');

    for row in rows {
        let values = [
            row.date.format("%Y-%m-%d").to_string(),
            csv_escape(&row.week),
            csv_escape(&row.member_name),
            csv_escape(&row.member_email),
            format_amount(row.amount_cents),
            csv_escape(row.description.as_deref().unwrap_or("")),
        ];
        output.push_str(&values.join(","));
        output.push('\n');
    }

    output
}

pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn row(y: i32, m: u32, d: u32, cents: i64, name: &str, desc: Option<&str>) -> ContributionRow {
        ContributionRow {
            id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            member_name: name.to_string(),
            member_email: "m@example.com".to_string(),
            amount_cents: cents,
            date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            week: "2025-W1".to_string(),
            description: desc.map(str::to_string),
        }
    }

    #[test]
    fn totals_group_by_month_in_order() {
        let rows = vec![
            row(2025, 3, 2, 1_000, "A", None),
            row(2025, 1, 5, 500, "B", None),
            row(2025, 3, 30, 250, "C", None),
            row(2024, 12, 29, 100, "D", None),
        ];

        let totals = monthly_totals(&rows);
        assert_eq!(
            totals,
            vec![
                MonthlyTotal { month: "2024-12".into(), total_cents: 100 },
                MonthlyTotal { month: "2025-01".into(), total_cents: 500 },
                MonthlyTotal { month: "2025-03".into(), total_cents: 1_250 },
            ]
        );
        assert_eq!(grand_total(&totals), 1_850);
    }

    #[test]
    fn no_rows_no_months() {
        assert!(monthly_totals(&[]).is_empty());
        assert_eq!(contributions_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        let rows = vec![row(2025, 1, 5, 1_250, "Smith, Jo", Some("said \"thanks\""))];
        let csv = contributions_csv(&rows);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "2025-01-05,2025-W1,\"Smith, Jo\",m@example.com,12.50,\"said \"\"thanks\"\"\""
        );
    }

    #[test]
    fn plain_fields_stay_bare() {
        assert_eq!(csv_escape("Weekly contribution"), "Weekly contribution");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }
}
