//! Plain-text rendering of dashboard views

use std::fmt::{self, Write};

use cg_cases::format::{format_date, format_time};
use cg_cases::stats::{CaseStats, ChartSeries};
use cg_cases::{CaseRecord, DashboardView, StatsDescriptor};
use cg_core::{partition, ColumnSet, PageItem, PaginationDescriptor, ViewFragment};

fn cell_text(fragment: &ViewFragment) -> String {
    match fragment {
        ViewFragment::Empty => "-".to_string(),
        ViewFragment::Badge { label, .. } => format!("[{label}]"),
        other => other.label().to_string(),
    }
}

fn optional(value: Option<impl fmt::Display>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn summary(out: &mut impl Write, tiles: &StatsDescriptor) -> fmt::Result {
    writeln!(
        out,
        "Total {}  |  New {}  |  High priority {}  |  In progress {}  |  Resolved {}  |  Escalated {}",
        tiles.total, tiles.new, tiles.high_priority, tiles.in_progress, tiles.resolved, tiles.escalated
    )
}

pub fn stats(out: &mut impl Write, stats: &CaseStats) -> fmt::Result {
    summary(out, &StatsDescriptor::from(stats))?;
    let s = &stats.by_status;
    writeln!(
        out,
        "By status: NEW {} / IN_PROGRESS {} / RESOLVED {} / ESCALATED {} / CLOSED {}",
        s.new, s.in_progress, s.resolved, s.escalated, s.closed
    )?;
    let p = &stats.by_priority;
    writeln!(out, "By priority: High {} / Medium {} / Low {}", p.high, p.medium, p.low)
}

pub fn charts(out: &mut impl Write, charts: &ChartSeries) -> fmt::Result {
    writeln!(out, "Status distribution:")?;
    for slice in &charts.status_distribution {
        writeln!(out, "  {:<12} {:>4}  {:>3}%", slice.label, slice.count, slice.percent)?;
    }
    writeln!(out, "Cases created per day:")?;
    for day in &charts.daily_created {
        writeln!(
            out,
            "  {}  {:>4}  {}",
            day.date.format("%m/%d"),
            day.count,
            "#".repeat(day.count.min(40))
        )?;
    }
    Ok(())
}

/// Detail line printed under an expanded row
fn details(out: &mut impl Write, case: &CaseRecord) -> fmt::Result {
    writeln!(
        out,
        "    customer {}  |  card {}  |  created {} {}  |  updated {} {}",
        optional(case.customer_id),
        optional(case.card_type.map(|c| c.as_str())),
        format_date(case.created_at),
        format_time(case.created_at),
        format_date(case.updated_at),
        format_time(case.updated_at),
    )
}

pub fn table<R>(out: &mut impl Write, columns: &ColumnSet<R>, view: &DashboardView) -> fmt::Result
where
    R: cg_core::Record,
{
    let mut grid: Vec<Vec<String>> = vec![std::iter::once(" ".to_string())
        .chain(columns.iter().map(|c| c.title.clone()))
        .chain(std::iter::once("Actions".to_string()))
        .collect()];
    for row in &view.rows {
        let (primary, overflow) = partition(&row.actions);
        let actions = match primary {
            Some(primary) if overflow.is_empty() => primary.label.clone(),
            Some(primary) => format!("{} (+{} more)", primary.label, overflow.len()),
            None => String::new(),
        };
        let mark = if row.selected { "*" } else { " " };
        grid.push(
            std::iter::once(mark.to_string())
                .chain(row.cells.iter().map(cell_text))
                .chain(std::iter::once(actions))
                .collect(),
        );
    }

    let widths: Vec<usize> = (0..grid[0].len())
        .map(|i| grid.iter().map(|r| r[i].chars().count()).max().unwrap_or(0))
        .collect();
    for (n, line) in grid.iter().enumerate() {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        writeln!(out, "{}", padded.join("  ").trim_end())?;
        if n == 0 {
            let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
            writeln!(out, "{}", "-".repeat(rule))?;
        } else if let Some(row) = view.rows.get(n - 1).filter(|row| row.expanded) {
            details(out, &row.case)?;
        }
    }
    if view.rows.is_empty() {
        writeln!(out, "No cases found.")?;
    }
    let selected = view.rows.iter().filter(|row| row.selected).count();
    if selected > 0 {
        writeln!(out, "{selected} of {} cases on this page selected", view.rows.len())?;
    }
    Ok(())
}

pub fn pagination(out: &mut impl Write, descriptor: &PaginationDescriptor) -> fmt::Result {
    if let Some((first, last)) = descriptor.range {
        writeln!(out, "Showing {} to {} of {} cases", first, last, descriptor.total_items)?;
    }
    if !descriptor.visible {
        return Ok(());
    }
    let strip: Vec<String> = descriptor
        .pages
        .iter()
        .map(|item| match item {
            PageItem::Page(n) if *n == descriptor.page => format!("[{n}]"),
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => "...".to_string(),
        })
        .collect();
    let prev = if descriptor.has_prev { "<" } else { " " };
    let next = if descriptor.has_next { ">" } else { " " };
    writeln!(out, "{prev} {} {next}", strip.join(" "))
}

pub fn dashboard<R: cg_core::Record>(columns: &ColumnSet<R>, view: &DashboardView) -> Result<String, fmt::Error> {
    let mut out = String::new();
    summary(&mut out, &view.summary)?;
    out.push('\n');
    charts(&mut out, &view.charts)?;
    out.push('\n');
    table(&mut out, columns, view)?;
    out.push('\n');
    pagination(&mut out, &view.pagination)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_cases::{case_columns, CasePriority, CaseStatus, DashboardConfig, DashboardSession};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_pagination_strip() {
        let mut out = String::new();
        pagination(&mut out, &cg_core::describe(5, 10, 95)).unwrap();
        assert_eq!(out, "Showing 41 to 50 of 95 cases\n< 1 ... 4 [5] 6 ... 10 >\n");
    }

    #[test]
    fn test_single_page_hides_strip() {
        let mut out = String::new();
        pagination(&mut out, &cg_core::describe(1, 10, 4)).unwrap();
        assert_eq!(out, "Showing 1 to 4 of 4 cases\n");
    }

    #[test]
    fn test_selected_and_expanded_rows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 14, 5, 9).unwrap();
        let case = CaseRecord {
            id: 8,
            entity_id: 80,
            customer_id: Some(77),
            status: CaseStatus::New,
            priority: CasePriority::High,
            assigned_to: None,
            created_at: now.timestamp_millis(),
            updated_at: now.timestamp_millis(),
            card_type: None,
        };
        let mut session = DashboardSession::new(vec![case], &DashboardConfig::default()).unwrap();
        session.toggle_selected("8");
        session.toggle_expanded("8");
        let view = session.view(now).unwrap();

        let mut out = String::new();
        table(&mut out, &case_columns().unwrap(), &view).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].starts_with("*  Case - 8"));
        assert_eq!(
            lines[3],
            "    customer 77  |  card -  |  created 03/10/2024 02:05:09 PM  |  updated 03/10/2024 02:05:09 PM"
        );
        assert_eq!(lines[4], "1 of 1 cases on this page selected");
    }
}
