//! Column and row-action schema of the case list

use cg_core::{
    ActionVariant, ColumnSet, ColumnSpec, DataGrid, FieldValue, RecordAccessor, RowAction,
    ViewFragment,
};

use crate::format::format_date_time;
use crate::model::{CaseRecord, CaseStatus};
use crate::CasesResult;

/// Detail page of a case
pub fn case_href(case: &CaseRecord) -> String {
    format!("/cases/{}", case.id)
}

fn render_case_link(_: &FieldValue, case: &CaseRecord, _: usize) -> ViewFragment {
    ViewFragment::Link {
        label: format!("Case - {}", case.id),
        href: case_href(case),
    }
}

fn render_created(_: &FieldValue, case: &CaseRecord, _: usize) -> ViewFragment {
    ViewFragment::text(format_date_time(case.created_at))
}

/// Columns of the case list. Status, priority and created are sortable.
pub fn case_columns() -> CasesResult<ColumnSet<CaseRecord>> {
    let columns = ColumnSet::new(vec![
        ColumnSpec::new("id", "Case ID").render_with(render_case_link),
        ColumnSpec::new("entityId", "Entity ID"),
        ColumnSpec::new("status", "Status").sortable(),
        ColumnSpec::new("priority", "Priority").sortable(),
        ColumnSpec::new("assignee", "Assignee").data_index("assignedTo"),
        ColumnSpec::new("created", "Created")
            .data_index("createdAt")
            .sortable()
            .render_with(render_created),
    ])?;
    Ok(columns)
}

/// Row actions of the case list.
///
/// "Assign to me" is only offered when the current user is known, and is
/// disabled on cases that user already owns.
pub fn case_actions(current_user: Option<u64>) -> Vec<RowAction<CaseRecord>> {
    let mut assign = RowAction::new("Assign to me").visible(current_user.is_some());
    if let Some(user) = current_user {
        assign = assign.disabled_when(move |case: &CaseRecord| case.assigned_to == Some(user));
    }

    vec![
        RowAction::new("View").href_with(case_href),
        assign,
        RowAction::new("Forward case")
            .variant(ActionVariant::Outline)
            .disabled_when(|case: &CaseRecord| case.status == CaseStatus::Closed),
        RowAction::new("Export details").variant(ActionVariant::Ghost),
    ]
}

/// Grid over cases keyed by case id
pub fn case_grid(current_user: Option<u64>) -> CasesResult<DataGrid<CaseRecord>> {
    Ok(DataGrid::new(case_columns()?)
        .with_actions(case_actions(current_user))
        .with_accessor(RecordAccessor::keyed_by("id")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::case;
    use crate::model::CasePriority;
    use cg_core::{resolve_for_record, trigger, ActionOutcome, GridError, Tone};

    #[test]
    fn test_rendered_cells() {
        let columns = case_columns().unwrap();
        let mut record = case(12, CaseStatus::InProgress, CasePriority::High, 0);
        record.assigned_to = Some(4);
        let cells = columns.render_row(&record, 0);

        assert_eq!(
            cells[0],
            ViewFragment::Link { label: "Case - 12".into(), href: "/cases/12".into() }
        );
        assert_eq!(cells[1], ViewFragment::text("1012"));
        assert_eq!(
            cells[2],
            ViewFragment::Badge { label: "IN PROGRESS".into(), tone: Tone::Warning }
        );
        assert_eq!(cells[3], ViewFragment::Badge { label: "High".into(), tone: Tone::Danger });
        assert_eq!(cells[4], ViewFragment::text("4"));
        assert_eq!(cells[5], ViewFragment::text("1970-01-01 12:00:00 AM"));
    }

    #[test]
    fn test_unassigned_cell_is_empty() {
        let columns = case_columns().unwrap();
        let cells = columns.render_row(&case(1, CaseStatus::New, CasePriority::Low, 0), 0);
        assert_eq!(cells[4], ViewFragment::Empty);
    }

    #[test]
    fn test_actions_without_current_user() {
        let record = case(3, CaseStatus::New, CasePriority::Low, 0);
        let resolved = resolve_for_record(&case_actions(None), &record);
        let labels: Vec<_> = resolved.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["View", "Forward case", "Export details"]);
        assert!(resolved[0].primary);
        assert_eq!(resolved[0].href.as_deref(), Some("/cases/3"));
    }

    #[test]
    fn test_assign_to_me_disabled_for_own_case() {
        let actions = case_actions(Some(9));
        let mut record = case(3, CaseStatus::Closed, CasePriority::Low, 0);
        record.assigned_to = Some(9);
        let resolved = resolve_for_record(&actions, &record);

        let assign = resolved.iter().find(|a| a.label == "Assign to me").unwrap();
        assert!(assign.disabled);
        assert!(matches!(
            trigger(&actions, assign, &record),
            Err(GridError::ActionDisabled { .. })
        ));

        let forward = resolved.iter().find(|a| a.label == "Forward case").unwrap();
        assert!(forward.disabled);

        let view = &resolved[0];
        assert_eq!(
            trigger(&actions, view, &record).unwrap(),
            ActionOutcome::Navigate("/cases/3".into())
        );
    }
}
