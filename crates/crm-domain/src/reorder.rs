//! Stage Reordering
//!
//! Pure list math behind drag-and-drop: move one entry, then renumber so
//! `order` is dense and zero-based. Works on the visible (filtered) view and
//! writes the result back into the full company ordering.

use std::collections::HashSet;

use thiserror::Error;

use crate::stage::{ReorderRequest, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("Position {index} is outside a list of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("\"{0}\" is a default stage and cannot be moved")]
    DefaultLocked(String),
    #[error("Stage {0} is not in the loaded list")]
    UnknownStage(String),
}

/// Result of a drop: the full list in its new order and the PATCH body.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    pub stages: Vec<Stage>,
    pub request: ReorderRequest,
}

/// Set each stage's order to its index (0, 1, 2, ...)
pub fn renumber(stages: &mut [Stage]) {
    for (position, stage) in stages.iter_mut().enumerate() {
        stage.order = position as i32;
    }
}

/// Copy of `stages` sorted by server order (ties by id)
pub fn by_order(stages: &[Stage]) -> Vec<Stage> {
    let mut sorted = stages.to_vec();
    sorted.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    sorted
}

/// Remove the entry at `from`, insert it at `to`, renumber.
pub fn move_stage(stages: &[Stage], from: usize, to: usize) -> Result<Vec<Stage>, ReorderError> {
    let len = stages.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfRange { index, len });
        }
    }

    let mut moved = stages.to_vec();
    let stage = moved.remove(from);
    moved.insert(to, stage);
    renumber(&mut moved);
    Ok(moved)
}

/// Plan a drop made in `view`, a filtered subset of `all` shown in order.
///
/// The visible stages are moved among themselves and put back into the slots
/// they held in the full ordering; hidden stages keep their slots. The whole
/// list is then renumbered, so the company ordering stays dense.
///
/// Returns `Ok(None)` when the drop does not change anything.
pub fn plan_reorder(
    all: &[Stage],
    view: &[Stage],
    from: usize,
    to: usize,
) -> Result<Option<ReorderPlan>, ReorderError> {
    let moved = move_stage(view, from, to)?;
    if view[from].is_locked() {
        return Err(ReorderError::DefaultLocked(view[from].name.clone()));
    }
    if from == to {
        return Ok(None);
    }

    let mut stages = by_order(all);
    let visible: HashSet<&str> = view.iter().map(|s| s.id.as_str()).collect();
    let slots: Vec<usize> = stages
        .iter()
        .enumerate()
        .filter(|(_, s)| visible.contains(s.id.as_str()))
        .map(|(i, _)| i)
        .collect();

    if slots.len() != moved.len() {
        let known: HashSet<&str> = all.iter().map(|s| s.id.as_str()).collect();
        let missing = view
            .iter()
            .find(|s| !known.contains(s.id.as_str()))
            .map(|s| s.id.clone())
            .unwrap_or_default();
        return Err(ReorderError::UnknownStage(missing));
    }

    for (slot, stage) in slots.into_iter().zip(moved) {
        stages[slot] = stage;
    }
    renumber(&mut stages);

    let request = ReorderRequest::from_stages(&stages);
    Ok(Some(ReorderPlan { stages, request }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stages(names: &[&str]) -> Vec<Stage> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Stage::new(n.to_lowercase(), "c1", *n, i as i32))
            .collect()
    }

    fn names(stages: &[Stage]) -> Vec<&str> {
        stages.iter().map(|s| s.name.as_str()).collect()
    }

    fn orders(stages: &[Stage]) -> Vec<i32> {
        stages.iter().map(|s| s.order).collect()
    }

    #[test]
    fn test_move_first_to_last() {
        let moved = move_stage(&stages(&["A", "B", "C"]), 0, 2).unwrap();
        assert_eq!(names(&moved), vec!["B", "C", "A"]);
        assert_eq!(orders(&moved), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_last_to_first() {
        let moved = move_stage(&stages(&["A", "B", "C", "D"]), 3, 0).unwrap();
        assert_eq!(names(&moved), vec!["D", "A", "B", "C"]);
        assert_eq!(orders(&moved), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_orders_are_dense_for_every_move() {
        let list = stages(&["A", "B", "C", "D", "E"]);
        for from in 0..list.len() {
            for to in 0..list.len() {
                let moved = move_stage(&list, from, to).unwrap();
                assert_eq!(orders(&moved), (0..5).collect::<Vec<i32>>());
                assert_eq!(moved[to].name, list[from].name);
            }
        }
    }

    #[test]
    fn test_renumber_fixes_sparse_orders() {
        let mut list = stages(&["A", "B", "C"]);
        list[0].order = 10;
        list[1].order = 20;
        list[2].order = 35;
        renumber(&mut list);
        assert_eq!(orders(&list), vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_range() {
        let err = move_stage(&stages(&["A", "B"]), 0, 2).unwrap_err();
        assert_eq!(err, ReorderError::OutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn test_plan_without_filter() {
        let all = stages(&["A", "B", "C"]);
        let plan = plan_reorder(&all, &all, 0, 2).unwrap().unwrap();
        assert_eq!(names(&plan.stages), vec!["B", "C", "A"]);
        let ids: Vec<(&str, i32)> = plan.request.stages.iter().map(|e| (e.id.as_str(), e.order)).collect();
        assert_eq!(ids, vec![("b", 0), ("c", 1), ("a", 2)]);
    }

    #[test]
    fn test_plan_same_position_is_noop() {
        let all = stages(&["A", "B"]);
        assert_eq!(plan_reorder(&all, &all, 1, 1).unwrap(), None);
    }

    #[test]
    fn test_plan_rejects_default_stage() {
        let mut all = stages(&["Lead In", "Won"]);
        all[0].is_default = true;
        let err = plan_reorder(&all, &all, 0, 1).unwrap_err();
        assert_eq!(err, ReorderError::DefaultLocked("Lead In".to_string()));
    }

    #[test]
    fn test_plan_with_filter_keeps_hidden_slots() {
        let mut all = stages(&["A", "B", "C", "D"]);
        all[1].is_active = false;
        let view: Vec<Stage> = all.iter().filter(|s| s.is_active).cloned().collect();

        let plan = plan_reorder(&all, &view, 0, 2).unwrap().unwrap();

        // Visible subset now reads C, D, A; hidden B stays in slot 1
        assert_eq!(names(&plan.stages), vec!["C", "B", "D", "A"]);
        assert_eq!(orders(&plan.stages), vec![0, 1, 2, 3]);
        assert_eq!(plan.request.stages.len(), 4);
    }

    #[test]
    fn test_plan_normalises_unsorted_input() {
        let mut all = stages(&["A", "B", "C"]);
        all.reverse();
        let view = by_order(&all);
        let plan = plan_reorder(&all, &view, 2, 0).unwrap().unwrap();
        assert_eq!(names(&plan.stages), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_plan_rejects_unknown_view_entry() {
        let all = stages(&["A", "B"]);
        let mut view = all.clone();
        view.push(Stage::new("ghost", "c1", "Ghost", 2));
        let err = plan_reorder(&all, &view, 0, 1).unwrap_err();
        assert_eq!(err, ReorderError::UnknownStage("ghost".to_string()));
    }
}
