//! Card ordering within a column.
//!
//! Each card carries a float `order` key. Dropping a card between two others
//! gives it the midpoint of their keys, so no sibling is ever rewritten.
//! Repeated drops into the same gap halve it each time; after ~50 of them
//! the neighbours' keys become indistinguishable and new cards tie (the
//! `created_at` tie-break still keeps the sort deterministic).

use std::cmp::Ordering;

use crate::model::task::Task;

/// Gap left before the first / after the last card
pub const ORDER_STEP: f64 = 1000.0;

/// Display order: `order` ascending, then newest first.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.order
        .partial_cmp(&b.order)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn sort_column(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

/// Whether `tasks` is already in display order
pub fn is_sorted(tasks: &[Task]) -> bool {
    tasks
        .windows(2)
        .all(|w| compare_tasks(&w[0], &w[1]) != Ordering::Greater)
}

/// Order key for a card dropped at `target_index` of `column`, which must
/// be in display order.
pub fn compute_insertion_key(column: &[Task], target_index: usize) -> f64 {
    let (Some(first), Some(last)) = (column.first(), column.last()) else {
        return 0.0;
    };
    if target_index == 0 {
        return first.order - ORDER_STEP;
    }
    if target_index >= column.len() {
        return last.order + ORDER_STEP;
    }
    let prev = column[target_index - 1].order;
    let next = column[target_index].order;
    prev + (next - prev) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Status, TaskFields};

    fn task(path: &str, order: f64, created_at: i64) -> Task {
        Task {
            path: path.into(),
            title: path.into(),
            status: Status::Todo,
            order,
            created_at,
            fields: TaskFields::default(),
        }
    }

    fn paths(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.path.as_str()).collect()
    }

    #[test]
    fn test_sort_by_order_then_newest_first() {
        let mut column = vec![
            task("old-zero", 0.0, 1),
            task("ten", 10.0, 5),
            task("neg", -3.0, 2),
            task("new-zero", 0.0, 9),
        ];
        sort_column(&mut column);
        assert_eq!(paths(&column), vec!["neg", "new-zero", "old-zero", "ten"]);
        assert!(is_sorted(&column));
    }

    #[test]
    fn test_empty_column_key_is_zero() {
        assert_eq!(compute_insertion_key(&[], 0), 0.0);
        assert_eq!(compute_insertion_key(&[], 5), 0.0);
    }

    #[test]
    fn test_insert_at_edges_and_between() {
        let column = vec![task("a", 0.0, 1), task("b", 10.0, 2)];
        assert_eq!(compute_insertion_key(&column, 0), -1000.0);
        assert_eq!(compute_insertion_key(&column, 1), 5.0);
        assert_eq!(compute_insertion_key(&column, 2), 1010.0);
        assert_eq!(compute_insertion_key(&column, 99), 1010.0);
    }

    #[test]
    fn test_insertion_key_is_strictly_bounded() {
        let column = vec![
            task("a", -7.5, 1),
            task("b", 0.25, 2),
            task("c", 3.0, 3),
            task("d", 4000.0, 4),
        ];
        assert!(compute_insertion_key(&column, 0) < -7.5);
        assert!(compute_insertion_key(&column, column.len()) > 4000.0);
        for idx in 1..column.len() {
            let key = compute_insertion_key(&column, idx);
            assert!(column[idx - 1].order < key && key < column[idx].order);
        }
    }

    #[test]
    fn test_repeated_front_inserts_keep_sort() {
        let mut column = vec![task("a", 0.0, 1)];
        for i in 0..5 {
            let key = compute_insertion_key(&column, 0);
            column.insert(0, task(&format!("n{}", i), key, 10 + i));
        }
        assert!(is_sorted(&column));
        assert_eq!(column[0].order, -5000.0);
    }
}
