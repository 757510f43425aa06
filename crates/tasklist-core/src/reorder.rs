//! Moving a task inside a filtered view.
//!
//! Positions come from the filtered view, not the full list. The move is an
//! array move on the view; the view's slots in the full list are then
//! refilled in the new order, so tasks hidden by the filter never move.

use crate::filter::FilterMode;
use crate::id::TaskId;
use crate::task::TaskList;

/// Move `from` to the position of `to` within the `mode` view of `tasks`.
///
/// Returns the list unchanged when either id is not visible under `mode`.
#[must_use]
pub fn reorder(tasks: &TaskList, mode: FilterMode, from: &TaskId, to: &TaskId) -> TaskList {
    let slots: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| mode.matches(task))
        .map(|(idx, _)| idx)
        .collect();

    let find = |id: &TaskId| {
        slots
            .iter()
            .position(|&slot| tasks.as_slice()[slot].id == *id)
    };
    let (Some(from_idx), Some(to_idx)) = (find(from), find(to)) else {
        return tasks.clone();
    };

    let mut order = slots.clone();
    move_item(&mut order, from_idx, to_idx);

    let mut next = tasks.clone();
    let source = tasks.as_slice();
    let target = next.tasks_mut();
    for (&slot, &origin) in slots.iter().zip(order.iter()) {
        target[slot] = source[origin].clone();
    }
    next
}

/// Splice the element at `from` out and reinsert it at `to`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
