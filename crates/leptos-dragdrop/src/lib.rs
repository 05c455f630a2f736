//! Leptos DragDrop Utilities
//!
//! Drag-to-reorder for flat Leptos lists using mouse events.
//! Uses movement threshold to distinguish click from drag.
//!
//! Rows are addressed by their index in the rendered list. A drop lands on a
//! *slot*: slot `s` is the gap before row `s`, slot `len` the gap after the
//! last row.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_read: ReadSignal<Option<usize>>,
    pub dragging_write: WriteSignal<Option<usize>>,
    pub drop_slot_read: ReadSignal<Option<usize>>,
    pub drop_slot_write: WriteSignal<Option<usize>>,
    /// Pending row (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<usize>>,
    pub pending_write: WriteSignal<Option<usize>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_read, dragging_write) = signal(None::<usize>);
    let (drop_slot_read, drop_slot_write) = signal(None::<usize>);
    let (pending_read, pending_write) = signal(None::<usize>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    DndSignals {
        dragging_read,
        dragging_write,
        drop_slot_read,
        drop_slot_write,
        pending_read,
        pending_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
    }
}

impl DndSignals {
    /// Window listeners may still fire while the owner is being cleaned up
    fn is_gone(&self) -> bool {
        self.dragging_read.is_disposed() || self.pending_read.is_disposed()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging_read.get().is_some()
    }
}

/// Index the dragged row ends up at, or `None` if the drop changes nothing
pub fn resolve_move(from: usize, slot: usize) -> Option<usize> {
    if slot == from || slot == from + 1 {
        None
    } else if slot > from {
        Some(slot - 1)
    } else {
        Some(slot)
    }
}

/// Slot under the pointer: upper half of row `index` is before it, lower half after
pub fn slot_for_pointer(index: usize, row_top: f64, row_height: f64, pointer_y: f64) -> usize {
    if pointer_y < row_top + row_height / 2.0 { index } else { index + 1 }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_write.set(None);
    dnd.drop_slot_write.set(None);
    dnd.pending_write.set(None);
}

/// Create mousedown handler for a draggable row
/// Records pending drag with start position; nothing happens while `enabled()` is false
pub fn make_on_mousedown<E>(dnd: DndSignals, index: usize, enabled: E) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    E: Fn() -> bool + Copy + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if !enabled() || ev.button() != 0 {
            return;
        }
        // Ignore if target is a control
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlSelectElement>().is_some() { return; }
        }
        // Keep text selection from following the pointer
        ev.prevent_default();
        dnd.pending_write.set(Some(index));
        dnd.start_x_write.set(ev.client_x());
        dnd.start_y_write.set(ev.client_y());
    }
}

/// Create mousemove handler for a row: targets the slot before or after it
pub fn make_on_row_mousemove(dnd: DndSignals, index: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_none() {
            return;
        }
        let Some(row) = ev.current_target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
            return;
        };
        let rect = row.get_bounding_client_rect();
        let slot = slot_for_pointer(index, rect.top(), rect.height(), ev.client_y() as f64);
        if dnd.drop_slot_read.get_untracked() != Some(slot) {
            dnd.drop_slot_write.set(Some(slot));
        }
    }
}

/// Create mouseenter handler for an explicit gap (e.g. the end of the list)
pub fn make_on_slot_mouseenter(dnd: DndSignals, slot: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_slot_write.set(Some(slot));
        }
    }
}

/// Create mouseleave handler for the list container
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_slot_write.set(None);
        }
    }
}

/// Runs `release` when the current owner is cleaned up
fn release_with_owner(release: impl FnOnce() + Send + Sync + 'static) {
    on_cleanup(release);
}

/// Bind window mousemove: starts the drag once moved past the threshold.
/// The listener is removed when the calling owner is cleaned up.
pub fn bind_global_mousemove(dnd: DndSignals) {
    let handle = window_event_listener(leptos::ev::mousemove, move |ev: web_sys::MouseEvent| {
        if dnd.is_gone() {
            return;
        }
        let pending = dnd.pending_read.get_untracked();

        // If we have a pending drag and haven't started dragging yet
        if pending.is_some() && dnd.dragging_read.get_untracked().is_none() {
            let dx = (ev.client_x() - dnd.start_x_read.get_untracked()).abs();
            let dy = (ev.client_y() - dnd.start_y_read.get_untracked()).abs();

            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                dnd.dragging_write.set(pending);
            }
        }
    });
    release_with_owner(move || handle.remove());
}

/// Bind window mouseup for drop detection.
/// `on_drop(from, to)` fires only for drops that move a row.
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(usize, usize) + 'static,
{
    let handle = window_event_listener(leptos::ev::mouseup, move |_ev: web_sys::MouseEvent| {
        if dnd.is_gone() {
            return;
        }
        let dragging = dnd.dragging_read.get_untracked();
        let slot = dnd.drop_slot_read.get_untracked();

        end_drag(&dnd);

        // Plain clicks never had a drag to finish
        if let (Some(from), Some(slot)) = (dragging, slot) {
            if let Some(to) = resolve_move(from, slot) {
                on_drop(from, to);
            }
        }
    });
    release_with_owner(move || handle.remove());

    // Also bind global mousemove
    bind_global_mousemove(dnd);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_move_downwards() {
        // Row 0 dropped after row 2 (slot 3) of [A, B, C]
        assert_eq!(resolve_move(0, 3), Some(2));
        assert_eq!(resolve_move(0, 2), Some(1));
    }

    #[test]
    fn test_resolve_move_upwards() {
        assert_eq!(resolve_move(2, 0), Some(0));
        assert_eq!(resolve_move(3, 1), Some(1));
    }

    #[test]
    fn test_gaps_around_self_are_noops() {
        assert_eq!(resolve_move(1, 1), None);
        assert_eq!(resolve_move(1, 2), None);
    }

    #[test]
    fn test_slot_for_pointer() {
        assert_eq!(slot_for_pointer(4, 100.0, 40.0, 110.0), 4);
        assert_eq!(slot_for_pointer(4, 100.0, 40.0, 130.0), 5);
    }

    #[test]
    fn test_end_drag_clears_all_drag_state() {
        let owner = Owner::new();
        owner.with(|| {
            let dnd = create_dnd_signals();
            dnd.pending_write.set(Some(2));
            dnd.dragging_write.set(Some(2));
            dnd.drop_slot_write.set(Some(4));

            end_drag(&dnd);

            assert_eq!(dnd.pending_read.get_untracked(), None);
            assert_eq!(dnd.dragging_read.get_untracked(), None);
            assert_eq!(dnd.drop_slot_read.get_untracked(), None);
        });
    }

    #[test]
    fn test_listeners_are_released_with_their_owner() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let root = Owner::new();
        root.set();
        let released = Arc::new(AtomicUsize::new(0));

        // Two mounts of the same list
        for _ in 0..2 {
            let page = root.child();
            let dnd = page.with(|| {
                let released = Arc::clone(&released);
                release_with_owner(move || {
                    released.fetch_add(1, Ordering::SeqCst);
                });
                create_dnd_signals()
            });
            assert!(!dnd.is_gone());
            page.cleanup();
            assert!(dnd.is_gone());
        }

        assert_eq!(released.load(Ordering::SeqCst), 2);
    }
}
