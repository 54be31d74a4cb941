//! Advisory permission predicates for dashboard affordances.
//!
//! These gates drive what the UI offers and short-circuit doomed requests;
//! the backend re-checks every mutation and is the real authority. The
//! `ensure_*` forms return a [`CoreError`] so call sites must acknowledge a
//! refusal before issuing any network call.

use crate::error::CoreError;
use crate::task::Task;
use crate::user::Viewer;

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Whether `task` is visible to `viewer`.
///
/// Admins see everything; everyone else sees only tasks assigned to them or
/// by them.
pub fn is_visible_to(viewer: &Viewer, task: &Task) -> bool {
    viewer.is_admin() || task.assigned_to.matches(viewer) || task.assigned_by.matches(viewer)
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Admins and the assigner may edit or delete a task.
pub fn can_edit_or_delete(viewer: &Viewer, task: &Task) -> bool {
    viewer.is_admin() || task.assigned_by.matches(viewer)
}

/// The assignee may mark a task done, unless approval has locked it.
///
/// With `completed_approval` set this is false for every viewer, including
/// the assignee.
pub fn can_mark_done(viewer: &Viewer, task: &Task) -> bool {
    !task.completed_approval && task.assigned_to.matches(viewer)
}

/// Only the original assigner may set or clear completed approval.
/// Admins are deliberately not exempt.
pub fn can_set_approval(viewer: &Viewer, task: &Task) -> bool {
    task.assigned_by.matches(viewer)
}

// ---------------------------------------------------------------------------
// Refusals
// ---------------------------------------------------------------------------

/// Refuse any mutation of an external calendar projection.
pub fn ensure_native(task: &Task) -> Result<(), CoreError> {
    if task.is_external() {
        return Err(CoreError::ExternalReadOnly(task.id.clone()));
    }
    Ok(())
}

/// Gate an edit or delete.
pub fn ensure_can_edit(viewer: &Viewer, task: &Task) -> Result<(), CoreError> {
    ensure_native(task)?;
    if !can_edit_or_delete(viewer, task) {
        return Err(CoreError::Forbidden(
            "Only an admin or the assigner can edit or delete this task".into(),
        ));
    }
    Ok(())
}

/// Gate a status toggle.
///
/// A locked task's status may only be touched by the original assigner. An
/// unlocked task may be toggled by its assignee, its assigner, or an admin
/// (the admin path is how forced completion happens).
pub fn ensure_can_toggle(viewer: &Viewer, task: &Task) -> Result<(), CoreError> {
    ensure_native(task)?;
    if task.completed_approval && !task.assigned_by.matches(viewer) {
        return Err(CoreError::ApprovalLocked(task.id.clone()));
    }
    if !(viewer.is_admin() || task.assigned_to.matches(viewer) || task.assigned_by.matches(viewer))
    {
        return Err(CoreError::Forbidden(
            "Only the assignee, the assigner, or an admin can change task status".into(),
        ));
    }
    Ok(())
}

/// Gate an approval change.
pub fn ensure_can_set_approval(viewer: &Viewer, task: &Task) -> Result<(), CoreError> {
    ensure_native(task)?;
    if !can_set_approval(viewer, task) {
        return Err(CoreError::Forbidden(
            "Only the original assigner can change completed approval".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
