//! Drag-and-drop reordering with optimistic update and rollback.
//!
//! A [`ReorderList`] walks through these phases:
//!
//! ```text
//! Idle --begin_drag--> Dragging --drop_on(other)--> Pending --confirm--> Idle
//!   ^                     |                            |
//!   +-----drop_on(self)---+                            +--rollback/restore--> Idle
//!   +-----cancel_drag-----+
//! ```
//!
//! Dropping onto another item moves the dragged item immediately, before the
//! backend has been told anything. The complete ordered ID list is what gets
//! persisted; there is no version token, so the last writer wins.
//!
//! [`ReorderList::drop_and_persist`] runs a whole round against the backend
//! in one call. Callers that hold the list across several events (a pointer
//! moving over rows, a response arriving later) drive it step by step
//! instead: [`ReorderList::drag_over`] and [`ReorderList::cancel_drag`] while
//! dragging, then [`ReorderList::confirm`], [`ReorderList::rollback`] or
//! [`ReorderList::restore`] once the backend has answered.

use std::fmt;
use std::future::Future;

use crate::optimistic::{self, Settled};

/// Something with a stable identity inside a list.
pub trait Identified {
    /// Identifier type.
    type Id: Copy + Eq + fmt::Debug;

    /// This item's identifier.
    fn id(&self) -> Self::Id;
}

/// Where a [`ReorderList`] is in the drag protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<Id> {
    /// No drag in progress.
    Idle,
    /// An item is being dragged; `over` is the row currently highlighted.
    Dragging { source: Id, over: Option<Id> },
    /// The list was reordered locally and awaits backend confirmation.
    Pending { order: Vec<Id> },
}

/// Invalid use of the drag protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// The referenced item is not in the list.
    #[error("item {0} is not in the list")]
    UnknownItem(String),
    /// A drag was started while another one is in progress.
    #[error("a drag is already in progress")]
    AlreadyDragging,
    /// A drop or hover arrived without a drag.
    #[error("no drag in progress")]
    NotDragging,
    /// The previous reorder has not been confirmed or rolled back yet.
    #[error("a reorder is awaiting confirmation")]
    AwaitingConfirmation,
    /// Confirm or rollback was called with nothing pending.
    #[error("no reorder is pending")]
    NothingPending,
}

/// Result of releasing a dragged item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome<Id> {
    /// Dropped onto itself; nothing to persist.
    Unchanged,
    /// The list was reordered; `order` must be persisted.
    Moved { order: Vec<Id> },
}

/// Result of a full drop-and-persist round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome<E> {
    /// Dropped onto itself; no request was made.
    Unchanged,
    /// The backend accepted the new order.
    Confirmed,
    /// The backend rejected the new order; the list now holds a fresh backend read.
    RolledBack { cause: E },
    /// The backend rejected the new order and could not be re-read; the list
    /// holds the order from before the drag.
    Restored { cause: E, refetch_error: E },
}

impl<E> From<Settled<E>> for ReorderOutcome<E> {
    fn from(settled: Settled<E>) -> Self {
        match settled {
            Settled::Confirmed => Self::Confirmed,
            Settled::RolledBack { cause } => Self::RolledBack { cause },
            Settled::Restored {
                cause,
                refetch_error,
            } => Self::Restored {
                cause,
                refetch_error,
            },
        }
    }
}

/// Move the element at `from` so that it ends up at index `to`.
///
/// Out-of-range indices leave the slice untouched.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// An ordered list that can be rearranged by dragging one item onto another.
#[derive(Debug, Clone)]
pub struct ReorderList<T: Identified> {
    items: Vec<T>,
    phase: Phase<T::Id>,
    snapshot: Option<Vec<T>>,
}

impl<T: Identified + Clone> ReorderList<T> {
    /// Wrap an authoritative list.
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self {
            items,
            phase: Phase::Idle,
            snapshot: None,
        }
    }

    /// Items in their current (possibly tentative) order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the list, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Current protocol phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase<T::Id> {
        &self.phase
    }

    /// Item IDs in their current order.
    #[must_use]
    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(Identified::id).collect()
    }

    fn position(&self, id: T::Id) -> Result<usize, ReorderError> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| ReorderError::UnknownItem(format!("{id:?}")))
    }

    /// Mark `source` as the item being dragged.
    ///
    /// # Errors
    ///
    /// Fails if `source` is unknown, a drag is already running, or a previous
    /// reorder is still pending.
    pub fn begin_drag(&mut self, source: T::Id) -> Result<(), ReorderError> {
        match self.phase {
            Phase::Idle => {}
            Phase::Dragging { .. } => return Err(ReorderError::AlreadyDragging),
            Phase::Pending { .. } => return Err(ReorderError::AwaitingConfirmation),
        }
        self.position(source)?;
        self.phase = Phase::Dragging { source, over: None };
        Ok(())
    }

    /// Record the row under the pointer. Purely presentational.
    ///
    /// # Errors
    ///
    /// Fails if no drag is running or `target` is unknown.
    pub fn drag_over(&mut self, target: T::Id) -> Result<(), ReorderError> {
        self.position(target)?;
        match &mut self.phase {
            Phase::Dragging { over, .. } => {
                *over = Some(target);
                Ok(())
            }
            _ => Err(ReorderError::NotDragging),
        }
    }

    /// Abandon the current drag without changing the order.
    pub fn cancel_drag(&mut self) {
        if matches!(self.phase, Phase::Dragging { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Release the dragged item over `target`.
    ///
    /// Dropping onto another item moves the source to the target's index right
    /// away and enters [`Phase::Pending`]. Dropping onto itself is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if no drag is running or `target` is unknown. An unknown target
    /// also ends the drag.
    pub fn drop_on(&mut self, target: T::Id) -> Result<DropOutcome<T::Id>, ReorderError> {
        let source = match self.phase {
            Phase::Dragging { source, .. } => source,
            Phase::Idle => return Err(ReorderError::NotDragging),
            Phase::Pending { .. } => return Err(ReorderError::AwaitingConfirmation),
        };

        if source == target {
            self.phase = Phase::Idle;
            return Ok(DropOutcome::Unchanged);
        }

        let to = match self.position(target) {
            Ok(to) => to,
            Err(err) => {
                self.phase = Phase::Idle;
                return Err(err);
            }
        };
        let from = self.position(source)?;

        self.snapshot = Some(self.items.clone());
        move_item(&mut self.items, from, to);

        let order = self.ids();
        self.phase = Phase::Pending {
            order: order.clone(),
        };
        Ok(DropOutcome::Moved { order })
    }

    /// The backend accepted the pending order.
    ///
    /// # Errors
    ///
    /// Fails if nothing is pending.
    pub fn confirm(&mut self) -> Result<(), ReorderError> {
        self.finish()?;
        Ok(())
    }

    /// The backend rejected the pending order; adopt its authoritative list.
    ///
    /// # Errors
    ///
    /// Fails if nothing is pending.
    pub fn rollback(&mut self, authoritative: Vec<T>) -> Result<(), ReorderError> {
        self.finish()?;
        self.items = authoritative;
        Ok(())
    }

    /// The backend rejected the pending order and could not be re-read; go
    /// back to the order from before the drag.
    ///
    /// # Errors
    ///
    /// Fails if nothing is pending.
    pub fn restore(&mut self) -> Result<(), ReorderError> {
        if let Some(snapshot) = self.finish()? {
            self.items = snapshot;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<Option<Vec<T>>, ReorderError> {
        if !matches!(self.phase, Phase::Pending { .. }) {
            return Err(ReorderError::NothingPending);
        }
        self.phase = Phase::Idle;
        Ok(self.snapshot.take())
    }

    /// Drop onto `target` and run the whole optimistic round.
    ///
    /// `persist` is handed the complete new ID order after the list has been
    /// reordered locally. On failure `refetch` supplies the authoritative
    /// list; if that fails as well the pre-drag order is restored. `persist`
    /// is not called for a drop onto the dragged item itself.
    ///
    /// # Errors
    ///
    /// Protocol misuse, as for [`ReorderList::drop_on`]. Backend failures are
    /// reported through [`ReorderOutcome`], not as errors.
    pub async fn drop_and_persist<E, P, PF, R, RF>(
        &mut self,
        target: T::Id,
        persist: P,
        refetch: R,
    ) -> Result<ReorderOutcome<E>, ReorderError>
    where
        P: FnOnce(Vec<T::Id>) -> PF,
        PF: Future<Output = Result<(), E>>,
        R: FnOnce() -> RF,
        RF: Future<Output = Result<Vec<T>, E>>,
    {
        let DropOutcome::Moved { order } = self.drop_on(target)? else {
            return Ok(ReorderOutcome::Unchanged);
        };

        let snapshot = self.snapshot.clone().unwrap_or_else(|| self.items.clone());
        let settled = optimistic::settle(&mut self.items, snapshot, persist(order), refetch).await;
        self.finish()?;

        Ok(settled.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row(&'static str);

    impl Identified for Row {
        type Id = &'static str;

        fn id(&self) -> &'static str {
            self.0
        }
    }

    fn abcd() -> ReorderList<Row> {
        ReorderList::new(vec![Row("A"), Row("B"), Row("C"), Row("D")])
    }

    #[test]
    fn test_move_item_takes_target_index() {
        let mut items = vec!["A", "B", "C", "D"];
        move_item(&mut items, 2, 0);
        assert_eq!(items, vec!["C", "A", "B", "D"]);

        let mut items = vec!["A", "B", "C", "D"];
        move_item(&mut items, 0, 2);
        assert_eq!(items, vec!["B", "C", "A", "D"]);

        let mut items = vec!["A", "B"];
        move_item(&mut items, 0, 5);
        assert_eq!(items, vec!["A", "B"]);
    }

    #[test]
    fn test_drop_reorders_before_confirmation() {
        let mut list = abcd();
        list.begin_drag("C").unwrap();
        list.drag_over("B").unwrap();
        list.drag_over("A").unwrap();

        let outcome = list.drop_on("A").unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Moved {
                order: vec!["C", "A", "B", "D"]
            }
        );
        assert_eq!(list.ids(), vec!["C", "A", "B", "D"]);
        assert!(matches!(list.phase(), Phase::Pending { .. }));

        list.confirm().unwrap();
        assert_eq!(list.phase(), &Phase::Idle);
        assert_eq!(list.ids(), vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn test_self_drop_is_noop() {
        let mut list = abcd();
        list.begin_drag("B").unwrap();
        assert_eq!(list.drop_on("B").unwrap(), DropOutcome::Unchanged);
        assert_eq!(list.ids(), vec!["A", "B", "C", "D"]);
        assert_eq!(list.phase(), &Phase::Idle);
        assert_eq!(list.confirm(), Err(ReorderError::NothingPending));
    }

    #[test]
    fn test_protocol_misuse() {
        let mut list = abcd();
        assert_eq!(list.drop_on("A"), Err(ReorderError::NotDragging));
        assert!(matches!(list.begin_drag("Z"), Err(ReorderError::UnknownItem(_))));

        list.begin_drag("A").unwrap();
        assert_eq!(list.begin_drag("B"), Err(ReorderError::AlreadyDragging));

        assert!(matches!(list.drop_on("Z"), Err(ReorderError::UnknownItem(_))));
        assert_eq!(list.phase(), &Phase::Idle);

        list.begin_drag("A").unwrap();
        list.drop_on("D").unwrap();
        assert_eq!(list.begin_drag("B"), Err(ReorderError::AwaitingConfirmation));
    }

    #[test]
    fn test_cancel_drag_keeps_order() {
        let mut list = abcd();
        list.begin_drag("D").unwrap();
        list.drag_over("A").unwrap();
        list.cancel_drag();
        assert_eq!(list.phase(), &Phase::Idle);
        assert_eq!(list.ids(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_rollback_adopts_authoritative_list() {
        let mut list = abcd();
        list.begin_drag("C").unwrap();
        list.drop_on("A").unwrap();
        list.rollback(vec![Row("D"), Row("A")]).unwrap();
        assert_eq!(list.ids(), vec!["D", "A"]);
    }

    #[test]
    fn test_restore_returns_to_pre_drag_order() {
        let mut list = abcd();
        list.begin_drag("C").unwrap();
        list.drop_on("A").unwrap();
        list.restore().unwrap();
        assert_eq!(list.ids(), vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_new_order_visible_while_persist_pending() {
        let mut list = abcd();
        list.begin_drag("C").unwrap();
        let DropOutcome::Moved { order } = list.drop_on("A").unwrap() else {
            panic!("expected a move");
        };

        let (answer, response) = tokio::sync::oneshot::channel::<Result<(), String>>();
        let request = tokio::spawn(async move {
            assert_eq!(order, vec!["C", "A", "B", "D"]);
            response.await.unwrap()
        });
        tokio::task::yield_now().await;

        assert!(!request.is_finished());
        assert_eq!(list.ids(), vec!["C", "A", "B", "D"]);
        assert!(matches!(list.phase(), Phase::Pending { .. }));

        answer.send(Ok(())).unwrap();
        request.await.unwrap().unwrap();
        list.confirm().unwrap();
        assert_eq!(list.ids(), vec!["C", "A", "B", "D"]);
    }

    #[tokio::test]
    async fn test_persist_receives_full_optimistic_order() {
        let mut list = abcd();
        list.begin_drag("C").unwrap();

        let outcome = list
            .drop_and_persist(
                "A",
                |order| async move {
                    assert_eq!(order, vec!["C", "A", "B", "D"]);
                    Ok::<(), String>(())
                },
                || async { Ok(vec![]) },
            )
            .await
            .unwrap();

        assert_eq!(outcome, ReorderOutcome::Confirmed);
        assert_eq!(list.ids(), vec!["C", "A", "B", "D"]);
        assert_eq!(list.phase(), &Phase::Idle);
    }

    #[tokio::test]
    async fn test_failed_persist_yields_next_fetch_verbatim() {
        let mut list = abcd();
        list.begin_drag("C").unwrap();

        let outcome = list
            .drop_and_persist(
                "A",
                |_| async { Err("conflict".to_string()) },
                || async { Ok(vec![Row("B"), Row("A"), Row("D"), Row("C")]) },
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReorderOutcome::RolledBack {
                cause: "conflict".to_string()
            }
        );
        assert_eq!(list.ids(), vec!["B", "A", "D", "C"]);
        assert_eq!(list.phase(), &Phase::Idle);
    }

    #[tokio::test]
    async fn test_failed_refetch_restores_snapshot() {
        let mut list = abcd();
        list.begin_drag("C").unwrap();

        let outcome = list
            .drop_and_persist(
                "A",
                |_| async { Err("conflict".to_string()) },
                || async { Err("offline".to_string()) },
            )
            .await
            .unwrap();

        assert!(matches!(outcome, ReorderOutcome::Restored { .. }));
        assert_eq!(list.ids(), vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_self_drop_issues_no_request() {
        let calls = Cell::new(0);
        let mut list = abcd();
        list.begin_drag("B").unwrap();

        let outcome = list
            .drop_and_persist(
                "B",
                |_| {
                    calls.set(calls.get() + 1);
                    async { Ok::<(), String>(()) }
                },
                || {
                    calls.set(calls.get() + 1);
                    async { Ok(vec![]) }
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome, ReorderOutcome::Unchanged);
        assert_eq!(calls.get(), 0);
        assert_eq!(list.ids(), vec!["A", "B", "C", "D"]);
    }
}
