//! Apply-then-confirm updates with rollback to server truth.
//!
//! A two-phase commit for UI state that is owned by the backend:
//!
//! 1. the caller applies a tentative mutation to its local copy and keeps a
//!    snapshot of the copy as it was before,
//! 2. the authoritative request is awaited,
//! 3. on success the tentative state stands; on failure it is replaced by a
//!    fresh authoritative read, or by the snapshot when that read fails too.
//!
//! The tentative state is never left in place after a failed request.

use std::future::Future;

/// How an optimistic update ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<E> {
    /// The backend accepted the change; local state is unchanged.
    Confirmed,
    /// The backend rejected the change; local state was re-read from the backend.
    RolledBack {
        /// Why the change was rejected.
        cause: E,
    },
    /// The backend rejected the change and could not be re-read; local state
    /// was reset to the pre-change snapshot.
    Restored {
        /// Why the change was rejected.
        cause: E,
        /// Why the re-read failed.
        refetch_error: E,
    },
}

impl<E> Settled<E> {
    /// Whether the change was accepted.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// The rejection cause, if the change was rejected.
    #[must_use]
    pub const fn cause(&self) -> Option<&E> {
        match self {
            Self::Confirmed => None,
            Self::RolledBack { cause } | Self::Restored { cause, .. } => Some(cause),
        }
    }
}

/// Await `persist` and settle `current` accordingly.
///
/// `current` must already hold the tentative state; `snapshot` is the state
/// before the mutation. `refetch` is only invoked when `persist` fails.
pub async fn settle<T, E, P, R, RF>(current: &mut T, snapshot: T, persist: P, refetch: R) -> Settled<E>
where
    P: Future<Output = Result<(), E>>,
    R: FnOnce() -> RF,
    RF: Future<Output = Result<T, E>>,
{
    let Err(cause) = persist.await else {
        return Settled::Confirmed;
    };

    match refetch().await {
        Ok(fresh) => {
            *current = fresh;
            Settled::RolledBack { cause }
        }
        Err(refetch_error) => {
            *current = snapshot;
            Settled::Restored {
                cause,
                refetch_error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[tokio::test]
    async fn test_confirmed_keeps_tentative_state() {
        let refetched = Cell::new(false);
        let mut state = vec![1, 2, 3, 4];

        let settled = settle(
            &mut state,
            vec![1, 2, 3],
            async { Ok::<(), String>(()) },
            || {
                refetched.set(true);
                async { Ok(vec![]) }
            },
        )
        .await;

        assert!(settled.is_confirmed());
        assert_eq!(state, vec![1, 2, 3, 4]);
        assert!(!refetched.get());
    }

    #[tokio::test]
    async fn test_failure_replaces_with_fresh_read() {
        let mut state = vec![3, 2, 1];

        let settled = settle(
            &mut state,
            vec![1, 2, 3],
            async { Err("rejected".to_string()) },
            || async { Ok(vec![9, 8]) },
        )
        .await;

        assert_eq!(
            settled,
            Settled::RolledBack {
                cause: "rejected".to_string()
            }
        );
        assert_eq!(state, vec![9, 8]);
    }

    #[tokio::test]
    async fn test_failed_refetch_restores_snapshot() {
        let mut state = Vec::new();

        let settled = settle(
            &mut state,
            vec![1, 2, 3],
            async { Err("rejected".to_string()) },
            || async { Err("offline".to_string()) },
        )
        .await;

        assert_eq!(settled.cause().map(String::as_str), Some("rejected"));
        assert!(matches!(settled, Settled::Restored { .. }));
        assert_eq!(state, vec![1, 2, 3]);
    }
}
