//! Sequential product deletion used by the category cascade.

use std::future::Future;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Delete every product in `ids`, in order, through `delete`.
///
/// Stops at the first failure and reports which product failed and how many
/// were removed before it. Returns the number of deleted products.
pub async fn cascade_delete_products<F, Fut>(ids: &[Uuid], mut delete: F) -> AppResult<usize>
where
    F: FnMut(Uuid) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    for (deleted, id) in ids.iter().copied().enumerate() {
        if let Err(e) = delete(id).await {
            tracing::warn!(product_id = %id, deleted, error = %e.internal_detail(), "Cascade delete stopped");
            return Err(AppError::CascadeFailed {
                product_id: id,
                deleted,
                reason: e.internal_detail(),
            });
        }
    }
    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_deletes_all_in_order() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let seen = Mutex::new(Vec::new());

        let deleted = cascade_delete_products(&ids, |id| {
            seen.lock().unwrap().push(id);
            async { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(deleted, 4);
        assert_eq!(*seen.lock().unwrap(), ids);
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let failing = ids[2];
        let calls = Mutex::new(0usize);

        let err = cascade_delete_products(&ids, |id| {
            *calls.lock().unwrap() += 1;
            async move {
                if id == failing {
                    Err(AppError::internal("foreign key violation"))
                } else {
                    Ok(())
                }
            }
        })
        .await
        .unwrap_err();

        assert_eq!(*calls.lock().unwrap(), 3);
        match err {
            AppError::CascadeFailed { product_id, deleted, reason } => {
                assert_eq!(product_id, failing);
                assert_eq!(deleted, 2);
                assert!(reason.contains("foreign key violation"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_list_is_noop() {
        let deleted = cascade_delete_products(&[], |_| async { Ok(()) }).await.unwrap();
        assert_eq!(deleted, 0);
    }
}
