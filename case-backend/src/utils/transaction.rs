// src/utils/transaction.rs

//! トランザクション管理の統一化
//!
//! 1リクエスト = 1トランザクション。クロージャが `Err` を返した場合はロールバックし、
//! 部分的な変更は一切残さない。自動リトライは行わない。

use crate::error::AppError;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use tracing::{debug, error, instrument, warn};

// Future型エイリアス（Boxed Future）
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// トランザクション実行を抽象化するトレイト
pub trait TransactionManager {
    /// トランザクション内で操作を実行
    #[allow(clippy::manual_async_fn)]
    fn execute_in_transaction<F, R>(
        &self,
        operation: F,
    ) -> impl Future<Output = Result<R, AppError>> + Send
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<R, AppError>>
            + Send
            + 'static,
        R: Send + 'static;
}

// DatabaseConnection への実装
impl TransactionManager for DatabaseConnection {
    #[instrument(skip(self, operation), name = "database_transaction")]
    #[allow(clippy::manual_async_fn)]
    fn execute_in_transaction<F, R>(
        &self,
        operation: F,
    ) -> impl Future<Output = Result<R, AppError>> + Send
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<R, AppError>>
            + Send
            + 'static,
        R: Send + 'static,
    {
        async move {
            let transaction_start = std::time::Instant::now();

            debug!("Starting database transaction");

            let txn = self.begin().await.map_err(|e| {
                error!(error = %e, "Failed to begin transaction");
                AppError::InternalServerError("Failed to begin transaction".to_string())
            })?;

            let result = operation(&txn).await;

            match result {
                Ok(value) => {
                    txn.commit().await.map_err(|e| {
                        error!(error = %e, "Failed to commit transaction");
                        AppError::InternalServerError("Failed to commit transaction".to_string())
                    })?;

                    debug!(
                        duration_ms = transaction_start.elapsed().as_millis(),
                        "Transaction committed"
                    );

                    Ok(value)
                }
                Err(app_error) => {
                    if let Err(rollback_error) = txn.rollback().await {
                        error!(
                            original_error = %app_error,
                            rollback_error = %rollback_error,
                            "Failed to rollback transaction"
                        );
                        return Err(AppError::InternalServerError(
                            "Transaction failed and rollback also failed".to_string(),
                        ));
                    }

                    warn!(
                        error = %app_error,
                        duration_ms = transaction_start.elapsed().as_millis(),
                        "Transaction rolled back"
                    );

                    Err(app_error)
                }
            }
        }
    }
}

/// トランザクション内での操作を簡単に記述するマクロ
#[macro_export]
macro_rules! with_transaction {
    ($db:expr, |$txn:ident| $body:expr) => {{
        use $crate::utils::transaction::TransactionManager;

        $db.execute_in_transaction(move |$txn| Box::pin($body))
            .await
    }};
}
