use std::{future::Future, time::Duration};

use tracing::{error, info, warn};

use crate::error::error_chain;
use crate::users::repo::UserStore;

/// Fixed-delay retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    Created,
    AlreadyExists,
    GaveUp { attempts: u32 },
}

/// Runs `op` until it succeeds or the budget is spent, sleeping `policy.delay`
/// between failures. Returns `Err(attempts)` when every attempt failed.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, u32>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0;
    while attempt < policy.max_attempts {
        attempt += 1;
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %error_chain(&e),
                    "attempt failed"
                );
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
    Err(attempt)
}

async fn check_and_create(store: &dyn UserStore) -> anyhow::Result<SchemaOutcome> {
    if store.users_table_exists().await? {
        return Ok(SchemaOutcome::AlreadyExists);
    }
    store.create_users_table().await?;
    Ok(SchemaOutcome::Created)
}

/// Makes sure the `users` table exists. Never fails: exhausting the retry
/// budget is logged and reported as `GaveUp`.
pub async fn ensure_users_table(store: &dyn UserStore, policy: &RetryPolicy) -> SchemaOutcome {
    let result = retry(policy, || check_and_create(store)).await;

    match result {
        Ok(SchemaOutcome::Created) => {
            info!("users table created");
            SchemaOutcome::Created
        }
        Ok(outcome) => {
            info!("users table already exists");
            outcome
        }
        Err(attempts) => {
            error!(attempts, "users table check failed, giving up");
            SchemaOutcome::GaveUp { attempts }
        }
    }
}
