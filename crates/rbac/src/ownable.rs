//! Ownable - Single administrative identity

use shared::{Identity, InvalidArgumentError, Result, UnauthorizedError, UserId};
use std::sync::{PoisonError, RwLock};
use tracing::{info, warn};

/// Holds the one identity allowed to perform administrative actions
#[derive(Debug)]
pub struct Ownable<U = UserId> {
    owner: RwLock<U>,
}

impl<U: Identity> Ownable<U> {
    /// Create with the creating identity as owner
    pub fn new(creator: U) -> Self {
        Self {
            owner: RwLock::new(creator),
        }
    }

    /// Get the current owner
    pub fn current_owner(&self) -> U {
        self.owner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check if `caller` is the current owner
    pub fn is_owner(&self, caller: &U) -> bool {
        *self.owner.read().unwrap_or_else(PoisonError::into_inner) == *caller
    }

    /// Fail unless `caller` is the current owner
    pub fn require_owner(&self, caller: &U) -> Result<()> {
        let owner = self.owner.read().unwrap_or_else(PoisonError::into_inner);
        ensure_owner(&*owner, caller)
    }

    /// Run `operation` as the owner.
    ///
    /// The owner stays locked while `operation` runs, so a concurrent
    /// `transfer_ownership` either completes before the check or waits until
    /// the operation has finished. `operation` must not touch this `Ownable`.
    pub fn with_owner<T, F>(&self, caller: &U, operation: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let owner = self.owner.read().unwrap_or_else(PoisonError::into_inner);
        ensure_owner(&*owner, caller)?;
        operation()
    }

    /// Hand ownership to `new_owner`. Only the current owner may do this.
    pub fn transfer_ownership(&self, caller: &U, new_owner: U) -> Result<()> {
        let mut owner = self.owner.write().unwrap_or_else(PoisonError::into_inner);
        ensure_owner(&*owner, caller)?;
        if new_owner.is_null() {
            return Err(InvalidArgumentError::new("new owner", "identity must not be null").into());
        }

        info!(from = %*owner, to = %new_owner, "ownership transferred");
        *owner = new_owner;
        Ok(())
    }
}

fn ensure_owner<U: Identity>(owner: &U, caller: &U) -> Result<()> {
    if *owner != *caller {
        warn!(caller = %caller, owner = %owner, "rejected non-owner caller");
        return Err(UnauthorizedError {
            caller: caller.to_string(),
            owner: owner.to_string(),
        }
        .into());
    }
    Ok(())
}
