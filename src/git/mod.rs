//! Git access for the commit gate.
//!
//! The gate only needs two things from the repository: the message of the
//! checked-out commit and a way to move the working copy to its parent.

mod cli;

pub use cli::GitCli;

use async_trait::async_trait;

use crate::error::Result;

/// Repository operations used by the gate.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Returns the full message of the checked-out commit.
    async fn head_commit_message(&self) -> Result<String>;

    /// Detaches the working copy at the parent of the checked-out commit.
    ///
    /// The previous checkout is not restored afterward.
    async fn checkout_parent(&self) -> Result<()>;
}
