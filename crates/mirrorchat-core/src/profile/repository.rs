//! ProfileRepository trait definition.

use mirrorchat_types::error::RepositoryError;
use mirrorchat_types::message::Partition;
use mirrorchat_types::profile::{Profile, ProfileUpdate};

/// Singleton profile document per partition.
///
/// Implementations live in mirrorchat-infra (e.g., `SqliteProfileRepository`).
pub trait ProfileRepository: Send + Sync {
    /// Get the partition's profile, `None` if it was never written.
    fn get_profile(
        &self,
        partition: &Partition,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    /// Merge-write: overwrite only the keys present in `update`, creating the
    /// document if needed. Returns the merged profile.
    fn merge_profile(
        &self,
        partition: &Partition,
        update: &ProfileUpdate,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;

    /// Delete the partition's profile. Returns whether one existed.
    fn delete_profile(
        &self,
        partition: &Partition,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
