pub mod optimistic;

pub use optimistic::{MutateError, MutationState, Reconciliation, SyncError, SyncedView, mutate};
