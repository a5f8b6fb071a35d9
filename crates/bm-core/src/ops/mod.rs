//! Registry operations run against a [`Session`](crate::Session)

mod add;
mod checkout;
mod configure;
mod edit;
mod info;
mod remove;

pub use add::{AddOutcome, AddRequest, add};
pub use checkout::{CheckoutOutcome, CheckoutRequest, auto_save_message, checkout};
pub use configure::{ConfigureOutcome, ConfigureRequest, configure};
pub use edit::{EditOutcome, EditRequest, edit};
pub use info::{
    BranchPresence, FeatureView, PruneOutcome, RepositoryReport, StatusTally, info, list_all,
    prune,
};
pub use remove::{GitBranchRemoval, RemoveOutcome, RemoveRequest, remove};
