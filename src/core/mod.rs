pub mod address_list;
pub mod controller;
pub mod engine;
pub mod reconcile;
pub mod view;

pub use crate::domain::model::{AddressSlot, MetadataRecord, ResultItem, SlotId};
pub use crate::domain::ports::{ConfigProvider, MetadataCollaborator};
pub use crate::utils::error::Result;
