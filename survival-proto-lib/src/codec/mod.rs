pub mod item_stack;
pub mod metadata;
pub mod string;

pub use item_stack::{ItemStack, PickupItem};
pub use metadata::{Metadata, MetadataEntry, MetadataValue};
