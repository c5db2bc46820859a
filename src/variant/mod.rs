//! A/B testing: two funnel variants and the persisted selection between them.

pub mod registry;
pub mod selector;
pub mod storage;

pub use registry::{FlowVariant, VariantEntry, VariantInfo, all_variants};
pub use selector::{AbTestStore, STORAGE_KEY};
pub use storage::{JsonFileStorage, MemoryStorage, VariantStorage};
