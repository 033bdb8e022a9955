pub mod memory;

pub use memory::{InMemoryCaseStudyStore, InstructionsTarget, StoreState};
