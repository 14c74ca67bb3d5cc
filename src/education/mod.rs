//! Education content: the dataset model and the collaborators that load it.

pub mod model;
pub mod source;

pub use model::{EducationCard, EducationDataset, EducationResponse, SaveButtonCta};
pub use source::{EducationSource, FileEducationSource, HttpEducationSource, source_from_config};
