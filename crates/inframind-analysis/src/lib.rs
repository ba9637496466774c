pub mod model;
mod payload;
pub mod transform;

pub use model::{
    category_icon, derive_label, AnalysisResult, CausalStep, ConfidenceLabel, Fix, FixPriority,
    ReasoningStep, StepType,
};
pub use transform::transform;
