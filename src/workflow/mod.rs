pub mod finish;

pub use finish::{FinishWorkflow, WorkflowError, WorkflowOutcome};
