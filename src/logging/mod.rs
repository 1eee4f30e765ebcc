pub mod formatter;
pub mod layer;

pub use formatter::{GroupState, WorkflowCommandFormatter};
pub use layer::{LogHandle, WorkflowCommandLayer, GROUP_FIELD};

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the GitHub Actions log renderer as the process-wide subscriber.
///
/// Everything down to debug level is rendered by default so the runner can
/// decide what to show; `RUST_LOG` still overrides the filter.
pub fn init() -> Result<LogHandle<std::io::Stdout>> {
    let (layer, handle) = WorkflowCommandLayer::stdout();
    tracing_subscriber::registry()
        .with(layer)
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .try_init()?;
    Ok(handle)
}
