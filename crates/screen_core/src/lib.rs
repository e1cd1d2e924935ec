pub mod assets;
pub mod controller;
pub mod log_view;
pub mod operation;
pub mod pipeline;
pub mod task;
pub mod view;

pub use assets::{AssetStore, DirAssetStore, MemoryAssetStore};
pub use controller::{ScreenController, ScreenEvent};
pub use log_view::{LogView, RecordingLogView};
pub use operation::{cancel_primary, Lifecycle, OperationDef, StartFn, StopFn};
pub use pipeline::{Observer, Pipeline, PipelineExt, COMPLETED, SEPARATOR};
pub use task::{TaskHandle, TaskScope};
pub use view::{ScreenView, ViewState};
