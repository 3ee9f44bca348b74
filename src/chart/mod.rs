/// Chart layer: turns a chart request into a validated instruction.
///
/// ```text
///   filtered Dataset + ChartRequest
///              │
///              ▼
///   ┌────────────────────┐
///   │ kind::CHART_SPECS   │  role rules + payload kind per chart
///   └────────────────────┘
///              │
///              ▼
///   ┌────────────────────┐
///   │ resolve             │  bind roles → check kinds → derive payload
///   └────────────────────┘
///              │
///              ▼
///   ChartInstruction  or  ValidationError
/// ```

pub mod correlation;
pub mod error;
pub mod kind;
pub mod request;
pub mod resolve;

pub use error::ValidationError;
pub use kind::{AxisRole, ChartKind};
pub use request::ChartRequest;
pub use resolve::{ChartInstruction, ChartPayload, resolve};
