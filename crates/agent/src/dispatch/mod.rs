//! Tool dispatch: catalog assembly and routing under the approval policy.

mod catalog;
mod dispatcher;

pub use catalog::{ToolCatalog, ToolOwner};
pub use dispatcher::{SensitivityPolicy, ToolDispatcher};
