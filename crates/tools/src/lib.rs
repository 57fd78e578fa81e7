//! Built-in tool implementations for Helmsman.
//!
//! Tools give the agent the ability to interact with the world: read and
//! write files, run shell commands, and fetch URLs. Each tool returns a
//! uniform `ToolResultEnvelope`; faults never escape a tool boundary as
//! panics.
//!
//! File editing is guarded by a read-before-edit tracker shared between
//! `read_file` and `edit_file`: a file must have been read this session
//! before an edit is accepted.

pub mod file_delete;
pub mod file_edit;
pub mod file_list;
pub mod file_read;
pub mod file_write;
pub mod read_tracker;
pub mod shell;
pub mod url_fetch;

use helmsman_core::tool::ToolRegistry;
pub use read_tracker::ReadTracker;

/// Create a default tool registry with all built-in tools.
///
/// The `read_file` and `edit_file` tools share one read tracker so the
/// read-before-edit invariant holds across calls.
pub fn default_registry() -> ToolRegistry {
    let tracker = ReadTracker::new();

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(file_read::ReadFileTool::new(tracker.clone())));
    registry.register(Box::new(file_write::CreateFileTool));
    registry.register(Box::new(file_edit::EditFileTool::new(tracker)));
    registry.register(Box::new(file_delete::DeleteFileTool));
    registry.register(Box::new(file_list::ListFilesTool));
    registry.register(Box::new(shell::ExecuteCommandTool::default()));
    registry.register(Box::new(url_fetch::UrlFetchTool::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_all_tools() {
        let registry = default_registry();
        for name in [
            "read_file",
            "create_file",
            "edit_file",
            "delete_file",
            "list_files",
            "execute_command",
            "url_fetch",
        ] {
            assert!(registry.contains(name), "missing tool: {name}");
        }
        assert_eq!(registry.descriptors().len(), 7);
    }
}
