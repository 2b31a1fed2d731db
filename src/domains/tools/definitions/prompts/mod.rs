pub mod add;
pub mod add_multi_message;
pub mod apply;
mod common;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use add::AddPromptTool;
pub use add_multi_message::AddMultiMessagePromptTool;
pub use apply::ApplyPromptTool;
pub use delete::DeletePromptTool;
pub use get::GetPromptTool;
pub use list::ListPromptsTool;
pub use update::UpdatePromptTool;
