//! View rendering.
//!
//! Views are embedded in the binary and rendered by name with a key/value context.

mod engine;

pub use engine::{MiniJinjaEngine, TemplateEngine};

pub const USER_HOME_VIEW: &str = "system/user/user.html";
pub const USER_ADD_VIEW: &str = "system/user/user_add.html";
pub const USER_EDIT_VIEW: &str = "system/user/user_edit.html";
pub const USER_ROLE_ASSIGN_VIEW: &str = "system/user/user_roleassign.html";
pub const CONTAINER_VIEW: &str = "container.html";
