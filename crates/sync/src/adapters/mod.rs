//! Dialect adapters for reading/writing each IDE's native file format.

mod central;
mod cursor;
pub mod traits;
pub mod utils;
mod vscode;
mod windsurf;

pub use central::{CentralAdapter, CANONICAL_DIALECT};
pub(crate) use central::{COMMANDS as CENTRAL_COMMANDS, RULES as CENTRAL_RULES};
pub use cursor::{CursorAdapter, CursorConfig};
pub use traits::{DialectAdapter, KindLayout};
pub use vscode::{VscodeAdapter, VscodeConfig, DEFAULT_APPLY_TO, DEFAULT_PROMPT_MODE};
pub use windsurf::{
    WindsurfAdapter, WindsurfConfig, DEFAULT_AUTO_EXECUTION_MODE, DEFAULT_RULE_MODE,
};
