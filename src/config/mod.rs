//! Configuration: template lists that encode editing policy.
//!
//! ```toml
//! [sections]
//! category-templates = ["c", "C", "cat", "top"]
//! topline-templates = ["LDL", "rfd"]
//!
//! [senses]
//! safe-templates = ["anchor", "wikipedia"]
//!
//! [senses.template-types]
//! syn = ["my-syn"]
//! ```

mod tables;
mod types;

pub use tables::{TEMPLATE_TYPES, Tables};
pub use types::{
    CONFIG_FILE_NAMES, Config, ConfigError, DEFAULT_CATEGORY_TEMPLATES, DEFAULT_SAFE_TEMPLATES,
    DEFAULT_TOPLINE_TEMPLATES, SectionsConfig, SensesConfig,
};
