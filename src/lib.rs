//! Purpose: Library crate behind the `frostlang` CLI: `.lang` codec, tag tree, JSON rendering.
//! Exports: `core` (codec, tree, rendering, flattening, errors), `convert`, `batch`, `notice`.
//! Role: Pure conversions live in `core`/`convert`; `batch` adds file discovery and I/O.
//! Invariants: Rendered JSON is byte-stable: sorted keys, two-space indent, no trailing newline.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod batch;
pub mod convert;
pub mod core;
mod json;
pub mod notice;

pub use crate::convert::{LangOutput, json_to_lang, lang_to_json};
pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::flatten::UnsupportedValuePolicy;
pub use crate::core::record::Entry;
pub use crate::core::tree::TagTree;
