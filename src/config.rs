//! Configuration for a transform run.
//!
//! Options are built with `typed-builder`, the same way the store backends
//! were configured, and can also be read from JSON/TOML through serde since
//! every field has a default.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use typed_builder::TypedBuilder;

/// How the owning module of a symbolic generator reference is matched
/// against the project's referenced modules.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModuleMatchPolicy {
    /// Zero or several matches is an error.
    #[default]
    Strict,
    /// Several matches pick the first referenced module in project order.
    FirstMatch,
}

/// Newline convention of the emitted document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// `\r\n` on Windows, `\n` elsewhere.
    #[default]
    Native,
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Native if cfg!(windows) => "\r\n",
            LineEnding::Native | LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Options for [`Transformer`](crate::transform::Transformer).
///
/// # Examples
///
/// ```
/// use attrgen::config::{ModuleMatchPolicy, TransformOptions};
///
/// let options = TransformOptions::builder()
///     .simplify(true)
///     .module_match(ModuleMatchPolicy::FirstMatch)
///     .build();
/// assert!(options.simplify);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[builder(doc)]
#[serde(default)]
pub struct TransformOptions {
    /// Shorten fully-qualified paths introduced by generators
    #[builder(default = false)]
    pub simplify: bool,

    /// Referenced-module matching behavior
    #[builder(default)]
    pub module_match: ModuleMatchPolicy,

    /// Require a matched referenced module's file to exist before loading it
    #[builder(default = false)]
    pub verify_module_files: bool,

    /// Inserted between the input file stem and `.rs` for the output path
    #[builder(default = String::from("generated"), setter(into))]
    pub output_suffix: String,

    /// Newline convention of the output text
    #[builder(default)]
    pub line_ending: LineEnding,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
