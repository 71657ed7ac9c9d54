//! Printing the output tree.

use super::assembly::header;
use crate::config::LineEnding;

/// Header followed by the pretty-printed tree, with every line break
/// converted to `line_ending`.
pub fn render(file: &syn::File, line_ending: LineEnding) -> String {
    let body = prettyplease::unparse(file);
    let newline = line_ending.as_str();
    let mut text = header(newline);
    text.push_str(&normalize_newlines(&body, newline));
    text
}

pub fn normalize_newlines(text: &str, newline: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    if newline == "\n" {
        unified
    } else {
        unified.replace('\n', newline)
    }
}
