// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Display titles derived from declared identifiers.

/// Separator characters replaced by spaces when no configuration says otherwise.
pub const DEFAULT_SEPARATORS: &str = "_";

/// Title for `name` using [`DEFAULT_SEPARATORS`].
///
/// ```
/// use metareg::title::create_title;
///
/// assert_eq!(create_title("position_x"), "Position X");
/// assert_eq!(create_title("Transform2D"), "Transform 2D");
/// assert_eq!(create_title("maxSpeed"), "Max Speed");
/// ```
#[must_use]
pub fn create_title(name: &str) -> String {
    create_title_with(name, DEFAULT_SEPARATORS)
}

/// Title for `name`, treating every char of `separators` as a word break.
///
/// Separators become spaces, the first char and every char after a space are
/// upper-cased, and a space is inserted at lower→upper and letter→digit
/// transitions.
#[must_use]
pub fn create_title_with(name: &str, separators: &str) -> String {
    let mut capitalized: Vec<char> = Vec::with_capacity(name.len());
    let mut after_space = true;
    for c in name.chars() {
        let c = if separators.contains(c) { ' ' } else { c };
        if after_space {
            capitalized.extend(c.to_uppercase());
        } else {
            capitalized.push(c);
        }
        after_space = c == ' ';
    }

    let mut title = String::with_capacity(capitalized.len() + 4);
    let mut prev: Option<char> = None;
    for c in capitalized {
        if let Some(p) = prev {
            let case_break = p.is_lowercase() && c.is_uppercase();
            let digit_break = p.is_alphabetic() && c.is_ascii_digit();
            if case_break || digit_break {
                title.push(' ');
            }
        }
        title.push(c);
        prev = Some(c);
    }
    title
}
