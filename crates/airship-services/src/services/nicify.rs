//! Inspector-style display names

/// Turn a field or class name into the label the Unity inspector shows
///
/// `m_` and `_` prefixes are dropped, a space is inserted at lower/upper
/// case and letter/digit boundaries, and the first letter is upper-cased.
/// Acronyms stay together: `HTTPServer` becomes `HTTP Server`.
pub fn nicify_variable_name(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let first = if text.starts_with('_') {
        1
    } else if text.starts_with("m_") {
        2
    } else {
        0
    };

    // Built back to front, reversed at the end
    let mut reversed: Vec<char> = Vec::with_capacity(chars.len() + 4);

    let mut prev_is_letter = false;
    let mut prev_is_upper = false;
    let mut prev_is_digit = false;
    let mut prev_is_start_of_word = false;
    let mut prev_is_number_word = false;

    for i in (first..chars.len()).rev() {
        let mut current = chars[i];

        let is_letter = current.is_ascii_alphabetic();
        let is_upper = is_letter && current.is_ascii_uppercase();
        let is_digit = current.is_ascii_digit();
        let is_spacer = current.is_whitespace() || current == '_';

        if i == first && is_letter {
            current = current.to_ascii_uppercase();
        }

        let add_space = (is_letter && !is_upper && prev_is_upper)
            || (is_letter && prev_is_upper && prev_is_start_of_word)
            || (is_digit && prev_is_start_of_word)
            || (!is_digit && prev_is_number_word)
            || (is_letter && !is_upper && prev_is_digit);

        if !is_spacer && add_space {
            reversed.push(' ');
        }
        reversed.push(current);

        prev_is_start_of_word = is_upper && prev_is_letter && !prev_is_upper;
        prev_is_number_word = is_digit && prev_is_letter && !prev_is_upper;
        prev_is_upper = is_upper;
        prev_is_letter = is_letter;
        prev_is_digit = is_digit;
    }

    reversed.into_iter().rev().collect()
}
