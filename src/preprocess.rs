//! Source sanitizer
//!
//! The first pipeline stage. Mobile keyboards habitually replace straight
//! quotes and the minus sign with their typographic cousins, so the
//! sanitizer folds those back before the lexer ever sees the text.
//! Preprocessor directives carry no semantics in this subset; lines whose
//! first non-whitespace character is `#` are dropped wholesale.
//!
//! Line numbers reported by every later stage refer to the sanitized
//! text, so a dropped `#` line shifts the numbering of everything below
//! it.

/// Sanitize raw source text, in order:
///
/// 1. `\r\n` → `\n`
/// 2. smart double quotes → `"`, smart single quotes → `'`,
///    en/em dashes → `-`
/// 3. drop lines whose first non-whitespace character is `#`
pub fn sanitize(source: &str) -> String {
    let folded: String = source
        .replace("\r\n", "\n")
        .chars()
        .map(|ch| match ch {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect();

    folded
        .split('\n')
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}
