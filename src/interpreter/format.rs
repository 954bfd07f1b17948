//! Restricted `printf` renderer
//!
//! Escape sequences in the format string were already processed by the
//! lexer; this module only interprets `%` sequences:
//!
//! | Specifier | Rendering                                  |
//! |-----------|--------------------------------------------|
//! | `%%`      | literal `%`                                |
//! | `d`, `i`  | base-10 signed                             |
//! | `u`       | unsigned interpretation of the low 32 bits |
//! | `x`, `X`  | lower/uppercase hex of the low 32 bits     |
//! | `c`       | the character of the low 8 bits            |
//!
//! Width, precision, padding and length modifiers are unsupported: the
//! `%` and the following character pass through literally and no
//! argument is consumed. Argument-count mismatches and unrepresentable
//! `%c` values are warnings, never errors.

use crate::interpreter::engine::Interpreter;

impl Interpreter {
    /// Render one printf call, appending any warnings it raises.
    pub(crate) fn format_printf(&mut self, format: &str, args: &[i64]) -> String {
        let mut output = String::new();
        let mut chars = format.chars().peekable();
        let mut arg_index = 0;

        while let Some(ch) = chars.next() {
            if ch != '%' {
                output.push(ch);
                continue;
            }

            let Some(&spec) = chars.peek() else {
                // Trailing lone '%'
                output.push('%');
                break;
            };

            match spec {
                '%' => {
                    chars.next();
                    output.push('%');
                }
                'd' | 'i' | 'u' | 'x' | 'X' | 'c' => {
                    chars.next();
                    if arg_index >= args.len() {
                        // Unsatisfied specifier: emit it literally.
                        self.warnings.push(format!(
                            "printf: not enough arguments for '%{}'",
                            spec
                        ));
                        output.push('%');
                        output.push(spec);
                        continue;
                    }
                    let value = args[arg_index];
                    arg_index += 1;
                    match spec {
                        'd' | 'i' => output.push_str(&value.to_string()),
                        'u' => output.push_str(&(value as u32).to_string()),
                        'x' => output.push_str(&format!("{:x}", value as u32)),
                        'X' => output.push_str(&format!("{:X}", value as u32)),
                        'c' => match char::from_u32((value & 0xFF) as u32) {
                            Some(ch) => output.push(ch),
                            None => self.warnings.push(format!(
                                "printf: value {} is not a printable character",
                                value
                            )),
                        },
                        _ => unreachable!("specifier set matched above"),
                    }
                }
                other => {
                    // Unsupported specifier: pass through literally
                    // without consuming an argument.
                    chars.next();
                    output.push('%');
                    output.push(other);
                }
            }
        }

        if arg_index < args.len() {
            self.warnings.push(format!(
                "printf: {} unused argument(s)",
                args.len() - arg_index
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;

    fn render(format: &str, args: &[i64]) -> (String, Vec<String>) {
        let mut interpreter = Interpreter::new();
        let output = interpreter.format_printf(format, args);
        (output, interpreter.take_warnings())
    }

    #[test]
    fn test_plain_text_passthrough() {
        let (output, warnings) = render("Hello, world!\n", &[]);
        assert_eq!(output, "Hello, world!\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_decimal_specifiers() {
        let (output, warnings) = render("%d %i", &[-3, 42]);
        assert_eq!(output, "-3 42");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unsigned_masks_to_32_bits() {
        let (output, _) = render("%u", &[-1]);
        assert_eq!(output, "4294967295");
    }

    #[test]
    fn test_hex_case() {
        let (output, _) = render("%x %X", &[255, 255]);
        assert_eq!(output, "ff FF");
    }

    #[test]
    fn test_char_masks_to_low_byte() {
        let (output, warnings) = render("%c%c", &[65, 256 + 66]);
        assert_eq!(output, "AB");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_percent_escape() {
        let (output, warnings) = render("100%%", &[]);
        assert_eq!(output, "100%");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_trailing_percent() {
        let (output, _) = render("50%", &[]);
        assert_eq!(output, "50%");
    }

    #[test]
    fn test_unknown_specifier_passes_through() {
        // Width modifiers are unsupported; no argument is consumed, so
        // the value lands on the later %d.
        let (output, warnings) = render("%5d %d", &[7]);
        assert_eq!(output, "%5d 7");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_argument_warns_and_emits_literally() {
        let (output, warnings) = render("%d %d\n", &[1]);
        assert_eq!(output, "1 %d\n");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not enough arguments"));
    }

    #[test]
    fn test_surplus_arguments_warn() {
        let (output, warnings) = render("%d\n", &[1, 2, 3]);
        assert_eq!(output, "1\n");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("2 unused"));
    }
}
