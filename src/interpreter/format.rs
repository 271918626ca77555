//! `printf`-style formatting
//!
//! Supports the conversions `d i u x X o c s f F e E g G %` with the flags
//! `- + space 0 #`, a field width and a `.precision`. Either of the last two
//! may be `*`, which takes the value from the next argument. Length modifiers
//! (`h l ll L j z t`) are accepted and ignored; values are always 64-bit.
//! Widths and precisions above [`MAX_FIELD`] are rejected.

use crate::interpreter::errors::RuntimeError;
use crate::memory::Value;
use crate::parser::ast::SourceLocation;

/// Largest accepted field width or precision
pub const MAX_FIELD: usize = u16::MAX as usize;

#[derive(Debug, Default)]
struct FormatSpec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl FormatSpec {
    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    /// Pad `prefix` + `body` to the field width. Zero padding goes between
    /// the prefix (sign, `0x`) and the digits.
    fn pad(&self, prefix: &str, body: &str, zero_ok: bool) -> String {
        let len = prefix.chars().count() + body.chars().count();
        let width = self.width.unwrap_or(0);
        if len >= width {
            return format!("{}{}", prefix, body);
        }
        let fill = width - len;
        if self.left {
            format!("{}{}{}", prefix, body, " ".repeat(fill))
        } else if self.zero && zero_ok {
            format!("{}{}{}", prefix, "0".repeat(fill), body)
        } else {
            format!("{}{}{}", " ".repeat(fill), prefix, body)
        }
    }
}

struct Args<'a> {
    values: &'a [Value],
    next: usize,
    location: SourceLocation,
}

impl<'a> Args<'a> {
    fn take(&mut self, conversion: char) -> Result<&'a Value, RuntimeError> {
        let value = self.values.get(self.next).ok_or_else(|| RuntimeError::InvalidFormat {
            message: format!("missing argument for '%{}'", conversion),
            location: self.location,
        })?;
        self.next += 1;
        Ok(value)
    }

    fn take_int(&mut self, conversion: char) -> Result<i64, RuntimeError> {
        let value = self.take(conversion)?;
        value.as_int().ok_or_else(|| RuntimeError::InvalidFormat {
            message: format!("'%{}' expects a number, got {}", conversion, value.type_name()),
            location: self.location,
        })
    }

    /// Reject a width or precision too large to render
    fn check_field(&self, what: &str, value: usize) -> Result<usize, RuntimeError> {
        if value > MAX_FIELD {
            return Err(RuntimeError::InvalidFormat {
                message: format!("{} {} exceeds the limit of {}", what, value, MAX_FIELD),
                location: self.location,
            });
        }
        Ok(value)
    }

    fn take_float(&mut self, conversion: char) -> Result<f64, RuntimeError> {
        let value = self.take(conversion)?;
        value.as_float().ok_or_else(|| RuntimeError::InvalidFormat {
            message: format!("'%{}' expects a number, got {}", conversion, value.type_name()),
            location: self.location,
        })
    }
}

/// Render `format` with `args`. Escapes in `format` must already be decoded.
pub fn format_printf(
    format: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<String, RuntimeError> {
    let mut output = String::new();
    let mut chars = format.chars().peekable();
    let mut args = Args {
        values: args,
        next: 0,
        location,
    };

    while let Some(ch) = chars.next() {
        if ch != '%' {
            output.push(ch);
            continue;
        }

        let mut spec = FormatSpec::default();

        // Flags
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                '#' => spec.alternate = true,
                _ => break,
            }
            chars.next();
        }

        // Width
        if chars.peek() == Some(&'*') {
            chars.next();
            let width = args.take_int('*')?;
            if width < 0 {
                spec.left = true;
            }
            let width = usize::try_from(width.unsigned_abs()).unwrap_or(usize::MAX);
            spec.width = Some(args.check_field("width", width)?);
        } else if let Some(width) = read_number(&mut chars) {
            spec.width = Some(args.check_field("width", width)?);
        }

        // Precision
        if chars.peek() == Some(&'.') {
            chars.next();
            if chars.peek() == Some(&'*') {
                chars.next();
                let precision = args.take_int('*')?;
                // A negative precision is treated as absent
                spec.precision = match usize::try_from(precision) {
                    Ok(precision) => Some(args.check_field("precision", precision)?),
                    Err(_) => None,
                };
            } else {
                let precision = read_number(&mut chars).unwrap_or(0);
                spec.precision = Some(args.check_field("precision", precision)?);
            }
        }

        // Length modifiers
        while matches!(chars.peek(), Some('h' | 'l' | 'L' | 'q' | 'j' | 'z' | 't')) {
            chars.next();
        }

        let conversion = chars.next().ok_or_else(|| RuntimeError::InvalidFormat {
            message: "format ends in the middle of a conversion".to_string(),
            location,
        })?;

        let piece = match conversion {
            '%' => "%".to_string(),
            'd' | 'i' => {
                let n = args.take_int(conversion)?;
                let digits = with_min_digits(n.unsigned_abs().to_string(), spec.precision);
                spec.pad(spec.sign(n < 0), &digits, spec.precision.is_none())
            }
            'u' => {
                let n = args.take_int(conversion)? as u64;
                let digits = with_min_digits(n.to_string(), spec.precision);
                spec.pad("", &digits, spec.precision.is_none())
            }
            'x' | 'X' | 'o' => {
                let n = args.take_int(conversion)? as u64;
                let (digits, prefix) = match conversion {
                    'x' => (format!("{:x}", n), "0x"),
                    'X' => (format!("{:X}", n), "0X"),
                    _ => (format!("{:o}", n), "0"),
                };
                let digits = with_min_digits(digits, spec.precision);
                let prefix = if spec.alternate && n != 0 && !digits.starts_with('0') {
                    prefix
                } else {
                    ""
                };
                spec.pad(prefix, &digits, spec.precision.is_none())
            }
            'c' => {
                let n = args.take_int(conversion)?;
                let ch = char::from(n as u8);
                spec.pad("", &ch.to_string(), false)
            }
            's' => {
                let text = match args.take(conversion)? {
                    Value::Str(s) => s.clone(),
                    Value::Int(n) | Value::Char(n) => n.to_string(),
                    Value::Float(x) => x.to_string(),
                };
                let text: String = match spec.precision {
                    Some(max) => text.chars().take(max).collect(),
                    None => text,
                };
                spec.pad("", &text, false)
            }
            'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
                let x = args.take_float(conversion)?;
                format_float(&spec, conversion, x)
            }
            other => {
                return Err(RuntimeError::InvalidFormat {
                    message: format!("unknown conversion '%{}'", other),
                    location,
                })
            }
        };
        output.push_str(&piece);
    }

    Ok(output)
}

fn read_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut number: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        number = Some(
            number
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    number
}

fn with_min_digits(digits: String, precision: Option<usize>) -> String {
    match precision {
        Some(0) if digits == "0" => String::new(),
        Some(min) if digits.len() < min => {
            format!("{}{}", "0".repeat(min - digits.len()), digits)
        }
        _ => digits,
    }
}

fn format_float(spec: &FormatSpec, conversion: char, x: f64) -> String {
    let upper = conversion.is_ascii_uppercase();
    let negative = x.is_sign_negative() && !x.is_nan();

    if !x.is_finite() {
        let text = if x.is_nan() { "nan" } else { "inf" };
        let text = if upper {
            text.to_uppercase()
        } else {
            text.to_string()
        };
        return spec.pad(spec.sign(negative), &text, false);
    }

    let precision = spec.precision.unwrap_or(6);
    let magnitude = x.abs();
    let body = match conversion.to_ascii_lowercase() {
        'f' => format!("{:.*}", precision, magnitude),
        'e' => exponential(magnitude, precision),
        _ => general(magnitude, precision, spec.alternate),
    };
    let body = if upper { body.to_uppercase() } else { body };
    spec.pad(spec.sign(negative), &body, true)
}

/// `%e` body: one leading digit and an exponent of at least two digits
fn exponential(x: f64, precision: usize) -> String {
    let rendered = format!("{:.*e}", precision, x);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => rendered,
    }
}

/// `%g` body: `%e` or `%f` depending on the exponent, trailing zeros removed
/// unless `#` is given
fn general(x: f64, precision: usize, alternate: bool) -> String {
    let precision = precision.max(1);
    let exponent = if x == 0.0 {
        0
    } else {
        let rendered = format!("{:.*e}", precision - 1, x);
        rendered
            .split_once('e')
            .and_then(|(_, e)| e.parse::<i32>().ok())
            .unwrap_or(0)
    };

    let body = if exponent < -4 || exponent >= precision as i32 {
        exponential(x, precision - 1)
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, x)
    };

    if alternate {
        return body;
    }
    strip_trailing_zeros(&body)
}

fn strip_trailing_zeros(body: &str) -> String {
    let (number, exponent) = match body.find('e') {
        Some(pos) => body.split_at(pos),
        None => (body, ""),
    };
    let number = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };
    format!("{}{}", number, exponent)
}
