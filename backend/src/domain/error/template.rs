//! Message-template substitution for error reports.
//!
//! Templates mix two placeholder conventions: `{}` (rewritten to `%s` and
//! filled printf-style) and indexed `{0}`, `{1}` placeholders with `'`
//! quoting. The printf pass runs first; when it fails or leaves the text
//! unchanged, the indexed pass runs against the original template. When
//! both fail the literal template is returned, so formatting can never mask
//! the failure being reported.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;
use tracing::debug;

use super::Param;

const DOMAIN_PLACEHOLDER: &str = "{}";
const PRINTF_PLACEHOLDER: &str = "%s";
const PRINTF_FLAGS: &str = "-#+ 0,(<";

/// Recoverable substitution failures. Every variant degrades to the next
/// formatting step; none reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum TemplateError {
    #[error("format specifier {specifier:?} has no matching argument")]
    MissingArgument { specifier: String },
    #[error("format specifier {specifier:?} uses argument index 0")]
    ZeroArgumentIndex { specifier: String },
    #[error("unsupported conversion {conversion:?} in format specifier {specifier:?}")]
    UnsupportedConversion { specifier: String, conversion: char },
    #[error("unsupported flag {flag:?} in format specifier {specifier:?}")]
    UnsupportedFlag { specifier: String, flag: char },
    #[error("format specifier {specifier:?} needs a width")]
    MissingWidth { specifier: String },
    #[error("format specifier {specifier:?} does not accept a precision")]
    PrecisionNotAllowed { specifier: String },
    #[error("argument {argument:?} is not an integer for format specifier {specifier:?}")]
    NotAnInteger { specifier: String, argument: String },
    #[error("numeric field in format specifier {specifier:?} is out of range")]
    NumberOutOfRange { specifier: String },
    #[error("template ends inside a format specifier")]
    DanglingSpecifier,
    #[error("unmatched braces in template")]
    UnmatchedBraces,
    #[error("cannot parse argument index {raw:?}")]
    InvalidArgumentIndex { raw: String },
}

/// Substitute `params` into `template`.
pub(crate) fn format_message(template: &str, params: &[Param]) -> String {
    let format = template.replace(DOMAIN_PLACEHOLDER, PRINTF_PLACEHOLDER);
    if params.is_empty() {
        return format;
    }

    let args: Vec<Cow<'_, str>> = params.iter().map(Param::render).collect();
    match printf(&format, &args) {
        Ok(formatted) if formatted != template => return formatted,
        Ok(_) => debug!(
            template,
            "printf substitution left template unchanged; trying indexed placeholders"
        ),
        Err(error) => debug!(
            template,
            %error,
            "printf substitution failed; trying indexed placeholders"
        ),
    }

    match indexed(template, &args) {
        Ok(formatted) => formatted,
        Err(error) => {
            debug!(template, %error, "indexed substitution failed; using literal template");
            template.to_owned()
        }
    }
}

struct Specifier {
    text: String,
    index: Option<usize>,
    left_align: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// printf-style substitution: `%s`, `%S`, `%d`, `%n`, `%%`, explicit `N$`
/// indices, the `-` flag, width and precision.
fn printf(format: &str, args: &[Cow<'_, str>]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut next_ordinary = 0_usize;

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        let spec = parse_specifier(&mut chars)?;
        match spec.conversion {
            '%' => out.push_str(&pad(String::from("%"), &spec)),
            'n' => out.push('\n'),
            's' | 'S' | 'd' => {
                let argument = match spec.index {
                    Some(index) => args.get(index - 1),
                    None => {
                        next_ordinary += 1;
                        args.get(next_ordinary - 1)
                    }
                }
                .ok_or_else(|| TemplateError::MissingArgument {
                    specifier: spec.text.clone(),
                })?;
                out.push_str(&convert(argument, &spec)?);
            }
            conversion => {
                return Err(TemplateError::UnsupportedConversion {
                    specifier: spec.text,
                    conversion,
                });
            }
        }
    }

    Ok(out)
}

fn parse_specifier(chars: &mut Peekable<Chars<'_>>) -> Result<Specifier, TemplateError> {
    let mut text = String::from("%");
    let mut index = None;
    let mut left_align = false;

    let mut digits = take_number(chars, &mut text)?;
    if digits.is_some() && chars.peek() == Some(&'$') {
        chars.next();
        text.push('$');
        if digits == Some(0) {
            return Err(TemplateError::ZeroArgumentIndex { specifier: text });
        }
        index = digits.take();
    }

    if digits.is_none() {
        while let Some(&flag) = chars.peek() {
            if !PRINTF_FLAGS.contains(flag) {
                break;
            }
            chars.next();
            text.push(flag);
            if flag != '-' {
                return Err(TemplateError::UnsupportedFlag {
                    specifier: text,
                    flag,
                });
            }
            left_align = true;
        }
        digits = take_number(chars, &mut text)?;
    }

    let precision = if chars.peek() == Some(&'.') {
        chars.next();
        text.push('.');
        Some(take_number(chars, &mut text)?.ok_or(TemplateError::DanglingSpecifier)?)
    } else {
        None
    };

    let conversion = chars.next().ok_or(TemplateError::DanglingSpecifier)?;
    text.push(conversion);

    if left_align && digits.is_none() {
        return Err(TemplateError::MissingWidth { specifier: text });
    }

    Ok(Specifier {
        text,
        index,
        left_align,
        width: digits,
        precision,
        conversion,
    })
}

fn take_number(
    chars: &mut Peekable<Chars<'_>>,
    text: &mut String,
) -> Result<Option<usize>, TemplateError> {
    let mut raw = String::new();
    while let Some(&digit) = chars.peek() {
        if !digit.is_ascii_digit() {
            break;
        }
        chars.next();
        raw.push(digit);
    }
    if raw.is_empty() {
        return Ok(None);
    }
    text.push_str(&raw);
    raw.parse()
        .map(Some)
        .map_err(|_| TemplateError::NumberOutOfRange {
            specifier: text.clone(),
        })
}

fn convert(argument: &str, spec: &Specifier) -> Result<String, TemplateError> {
    let rendered = match spec.conversion {
        'd' => {
            if spec.precision.is_some() {
                return Err(TemplateError::PrecisionNotAllowed {
                    specifier: spec.text.clone(),
                });
            }
            argument
                .parse::<i128>()
                .map_err(|_| TemplateError::NotAnInteger {
                    specifier: spec.text.clone(),
                    argument: argument.to_owned(),
                })?
                .to_string()
        }
        conversion => {
            let truncated: String = match spec.precision {
                Some(limit) => argument.chars().take(limit).collect(),
                None => argument.to_owned(),
            };
            if conversion == 'S' {
                truncated.to_uppercase()
            } else {
                truncated
            }
        }
    };
    Ok(pad(rendered, spec))
}

fn pad(value: String, spec: &Specifier) -> String {
    let Some(width) = spec.width else {
        return value;
    };
    let fill = width.saturating_sub(value.chars().count());
    if fill == 0 {
        return value;
    }
    let padding = " ".repeat(fill);
    if spec.left_align {
        value + &padding
    } else {
        padding + &value
    }
}

/// Indexed substitution: `{N}` and `{N,type[,style]}` with `'` quoting.
///
/// Format types and styles are accepted and the argument renders as its
/// text form. Indices past the end of `args` stay literal.
fn indexed(template: &str, args: &[Cow<'_, str>]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut quoted = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\'' => quoted = !quoted,
            '{' if !quoted => {
                let element = read_element(&mut chars)?;
                out.push_str(&render_element(&element, args)?);
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

fn read_element(chars: &mut Peekable<Chars<'_>>) -> Result<String, TemplateError> {
    let mut element = String::new();
    let mut depth = 0_usize;
    let mut quoted = false;

    for ch in chars.by_ref() {
        match ch {
            '\'' => {
                quoted = !quoted;
                element.push(ch);
            }
            '{' if !quoted => {
                depth += 1;
                element.push(ch);
            }
            '}' if !quoted && depth == 0 => return Ok(element),
            '}' if !quoted => {
                depth -= 1;
                element.push(ch);
            }
            _ => element.push(ch),
        }
    }

    Err(TemplateError::UnmatchedBraces)
}

fn render_element(element: &str, args: &[Cow<'_, str>]) -> Result<String, TemplateError> {
    let raw_index = element
        .split_once(',')
        .map_or(element, |(index, _format)| index);
    let index: usize = raw_index
        .parse()
        .map_err(|_| TemplateError::InvalidArgumentIndex {
            raw: raw_index.to_owned(),
        })?;
    Ok(args
        .get(index)
        .map_or_else(|| format!("{{{index}}}"), |argument| argument.to_string()))
}

#[cfg(test)]
mod tests {
    //! Unit coverage for the two substitution dialects.

    use super::*;
    use rstest::rstest;

    fn args(values: &[&'static str]) -> Vec<Cow<'static, str>> {
        values.iter().map(|value| Cow::Borrowed(*value)).collect()
    }

    #[rstest]
    #[case("failed for %s", &["x"], "failed for x")]
    #[case("%s and %s", &["a", "b"], "a and b")]
    #[case("%2$s before %1$s", &["a", "b"], "b before a")]
    #[case("%1$s %s %s", &["a", "b"], "a a b")]
    #[case("%S!", &["loud"], "LOUD!")]
    #[case("[%5s]", &["ab"], "[   ab]")]
    #[case("[%-5s]", &["ab"], "[ab   ]")]
    #[case("[%.2s]", &["abcdef"], "[ab]")]
    #[case("%d items", &["42"], "42 items")]
    #[case("100%% of %s", &["x"], "100% of x")]
    #[case("line%nbreak", &["unused"], "line\nbreak")]
    #[case("extra args ignored: %s", &["a", "b"], "extra args ignored: a")]
    fn printf_substitutes(
        #[case] format: &str,
        #[case] values: &[&'static str],
        #[case] expected: &str,
    ) {
        assert_eq!(printf(format, &args(values)).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case("%s and %s", &["only"])]
    #[case("%d", &["not a number"])]
    #[case("%x", &["1"])]
    #[case("%+d", &["1"])]
    #[case("%-s", &["a"])]
    #[case("%0$s", &["a"])]
    #[case("trailing %", &["a"])]
    #[case("%3$s", &["a"])]
    fn printf_rejects(#[case] format: &str, #[case] values: &[&'static str]) {
        assert!(printf(format, &args(values)).is_err(), "{format} should fail");
    }

    #[rstest]
    #[case("failed: {0}", &["x"], "failed: x")]
    #[case("{1} then {0}", &["a", "b"], "b then a")]
    #[case("{0} and {1}", &["a"], "a and {1}")]
    #[case("{0,number,integer} items", &["7"], "7 items")]
    #[case("it''s {0}", &["here"], "it's here")]
    #[case("'{0}' is {0}", &["x"], "{0} is x")]
    #[case("a } stays", &["x"], "a } stays")]
    fn indexed_substitutes(
        #[case] template: &str,
        #[case] values: &[&'static str],
        #[case] expected: &str,
    ) {
        assert_eq!(indexed(template, &args(values)).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case("failed {}", TemplateError::InvalidArgumentIndex { raw: String::new() })]
    #[case("failed {x}", TemplateError::InvalidArgumentIndex { raw: "x".to_owned() })]
    #[case("failed {0", TemplateError::UnmatchedBraces)]
    fn indexed_rejects(#[case] template: &str, #[case] expected: TemplateError) {
        assert_eq!(indexed(template, &args(&["a"])), Err(expected));
    }

    #[rstest]
    fn no_params_only_rewrites_placeholders() {
        assert_eq!(format_message("failed for {}", &[]), "failed for %s");
    }

    #[rstest]
    fn unchanged_printf_output_falls_back_to_indexed() {
        let params = [Param::from("x")];
        assert_eq!(format_message("failed for {0}", &params), "failed for x");
    }

    #[rstest]
    fn both_failures_degrade_to_literal_template() {
        let params = [Param::from("x")];
        assert_eq!(format_message("{} and {}", &params), "{} and {}");
    }
}
