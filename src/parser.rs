//! Expression Parser (Component E): a hand-written recursive-descent parser
//! that reduces a UCUM unit-expression string directly to a `unit::Unit`.
//!
//! There is no intermediate AST or separate evaluator pass: every production
//! below returns an already-reduced `Unit`, built left-to-right through
//! `unit::Unit`'s algebra as atoms are recognized, so there is no tree to
//! walk afterward. Tokenizing is manual byte-cursor scanning over the input,
//! with dedicated handling for annotations, prefixes, and exponents.

use crate::dimension::Dimension;
use crate::error::{ErrorKind, Span, UcumError};
use crate::registry::{self, Prefix, UnitRecord};
use crate::suggestions::SuggestionEngine;
use crate::unit::Unit;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

/// Matches the engine's own input-size bound so callers get a consistent
/// `InputTooLong` regardless of which entry point they use.
pub const MAX_INPUT_LEN: usize = 64 * 1024;

static SIBLING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)(\()").expect("static regex"));

static SUGGESTIONS: Lazy<SuggestionEngine> = Lazy::new(SuggestionEngine::new);

/// The result of successfully parsing an expression: the reduced unit plus
/// any non-fatal advisories collected along the way (sibling-number repair,
/// case-insensitive fallback, bracket/annotation advisories).
pub struct ParseOutcome {
    pub unit: Unit,
    pub warnings: Vec<String>,
}

/// Caller-tunable parsing behavior. `allow_ci_fallback` gates atom-resolution
/// step 5(iii): a case-insensitive retry after the exact case-sensitive
/// lookups (plain and prefixed) have both failed. Off by default — a caller
/// must opt in, since silently accepting `MOL` for `mol` also means silently
/// accepting any other case variant that happens to collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub allow_ci_fallback: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { allow_ci_fallback: false }
    }
}

/// Parse `input` into a `Unit` with the case-insensitive fallback disabled.
/// Equivalent to `parse_with_options(input, ParseOptions::default())`.
pub fn parse(input: &str) -> Result<ParseOutcome, UcumError> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse `input` into a `Unit`. Phases, per the design:
/// 1. length/emptiness guard, 2. bracket/paren balance check over the raw
/// string, 3. sibling-number repair, 4-6. tokenize and reduce left to right.
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<ParseOutcome, UcumError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UcumError::empty_input());
    }
    if trimmed.len() > MAX_INPUT_LEN {
        return Err(UcumError::input_too_long(trimmed.len(), MAX_INPUT_LEN));
    }
    check_balance(trimmed)?;
    let (repaired, mut warnings) = repair_siblings(trimmed);

    let mut cursor = Cursor::new(&repaired, options.allow_ci_fallback);
    let unit = cursor
        .parse_expression()
        .map_err(|e| e.with_warnings(warnings.clone()))?;
    if cursor.pos < cursor.bytes.len() {
        return Err(UcumError::invalid_expression(format!(
            "unexpected trailing input at position {}",
            cursor.pos
        ))
        .with_warnings(warnings.clone()));
    }
    warnings.extend(cursor.warnings);
    Ok(ParseOutcome { unit, warnings })
}

/// Phase 2: verify every `(`/`)` and `[`/`]` is matched, ignoring content
/// inside `{...}` annotations (which may contain free text).
fn check_balance(input: &str) -> Result<(), UcumError> {
    let mut parens: Vec<usize> = Vec::new();
    let mut brackets: Vec<usize> = Vec::new();
    let mut in_annotation = false;
    for (i, ch) in input.char_indices() {
        if in_annotation {
            if ch == '}' {
                in_annotation = false;
            }
            continue;
        }
        match ch {
            '{' => in_annotation = true,
            '(' => parens.push(i),
            ')' => {
                if parens.pop().is_none() {
                    return Err(UcumError::new(ErrorKind::UnbalancedParentheses {
                        span: Span::point(i),
                    }));
                }
            }
            '[' => brackets.push(i),
            ']' => {
                if brackets.pop().is_none() {
                    return Err(UcumError::new(ErrorKind::UnbalancedBrackets {
                        span: Span::point(i),
                    }));
                }
            }
            _ => {}
        }
    }
    if let Some(&pos) = parens.last() {
        return Err(UcumError::new(ErrorKind::UnbalancedParentheses {
            span: Span::point(pos),
        }));
    }
    if let Some(&pos) = brackets.last() {
        return Err(UcumError::new(ErrorKind::UnbalancedBrackets {
            span: Span::point(pos),
        }));
    }
    Ok(())
}

/// Phase 3: rewrite `<number>(` to `<number>.(`, recording one warning per
/// repair. Input like `78.4(mmol/L)/s` is missing the explicit `.` UCUM
/// requires between a numeric literal and a parenthesized sub-expression.
fn repair_siblings(input: &str) -> (String, Vec<String>) {
    let mut warnings = Vec::new();
    let repaired = SIBLING_NUMBER.replace_all(input, |caps: &regex::Captures| {
        let num = &caps[1];
        warnings.push(format!(
            "Rewriting '{num}(' to '{num}.(': a number directly followed by a \
             parenthesized sub-expression needs an explicit '.' operator."
        ));
        format!("{num}.(")
    });
    (repaired.into_owned(), warnings)
}

/// A byte-cursor over the (already balance-checked, sibling-repaired)
/// expression string. Lexing and parsing are combined: each `parse_*` method
/// both recognizes its own tokens and immediately folds them into a `Unit`.
struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    warnings: Vec<String>,
    allow_ci_fallback: bool,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str, allow_ci_fallback: bool) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            warnings: Vec::new(),
            allow_ci_fallback,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    /// `Expression := ['/'] Term (('.' | '/') Term)*`
    fn parse_expression(&mut self) -> Result<Unit, UcumError> {
        if self.peek() == Some(b'/') {
            self.pos += 1;
            let denom = self.parse_term()?;
            let acc = Unit::numeric(1.0, "1").divide(&denom)?;
            return self.parse_continuation(acc);
        }
        let first = self.parse_term()?;
        self.parse_continuation(first)
    }

    /// `('.' | '/') Term` repeated. A run of consecutive `.`-joined terms is
    /// batched into a small stack-allocated buffer and folded in one call to
    /// `Unit::multiply_these`, rather than multiplying one term at a time.
    fn parse_continuation(&mut self, mut acc: Unit) -> Result<Unit, UcumError> {
        loop {
            match self.peek() {
                Some(b'.') => {
                    let mut run: SmallVec<[Unit; 4]> = SmallVec::new();
                    run.push(acc);
                    while self.peek() == Some(b'.') {
                        self.pos += 1;
                        run.push(self.parse_term()?);
                    }
                    acc = Unit::multiply_these(&run)?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    let rhs = self.parse_term()?;
                    acc = acc.divide(&rhs)?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    /// `Term := Component [Exponent] Annotation*`
    fn parse_term(&mut self) -> Result<Unit, UcumError> {
        let mut component = self.parse_component()?;
        if let Some(exponent) = self.parse_exponent()? {
            component = component.power(exponent)?;
        }
        while self.peek() == Some(b'{') {
            let text = self.consume_annotation()?;
            self.check_bracket_advisory(&text);
        }
        Ok(component)
    }

    /// `Component := '(' Expression ')' | Annotation | Number | Symbol`
    fn parse_component(&mut self) -> Result<Unit, UcumError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let inner = self.parse_expression()?;
                if self.peek() != Some(b')') {
                    return Err(UcumError::new(ErrorKind::UnbalancedParentheses {
                        span: Span::point(self.pos),
                    }));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(b'{') => {
                let text = self.consume_annotation()?;
                self.check_bracket_advisory(&text);
                Ok(Unit::numeric(1.0, format!("{{{text}}}")))
            }
            Some(c) if c.is_ascii_digit() => {
                let n = self.read_number()?;
                Ok(Unit::numeric(n, format!("{n}")))
            }
            Some(_) => {
                let symbol = self.read_symbol()?;
                self.resolve_atom(&symbol)
            }
            None => Err(UcumError::invalid_expression("unexpected end of expression")),
        }
    }

    fn read_number(&mut self) -> Result<f64, UcumError> {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.pos += 1;
            } else if c == b'.'
                && !seen_dot
                && self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit)
            {
                seen_dot = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        self.input[start..self.pos]
            .parse::<f64>()
            .map_err(|_| UcumError::invalid_expression("malformed numeric literal"))
    }

    /// A bracketed atom (`[car_m]`) is read whole; otherwise a run of
    /// letters/apostrophe/underscore/percent/non-ASCII (covers `µ`-style
    /// prefixes — the registry carries ASCII codes only, so a bare unicode
    /// symbol simply fails atom resolution with a clear message).
    fn read_symbol(&mut self) -> Result<String, UcumError> {
        let start = self.pos;
        if self.peek() == Some(b'[') {
            self.pos += 1;
            while let Some(c) = self.peek() {
                self.pos += 1;
                if c == b']' {
                    break;
                }
            }
            return Ok(self.input[start..self.pos].to_string());
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() || matches!(c, '\'' | '_' | '%') || !c.is_ascii() {
                self.advance_char();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(UcumError::invalid_expression(format!(
                "unexpected character at position {start}"
            )));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// `Exponent := '^'? ['+' | '-'] Digit+`, implicit (no separator) or
    /// explicit via `^`. A trailing `.` after the digits means a
    /// non-integer exponent, which this algebra rejects outright.
    fn parse_exponent(&mut self) -> Result<Option<i32>, UcumError> {
        if self.peek() == Some(b'^') {
            self.pos += 1;
            return self.read_signed_int().map(Some);
        }
        match self.peek_char() {
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => {
                Ok(Some(self.read_signed_int()?))
            }
            _ => Ok(None),
        }
    }

    fn read_signed_int(&mut self) -> Result<i32, UcumError> {
        let start = self.pos;
        if matches!(self.peek_char(), Some('-') | Some('+')) {
            self.advance_char();
        }
        let digits_start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
        }
        if self.pos == digits_start {
            return Err(UcumError::invalid_expression("expected an integer exponent"));
        }
        if self.peek_char() == Some('.') {
            let value_start = start;
            while self
                .peek_char()
                .is_some_and(|c| c.is_ascii_digit() || c == '.')
            {
                self.advance_char();
            }
            let raw = &self.input[value_start..self.pos];
            let value = raw.parse::<f64>().unwrap_or(f64::NAN);
            return Err(UcumError::new(ErrorKind::NonIntegerExponent { value }));
        }
        self.input[start..self.pos]
            .parse::<i32>()
            .map_err(|_| UcumError::invalid_expression("exponent out of range"))
    }

    /// Consume a `{...}` annotation and return its inner text, unescaped.
    fn consume_annotation(&mut self) -> Result<String, UcumError> {
        let start = self.pos + 1;
        let end = memchr::memchr(b'}', &self.bytes[start..])
            .map(|i| start + i)
            .ok_or_else(|| {
                UcumError::new(ErrorKind::UnbalancedBrackets {
                    span: Span::point(self.pos),
                })
            })?;
        let text = self.input[start..end].to_string();
        self.pos = end + 1;
        Ok(text)
    }

    /// Advisory for a standalone annotation whose content happens to name a
    /// real atom, bracketed or not (e.g. `{degF}` when `[degF]` exists, or
    /// `{g}` when `g` exists) — still a valid dimensionless-1 expression,
    /// just probably not what was meant.
    fn check_bracket_advisory(&mut self, text: &str) {
        let found =
            registry::atom_by_cs(text).or_else(|| registry::atom_by_cs(&format!("[{text}]")));
        if let Some(atom) = found {
            self.warnings.push(format!(
                "{{{text}}} is a valid unit expression, but did you mean {} ({})?",
                atom.cs_code, atom.name
            ));
        }
    }

    fn resolve_atom(&mut self, raw: &str) -> Result<Unit, UcumError> {
        if let Some(atom) = registry::atom_by_cs(raw) {
            return Ok(atom_to_unit(atom, raw));
        }
        if let Some((prefix, atom)) = split_prefixed(raw, registry::atom_by_cs) {
            return Ok(build_prefixed_unit(prefix, atom, raw));
        }
        if self.allow_ci_fallback {
            if let Some(atom) = registry::atom_by_ci(raw) {
                self.warnings
                    .push(format!("'{raw}' matched '{}' case-insensitively.", atom.cs_code));
                return Ok(atom_to_unit(atom, raw));
            }
            if let Some((prefix, atom)) = split_prefixed(raw, registry::atom_by_ci) {
                self.warnings
                    .push(format!("'{raw}' matched a prefixed atom case-insensitively."));
                return Ok(build_prefixed_unit(prefix, atom, raw));
            }
        }
        if is_double_prefixed(raw) {
            return Err(UcumError::double_prefix(raw));
        }
        let suggestions = SUGGESTIONS
            .suggest(raw, 3)
            .into_iter()
            .map(|u| u.cs_code.to_string())
            .collect();
        Err(UcumError::unknown_atom(raw).with_suggestions(suggestions))
    }
}

fn atom_to_unit(atom: &'static UnitRecord, code: &str) -> Unit {
    if atom.is_arbitrary {
        Unit::arbitrary(atom.dimension, code)
    } else if let Some(name) = atom.special {
        Unit::special(name, atom.dimension, code)
    } else {
        Unit::ratio(atom.factor.unwrap_or(1.0), atom.dimension, code)
    }
}

fn build_prefixed_unit(prefix: &'static Prefix, atom: &'static UnitRecord, code: &str) -> Unit {
    let magnitude = atom.factor.unwrap_or(1.0) * prefix.factor();
    Unit::ratio(magnitude, atom.dimension, code)
}

/// One level of prefix + metric-atom decomposition, longest prefix first.
fn split_prefixed(
    s: &str,
    lookup: fn(&str) -> Option<&'static UnitRecord>,
) -> Option<(&'static Prefix, &'static UnitRecord)> {
    for prefix in registry::prefixes_longest_first() {
        if s.len() <= prefix.cs_code.len() || !s.starts_with(prefix.cs_code) {
            continue;
        }
        let rest = &s[prefix.cs_code.len()..];
        if let Some(atom) = lookup(rest) {
            if atom.is_metric {
                return Some((prefix, atom));
            }
        }
    }
    None
}

/// Detects the `mcg`-style mistake: two stacked prefixes in front of a real
/// metric atom (`m` + `c` + `g`), which UCUM forbids even though each half
/// looks individually plausible.
fn is_double_prefixed(s: &str) -> bool {
    for p1 in registry::prefixes_longest_first() {
        let Some(rest1) = s.strip_prefix(p1.cs_code) else {
            continue;
        };
        if rest1.is_empty() {
            continue;
        }
        for p2 in registry::prefixes_longest_first() {
            let Some(rest2) = rest1.strip_prefix(p2.cs_code) else {
                continue;
            };
            if rest2.is_empty() {
                continue;
            }
            if let Some(atom) = registry::atom_by_cs(rest2) {
                if atom.is_metric {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Unit {
        parse(input).unwrap_or_else(|e| panic!("expected {input} to parse, got {e}")).unit
    }

    #[test]
    fn simple_atom_resolves() {
        let m = parse_ok("m");
        assert_eq!(m.dimension, Dimension([0, 1, 0, 0, 0, 0, 0]));
        assert!((m.magnitude - 1.0).abs() < 1e-12);
    }

    #[test]
    fn product_and_quotient() {
        let u = parse_ok("kg.m/s2");
        assert_eq!(u.dimension, Dimension([1, 1, -2, 0, 0, 0, 0]));
        assert!((u.magnitude - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn parenthesized_group_with_exponent() {
        let u = parse_ok("(kg.m)2");
        assert_eq!(u.dimension, Dimension([2, 2, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn leading_slash_inverts() {
        let u = parse_ok("/min");
        assert_eq!(u.dimension, Dimension([0, 0, -1, 0, 0, 0, 0]));
        assert!((u.magnitude - (1.0 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn annotation_is_dimensionless_one() {
        let u = parse_ok("{cells}/uL");
        assert_eq!(u.dimension, Dimension([0, -3, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn bracket_advisory_on_standalone_annotation() {
        let outcome = parse("{g}").unwrap();
        assert!(!outcome.warnings.is_empty());
        assert!(outcome.warnings[0].contains("did you mean"));
    }

    #[test]
    fn double_prefix_is_rejected() {
        let err = parse("mcg").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DoublePrefix { .. }));
    }

    #[test]
    fn unknown_atom_carries_suggestions() {
        let err = parse("meterz").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownAtom { .. }));
    }

    #[test]
    fn unbalanced_parentheses_reported_with_span() {
        let err = parse("(kg.m/s2").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnbalancedParentheses { .. }));
    }

    #[test]
    fn non_integer_exponent_rejected() {
        let err = parse("m^2.5").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NonIntegerExponent { .. }));
    }

    #[test]
    fn sibling_number_repair_emits_warning() {
        let outcome = parse("78.4(mmol/L)/s").unwrap();
        assert!(outcome.warnings.iter().any(|w| w.contains("Rewriting")));
        assert_eq!(outcome.unit.dimension, Dimension([0, -3, -1, 0, 0, 0, 0]));
    }

    #[test]
    fn deeply_nested_parens_reduce_to_identity() {
        let u = parse_ok("((((m))))");
        assert_eq!(u.dimension, Dimension([0, 1, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn case_insensitive_fallback_is_off_by_default() {
        let err = parse("MOL").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownAtom { .. }));
    }

    #[test]
    fn case_insensitive_fallback_matches_and_warns_when_opted_in() {
        let outcome = parse_with_options("MOL", ParseOptions { allow_ci_fallback: true }).unwrap();
        assert!(!outcome.warnings.is_empty());
        assert_eq!(outcome.unit.dimension, Dimension::zero());
    }
}
