//! Content stream tokenizer with byte-span tracking.
//!
//! Scans decoded content stream bytes into a flat sequence of
//! [`LexicalUnit`]s, each carrying the half-open byte range it occupies.
//! On top of the units, [`scan`] groups operators with their operands,
//! recognises text-showing invocations (`Tj`, `TJ`, `'`, `"`) and pairs
//! `BT`/`ET` into text objects. Spans are what the rewriter deletes; the
//! scanner itself never copies or alters the buffer.

use std::ops::Range;

use crate::error::TokenizeError;

/// A lexical unit of a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum LexicalUnit {
    /// Literal string `(...)`, stored as decoded content bytes.
    LiteralString {
        /// Content bytes after escape processing.
        bytes: Vec<u8>,
        /// Source span including the parentheses.
        span: Range<usize>,
    },
    /// Hexadecimal string `<...>`, stored as its hex digits.
    HexString {
        /// Hex digits with whitespace removed.
        digits: Vec<u8>,
        /// Source span including the angle brackets.
        span: Range<usize>,
    },
    /// Array `[...]`.
    Array {
        /// Elements in order.
        elements: Vec<LexicalUnit>,
        /// Source span including the brackets.
        span: Range<usize>,
    },
    /// Name object (e.g. `/F1`). Stored without the leading `/`.
    Name {
        /// Name with `#XX` escapes resolved.
        name: String,
        /// Source span including the slash.
        span: Range<usize>,
    },
    /// Bare operator keyword. An inline image is a single `BI` keyword whose
    /// span runs through the closing `EI`.
    Keyword {
        /// Keyword text.
        name: String,
        /// Source span.
        span: Range<usize>,
    },
    /// Numbers, booleans, `null`, dictionaries and braces. Kept only for
    /// their span.
    Opaque {
        /// Source span.
        span: Range<usize>,
    },
}

impl LexicalUnit {
    /// The source byte range of this unit.
    pub fn span(&self) -> Range<usize> {
        match self {
            LexicalUnit::LiteralString { span, .. }
            | LexicalUnit::HexString { span, .. }
            | LexicalUnit::Array { span, .. }
            | LexicalUnit::Name { span, .. }
            | LexicalUnit::Keyword { span, .. }
            | LexicalUnit::Opaque { span } => span.clone(),
        }
    }

    /// Raw string bytes for literal and hex strings, `None` otherwise.
    pub fn string_bytes(&self) -> Option<Vec<u8>> {
        match self {
            LexicalUnit::LiteralString { bytes, .. } => Some(bytes.clone()),
            LexicalUnit::HexString { digits, .. } => Some(hex_bytes(digits)),
            _ => None,
        }
    }

    /// The keyword text, if this unit is a keyword.
    pub fn keyword(&self) -> Option<&str> {
        match self {
            LexicalUnit::Keyword { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// An operator keyword together with the operands that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operator keyword (e.g. `"Tf"`, `"TJ"`).
    pub operator: String,
    /// Index of the keyword in [`ContentScan::units`].
    pub operator_unit: usize,
    /// Indices of the operand units in [`ContentScan::units`].
    pub operands: Range<usize>,
    /// From the first operand's start to the keyword's end.
    pub span: Range<usize>,
}

/// A text-showing operator (`Tj`, `TJ`, `'`, `"`) with its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextShowingInvocation {
    /// Index in [`ContentScan::operations`].
    pub operation: usize,
    /// `[operand_start, operator_end)`.
    pub span: Range<usize>,
    /// Index of the enclosing text object in [`ContentScan::text_objects`].
    pub text_object: Option<usize>,
}

/// A closed `BT ... ET` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextObject {
    /// From `BT` to the end of `ET`.
    pub span: Range<usize>,
    /// Operations from `BT` through `ET`, as indices into
    /// [`ContentScan::operations`].
    pub operations: Range<usize>,
    /// Indices into [`ContentScan::invocations`], in stream order.
    pub invocations: Vec<usize>,
    /// Whether every operator other than text showing, `BT` and `ET` is a
    /// state-setting operator (see [`is_state_operator`]).
    pub state_only: bool,
}

/// Result of scanning one content stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentScan {
    /// Top-level lexical units in stream order, keywords included.
    pub units: Vec<LexicalUnit>,
    /// Operators with their operands, in stream order.
    pub operations: Vec<Operation>,
    /// Text-showing invocations, in stream order.
    pub invocations: Vec<TextShowingInvocation>,
    /// Closed text objects, in stream order.
    pub text_objects: Vec<TextObject>,
}

impl ContentScan {
    /// The operand units of `operation`.
    pub fn operands(&self, operation: &Operation) -> &[LexicalUnit] {
        &self.units[operation.operands.clone()]
    }

    /// The operand units of a text-showing invocation.
    pub fn invocation_operands(&self, invocation: &TextShowingInvocation) -> &[LexicalUnit] {
        self.operands(&self.operations[invocation.operation])
    }

    /// The operator keyword of a text-showing invocation.
    pub fn invocation_operator(&self, invocation: &TextShowingInvocation) -> &str {
        &self.operations[invocation.operation].operator
    }
}

/// Whether `op` paints text.
pub fn is_text_showing(op: &str) -> bool {
    matches!(op, "Tj" | "TJ" | "'" | "\"")
}

/// Whether `op` only sets text, colour or graphics state.
///
/// Text objects whose other operators are all state-setting vanish when
/// their text is removed.
pub fn is_state_operator(op: &str) -> bool {
    matches!(
        op,
        "Tc" | "Tw"
            | "Tz"
            | "TL"
            | "Tf"
            | "Tr"
            | "Ts"
            | "Td"
            | "TD"
            | "Tm"
            | "T*"
            | "g"
            | "G"
            | "rg"
            | "RG"
            | "k"
            | "K"
            | "cs"
            | "CS"
            | "sc"
            | "SC"
            | "scn"
            | "SCN"
            | "gs"
            | "w"
            | "J"
            | "j"
            | "M"
            | "d"
            | "ri"
            | "i"
            | "q"
            | "Q"
            | "cm"
    )
}

struct OpenTextObject {
    start: usize,
    first_operation: usize,
    invocations: Vec<usize>,
    state_only: bool,
}

/// Scan a decoded content stream.
///
/// # Errors
///
/// Returns a [`TokenizeError`] if a string, array, dictionary or inline
/// image is unterminated, a hex string holds a non-hex byte, or a closing
/// delimiter appears with nothing to close.
pub fn scan(input: &[u8]) -> Result<ContentScan, TokenizeError> {
    let mut result = ContentScan::default();
    let mut operand_start = 0;
    let mut open: Option<OpenTextObject> = None;
    let mut pos = 0;

    loop {
        skip_whitespace_and_comments(input, &mut pos);
        if pos >= input.len() {
            break;
        }

        let unit = parse_object(input, &mut pos)?;
        let index = result.units.len();
        let Some(name) = unit.keyword().map(str::to_string) else {
            result.units.push(unit);
            continue;
        };
        let keyword_span = unit.span();
        result.units.push(unit);

        let operands = operand_start..index;
        let start = result
            .units
            .get(operand_start)
            .filter(|_| !operands.is_empty())
            .map_or(keyword_span.start, |u| u.span().start);
        let op_index = result.operations.len();
        result.operations.push(Operation {
            operator: name.clone(),
            operator_unit: index,
            operands,
            span: start..keyword_span.end,
        });
        operand_start = index + 1;

        match name.as_str() {
            "BT" => {
                if open.is_some() {
                    tracing::debug!(
                        offset = keyword_span.start,
                        "nested BT, dropping open text object"
                    );
                }
                open = Some(OpenTextObject {
                    start: keyword_span.start,
                    first_operation: op_index,
                    invocations: Vec::new(),
                    state_only: true,
                });
            }
            "ET" => {
                if let Some(text) = open.take() {
                    let object_index = result.text_objects.len();
                    for &inv in &text.invocations {
                        result.invocations[inv].text_object = Some(object_index);
                    }
                    result.text_objects.push(TextObject {
                        span: text.start..keyword_span.end,
                        operations: text.first_operation..op_index + 1,
                        invocations: text.invocations,
                        state_only: text.state_only,
                    });
                }
            }
            op if is_text_showing(op) => {
                let inv_index = result.invocations.len();
                result.invocations.push(TextShowingInvocation {
                    operation: op_index,
                    span: start..keyword_span.end,
                    text_object: None,
                });
                if let Some(text) = open.as_mut() {
                    text.invocations.push(inv_index);
                }
            }
            op => {
                if let Some(text) = open.as_mut() {
                    if !is_state_operator(op) {
                        text.state_only = false;
                    }
                }
            }
        }
    }

    Ok(result)
}

/// Decode hex digits into bytes. An odd trailing digit is padded with 0.
pub fn hex_bytes(digits: &[u8]) -> Vec<u8> {
    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0]).unwrap_or(0);
            let lo = pair.get(1).and_then(|&b| hex_value(b)).unwrap_or(0);
            (hi << 4) | lo
        })
        .collect()
}

/// Returns `true` if `b` is a PDF whitespace character.
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

/// Returns `true` if `b` is a PDF delimiter character.
pub(crate) fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Skip whitespace and comments.
fn skip_whitespace_and_comments(input: &[u8], pos: &mut usize) {
    while *pos < input.len() {
        if is_whitespace(input[*pos]) {
            *pos += 1;
        } else if input[*pos] == b'%' {
            while *pos < input.len() && input[*pos] != b'\n' && input[*pos] != b'\r' {
                *pos += 1;
            }
        } else {
            break;
        }
    }
}

/// Parse one object starting at a non-whitespace byte.
fn parse_object(input: &[u8], pos: &mut usize) -> Result<LexicalUnit, TokenizeError> {
    let start = *pos;
    let b = input[start];
    match b {
        b'(' => {
            let bytes = parse_literal_string(input, pos)?;
            Ok(LexicalUnit::LiteralString {
                bytes,
                span: start..*pos,
            })
        }
        b'<' if input.get(start + 1) == Some(&b'<') => {
            parse_dictionary(input, pos)?;
            Ok(LexicalUnit::Opaque { span: start..*pos })
        }
        b'<' => {
            let digits = parse_hex_string(input, pos)?;
            Ok(LexicalUnit::HexString {
                digits,
                span: start..*pos,
            })
        }
        b'[' => {
            let elements = parse_array(input, pos)?;
            Ok(LexicalUnit::Array {
                elements,
                span: start..*pos,
            })
        }
        b'/' => {
            let name = parse_name(input, pos);
            Ok(LexicalUnit::Name {
                name,
                span: start..*pos,
            })
        }
        b'{' | b'}' => {
            *pos += 1;
            Ok(LexicalUnit::Opaque { span: start..*pos })
        }
        b')' | b'>' | b']' => Err(TokenizeError::UnexpectedDelimiter {
            byte: b,
            offset: start,
        }),
        _ => {
            let token = parse_regular(input, pos);
            let opaque = token == b"true"
                || token == b"false"
                || token == b"null"
                || matches!(token[0], b'0'..=b'9' | b'+' | b'-' | b'.');
            if opaque {
                return Ok(LexicalUnit::Opaque { span: start..*pos });
            }
            if token == b"BI" {
                parse_inline_image(input, pos, start)?;
                return Ok(LexicalUnit::Keyword {
                    name: "BI".to_string(),
                    span: start..*pos,
                });
            }
            Ok(LexicalUnit::Keyword {
                name: String::from_utf8_lossy(token).into_owned(),
                span: start..*pos,
            })
        }
    }
}

/// Consume a maximal run of regular (non-whitespace, non-delimiter) bytes.
fn parse_regular<'a>(input: &'a [u8], pos: &mut usize) -> &'a [u8] {
    let start = *pos;
    while *pos < input.len() && !is_whitespace(input[*pos]) && !is_delimiter(input[*pos]) {
        *pos += 1;
    }
    &input[start..*pos]
}

/// Parse a literal string `(...)` with balanced parentheses and escape sequences.
fn parse_literal_string(input: &[u8], pos: &mut usize) -> Result<Vec<u8>, TokenizeError> {
    let offset = *pos;
    *pos += 1; // skip opening '('

    let mut result = Vec::new();
    let mut depth = 1u32;

    while *pos < input.len() {
        let b = input[*pos];
        match b {
            b'(' => {
                depth += 1;
                result.push(b'(');
                *pos += 1;
            }
            b')' => {
                depth -= 1;
                *pos += 1;
                if depth == 0 {
                    return Ok(result);
                }
                result.push(b')');
            }
            b'\\' => {
                *pos += 1;
                let Some(&escaped) = input.get(*pos) else {
                    break;
                };
                match escaped {
                    b'n' => result.push(b'\n'),
                    b'r' => result.push(b'\r'),
                    b't' => result.push(b'\t'),
                    b'b' => result.push(0x08),
                    b'f' => result.push(0x0C),
                    b'\r' => {
                        // Line continuation, CR or CR LF.
                        *pos += 1;
                        if input.get(*pos) == Some(&b'\n') {
                            *pos += 1;
                        }
                        continue;
                    }
                    b'\n' => {
                        *pos += 1;
                        continue;
                    }
                    b'0'..=b'7' => {
                        let mut val = escaped - b'0';
                        for _ in 0..2 {
                            match input.get(*pos + 1) {
                                Some(&d @ b'0'..=b'7') => {
                                    *pos += 1;
                                    val = val.wrapping_mul(8).wrapping_add(d - b'0');
                                }
                                _ => break,
                            }
                        }
                        result.push(val);
                    }
                    // `\(`, `\)`, `\\` and unknown escapes yield the byte itself.
                    other => result.push(other),
                }
                *pos += 1;
            }
            _ => {
                result.push(b);
                *pos += 1;
            }
        }
    }

    Err(TokenizeError::MalformedLiteralString { offset })
}

/// Parse a hex string `<...>`, returning its digits.
fn parse_hex_string(input: &[u8], pos: &mut usize) -> Result<Vec<u8>, TokenizeError> {
    let offset = *pos;
    *pos += 1; // skip '<'

    let mut digits = Vec::new();
    while *pos < input.len() {
        let b = input[*pos];
        *pos += 1;
        if b == b'>' {
            return Ok(digits);
        }
        if is_whitespace(b) {
            continue;
        }
        if hex_value(b).is_none() {
            return Err(TokenizeError::MalformedHexString { offset });
        }
        digits.push(b);
    }

    Err(TokenizeError::MalformedHexString { offset })
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse an array `[...]`.
fn parse_array(input: &[u8], pos: &mut usize) -> Result<Vec<LexicalUnit>, TokenizeError> {
    let offset = *pos;
    *pos += 1; // skip '['

    let mut elements = Vec::new();
    loop {
        skip_whitespace_and_comments(input, pos);
        match input.get(*pos) {
            None => return Err(TokenizeError::UnterminatedArray { offset }),
            Some(b']') => {
                *pos += 1;
                return Ok(elements);
            }
            Some(_) => elements.push(parse_object(input, pos)?),
        }
    }
}

/// Skip over a dictionary `<<...>>`, nested objects included.
fn parse_dictionary(input: &[u8], pos: &mut usize) -> Result<(), TokenizeError> {
    let offset = *pos;
    *pos += 2; // skip '<<'

    loop {
        skip_whitespace_and_comments(input, pos);
        match input.get(*pos) {
            None => return Err(TokenizeError::UnterminatedDictionary { offset }),
            Some(b'>') if input.get(*pos + 1) == Some(&b'>') => {
                *pos += 2;
                return Ok(());
            }
            Some(_) => {
                parse_object(input, pos)?;
            }
        }
    }
}

/// Parse a `/Name` token. Assumes current byte is `/`.
fn parse_name(input: &[u8], pos: &mut usize) -> String {
    *pos += 1; // skip '/'
    let raw = parse_regular(input, pos);

    // Handle #XX hex escapes in names
    let mut name = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'#' && i + 2 < raw.len() {
            if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                name.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        name.push(raw[i]);
        i += 1;
    }

    String::from_utf8_lossy(&name).into_owned()
}

/// Skip an inline image body after its `BI` keyword, through `EI`.
fn parse_inline_image(input: &[u8], pos: &mut usize, offset: usize) -> Result<(), TokenizeError> {
    let unterminated = TokenizeError::UnterminatedInlineImage { offset };

    // Dictionary entries until ID
    loop {
        skip_whitespace_and_comments(input, pos);
        if *pos >= input.len() {
            return Err(unterminated);
        }
        let at = *pos;
        if !is_delimiter(input[at]) && parse_regular(input, pos) == b"ID" {
            break;
        }
        *pos = at;
        parse_object(input, pos)?;
    }

    // Single whitespace byte after ID
    if *pos < input.len() && is_whitespace(input[*pos]) {
        *pos += 1;
    }

    // Image data until EI preceded by whitespace
    let data_start = *pos;
    while *pos + 2 <= input.len() {
        if (*pos == data_start || is_whitespace(input[*pos - 1]))
            && input[*pos] == b'E'
            && input[*pos + 1] == b'I'
            && (*pos + 2 == input.len()
                || is_whitespace(input[*pos + 2])
                || is_delimiter(input[*pos + 2]))
        {
            *pos += 2;
            return Ok(());
        }
        *pos += 1;
    }

    Err(unterminated)
}
