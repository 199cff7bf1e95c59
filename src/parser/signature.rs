//! Declaration classification and method signature parsing.
//!
//! Deliberately shallow: a selection is a class when its header mentions
//! the `class` keyword, a method when its header reads
//! `<modifiers> <type> <name>(<params>)`, and nothing otherwise.

use crate::error::Result;
use crate::model::*;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Keywords removed from a signature before the return type is read.
pub const DECLARATION_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "global",
    "override",
    "testmethod",
    "static",
    "virtual",
    "abstract",
    "final",
    "transient",
    "webservice",
];

/// `@name` with an optional parenthesised argument list.
const ANNOTATION: &str = r"@\w+(?:\s*\([^)]*\))?";

/// Words that can precede `(` in a block header without it being a method.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "when", "catch", "try", "finally", "return",
    "new", "throw",
];

static RE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)class(?:\s|$)").unwrap());

static RE_SIGNATURE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?:(?P<ret>.*\S)\s+)?(?P<name>[A-Za-z_]\w*)\s*\($").unwrap()
});

static RE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^[A-Za-z_][\w.]*(?:\s*<.*>)?(?:\s*\[\s*\])*$").unwrap()
});

static RE_IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").unwrap());

static DEFAULT_MODIFIERS: LazyLock<ModifierSet> = LazyLock::new(|| {
    ModifierSet::compile(DECLARATION_MODIFIERS.iter().copied()).unwrap()
});

/// Modifier keywords and annotations compiled into a single matcher.
#[derive(Debug, Clone)]
pub struct ModifierSet {
    matcher: Regex,
}

impl Default for ModifierSet {
    fn default() -> Self {
        DEFAULT_MODIFIERS.clone()
    }
}

impl ModifierSet {
    /// The built-in set plus `extra` keywords.
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Result<Self> {
        Self::compile(
            DECLARATION_MODIFIERS
                .iter()
                .copied()
                .chain(extra.iter().map(|k| k.as_ref())),
        )
    }

    fn compile<'a>(keywords: impl Iterator<Item = &'a str>) -> Result<Self> {
        let alternatives: Vec<String> = keywords
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| {
                let escaped = regex::escape(k);
                if k.ends_with(|c: char| c.is_alphanumeric() || c == '_') {
                    format!(r"{escaped}\b")
                } else {
                    escaped
                }
            })
            .collect();
        // `lead` stands in for a look-behind: a keyword only counts when it
        // is not glued to an identifier or a qualified name.
        let pattern = format!(
            r"(?i)(?P<lead>^|[^\w.@])(?:{})|{ANNOTATION}",
            alternatives.join("|")
        );
        Ok(Self {
            matcher: Regex::new(&pattern)?,
        })
    }

    /// Replace every modifier and annotation with a space.
    pub fn strip(&self, signature: &str) -> String {
        self.matcher
            .replace_all(signature, |caps: &Captures| {
                let lead = caps.name("lead").map_or("", |m| m.as_str());
                format!("{lead} ")
            })
            .into_owned()
    }
}

/// Classifies selections and parses method signatures.
#[derive(Debug, Clone, Default)]
pub struct SignatureParser {
    modifiers: ModifierSet,
}

impl SignatureParser {
    pub fn new(modifiers: ModifierSet) -> Self {
        Self { modifiers }
    }

    /// Decide what `text` declares. Class detection wins over method
    /// detection; only the header (text before the first `{`) is consulted.
    pub fn classify(&self, text: &str) -> Declaration {
        let text = skip_line_comments(text).trim();
        let header = text.find('{').map_or(text, |brace| &text[..brace]);

        if RE_CLASS.is_match(header) {
            return Declaration::Class;
        }
        if !text.contains('{') || !header.contains('(') {
            return Declaration::Unrecognized;
        }
        match self.parse_signature(header) {
            Some(sig) => Declaration::Method(sig),
            None => Declaration::Unrecognized,
        }
    }

    /// Parse a method header without its body.
    pub fn parse_signature(&self, signature: &str) -> Option<MethodSignature> {
        let stripped = self.modifiers.strip(signature);
        let stripped = stripped.trim();
        let paren = stripped.find('(')?;

        let caps = RE_SIGNATURE_HEAD.captures(&stripped[..=paren])?;
        let name = caps["name"].to_string();
        if is_control_keyword(&name) {
            return None;
        }
        let return_type = match caps.name("ret") {
            Some(ret) => normalize_whitespace(ret.as_str()),
            None => name.clone(),
        };
        let leading_word = return_type.split(|c: char| !c.is_alphanumeric() && c != '_').next();
        if !RE_TYPE.is_match(&return_type) || leading_word.is_some_and(is_control_keyword) {
            return None;
        }

        let mut parameters = Parameters::default();
        for piece in split_parameters(parameter_list(&stripped[paren + 1..])) {
            match parse_parameter(piece) {
                Some(param) => parameters.insert(param),
                None if piece.trim().is_empty() => {}
                None => tracing::debug!(parameter = piece.trim(), "skipping malformed parameter"),
            }
        }

        Some(MethodSignature {
            name,
            return_type,
            parameters,
        })
    }
}

/// Classify with the built-in modifier set.
pub fn classify(text: &str) -> Declaration {
    SignatureParser::default().classify(text)
}

/// Parse a method header with the built-in modifier set.
pub fn parse_signature(signature: &str) -> Option<MethodSignature> {
    SignatureParser::default().parse_signature(signature)
}

fn is_control_keyword(word: &str) -> bool {
    CONTROL_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(word))
}

/// Text up to the `)` matching an already consumed `(`; the whole of `rest`
/// when the list is never closed.
fn parameter_list(rest: &str) -> &str {
    let mut depth = 1usize;
    for (i, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..i];
                }
            }
            _ => {}
        }
    }
    rest
}

/// Split a parameter list on commas that are not nested in `()`, `<>` or `[]`.
pub fn split_parameters(list: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in list.char_indices() {
        match ch {
            '(' | '<' | '[' => depth += 1,
            ')' | '>' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&list[start..]);
    pieces
}

/// `Type name` split at the last whitespace run. `None` when either half is
/// missing or the name is not an identifier.
pub fn parse_parameter(piece: &str) -> Option<Parameter> {
    let piece = piece.trim();
    let split = piece.rfind(char::is_whitespace)?;
    let ty = normalize_whitespace(&piece[..split]);
    let name = piece[split..].trim();
    if ty.is_empty() || !RE_IDENT.is_match(name) {
        return None;
    }
    Some(Parameter::new(name, ty))
}

/// `text` from its first line that is neither blank nor a `//` comment.
pub fn skip_line_comments(text: &str) -> &str {
    let mut rest = text.trim_start();
    while rest.starts_with("//") {
        rest = match rest.find('\n') {
            Some(newline) => rest[newline + 1..].trim_start(),
            None => "",
        };
    }
    rest
}

/// Modifier keywords and annotations removed, using the built-in set.
pub fn strip_modifiers(signature: &str) -> String {
    DEFAULT_MODIFIERS.strip(signature)
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
