//! Data model for parsed declarations and documentation comments.

/// A method parameter as written in the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Parameters in declaration order, unique by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    /// Add `param`. A repeated name keeps its first position and takes the
    /// new type.
    pub fn insert(&mut self, param: Parameter) {
        match self.0.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => existing.ty = param.ty,
            None => self.0.push(param),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.ty.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut params = Parameters::default();
        for p in iter {
            params.insert(p);
        }
        params
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parsed method header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    /// Best effort: whatever precedes the method name once modifiers and
    /// annotations are gone. Constructors report their own name.
    pub return_type: String,
    pub parameters: Parameters,
}

/// What a selection was recognised as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Unrecognized,
    Class,
    Method(MethodSignature),
}

/// A documentation block found next to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExistingComment {
    /// Text after `@description`, empty when the tag is absent.
    pub description: String,
    /// Text after `@Date`, empty when the tag is absent.
    pub date: String,
    /// Byte span of the block in the document, widened to whole lines when
    /// nothing else shares them.
    pub start: usize,
    pub end: usize,
}

/// Comment content ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    pub indent: String,
    /// `None` renders the description placeholder.
    pub description: Option<String>,
    /// Present for methods only.
    pub method: Option<MethodTags>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTags {
    pub parameters: Parameters,
    pub date: String,
    pub return_type: String,
}

/// Output lines of a documentation block, without line terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedComment {
    lines: Vec<String>,
}

impl RenderedComment {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every line followed by `eol`.
    pub fn to_text(&self, eol: &str) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push_str(eol);
        }
        out
    }
}
