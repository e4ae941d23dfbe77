//! Static metadata extraction from agent source text.
//!
//! Pure pattern matching over the file contents; the source is never
//! executed. Anything that does not match is simply left out of the
//! [`MetadataFragment`], and callers fill the gaps with defaults.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::component::CapabilityDescriptor;

/// Source dialects the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Python sources, run through the external interpreter.
    Python,
    /// TypeScript / JavaScript sources, declared to the host.
    Script,
}

impl Dialect {
    /// Dialect implied by a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("py") => Some(Self::Python),
            Some("ts" | "js" | "mjs") => Some(Self::Script),
            _ => None,
        }
    }
}

/// Feature switches found as literal assignments. `None` means undeclared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclaredFeatures {
    /// `audio_enabled`
    pub audio: Option<bool>,
    /// `marketplace_enabled`
    pub marketplace: Option<bool>,
    /// `iot_enabled`
    pub iot: Option<bool>,
    /// `automotive_enabled`
    pub automotive: Option<bool>,
}

/// Best-effort metadata pulled from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFragment {
    /// Friendly display name derived from the component type.
    pub name: Option<String>,
    /// The matched component type name, suffix included.
    pub type_name: Option<String>,
    /// First doc block.
    pub description: Option<String>,
    /// First literal `version` assignment.
    pub version: Option<String>,
    /// First literal `author` assignment.
    pub author: Option<String>,
    /// Literal feature assignments.
    pub features: DeclaredFeatures,
    /// Documented public operations.
    pub capabilities: Vec<CapabilityDescriptor>,
}

impl MetadataFragment {
    /// Whether nothing at all was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Operation names that are lifecycle plumbing rather than capabilities.
const EXCLUDED_OPERATIONS: &[&str] = &[
    "constructor",
    "process",
    "initialize",
    "setup",
    "teardown",
    "cleanup",
    "shutdown",
    "execute",
    "get_input_schema",
    "get_output_schema",
    "get_metadata",
    "getInputSchema",
    "getOutputSchema",
];

/// Friendly title that replaces the stripped type suffix.
const TITLE_SUFFIX: &str = "Expert";

static PY_DOCSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)("""|''')(.*?)("""|''')"#).expect("invalid regex"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\*?(.*?)\*/").expect("invalid regex"));

static PY_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*class[ \t]+([A-Za-z_][A-Za-z0-9_]*)").expect("invalid regex")
});

static SCRIPT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:abstract[ \t]+)?class[ \t]+([A-Za-z_$][A-Za-z0-9_$]*)")
        .expect("invalid regex")
});

static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:__)?version(?:__)?[ \t]*[:=][ \t]*["']([^"'\n]+)["']"#)
        .expect("invalid regex")
});

static AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:__)?author(?:__)?[ \t]*[:=][ \t]*["']([^"'\n]+)["']"#)
        .expect("invalid regex")
});

static FEATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(audio|marketplace|iot|automotive)_?enabled[ \t]*[:=][ \t]*(true|false)\b")
        .expect("invalid regex")
});

static PY_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]+(?:async[ \t]+)?def[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(")
        .expect("invalid regex")
});

/// Return annotation, colon, then a docstring on the next line.
static PY_DOC_AFTER_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\A[^:\n]*:[ \t]*(?:#[^\n]*)?\n[ \t]*(?:"""|''')((?s:.*?))(?:"""|''')"#)
        .expect("invalid regex")
});

static SCRIPT_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"/\*\*((?:[^*]|\*+[^*/])*)\*+/\s*((?:(?:public|private|protected|static|async|override|readonly|get|set)\s+)*)(#?[A-Za-z_$][A-Za-z0-9_$]*)\s*\(",
    )
    .expect("invalid regex")
});

/// Extracts metadata fragments from source text.
#[derive(Debug, Clone)]
pub struct Extractor {
    type_suffix: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new("Agent")
    }
}

impl Extractor {
    /// Extractor recognising component types whose name ends in `type_suffix`.
    #[must_use]
    pub fn new(type_suffix: impl Into<String>) -> Self {
        Self {
            type_suffix: type_suffix.into(),
        }
    }

    /// The configured type-name suffix.
    #[must_use]
    pub fn type_suffix(&self) -> &str {
        &self.type_suffix
    }

    /// Extract a fragment from `text`. Never fails; unrecognised input
    /// yields an empty fragment.
    #[must_use]
    pub fn extract(&self, text: &str, dialect: Dialect) -> MetadataFragment {
        if text.trim().is_empty() || text.contains('\0') {
            return MetadataFragment::default();
        }

        let class_re = match dialect {
            Dialect::Python => &*PY_CLASS,
            Dialect::Script => &*SCRIPT_CLASS,
        };
        let component_type = self.find_component_type(text, class_re);

        let mut fragment = MetadataFragment {
            description: match dialect {
                Dialect::Python => first_docstring(text),
                Dialect::Script => first_block_comment(text),
            },
            version: first_capture(&VERSION, text),
            author: first_capture(&AUTHOR, text),
            features: declared_features(text),
            ..MetadataFragment::default()
        };

        if let Some((type_name, body)) = component_type {
            fragment.name = self.friendly_name(&type_name);
            fragment.type_name = Some(type_name);
            fragment.capabilities = match dialect {
                Dialect::Python => python_capabilities(body),
                Dialect::Script => script_capabilities(body),
            };
        }

        fragment
    }

    /// First type whose name ends in the suffix, and the text of its body
    /// up to the next type declared at the same or a shallower indent.
    fn find_component_type<'t>(&self, text: &'t str, class_re: &Regex) -> Option<(String, &'t str)> {
        let decls: Vec<TypeDecl<'t>> = class_re
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(TypeDecl {
                    start: whole.start(),
                    body_start: whole.end(),
                    indent: indent_width(whole.as_str()),
                    name: caps.get(1)?.as_str(),
                })
            })
            .collect();

        let pos = decls
            .iter()
            .position(|d| d.name.ends_with(self.type_suffix.as_str()))?;
        let component = decls.get(pos)?;
        let end = decls
            .iter()
            .skip(pos.saturating_add(1))
            .find(|d| d.indent <= component.indent)
            .map_or(text.len(), |d| d.start);
        let body = text.get(component.body_start..end).unwrap_or("");
        Some((component.name.to_owned(), body))
    }

    fn friendly_name(&self, type_name: &str) -> Option<String> {
        let stem = type_name.strip_suffix(self.type_suffix.as_str())?;
        let words = split_camel(stem);
        if words.is_empty() {
            return None;
        }
        Some(format!("{words} {TITLE_SUFFIX}"))
    }
}

struct TypeDecl<'t> {
    start: usize,
    body_start: usize,
    indent: usize,
    name: &'t str,
}

fn indent_width(line: &str) -> usize {
    line.len().saturating_sub(line.trim_start().len())
}

/// `CardiologyAIAgent` style identifiers to `Cardiology AI`.
fn split_camel(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().filter(|c| *c != '_').collect();
    let mut out = String::with_capacity(ident.len().saturating_add(4));
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev_lower = chars.get(i.saturating_sub(1)).is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let next_lower = chars.get(i.saturating_add(1)).is_some_and(|n| n.is_lowercase());
            let prev_upper = chars.get(i.saturating_sub(1)).is_some_and(|p| p.is_uppercase());
            if prev_lower || (prev_upper && next_lower) {
                out.push(' ');
            }
        }
        out.push(*c);
    }
    out
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty())
}

fn first_docstring(text: &str) -> Option<String> {
    PY_DOCSTRING
        .captures_iter(text)
        .filter_map(|c| c.get(2).map(|m| m.as_str()))
        .find_map(first_paragraph)
}

fn first_block_comment(text: &str) -> Option<String> {
    BLOCK_COMMENT
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| strip_comment_stars(m.as_str())))
        .find_map(|body| first_paragraph(&body))
}

/// Leading `*` gutters and `@tag` lines removed.
fn strip_comment_stars(body: &str) -> String {
    body.lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .filter(|l| !l.starts_with('@'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First blank-line separated paragraph, whitespace collapsed.
fn first_paragraph(doc: &str) -> Option<String> {
    let para = doc
        .trim()
        .split("\n\n")
        .next()?
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (!para.is_empty()).then_some(para)
}

fn first_line(doc: &str) -> String {
    doc.lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .find(|l| !l.is_empty() && !l.starts_with('@'))
        .unwrap_or("")
        .to_owned()
}

fn declared_features(text: &str) -> DeclaredFeatures {
    let mut features = DeclaredFeatures::default();
    for caps in FEATURE.captures_iter(text) {
        let (Some(flag), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let value = value.as_str().eq_ignore_ascii_case("true");
        let slot = match flag.as_str().to_ascii_lowercase().as_str() {
            "audio" => &mut features.audio,
            "marketplace" => &mut features.marketplace,
            "iot" => &mut features.iot,
            "automotive" => &mut features.automotive,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }
    features
}

fn is_excluded(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('#') || EXCLUDED_OPERATIONS.contains(&name)
}

fn python_capabilities(body: &str) -> Vec<CapabilityDescriptor> {
    let mut caps: Vec<CapabilityDescriptor> = Vec::new();
    for m in PY_DEF.captures_iter(body) {
        let (Some(whole), Some(name)) = (m.get(0), m.get(1)) else {
            continue;
        };
        let name = name.as_str();
        if is_excluded(name) || caps.iter().any(|c| c.name == name) {
            continue;
        }
        let Some((params, tail)) = body.get(whole.end()..).and_then(split_parenthesized) else {
            continue;
        };
        let Some(doc) = PY_DOC_AFTER_SIGNATURE.captures(tail).and_then(|c| c.get(1)) else {
            continue;
        };
        let mut cap = CapabilityDescriptor::new(name, first_line(doc.as_str()));
        for raw in split_top_level(params) {
            if let Some((param, hint, required)) = parse_python_param(raw) {
                cap.push_parameter(param, hint, required);
            }
        }
        caps.push(cap);
    }
    caps
}

fn script_capabilities(body: &str) -> Vec<CapabilityDescriptor> {
    let mut caps: Vec<CapabilityDescriptor> = Vec::new();
    for m in SCRIPT_METHOD.captures_iter(body) {
        let (Some(whole), Some(doc), Some(modifiers), Some(name)) =
            (m.get(0), m.get(1), m.get(2), m.get(3))
        else {
            continue;
        };
        let name = name.as_str();
        let hidden = modifiers
            .as_str()
            .split_whitespace()
            .any(|w| w == "private" || w == "protected");
        if hidden || is_excluded(name) || caps.iter().any(|c| c.name == name) {
            continue;
        }
        let Some((params, _)) = body.get(whole.end()..).and_then(split_parenthesized) else {
            continue;
        };
        let mut cap = CapabilityDescriptor::new(name, first_line(doc.as_str()));
        for raw in split_top_level(params) {
            if let Some((param, hint, required)) = parse_script_param(raw) {
                cap.push_parameter(param, hint, required);
            }
        }
        caps.push(cap);
    }
    caps
}

/// Split text following an opening `(` into the balanced contents and
/// whatever follows the matching `)`. Quoted text is skipped.
fn split_parenthesized(s: &str) -> Option<(&str, &str)> {
    let mut depth: usize = 0;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth = depth.saturating_add(1),
            ')' if depth == 0 => {
                return Some((s.get(..i)?, s.get(i.saturating_add(1)..)?));
            },
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {},
        }
    }
    None
}

/// Split on commas that are not nested in brackets, braces or parens.
fn split_top_level(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        match c {
            '[' | '(' | '{' | '<' => depth = depth.saturating_add(1),
            ']' | ')' | '}' | '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(params.get(start..i).unwrap_or(""));
                start = i.saturating_add(1);
            },
            _ => {},
        }
    }
    parts.push(params.get(start..).unwrap_or(""));
    parts
}

/// Position of the first `ch` outside brackets.
fn find_top_level(s: &str, ch: char) -> Option<usize> {
    let mut depth: usize = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '(' | '{' | '<' => depth = depth.saturating_add(1),
            ']' | ')' | '}' | '>' => depth = depth.saturating_sub(1),
            c if c == ch && depth == 0 => return Some(i),
            _ => {},
        }
    }
    None
}

fn parse_python_param(raw: &str) -> Option<(String, String, bool)> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('*') || raw == "/" {
        return None;
    }
    let (decl, has_default) = match find_top_level(raw, '=') {
        Some(i) => (raw.get(..i).unwrap_or(raw), true),
        None => (raw, false),
    };
    let (name, hint) = match decl.split_once(':') {
        Some((n, h)) => (n.trim(), h.trim()),
        None => (decl.trim(), ""),
    };
    if name == "self" || name == "cls" || name.is_empty() {
        return None;
    }
    let hint = if hint.is_empty() { "any" } else { hint };
    Some((name.to_owned(), hint.to_owned(), !has_default))
}

fn parse_script_param(raw: &str) -> Option<(String, String, bool)> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("...") || raw.starts_with('{') || raw.starts_with('[') {
        return None;
    }
    let (decl, has_default) = match find_top_level(raw, '=') {
        Some(i) => (raw.get(..i).unwrap_or(raw), true),
        None => (raw, false),
    };
    let (name, hint) = match find_top_level(decl, ':') {
        Some(i) => (
            decl.get(..i).unwrap_or(decl).trim(),
            decl.get(i.saturating_add(1)..).unwrap_or("").trim(),
        ),
        None => (decl.trim(), ""),
    };
    let (name, optional) = match name.strip_suffix('?') {
        Some(n) => (n.trim(), true),
        None => (name, false),
    };
    if name.is_empty() || name == "this" {
        return None;
    }
    let hint = if hint.is_empty() { "any" } else { hint };
    Some((name.to_owned(), hint.to_owned(), !has_default && !optional))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PY_AGENT: &str = r#""""Cardiology specialist agent.

Longer explanation that should not be part of the description.
"""

from typing import Dict, Any, Optional

version = "2.1.0"
author = "Heart Team"
audio_enabled = True
iot_enabled = False


class CardiologyInput(BaseModel):
    """Input schema."""
    symptoms: list


class CardiologyAgent(BaseAIAgent):
    """Agent for cardiology consultations."""

    def __init__(self):
        """Create the agent."""
        super().__init__()

    async def consult(self, query: str, context: Optional[Dict[str, Any]] = None) -> Dict:
        """Answer a cardiology question.

        More detail here.
        """
        return {}

    async def assess_risk(self, age: int, factors: list, *args, **kwargs):
        """Estimate cardiovascular risk."""
        return {}

    def get_input_schema(self):
        """Schema getter."""
        return CardiologyInput

    def _private(self, x):
        """Hidden."""
        return x

    def undocumented(self, y):
        return y


class HelperAgent:
    """Second agent in the same file."""

    def helper(self, z):
        """Belongs to the second type."""
        return z
"#;

    #[test]
    fn python_metadata() {
        let f = Extractor::default().extract(PY_AGENT, Dialect::Python);

        assert_eq!(f.type_name.as_deref(), Some("CardiologyAgent"));
        assert_eq!(f.name.as_deref(), Some("Cardiology Expert"));
        assert_eq!(f.description.as_deref(), Some("Cardiology specialist agent."));
        assert_eq!(f.version.as_deref(), Some("2.1.0"));
        assert_eq!(f.author.as_deref(), Some("Heart Team"));
        assert_eq!(f.features.audio, Some(true));
        assert_eq!(f.features.iot, Some(false));
        assert_eq!(f.features.marketplace, None);
    }

    #[test]
    fn python_capabilities_follow_docstrings() {
        let f = Extractor::default().extract(PY_AGENT, Dialect::Python);
        let names: Vec<_> = f.capabilities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["consult", "assess_risk"]);

        let consult = &f.capabilities[0];
        assert_eq!(consult.description, "Answer a cardiology question.");
        assert_eq!(consult.parameters.len(), 2);
        assert_eq!(consult.parameters[0].hint, "str");
        assert_eq!(consult.parameters[1].hint, "Optional[Dict[str, Any]]");
        assert_eq!(consult.required_parameters, ["query"]);

        let risk = &f.capabilities[1];
        let params: Vec<_> = risk.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, ["age", "factors"]);
        assert_eq!(risk.required_parameters, ["age", "factors"]);
    }

    const TS_AGENT: &str = r"/**
 * Portfolio analysis assistant.
 * @module finance
 */
export class PortfolioAgent extends BaseAgent {
  version = '0.3.0';
  marketplaceEnabled: true;

  constructor(opts: Options) {
    super(opts);
  }

  /**
   * Rebalance a portfolio toward a target allocation.
   * @param holdings current positions
   */
  async rebalance(holdings: Record<string, number>, target?: Allocation, drift = 0.05): Promise<Result> {
    return {};
  }

  /** Summarise performance. */
  public summary(...periods: string[]) {
    return '';
  }

  private hidden() {}
}
";

    #[test]
    fn script_dialect() {
        let f = Extractor::default().extract(TS_AGENT, Dialect::Script);

        assert_eq!(f.name.as_deref(), Some("Portfolio Expert"));
        assert_eq!(f.description.as_deref(), Some("Portfolio analysis assistant."));
        assert_eq!(f.version.as_deref(), Some("0.3.0"));
        assert_eq!(f.features.marketplace, Some(true));

        let names: Vec<_> = f.capabilities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["rebalance", "summary"]);
        let rebalance = &f.capabilities[0];
        assert_eq!(rebalance.description, "Rebalance a portfolio toward a target allocation.");
        assert_eq!(rebalance.parameters.len(), 3);
        assert_eq!(rebalance.parameters[0].hint, "Record<string, number>");
        assert_eq!(rebalance.required_parameters, ["holdings"]);
        assert!(f.capabilities[1].parameters.is_empty());
    }

    #[test]
    fn nested_class_inside_method_keeps_later_methods() {
        let src = r#"
class InterpretationAgent(BaseAIAgent):
    def get_output_schema(self):
        """Schema getter."""
        class Assessment(BaseModel):
            risk: str
        return Assessment

    def interpret_ecg(self, tracing: str, leads: int = 12):
        """Interpret a resting ECG."""
        return {}


class Unrelated:
    def other(self):
        """Not ours."""
"#;
        let f = Extractor::default().extract(src, Dialect::Python);
        let names: Vec<_> = f.capabilities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["interpret_ecg"]);
        assert_eq!(f.capabilities[0].required_parameters, ["tracing"]);
    }

    #[test]
    fn parenthesized_defaults_keep_whole_signature() {
        let src = r#"
class WindowAgent:
    def smooth(self, series: list, window=(1, 2), opts=dict(), sep=")"):
        """Smooth a series."""
        return series

    def after(self, x):
        """Runs after smoothing."""
        return x
"#;
        let f = Extractor::default().extract(src, Dialect::Python);
        let names: Vec<_> = f.capabilities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["smooth", "after"]);

        let smooth = &f.capabilities[0];
        let params: Vec<_> = smooth.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, ["series", "window", "opts", "sep"]);
        assert_eq!(smooth.required_parameters, ["series"]);
    }

    #[test]
    fn script_doc_comment_stays_with_its_member() {
        let src = "export class OpsAgent {
  /** Internal helper. */ private helper() {}
  /** Cached count. */ count = 0;
  /** Public op. */ run(x: string, opts = defaults()) {}
  /** Guarded. */ protected guard() {}
}
";
        let f = Extractor::default().extract(src, Dialect::Script);
        let names: Vec<_> = f.capabilities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["run"]);
        assert_eq!(f.capabilities[0].description, "Public op.");
        assert_eq!(f.capabilities[0].required_parameters, ["x"]);
        assert_eq!(f.capabilities[0].parameters.len(), 2);
    }

    #[test]
    fn malformed_input_yields_empty_fragment() {
        let ex = Extractor::default();
        assert!(ex.extract("", Dialect::Python).is_empty());
        assert!(ex.extract("\0\0binary", Dialect::Python).is_empty());
        assert!(ex.extract("def broken(:\n  \"\"\"", Dialect::Python).capabilities.is_empty());
    }

    #[test]
    fn suffix_is_configurable() {
        let ex = Extractor::new("Assistant");
        let f = ex.extract("class TaxAssistant:\n    pass\n", Dialect::Python);
        assert_eq!(f.name.as_deref(), Some("Tax Expert"));
        let f = Extractor::default().extract("class TaxAssistant:\n    pass\n", Dialect::Python);
        assert!(f.name.is_none());
    }

    #[test]
    fn camel_case_splitting() {
        assert_eq!(split_camel("EnergySustainability"), "Energy Sustainability");
        assert_eq!(split_camel("CardiologyAI"), "Cardiology AI");
        assert_eq!(split_camel("AIResearch"), "AI Research");
        assert_eq!(split_camel("Web3Dev"), "Web3 Dev");
    }

    #[test]
    fn dialect_from_extension() {
        assert_eq!(Dialect::from_path(Path::new("a_agent.py")), Some(Dialect::Python));
        assert_eq!(Dialect::from_path(Path::new("a_agent.ts")), Some(Dialect::Script));
        assert_eq!(Dialect::from_path(Path::new("agent.md")), None);
    }
}
