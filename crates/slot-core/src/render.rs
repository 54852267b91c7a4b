//! Command template rendering.
//!
//! Slot commands use Go-style dotted placeholders: `{{.file}}`,
//! `{{ .ns | upper }}`, `{{ .tag | default(value="latest") }}`. Before
//! execution every dotted reference inside a `{{ }}` or `{% %}` tag is
//! rewritten to a plain tera identifier, so the full tera expression
//! language and filter library are available in pipelines.
//!
//! Text outside tags is shell, not template: a bash `${#arr[@]}` is passed
//! through as written, and `{% raw %}...{% endraw %}` keeps `{{ }}` literal.
//!
//! Missing bindings are caught before execution by a static scan, and
//! every missing name is reported at once.

use crate::error::{Result, SlotError};
use crate::paths;
use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use tera::{Tera, Value};

const TEMPLATE_NAME: &str = "cmd";

// ---------------------------------------------------------------------------
// Reserved bindings
// ---------------------------------------------------------------------------

pub const SLOTS_FILE: &str = "SLOTS_FILE";
pub const SLOTS_DIR: &str = "SLOTS_DIR";
pub const CLI_ARGS: &str = "CLI_ARGS";
pub const CLI_ARGS_SPLIT: &str = "CLI_ARGS_SPLIT";

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Text(String),
    List(Vec<String>),
}

/// Values available to a template, keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, Binding>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` arguments. The value may be empty or contain `=`.
    /// Every malformed argument is reported in a single error.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::new();
        let mut errors = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                None => errors.push(format!("missing value: {arg:?}")),
                Some(("", _)) => errors.push(format!("missing key: {arg:?}")),
                Some((key, value)) => out.insert_text(key, value),
            }
        }
        if !errors.is_empty() {
            return Err(SlotError::InvalidBindings(errors));
        }
        Ok(out)
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), Binding::Text(value.into()));
    }

    pub fn insert_list(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), Binding::List(values));
    }

    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy `other` over `self`; keys in `other` win.
    pub fn extend(&mut self, other: Bindings) {
        self.0.extend(other.0);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Build the full binding set for a render: reserved values first, then the
/// user's bindings on top. `CLI_ARGS_SPLIT` is derived last from whatever
/// `CLI_ARGS` ended up as.
pub fn render_bindings(store_file: &Path, cli_args: &[String], user: Bindings) -> Bindings {
    let mut out = Bindings::new();
    out.insert_text(SLOTS_FILE, paths::to_slash(store_file));
    let dir = store_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    out.insert_text(SLOTS_DIR, paths::to_slash(dir));
    out.insert_text(CLI_ARGS, cli_args.join(" "));
    out.extend(user);

    let split = match out.get(CLI_ARGS) {
        Some(Binding::Text(s)) => s.split_whitespace().map(str::to_string).collect(),
        Some(Binding::List(items)) => items.clone(),
        None => Vec::new(),
    };
    out.insert_list(CLI_ARGS_SPLIT, split);
    out
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// All distinct placeholder names referenced by `template`, sorted.
pub fn placeholders(template: &str) -> Vec<String> {
    let scan = scan(template);
    scan.references.into_keys().collect()
}

/// Substitute `bindings` into `template` and trim the result.
///
/// Fails with `TemplateParse` on malformed syntax or an unknown helper,
/// `MissingVariables` when a required placeholder is unbound, and
/// `TemplateRender` for anything the engine rejects while executing.
pub fn apply(template: &str, bindings: &Bindings) -> Result<String> {
    let scan = scan(template);

    if let Some(unknown) = scan.filters.iter().find(|f| !is_known_filter(f)) {
        return Err(SlotError::TemplateParse(format!("unknown helper \"{unknown}\"")));
    }
    if let Some(word) = scan.keywords.first() {
        return Err(SlotError::TemplateParse(format!(
            "placeholder \".{word}\" is a reserved word"
        )));
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    register_helpers(&mut tera);
    tera.add_raw_template(TEMPLATE_NAME, &scan.translated)
        .map_err(|e| SlotError::TemplateParse(error_chain(&e)))?;

    let missing: Vec<String> = scan
        .references
        .iter()
        .filter(|(name, optional)| !**optional && !bindings.contains(name))
        .map(|(name, _)| name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(SlotError::MissingVariables(missing));
    }

    let context = tera::Context::from_serialize(bindings)
        .map_err(|e| SlotError::TemplateRender(error_chain(&e)))?;
    let rendered = tera
        .render(TEMPLATE_NAME, &context)
        .map_err(|e| SlotError::TemplateRender(error_chain(&e)))?;
    tracing::debug!(bindings = bindings.len(), "rendered template");
    Ok(rendered.trim().to_string())
}

// ---------------------------------------------------------------------------
// Template scanning
// ---------------------------------------------------------------------------

struct Scan {
    /// Template with dotted references rewritten for tera.
    translated: String,
    /// Placeholder name -> true when every use falls back via `default`.
    references: BTreeMap<String, bool>,
    filters: BTreeSet<String>,
    /// Dotted names that collide with tera literals or operators.
    keywords: BTreeSet<String>,
}

/// Words tera reads as literals or operators; `{{.true}}` would never
/// reach the bound value.
const TERA_KEYWORDS: &[&str] = &[
    "true", "false", "True", "False", "and", "or", "not", "in", "is",
];

/// Literal text that tera would read as the start of a comment.
const COMMENT_OPEN: &str = "{#";
const COMMENT_OPEN_ESCAPED: &str = "{{ \"{#\" }}";

static TAG_RE: OnceLock<Regex> = OnceLock::new();
static END_RAW_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| {
        Regex::new(r"(?s)\{\{(.*?)\}\}|\{%(.*?)%\}").expect("tag regex is valid")
    })
}

fn end_raw_re() -> &'static Regex {
    END_RAW_RE.get_or_init(|| {
        Regex::new(r"\{%-?\s*endraw\s*-?%\}").expect("endraw regex is valid")
    })
}

fn scan(template: &str) -> Scan {
    let mut out = Scan {
        translated: String::with_capacity(template.len()),
        references: BTreeMap::new(),
        filters: BTreeSet::new(),
        keywords: BTreeSet::new(),
    };
    let mut pos = 0;
    while let Some(caps) = tag_re().captures_at(template, pos) {
        let (Some(tag), Some(body)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2))) else {
            break;
        };
        push_text(&template[pos..tag.start()], &mut out);

        if caps.get(2).is_some() && is_raw_open(body.as_str()) {
            // Raw blocks reach tera untouched, including any `{{.x}}` inside.
            let end = end_raw_re()
                .find_at(template, tag.end())
                .map_or(template.len(), |m| m.end());
            out.translated.push_str(&template[tag.start()..end]);
            pos = end;
            continue;
        }

        out.translated.push_str(&template[tag.start()..body.start()]);
        translate_expr(body.as_str(), &mut out);
        out.translated.push_str(&template[body.end()..tag.end()]);
        pos = tag.end();
    }
    push_text(&template[pos..], &mut out);
    out
}

/// Copy text between tags, escaping sequences tera would treat as syntax.
fn push_text(text: &str, out: &mut Scan) {
    out.translated.push_str(&text.replace(COMMENT_OPEN, COMMENT_OPEN_ESCAPED));
}

fn is_raw_open(body: &str) -> bool {
    body.trim_matches(|c: char| c == '-' || c.is_whitespace()) == "raw"
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrite one tag body, recording placeholder references and filter names.
fn translate_expr(body: &str, out: &mut Scan) {
    let chars: Vec<char> = body.chars().collect();
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            out.translated.push(c);
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                out.translated.push(c);
                i += 1;
            }
            '.' if is_reference_start(&chars, i) => {
                let end = ident_end(&chars, i + 1);
                let name: String = chars[i + 1..end].iter().collect();
                out.translated.push_str(&name);
                if TERA_KEYWORDS.contains(&name.as_str()) {
                    out.keywords.insert(name.clone());
                }
                let optional = piped_into(&chars, end).as_deref() == Some("default");
                out.references
                    .entry(name)
                    .and_modify(|o| *o &= optional)
                    .or_insert(optional);
                i = end;
            }
            '|' => {
                out.translated.push(c);
                i += 1;
                while i < chars.len() && chars[i].is_whitespace() {
                    out.translated.push(chars[i]);
                    i += 1;
                }
                let end = ident_end(&chars, i);
                if end > i {
                    let name: String = chars[i..end].iter().collect();
                    out.translated.push_str(&name);
                    out.filters.insert(name);
                    i = end;
                }
            }
            _ => {
                out.translated.push(c);
                i += 1;
            }
        }
    }
}

/// A `.` starts a placeholder when it is followed by an identifier and is
/// not attribute access on a preceding expression (`a.b`, `x().b`, `l[0].b`).
fn is_reference_start(chars: &[char], i: usize) -> bool {
    let followed = chars.get(i + 1).is_some_and(|&c| is_ident_start(c));
    let preceded = i
        .checked_sub(1)
        .and_then(|p| chars.get(p))
        .is_some_and(|&c| is_ident_char(c) || matches!(c, ')' | ']' | '.'));
    followed && !preceded
}

fn ident_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    if end < chars.len() && is_ident_start(chars[end]) {
        end += 1;
        while end < chars.len() && is_ident_char(chars[end]) {
            end += 1;
        }
    }
    end
}

/// Name of the filter an expression ending at `from` is piped into, if any.
fn piped_into(chars: &[char], from: usize) -> Option<String> {
    let mut i = from;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    if chars.get(i) != Some(&'|') {
        return None;
    }
    i += 1;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    let end = ident_end(chars, i);
    (end > i).then(|| chars[i..end].iter().collect())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SLOT_FILTERS: &[&str] = &[
    "snake_case",
    "kebab_case",
    "camel_case",
    "shouty_snake_case",
    "shell_quote",
];

const TERA_FILTERS: &[&str] = &[
    // strings
    "lower",
    "upper",
    "wordcount",
    "capitalize",
    "replace",
    "addslashes",
    "slugify",
    "title",
    "trim",
    "trim_start",
    "trim_end",
    "trim_start_matches",
    "trim_end_matches",
    "truncate",
    "linebreaksbr",
    "indent",
    "striptags",
    "spaceless",
    "split",
    "int",
    "float",
    "json_encode",
    "as_str",
    "escape",
    "escape_xml",
    "safe",
    "urlencode",
    "urlencode_strict",
    // arrays
    "first",
    "last",
    "nth",
    "join",
    "length",
    "reverse",
    "sort",
    "unique",
    "slice",
    "group_by",
    "filter",
    "map",
    "concat",
    // numbers
    "pluralize",
    "round",
    "filesizeformat",
    "abs",
    // objects and misc
    "get",
    "default",
    "date",
];

fn is_known_filter(name: &str) -> bool {
    SLOT_FILTERS.contains(&name) || TERA_FILTERS.contains(&name)
}

fn register_helpers(tera: &mut Tera) {
    tera.register_filter("snake_case", case_filter("snake_case", |s| s.to_snake_case()));
    tera.register_filter("kebab_case", case_filter("kebab_case", |s| s.to_kebab_case()));
    tera.register_filter(
        "camel_case",
        case_filter("camel_case", |s| s.to_lower_camel_case()),
    );
    tera.register_filter(
        "shouty_snake_case",
        case_filter("shouty_snake_case", |s| s.to_shouty_snake_case()),
    );
    tera.register_filter("shell_quote", shell_quote_filter);
}

fn case_filter(
    name: &'static str,
    convert: fn(&str) -> String,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync {
    move |value: &Value, _args: &HashMap<String, Value>| match value {
        Value::String(s) => Ok(Value::String(convert(s))),
        other => Err(tera::Error::msg(format!(
            "filter `{name}` expects a string, got {other}"
        ))),
    }
}

/// Quote a string (or each item of a list, joined by spaces) for a POSIX
/// shell.
fn shell_quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(shell_quote(s))),
        Value::Array(items) => {
            let mut quoted = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => quoted.push(shell_quote(s)),
                    other => quoted.push(shell_quote(&other.to_string())),
                }
            }
            Ok(Value::String(quoted.join(" ")))
        }
        other => Ok(Value::String(shell_quote(&other.to_string()))),
    }
}

pub fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    msg
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
