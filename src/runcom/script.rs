//! rc.d launch script rendering
//!
//! Templates are plain text with `{{ .Field }}` actions. A field may be piped
//! through functions: `{{ .Arguments | args }}`.
//!
//! Fields: `Name`, `DisplayName`, `Description`, `Path`, `SvcInfo`, `Arguments`.
//! Functions: `args` (list → one shell-quoted token), `quote` (text → shell-quoted).

use std::borrow::Cow;
use std::path::Path;

/// Built-in rc.d script, dispatching to rc.subr's `rc_cmd`
pub const DEFAULT_TEMPLATE: &str = r#"#!/bin/sh
#
# $OpenBSD: {{ .SvcInfo }}

daemon={{ .Path | quote }}
daemon_flags={{ .Arguments | args }}

. /etc/rc.d/rc.subr

rc_bg=YES

rc_cmd $1
"#;

/// Values available to a template
#[derive(Debug, Clone)]
pub struct ScriptContext<'a> {
    pub name: &'a str,
    pub display_name: &'a str,
    pub description: &'a str,
    /// Absolute path of the daemon executable
    pub path: &'a Path,
    pub arguments: &'a [String],
    /// Free-text identification written into the script header
    pub svc_info: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unclosed action at byte {0}")]
    Unclosed(usize),

    #[error("malformed action {0:?}")]
    Malformed(String),

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("unknown function {0:?}")]
    UnknownFunction(String),

    #[error("function {func:?} cannot take a {kind} value")]
    WrongType { func: String, kind: &'static str },

    #[error("action {0:?} yields a list; pipe it through `args`")]
    UnpipedList(String),

    #[error("value cannot be shell-quoted: {0}")]
    Quote(#[from] shlex::QuoteError),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
}

enum Value<'a> {
    Text(Cow<'a, str>),
    List(&'a [String]),
}

impl Value<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }
}

/// Render `template` against `ctx`
///
/// Fails on the first malformed action; nothing is rendered partially.
pub fn render(template: &str, ctx: &ScriptContext<'_>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + 128);
    let mut rest = template;
    let mut offset = 0;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);

        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or(TemplateError::Unclosed(offset + open))?;
        let action = after[..close].trim();
        out.push_str(&eval(action, ctx)?);

        let consumed = open + 2 + close + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);

    Ok(out)
}

fn eval(action: &str, ctx: &ScriptContext<'_>) -> Result<String, TemplateError> {
    let mut stages = action.split('|').map(str::trim);

    let field = stages
        .next()
        .and_then(|s| s.strip_prefix('.'))
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(|| TemplateError::Malformed(action.to_string()))?;

    let mut value = lookup(field, ctx)?;
    for func in stages {
        value = apply(func, value)?;
    }

    match value {
        Value::Text(s) => Ok(s.into_owned()),
        Value::List(_) => Err(TemplateError::UnpipedList(action.to_string())),
    }
}

fn lookup<'a>(field: &str, ctx: &ScriptContext<'a>) -> Result<Value<'a>, TemplateError> {
    let text = match field {
        "Name" => ctx.name,
        "DisplayName" => ctx.display_name,
        "Description" => ctx.description,
        "SvcInfo" => ctx.svc_info,
        "Path" => ctx
            .path
            .to_str()
            .ok_or_else(|| TemplateError::NonUtf8Path(ctx.path.display().to_string()))?,
        "Arguments" => return Ok(Value::List(ctx.arguments)),
        other => return Err(TemplateError::UnknownField(other.to_string())),
    };
    Ok(Value::Text(Cow::Borrowed(text)))
}

fn apply<'a>(func: &str, value: Value<'a>) -> Result<Value<'a>, TemplateError> {
    match (func, value) {
        ("args", Value::List(args)) => Ok(Value::Text(Cow::Owned(quote_args(args)?))),
        ("quote", Value::Text(s)) => Ok(Value::Text(Cow::Owned(
            shlex::try_quote(&s)?.into_owned(),
        ))),
        ("args" | "quote", value) => Err(TemplateError::WrongType {
            func: func.to_string(),
            kind: value.kind(),
        }),
        ("", _) => Err(TemplateError::Malformed(func.to_string())),
        (other, _) => Err(TemplateError::UnknownFunction(other.to_string())),
    }
}

/// Join arguments with single spaces into one shell-safe token
///
/// rc.subr word-splits `daemon_flags` itself, so the whole list is stored as a
/// single opaque value.
pub fn quote_args(args: &[String]) -> Result<String, TemplateError> {
    Ok(shlex::try_quote(&args.join(" "))?.into_owned())
}
