//! Argument-template resolution.
//!
//! Templates use `%(name)d` / `%(name)s` / `%(name)f` placeholders resolved
//! against the entry's parameter map. A placeholder with no bound parameter
//! fails the whole invocation's construction.

use crate::error::MatrixError;
use crate::types::ParamValue;
use indexmap::IndexMap;

pub fn resolve_template(
    template: &str,
    params: &IndexMap<String, ParamValue>,
) -> Result<String, MatrixError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some((_, '%')) => {
                chars.next();
                out.push('%');
            }
            Some((_, '(')) => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for (_, nc) in chars.by_ref() {
                    if nc == ')' {
                        closed = true;
                        break;
                    }
                    name.push(nc);
                }
                let conv = chars.next().map(|(_, cc)| cc);
                let conv = match (closed, conv) {
                    (true, Some(cc)) => cc,
                    // Truncated placeholder: a malformed template must not
                    // reach the driver.
                    _ => {
                        return Err(MatrixError::Template {
                            placeholder: name,
                            template: template.to_string(),
                        })
                    }
                };
                let value = params.get(&name).ok_or_else(|| MatrixError::Template {
                    placeholder: name.clone(),
                    template: template.to_string(),
                })?;
                out.push_str(&format_value(value, conv));
            }
            _ => out.push('%'),
        }
    }
    Ok(out)
}

fn format_value(value: &ParamValue, conv: char) -> String {
    match (conv, value) {
        ('d', ParamValue::Int(n)) => n.to_string(),
        ('d', ParamValue::Float(x)) => (x.trunc() as i64).to_string(),
        ('f', ParamValue::Int(n)) => format!("{:.6}", *n as f64),
        ('f', ParamValue::Float(x)) => format!("{x:.6}"),
        (_, ParamValue::Int(n)) => n.to_string(),
        (_, ParamValue::Float(x)) => x.to_string(),
        (_, ParamValue::Str(s)) => s.clone(),
    }
}
