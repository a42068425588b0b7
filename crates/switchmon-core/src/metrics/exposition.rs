//! Prometheus text exposition (format 0.0.4).
//!
//! Renders one [`Scrape`] as `# HELP` / `# TYPE` headers followed by one
//! sample line per observation. The unit goes on an extra `# UNIT` comment
//! line, which 0.0.4 parsers skip.

use std::fmt::Write as _;

use super::registry::{Scrape, SampleValue, is_valid_metric_name};

/// Content type of the rendered text.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Rendering knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpositionOptions {
    /// Prefix joined to every metric name with `_`.
    pub namespace: Option<String>,
    /// Append each observation's timestamp (milliseconds) to its sample.
    pub timestamps: bool,
}

/// Render a scrape into Prometheus text format.
pub fn render_prometheus(scrape: &Scrape, options: &ExpositionOptions) -> String {
    let mut out = String::new();

    for family in &scrape.families {
        let desc = &family.descriptor;
        let name = metric_name(options.namespace.as_deref(), &desc.name);

        let _ = writeln!(out, "# HELP {name} {}", escape_help(&desc.description));
        let _ = writeln!(out, "# TYPE {name} gauge");
        if !desc.unit.is_empty() {
            let _ = writeln!(out, "# UNIT {name} {}", escape_help(&desc.unit));
        }

        for sample in &family.samples {
            out.push_str(&name);
            if !sample.attributes.is_empty() {
                out.push('{');
                for (i, kv) in sample.attributes.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{}=\"{}\"", kv.key, escape_label(&kv.value));
                }
                out.push('}');
            }
            out.push(' ');
            out.push_str(&format_value(sample.value));
            if options.timestamps {
                let _ = write!(out, " {}", sample.observed_at.timestamp_millis());
            }
            out.push('\n');
        }
    }

    out
}

fn metric_name(namespace: Option<&str>, name: &str) -> String {
    match namespace.filter(|ns| !ns.is_empty()) {
        Some(ns) => format!("{}_{name}", sanitize_name(ns)),
        None => name.to_owned(),
    }
}

/// Replace characters not allowed in a metric name with `_`.
pub fn sanitize_name(raw: &str) -> String {
    if is_valid_metric_name(raw) {
        return raw.to_owned();
    }
    let mut out: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn format_value(value: SampleValue) -> String {
    match value {
        SampleValue::I64(v) => v.to_string(),
        SampleValue::F64(v) if v.is_nan() => "NaN".into(),
        SampleValue::F64(v) if v.is_infinite() => {
            if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
        }
        SampleValue::F64(v) => v.to_string(),
    }
}

fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
