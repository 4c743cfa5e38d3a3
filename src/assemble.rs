use crate::codebehind::{EventTable, FieldSet};
use crate::config::Config;
use crate::helpers;
use std::path::Path;

/// The `@page` route for a markup file: its file name without extension,
/// first character capitalized, behind a `/`.
pub fn route_for(path: &Path) -> String {
    format!("/{}", helpers::capitalize_first(&helpers::file_stem(path)))
}

fn preamble(route: &str, config: &Config) -> String {
    let mut out = format!("@page \"{route}\"\n");
    for using in &config.usings {
        out.push_str(&format!("@using {using}\n"));
    }
    for inject in &config.injects {
        out.push_str(&format!("@inject {} {}\n", inject.type_name, inject.name));
    }
    out.push('\n');
    out
}

fn code_block(fields: &FieldSet, events: &EventTable) -> String {
    let mut out = String::from("@code {\n");
    for field in fields.iter() {
        out.push_str(&format!("    {}\n", field.body()));
    }
    if !fields.is_empty() && !events.is_empty() {
        out.push('\n');
    }
    for event in events.iter() {
        out.push_str(&format!("    {}\n", event.body));
    }
    out.push_str("}\n");
    out
}

/// Builds the final `.razor` document around already transformed markup.
/// The `@code` block is always present, even when empty.
pub fn assemble(
    markup: &str,
    fields: &FieldSet,
    events: &EventTable,
    route: &str,
    config: &Config,
) -> String {
    let markup = markup.trim_end();
    let mut out = preamble(route, config);
    if !markup.is_empty() {
        out.push_str(markup);
        out.push_str("\n\n");
    }
    out.push_str(&code_block(fields, events));
    out
}
