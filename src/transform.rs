//! Rewrites a Web Forms page into Blazor markup.
//!
//! The passes run in a fixed order, and each one is a no-op on a page that
//! has nothing for it to do:
//!
//! 1. `<%@ ... %>` directives are cut out of the raw text.
//! 2. The text is parsed and known control tags get their canonical casing.
//! 3. Server-marked wrapper tags are unwrapped and `runat` is stripped.
//! 4. Every known control is rewritten in place, depth-first.

use crate::codebehind::{EventTable, FieldDeclaration, FieldSet};
use crate::helpers;
use crate::mapping::{self, ControlMapping, EventBinding};
use crate::markup::{self, Document, Element, Node};
use regex::Regex;
use std::sync::LazyLock;

static DIRECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<%@.*?%>[ \t]*(\r?\n)?").expect("directive pattern is a valid regex")
});

pub fn strip_directives(markup: &str) -> String {
    DIRECTIVE_PATTERN.replace_all(markup, "").into_owned()
}

pub fn restore_tag_identities(document: &mut Document) {
    document.visit_elements_mut(|element| {
        if let Some(canonical) = mapping::canonical_tag(&element.name) {
            if canonical != element.name {
                element.name = canonical.to_string();
            }
        }
    });
}

fn is_server_marked(element: &Element) -> bool {
    element
        .get_attribute(mapping::SERVER_MARKER)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(mapping::SERVER_MARKER_VALUE))
}

/// Removes server-marked wrapper elements, splicing their children into
/// their place, and strips `runat` from every other element.
pub fn unwrap_server_wrappers(document: &mut Document, wrapper_tags: &[String]) {
    let children = std::mem::take(&mut document.children);
    document.children = unwrap_nodes(children, wrapper_tags);
}

fn unwrap_nodes(nodes: Vec<Node>, wrapper_tags: &[String]) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(mut element) => {
                let unwrap = is_server_marked(&element)
                    && wrapper_tags
                        .iter()
                        .any(|tag| tag.eq_ignore_ascii_case(&element.name));
                element.remove_all_attributes(mapping::SERVER_MARKER);
                let children = unwrap_nodes(std::mem::take(&mut element.children), wrapper_tags);
                if unwrap {
                    log::debug!("Unwrapping <{}> ({} children)", element.name, children.len());
                    out.extend(children);
                } else {
                    element.children = children;
                    out.push(Node::Element(element));
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Rewrites every known control in `document`. Fields synthesized from
/// bindings are appended to `fields`; `events` decides which server event
/// attributes become Blazor event bindings.
pub fn rewrite_controls(document: &mut Document, events: &EventTable, fields: &mut FieldSet) {
    document.visit_elements_mut(|element| {
        if let Some(control) = mapping::lookup(&element.name) {
            rewrite_control(element, control, events, fields);
        }
    });
}

fn rewrite_control(
    element: &mut Element,
    control: &ControlMapping,
    events: &EventTable,
    fields: &mut FieldSet,
) {
    log::debug!("Rewriting <{}> as <{}>", element.name, control.output_tag);
    element.name = control.output_tag.to_string();

    if let Some((name, value)) = control.fixed_attribute {
        element.set_attribute(name, value);
    }

    for &(from, to) in &control.attribute_renames {
        let Some(value) = element.rename_attribute(from, to) else {
            continue;
        };
        if !ControlMapping::is_binding(to) {
            continue;
        }
        if let Err(reason) = bind_field(&value, control, fields) {
            log::warn!(
                "{from}=\"{value}\" on {} became {to} without a field declaration ({reason})",
                control.legacy_tag
            );
        }
    }

    if let Some(event) = control.event {
        bind_event(element, event, events);
    }

    rename_client_click(element);

    let is_void = mapping::is_void_element(control.output_tag);
    if !is_void {
        if let Some(text) = element.remove_attribute(mapping::TEXT_ATTRIBUTE) {
            element.children = vec![Node::Text(text.value().to_string())];
        }
    }
    element.self_closing = is_void;
}

/// Declares a field for a binding value unless one with that name exists.
/// Empty and non-identifier values are refused.
fn bind_field(
    value: &str,
    control: &ControlMapping,
    fields: &mut FieldSet,
) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("empty value");
    }
    if !helpers::is_identifier(value) {
        return Err("not a C# identifier");
    }
    if fields.contains(value) {
        return Ok(());
    }
    fields.push(FieldDeclaration::new(control.binding_type, value));
    log::debug!("Synthesized field `{value}` from {}", control.legacy_tag);
    Ok(())
}

fn bind_event(element: &mut Element, event: EventBinding, events: &EventTable) {
    let Some(index) = element.attribute_index(event.legacy) else {
        return;
    };
    // `@bind:after` is only legal next to an `@bind`.
    let needs_binding = ControlMapping::is_binding(event.target);
    let has_binding = element
        .attributes
        .iter()
        .any(|attr| ControlMapping::is_binding(&attr.name));
    let handler = element.attributes[index].value().trim();

    if needs_binding && !has_binding {
        log::debug!(
            "Leaving {}=\"{}\" as is, {} needs a bound value",
            event.legacy,
            handler,
            event.target
        );
    } else if helpers::is_identifier(handler) && events.contains(handler) {
        element.attributes[index].name = event.target.to_string();
    } else {
        log::debug!(
            "Leaving {}=\"{}\" as is, no matching code-behind handler",
            event.legacy,
            handler
        );
    }
}

/// Client-side click script always becomes a plain `onclick`. An unconverted
/// server `OnClick` on the same element is kept next to it.
fn rename_client_click(element: &mut Element) {
    let Some(index) = element.attribute_index(mapping::CLIENT_CLICK) else {
        return;
    };
    if let Some(existing) = element.get_attribute(mapping::CLIENT_CLICK_TARGET) {
        log::warn!(
            "<{}> keeps server handler \"{existing}\" next to the converted {}",
            element.name,
            mapping::CLIENT_CLICK
        );
    }
    element.attributes[index].name = mapping::CLIENT_CLICK_TARGET.to_string();
}

/// Runs every pass over `markup`.
pub fn transform(
    markup: &str,
    events: &EventTable,
    fields: &mut FieldSet,
    wrapper_tags: &[String],
) -> Document {
    let stripped = strip_directives(markup);
    let mut document = markup::parse(&stripped);
    restore_tag_identities(&mut document);
    unwrap_server_wrappers(&mut document, wrapper_tags);
    rewrite_controls(&mut document, events, fields);
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebehind::EventStub;

    fn wrappers() -> Vec<String> {
        mapping::DEFAULT_WRAPPER_TAGS.iter().map(|t| t.to_string()).collect()
    }

    fn events(names: &[&str]) -> EventTable {
        let mut table = EventTable::new();
        for name in names {
            table.insert(EventStub::new(name));
        }
        table
    }

    fn run(markup: &str, events: &EventTable) -> (String, FieldSet) {
        let mut fields = FieldSet::new();
        let document = transform(markup, events, &mut fields, &wrappers());
        (document.to_string(), fields)
    }

    fn field_names(fields: &FieldSet) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn strips_page_directives() {
        let markup = "<%@ Page Language=\"C#\" CodeBehind=\"Default.aspx.cs\"\n\
                      \x20   Inherits=\"App.Default\" %>\n\
                      <%@ Register TagPrefix=\"uc\" Src=\"~/Menu.ascx\" %>\n<p>Hi</p>";
        assert_eq!(strip_directives(markup), "<p>Hi</p>");
    }

    #[test]
    fn leaves_other_server_blocks_alone() {
        assert_eq!(strip_directives("<%= Title %>"), "<%= Title %>");
    }

    #[test]
    fn restores_canonical_casing_for_any_input_casing() {
        for control in mapping::controls() {
            for spelling in [
                control.legacy_tag.to_ascii_lowercase(),
                control.legacy_tag.to_ascii_uppercase(),
                control.legacy_tag.to_string(),
            ] {
                let mut document = markup::parse(&format!("<{spelling}></{spelling}>"));
                restore_tag_identities(&mut document);
                match document.children.as_slice() {
                    [Node::Element(element)] => assert_eq!(element.name, control.legacy_tag),
                    other => panic!("unexpected tree {other:?}"),
                }
            }
        }
    }

    #[test]
    fn unwrapping_keeps_child_order_in_place() {
        let (out, _) = run(
            "<p>before</p><form id=\"f\" runat=\"server\"><i>a</i>b<u>c</u></form><p>after</p>",
            &EventTable::new(),
        );
        assert_eq!(out, "<p>before</p><i>a</i>b<u>c</u><p>after</p>");
    }

    #[test]
    fn server_marker_match_ignores_case() {
        let (out, _) = run("<FORM RunAt=\"SERVER\"><b>x</b></FORM>", &EventTable::new());
        assert_eq!(out, "<b>x</b>");
    }

    #[test]
    fn non_wrapper_only_loses_its_server_marker() {
        let (out, _) = run(
            "<div runat=\"server\" id=\"box\">x</div><form>y</form>",
            &EventTable::new(),
        );
        assert_eq!(out, "<div id=\"box\">x</div><form>y</form>");
    }

    #[test]
    fn nested_wrappers_unwrap_fully() {
        let (out, _) = run(
            "<asp:Content runat=\"server\" ContentPlaceHolderID=\"Main\">\
             <form runat=\"server\"><p>x</p></form></asp:Content>",
            &EventTable::new(),
        );
        assert_eq!(out, "<p>x</p>");
    }

    #[test]
    fn rewrites_button_with_known_handler() {
        let (out, fields) = run(
            r#"<asp:Button runat="server" Text="Save" OnClick="SaveClick"/>"#,
            &events(&["SaveClick"]),
        );
        assert_eq!(out, r#"<button @bind-Value="Save" @onclick="SaveClick"></button>"#);
        assert_eq!(field_names(&fields), vec!["Save"]);
    }

    #[test]
    fn unknown_handler_is_left_unconverted() {
        let (out, _) = run(
            r#"<asp:Button OnClick="SaveClick" />"#,
            &events(&["OtherClick"]),
        );
        assert_eq!(out, r#"<button OnClick="SaveClick"></button>"#);
    }

    #[test]
    fn inline_script_handler_is_left_unconverted() {
        let (out, _) = run(
            r#"<asp:Button OnClick="alert('hi')" />"#,
            &events(&["alert"]),
        );
        assert_eq!(out, r#"<button OnClick="alert('hi')"></button>"#);
    }

    #[test]
    fn client_click_is_always_renamed() {
        let (out, _) = run(
            r#"<asp:LinkButton OnClientClick="return confirm('Sure?');">Go</asp:LinkButton>"#,
            &EventTable::new(),
        );
        assert_eq!(out, r#"<a onclick="return confirm('Sure?');">Go</a>"#);
    }

    #[test]
    fn repeated_bindings_declare_one_field() {
        let markup = (0..5)
            .map(|_| r#"<asp:TextBox Text="CustomerName" />"#)
            .collect::<String>();
        let (_, fields) = run(&markup, &EventTable::new());
        assert_eq!(field_names(&fields), vec!["CustomerName"]);
    }

    #[test]
    fn bindings_to_declared_fields_add_nothing() {
        let mut fields: FieldSet = vec![FieldDeclaration::new("string", "Email")]
            .into_iter()
            .collect();
        transform(
            r#"<asp:TextBox Text="Email" /><asp:TextBox Text="Phone" />"#,
            &EventTable::new(),
            &mut fields,
            &wrappers(),
        );
        assert_eq!(field_names(&fields), vec!["Email", "Phone"]);
    }

    #[test]
    fn empty_binding_value_declares_no_field() {
        let (out, fields) = run(r#"<asp:TextBox Text="" />"#, &EventTable::new());
        assert_eq!(out, r#"<input @bind="" />"#);
        assert!(fields.is_empty());
    }

    #[test]
    fn non_identifier_binding_declares_no_field() {
        let (out, fields) = run(r#"<asp:Button Text="Save changes" />"#, &EventTable::new());
        assert_eq!(out, r#"<button @bind-Value="Save changes"></button>"#);
        assert!(fields.is_empty());
    }

    #[test]
    fn checkbox_gets_fixed_type_and_bool_field() {
        let (out, fields) = run(
            r#"<asp:CheckBox ID="chk" type="text" Checked="IsGift"
                OnCheckedChanged="GiftChanged" />"#,
            &events(&["GiftChanged"]),
        );
        assert_eq!(
            out,
            r#"<input ID="chk" type="checkbox" @bind="IsGift" @bind:after="GiftChanged" />"#
        );
        assert_eq!(
            fields.iter().next().map(|f| f.body()),
            Some("public bool IsGift { get; set; }".to_string())
        );
    }

    #[test]
    fn control_without_recognized_attributes_gets_only_fixed_attribute() {
        let (out, fields) = run("<asp:RadioButton runat=\"server\" />", &EventTable::new());
        assert_eq!(out, r#"<input type="radio" />"#);
        assert!(fields.is_empty());
    }

    #[test]
    fn label_text_becomes_content() {
        let (out, _) = run(
            r#"<asp:Label ID="lbl" CssClass="hint" Text="Total:" runat="server" />"#,
            &EventTable::new(),
        );
        assert_eq!(out, r#"<span ID="lbl" class="hint">Total:</span>"#);
    }

    #[test]
    fn link_and_image_attributes_are_renamed() {
        let (out, _) = run(
            r#"<asp:HyperLink NavigateUrl="~/home" Text="Home">
                <asp:Image ImageUrl="logo.png" AlternateText="Logo" />
            </asp:HyperLink>"#,
            &EventTable::new(),
        );
        assert_eq!(out, r#"<a href="~/home">Home</a>"#);
    }

    #[test]
    fn nested_controls_are_rewritten() {
        let (out, _) = run(
            concat!(
                r#"<asp:Panel runat="server">"#,
                r#"<asp:Image ImageUrl="logo.png" AlternateText="Logo" />"#,
                "</asp:Panel>"
            ),
            &EventTable::new(),
        );
        assert_eq!(out, r#"<div><img src="logo.png" alt="Logo" /></div>"#);
    }

    #[test]
    fn page_without_controls_only_loses_directives_and_markers() {
        let markup = "<%@ Page Language=\"C#\" %>\n<div class=\"x\" runat=\"server\">\n  \
                      <p onclick=\"go()\">Text</p>\n  <%# Eval(\"Name\") %>\n</div>\n";
        let (out, fields) = run(markup, &EventTable::new());
        assert_eq!(
            out,
            "<div class=\"x\">\n  <p onclick=\"go()\">Text</p>\n  <%# Eval(\"Name\") %>\n</div>\n"
        );
        assert!(fields.is_empty());
    }

    #[test]
    fn unconverted_server_click_survives_client_click_rename() {
        let (out, _) = run(
            r#"<asp:Button OnClick="Unknown" OnClientClick="return confirm('x');" />"#,
            &EventTable::new(),
        );
        assert_eq!(
            out,
            r#"<button OnClick="Unknown" onclick="return confirm('x');"></button>"#
        );
    }

    #[test]
    fn bound_server_click_and_client_click_coexist() {
        let (out, _) = run(
            r#"<asp:Button OnClick="SaveClick" OnClientClick="return confirm('x');" />"#,
            &events(&["SaveClick"]),
        );
        assert_eq!(
            out,
            r#"<button @onclick="SaveClick" onclick="return confirm('x');"></button>"#
        );
    }

    #[test]
    fn change_event_without_binding_is_left_unconverted() {
        let (out, _) = run(
            r#"<asp:DropDownList OnSelectedIndexChanged="CountryChanged" />"#,
            &events(&["CountryChanged"]),
        );
        assert_eq!(out, r#"<select OnSelectedIndexChanged="CountryChanged"></select>"#);
    }

    #[test]
    fn change_event_with_binding_becomes_bind_after() {
        let (out, fields) = run(
            r#"<asp:DropDownList SelectedValue="Country"
                OnSelectedIndexChanged="CountryChanged" />"#,
            &events(&["CountryChanged"]),
        );
        assert_eq!(
            out,
            r#"<select @bind="Country" @bind:after="CountryChanged"></select>"#
        );
        assert_eq!(field_names(&fields), vec!["Country"]);
    }
}
