//! The fixed vocabulary of Web Forms server controls and how each one is
//! rewritten into plain Blazor markup.
//!
//! The table is built once on first use and never mutated afterwards. Lookups
//! are case-insensitive because the legacy markup is written with arbitrary
//! casing (`<asp:button>`, `<ASP:Button>`, ...).

use ahash::AHashMap;
use std::sync::LazyLock;

/// Output attributes starting with this prefix bind an element to a field.
pub const BINDING_MARKER: &str = "@bind";

/// Attribute marking a tag as server-side in Web Forms markup.
pub const SERVER_MARKER: &str = "runat";
pub const SERVER_MARKER_VALUE: &str = "server";

/// Inline client-side handler attribute and its plain HTML counterpart.
pub const CLIENT_CLICK: &str = "OnClientClick";
pub const CLIENT_CLICK_TARGET: &str = "onclick";

/// Legacy attribute carrying a control's display text.
pub const TEXT_ATTRIBUTE: &str = "Text";

pub const DEFAULT_BINDING_TYPE: &str = "string";

pub const DEFAULT_WRAPPER_TAGS: &[&str] =
    &["form", "asp:Content", "asp:PlaceHolder", "asp:UpdatePanel"];

/// Renames applied to every control on top of its own table.
const COMMON_RENAMES: &[(&str, &str)] = &[("CssClass", "class"), ("ToolTip", "title")];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A server-side event attribute and the Blazor attribute it turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBinding {
    pub legacy: &'static str,
    pub target: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMapping {
    pub legacy_tag: &'static str,
    pub output_tag: &'static str,
    pub attribute_renames: Vec<(&'static str, &'static str)>,
    pub fixed_attribute: Option<(&'static str, &'static str)>,
    pub event: Option<EventBinding>,
    /// C# type of fields synthesized from this control's bindings.
    pub binding_type: &'static str,
}

impl ControlMapping {
    fn new(legacy_tag: &'static str, output_tag: &'static str) -> Self {
        ControlMapping {
            legacy_tag,
            output_tag,
            attribute_renames: COMMON_RENAMES.to_vec(),
            fixed_attribute: None,
            event: None,
            binding_type: DEFAULT_BINDING_TYPE,
        }
    }

    fn rename(mut self, from: &'static str, to: &'static str) -> Self {
        self.attribute_renames.push((from, to));
        self
    }

    fn fixed(mut self, name: &'static str, value: &'static str) -> Self {
        self.fixed_attribute = Some((name, value));
        self
    }

    fn event(mut self, legacy: &'static str, target: &'static str) -> Self {
        self.event = Some(EventBinding { legacy, target });
        self
    }

    fn binding_type(mut self, binding_type: &'static str) -> Self {
        self.binding_type = binding_type;
        self
    }

    pub fn is_binding(target: &str) -> bool {
        target.starts_with(BINDING_MARKER)
    }
}

static CONTROLS: LazyLock<Vec<ControlMapping>> = LazyLock::new(|| {
    vec![
        ControlMapping::new("asp:Button", "button")
            .rename("Text", "@bind-Value")
            .event("OnClick", "@onclick"),
        ControlMapping::new("asp:LinkButton", "a")
            .rename("PostBackUrl", "href")
            .event("OnClick", "@onclick"),
        ControlMapping::new("asp:TextBox", "input")
            .rename("Text", "@bind")
            .rename("MaxLength", "maxlength")
            .event("OnTextChanged", "@bind:after"),
        ControlMapping::new("asp:Label", "span"),
        ControlMapping::new("asp:Literal", "span"),
        ControlMapping::new("asp:DropDownList", "select")
            .rename("SelectedValue", "@bind")
            .event("OnSelectedIndexChanged", "@bind:after"),
        ControlMapping::new("asp:CheckBox", "input")
            .fixed("type", "checkbox")
            .rename("Checked", "@bind")
            .event("OnCheckedChanged", "@bind:after")
            .binding_type("bool"),
        ControlMapping::new("asp:RadioButton", "input")
            .fixed("type", "radio")
            .rename("Checked", "@bind")
            .rename("GroupName", "name")
            .event("OnCheckedChanged", "@bind:after")
            .binding_type("bool"),
        ControlMapping::new("asp:HyperLink", "a").rename("NavigateUrl", "href"),
        ControlMapping::new("asp:Image", "img")
            .rename("ImageUrl", "src")
            .rename("AlternateText", "alt"),
        ControlMapping::new("asp:HiddenField", "input")
            .fixed("type", "hidden")
            .rename("Value", "@bind"),
        ControlMapping::new("asp:Panel", "div"),
    ]
});

static INDEX: LazyLock<AHashMap<String, usize>> = LazyLock::new(|| {
    CONTROLS
        .iter()
        .enumerate()
        .map(|(i, control)| (control.legacy_tag.to_ascii_lowercase(), i))
        .collect()
});

pub fn controls() -> &'static [ControlMapping] {
    &CONTROLS
}

/// Find the mapping for a tag name, ignoring case.
pub fn lookup(tag: &str) -> Option<&'static ControlMapping> {
    INDEX.get(&tag.to_ascii_lowercase()).map(|&i| &CONTROLS[i])
}

/// The canonical spelling of a known legacy tag, if `tag` is one in any casing.
pub fn canonical_tag(tag: &str) -> Option<&'static str> {
    lookup(tag).map(|control| control.legacy_tag)
}

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}
