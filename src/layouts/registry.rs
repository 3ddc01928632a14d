// Registry of built-in layout descriptors

use super::descriptor::{LayoutDescriptor, ModelId};
use super::{ar5rm, bf888, uv5r};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Built-in layouts, in detection priority order
pub static BUILTIN_LAYOUTS: &[&LayoutDescriptor] = &[&uv5r::LAYOUT, &bf888::LAYOUT, &ar5rm::LAYOUT];

lazy_static::lazy_static! {
    static ref LAYOUT_REGISTRY: HashMap<ModelId, &'static LayoutDescriptor> = BUILTIN_LAYOUTS
        .iter()
        .map(|layout| (layout.model, *layout))
        .collect();

    /// One case-insensitive pattern per layout covering all of its tokens
    static ref TOKEN_PATTERNS: Vec<(ModelId, Regex)> = BUILTIN_LAYOUTS
        .iter()
        .filter_map(|layout| {
            let alternatives: Vec<String> =
                layout.filename_tokens.iter().map(|t| token_pattern(t)).collect();
            if alternatives.is_empty() {
                return None;
            }
            Regex::new(&format!("(?i){}", alternatives.join("|")))
                .ok()
                .map(|re| (layout.model, re))
        })
        .collect();
}

/// Turn a model token into a regex where each `-` also matches `_`, a space,
/// or nothing: `UV-5R` matches `uv5r`, `UV_5R` and `uv 5r`
fn token_pattern(token: &str) -> String {
    let parts: Vec<String> = token.split('-').map(regex::escape).collect();
    format!("(?:{})", parts.join("[-_ ]?"))
}

/// Get a layout by model id
pub fn get_layout(model: ModelId) -> Option<&'static LayoutDescriptor> {
    LAYOUT_REGISTRY.get(&model).copied()
}

/// First layout (in priority order) whose filename token occurs in `text`
pub fn match_token(text: &str) -> Option<&'static LayoutDescriptor> {
    TOKEN_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .and_then(|(model, _)| get_layout(*model))
}

/// Look up a layout from a user-supplied model name
///
/// Accepts the exact model id in any case, or anything its filename tokens
/// recognize.
pub fn find_layout(name: &str) -> Option<&'static LayoutDescriptor> {
    let name = name.trim();
    BUILTIN_LAYOUTS
        .iter()
        .copied()
        .find(|layout| layout.model.as_str().eq_ignore_ascii_case(name))
        .or_else(|| match_token(name))
}

/// List all layouts in detection priority order
pub fn list_layouts() -> Vec<&'static LayoutDescriptor> {
    BUILTIN_LAYOUTS.to_vec()
}

/// List layouts grouped by vendor
pub fn list_layouts_by_vendor() -> BTreeMap<&'static str, Vec<&'static LayoutDescriptor>> {
    let mut by_vendor: BTreeMap<&'static str, Vec<&'static LayoutDescriptor>> = BTreeMap::new();

    for layout in list_layouts() {
        by_vendor.entry(layout.vendor).or_default().push(layout);
    }

    for layouts in by_vendor.values_mut() {
        layouts.sort_by(|a, b| a.model.cmp(&b.model));
    }

    by_vendor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layouts_are_consistent() {
        for layout in list_layouts() {
            assert_eq!(layout.check(), Ok(()), "{}", layout.model);
            assert_eq!(get_layout(layout.model), Some(layout));
        }
        assert_eq!(LAYOUT_REGISTRY.len(), BUILTIN_LAYOUTS.len());
    }

    #[test]
    fn test_token_pattern() {
        assert_eq!(token_pattern("UV-5R"), "(?:UV[-_ ]?5R)");
        assert_eq!(token_pattern("AR.5"), r"(?:AR\.5)");
    }

    #[test]
    fn test_match_token() {
        let model = |text: &str| match_token(text).map(|l| l.model);

        assert_eq!(model("Baofeng_UV-5R_20240101.img"), Some(ModelId("UV-5R")));
        assert_eq!(model("my uv5r backup.img"), Some(ModelId("UV-5R")));
        assert_eq!(model("uv_82.img"), Some(ModelId("UV-5R")));
        assert_eq!(model("bf888s-club.img"), Some(ModelId("BF-888S")));
        assert_eq!(model("Abbree AR 5RM.img"), Some(ModelId("AR-5RM")));
        assert_eq!(model("radio.img"), None);
    }

    #[test]
    fn test_find_layout() {
        assert_eq!(find_layout("uv-5r").map(|l| l.model), Some(ModelId("UV-5R")));
        assert_eq!(find_layout("BF-888S").map(|l| l.model), Some(ModelId("BF-888S")));
        assert_eq!(find_layout("h777").map(|l| l.model), Some(ModelId("BF-888S")));
        assert!(find_layout("IC-9700").is_none());
    }

    #[test]
    fn test_list_by_vendor() {
        let by_vendor = list_layouts_by_vendor();
        let baofeng: Vec<_> = by_vendor["Baofeng"].iter().map(|l| l.model).collect();
        assert_eq!(baofeng, vec![ModelId("BF-888S"), ModelId("UV-5R")]);
        assert_eq!(by_vendor["Abbree"].len(), 1);
    }
}
