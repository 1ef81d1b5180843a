//! Media URL template substitution.

use std::{collections::HashMap, sync::LazyLock};

use regex::{Regex, Replacer};

use crate::{locator::Locator, mpd::Representation};

// From https://dashif.org/docs/DASH-IF-IOP-v4.3.pdf:
// "For the avoidance of doubt, only %0[width]d is permitted and no other identifiers. The reason
// is that such a string replacement can be easily implemented without requiring a specific library."
//
// Instead of pulling in C printf() or a reimplementation such as the printf_compat crate, we reimplement
// this functionality directly.
//
// Example template: "$RepresentationID$/$Number%06d$.m4s"
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(RepresentationID|Number|SubNumber|Time|Bandwidth)(?:%0(\d+)d)?\$").unwrap()
});

pub struct Template<'a> {
    args: HashMap<&'a str, String>,
}

impl Template<'_> {
    pub const REPRESENTATION_ID: &'static str = "RepresentationID";
    pub const NUMBER: &'static str = "Number";
    pub const SUB_NUMBER: &'static str = "SubNumber";
    pub const TIME: &'static str = "Time";
    pub const BANDWIDTH: &'static str = "Bandwidth";

    pub fn new() -> Self {
        Self {
            args: HashMap::with_capacity(5),
        }
    }

    pub fn insert(&mut self, key: &'static str, value: String) -> &mut Self {
        self.args.insert(key, value);
        self
    }

    pub fn insert_optional(&mut self, key: &'static str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.args.insert(key, value);
        }
        self
    }

    /// Substitutes every known placeholder that has a value. Placeholders
    /// without a value, and unknown identifiers, are left intact.
    pub fn resolve(&self, template: &str) -> String {
        TEMPLATE_REGEX
            .replace_all(template, TemplateReplacer(&self.args))
            .to_string()
    }

    /// Whether `resolved` still contains a known placeholder, i.e. one
    /// that had no value during [`Template::resolve`].
    pub fn is_fully_resolved(resolved: &str) -> bool {
        !TEMPLATE_REGEX.is_match(resolved)
    }
}

impl Default for Template<'_> {
    fn default() -> Self {
        Self::new()
    }
}

struct TemplateReplacer<'a>(&'a HashMap<&'a str, String>);

impl Replacer for TemplateReplacer<'_> {
    fn replace_append(&mut self, caps: &regex::Captures<'_>, dst: &mut String) {
        let key = caps.get(1).unwrap().as_str();
        let Some(value) = self.0.get(key) else {
            dst.push_str(caps.get(0).unwrap().as_str());
            return;
        };

        let width = caps.get(2).map(|m| m.as_str().parse().unwrap());
        if let Some(width) = width {
            dst.push_str(&format!("{value:0>width$}", width = width));
        } else {
            dst.push_str(value.as_str());
        }
    }
}

/// Resolves one segment's media URL from the representation's template.
///
/// Returns `None` when the template cannot produce a URL: a known
/// placeholder remained unfilled (e.g. `$RepresentationID$` on a
/// representation without an id), or the substituted string does not
/// form a valid URL against the representation's base mirrors.
pub fn resolve_media_url(
    representation: &Representation,
    segment_number: u64,
    time: u64,
    sub_number: u64,
    bandwidth: Option<u64>,
) -> Option<Locator> {
    let media_url_template = representation
        .segment_template
        .as_ref()
        .and_then(|template| template.media_url_template.as_deref())?;

    let mut template = Template::new();
    template
        .insert_optional(Template::REPRESENTATION_ID, representation.id.clone())
        .insert(Template::NUMBER, segment_number.to_string())
        .insert(Template::SUB_NUMBER, sub_number.to_string())
        .insert(Template::TIME, time.to_string())
        .insert_optional(Template::BANDWIDTH, bandwidth.map(|b| b.to_string()));

    let resolved = template.resolve(media_url_template);
    if !Template::is_fully_resolved(&resolved) {
        return None;
    }

    Locator::resolve(&representation.base_urls, &resolved).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpd::SegmentTemplate;

    #[test]
    fn test_template_replace() {
        let mut template = Template::new();
        template.insert(Template::REPRESENTATION_ID, "1".to_string());
        template.insert(Template::NUMBER, "2".to_string());
        template.insert(Template::TIME, "3".to_string());
        template.insert(Template::BANDWIDTH, "4".to_string());

        // Single digit
        assert_eq!(template.resolve("$RepresentationID$"), "1".to_string());
        assert_eq!(template.resolve("$Number$"), "2".to_string());
        assert_eq!(template.resolve("$Time$"), "3".to_string());
        assert_eq!(template.resolve("$Bandwidth$"), "4".to_string());

        // Width
        assert_eq!(template.resolve("$Number%02d$"), "02".to_string());
        assert_eq!(template.resolve("$Time%06d$"), "000003".to_string());

        // Mixed variables with width
        assert_eq!(
            template.resolve("$RepresentationID%02d$-$Number%09d$"),
            "01-000000002".to_string()
        );

        // Unknown variable
        assert_eq!(template.resolve("$Unknown$"), "$Unknown$".to_string());
    }

    #[test]
    fn test_template_variable_not_defined() {
        let template = Template::new();
        assert_eq!(
            template.resolve("$RepresentationID$"),
            "$RepresentationID$".to_string()
        );
        assert!(!Template::is_fully_resolved(
            &template.resolve("$RepresentationID$")
        ));
    }

    #[test]
    fn test_resolve_media_url() {
        let representation = Representation {
            id: Some("video-1080p".to_string()),
            base_urls: vec!["https://cdn.example.com/live/".parse().unwrap()],
            segment_template: Some(SegmentTemplate {
                media_url_template: Some("$RepresentationID$/$Time$-$Number%04d$.m4s".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let locator = resolve_media_url(&representation, 12, 90000, 0, None).unwrap();
        assert_eq!(
            locator.primary().as_str(),
            "https://cdn.example.com/live/video-1080p/90000-0012.m4s"
        );
    }

    #[test]
    fn test_resolve_media_url_missing_representation_id() {
        let representation = Representation {
            base_urls: vec!["https://cdn.example.com/live/".parse().unwrap()],
            segment_template: Some(SegmentTemplate {
                media_url_template: Some("$RepresentationID$/$Number$.m4s".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(resolve_media_url(&representation, 1, 0, 0, None).is_none());
    }
}
