//! Accessibility audit over rendered HTML.
//!
//! Checks are heuristics over the parsed DOM and do not replace a
//! screen-reader pass.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    ImageMissingAlt,
    LinkWithoutName,
    ButtonWithoutName,
    ControlWithoutLabel,
    HeadingLevelSkipped,
    EmptyHeading,
    DuplicateId,
    MissingLang,
    MissingTitle,
}

impl Rule {
    pub fn severity(&self) -> Severity {
        match self {
            Rule::HeadingLevelSkipped | Rule::EmptyHeading => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub rule: Rule,
    pub severity: Severity,
    /// Short `tag#id.class` description of the offending element
    pub element: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {}: {}", level, self.element, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    pub issues: Vec<Issue>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn count(&self, rule: Rule) -> usize {
        self.issues.iter().filter(|i| i.rule == rule).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    fn push(&mut self, rule: Rule, element: &ElementRef<'_>, message: impl Into<String>) {
        self.issues.push(Issue {
            rule,
            severity: rule.severity(),
            element: describe(element),
            message: message.into(),
        });
    }
}

/// Audit a complete page, including document-level checks
pub fn audit_document(html: &str) -> AuditReport {
    let document = Html::parse_document(html);
    let mut report = AuditReport::default();

    let root = document.root_element();
    if root.value().attr("lang").map_or(true, |lang| lang.trim().is_empty()) {
        report.push(Rule::MissingLang, &root, "page does not declare a language");
    }
    let has_title = document
        .select(&selector("title"))
        .any(|title| !accessible_text(&title).is_empty());
    if !has_title {
        report.push(Rule::MissingTitle, &root, "page has no title");
    }

    audit_elements(&document, &mut report, true);
    debug!("Document audit found {} issues", report.issues.len());
    report
}

/// Audit an HTML fragment such as a single card
pub fn audit_fragment(html: &str) -> AuditReport {
    let fragment = Html::parse_fragment(html);
    let mut report = AuditReport::default();
    audit_elements(&fragment, &mut report, false);
    report
}

fn audit_elements(html: &Html, report: &mut AuditReport, document: bool) {
    for img in html.select(&selector("img")) {
        if img.value().attr("alt").is_none() {
            report.push(Rule::ImageMissingAlt, &img, "image has no alt attribute");
        }
    }

    for link in html.select(&selector("a[href]")) {
        if accessible_name(html, &link).is_empty() {
            report.push(Rule::LinkWithoutName, &link, "link has no accessible name");
        }
    }

    for button in html.select(&selector("button, [role=button]")) {
        if accessible_name(html, &button).is_empty() {
            report.push(Rule::ButtonWithoutName, &button, "button has no accessible name");
        }
    }

    check_labels(html, report);
    check_headings(html, report, document);
    check_ids(html, report);
}

fn check_labels(html: &Html, report: &mut AuditReport) {
    let labelled: HashSet<String> = html
        .select(&selector("label[for]"))
        .filter_map(|label| label.value().attr("for"))
        .map(str::to_string)
        .collect();

    for control in html.select(&selector("input, select, textarea")) {
        let element = control.value();
        let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
        if element.name() == "input"
            && matches!(kind.as_str(), "hidden" | "submit" | "button" | "reset" | "image")
        {
            continue;
        }

        let has_aria = ["aria-label", "title"]
            .iter()
            .any(|attr| element.attr(attr).is_some_and(|v| !v.trim().is_empty()))
            || !labelled_by(html, &control).is_empty();
        let has_for = element.id().is_some_and(|id| labelled.contains(id));
        let wrapped = control
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| ancestor.value().name() == "label");

        if !(has_aria || has_for || wrapped) {
            report.push(Rule::ControlWithoutLabel, &control, "form control has no label");
        }
    }
}

fn check_headings(html: &Html, report: &mut AuditReport, document: bool) {
    let mut previous: Option<u8> = None;
    for heading in html.select(&selector("h1, h2, h3, h4, h5, h6")) {
        let level = heading_level(heading.value().name());

        if accessible_text(&heading).is_empty() {
            report.push(Rule::EmptyHeading, &heading, "heading has no text");
        }

        match previous {
            Some(prev) if level > prev + 1 => report.push(
                Rule::HeadingLevelSkipped,
                &heading,
                format!("heading jumps from h{} to h{}", prev, level),
            ),
            None if document && level != 1 => report.push(
                Rule::HeadingLevelSkipped,
                &heading,
                format!("first heading on the page is h{}", level),
            ),
            _ => {}
        }
        previous = Some(level);
    }
}

fn check_ids(html: &Html, report: &mut AuditReport) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for element in html.select(&selector("[id]")) {
        if let Some(id) = element.value().id() {
            let count = seen.entry(id.to_string()).or_insert(0);
            *count += 1;
            if *count == 2 {
                report.push(Rule::DuplicateId, &element, format!("id '{}' is used more than once", id));
            }
        }
    }
}

fn heading_level(name: &str) -> u8 {
    name.strip_prefix('h')
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

/// Name exposed to assistive technology: aria-labelledby targets,
/// aria-label, title, text content or the alt text of contained images
fn accessible_name(html: &Html, element: &ElementRef<'_>) -> String {
    let referenced = labelled_by(html, element);
    if !referenced.is_empty() {
        return referenced;
    }

    let value = element.value();
    for attr in ["aria-label", "title"] {
        if let Some(v) = value.attr(attr).map(str::trim).filter(|v| !v.is_empty()) {
            return v.to_string();
        }
    }

    let text = accessible_text(element);
    if !text.is_empty() {
        return text;
    }

    element
        .select(&selector("img[alt]"))
        .filter_map(|img| img.value().attr("alt"))
        .map(str::trim)
        .find(|alt| !alt.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Text of the elements named by `aria-labelledby`; ids that match nothing
/// contribute nothing
fn labelled_by(html: &Html, element: &ElementRef<'_>) -> String {
    let Some(ids) = element.value().attr("aria-labelledby") else {
        return String::new();
    };
    let candidates: Vec<ElementRef<'_>> = html.select(&selector("[id]")).collect();
    ids.split_whitespace()
        .filter_map(|id| candidates.iter().find(|el| el.value().id() == Some(id)))
        .map(accessible_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn accessible_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe(element: &ElementRef<'_>) -> String {
    let value = element.value();
    let mut out = value.name().to_string();
    if let Some(id) = value.id() {
        out.push('#');
        out.push_str(id);
    }
    for class in value.classes().take(2) {
        out.push('.');
        out.push_str(class);
    }
    out
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}
