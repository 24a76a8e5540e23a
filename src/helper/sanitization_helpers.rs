use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Strips all HTML tags from input, leaving plain text (names, titles,
/// authors, comment bodies). Entities are decoded afterwards so the stored
/// value is the text itself; templates escape it again on output.
pub fn strip_all_html(input: &str) -> String {
    let cleaned = ammonia::Builder::new()
        .tags(HashSet::new())
        .clean(input)
        .to_string();
    html_escape::decode_html_entities(&cleaned).trim().to_string()
}

/// Renders a markdown post description to HTML that is safe to embed.
pub fn render_markdown(markdown_input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown_input, options);
    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, parser);

    ammonia::Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .clean(&unsafe_html)
        .to_string()
}

fn slug_separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("slug separator pattern is valid"))
}

/// Lowercased slug that keeps letters and digits of any script (Hangul
/// included) and turns every other run into a single dash.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    slug_separators()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_all_html_keeps_text_only() {
        assert_eq!(strip_all_html("<b>Gangnam</b> R"), "Gangnam R");
        assert_eq!(strip_all_html("Coffee & Tea <script>alert(1)</script>"), "Coffee & Tea");
        assert_eq!(strip_all_html("  padded  "), "padded");
    }

    #[test]
    fn markdown_is_rendered_and_scripts_removed() {
        let rendered = render_markdown("## Hours\n\n**7am**<script>alert(1)</script>");
        assert!(rendered.contains("<h2>Hours</h2>"));
        assert!(rendered.contains("<strong>7am</strong>"));
        assert!(!rendered.contains("<script>"));
    }

    #[test]
    fn slugify_keeps_hangul_and_collapses_separators() {
        assert_eq!(slugify("더종로R점 -- Grand Opening!"), "더종로r점-grand-opening");
        assert_eq!(slugify("  Seoul / Busan  "), "seoul-busan");
        assert_eq!(slugify("!!!"), "");
    }
}
