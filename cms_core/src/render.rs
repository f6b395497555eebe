//! Markdown to HTML conversion.

use pulldown_cmark::{html, Parser};

/// Renders CommonMark to an HTML fragment. No extensions are enabled; the
/// fragment still needs to be wrapped in a page layout before serving.
pub fn render_markdown(input: &str) -> String {
    let parser = Parser::new(input);
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}
