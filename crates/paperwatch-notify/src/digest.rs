//! Daily digest rendering.
//!
//! Produces the subject line and HTML body for a batch of new papers, plus
//! a plain-text alternative for clients that refuse HTML.

use paperwatch_core::Paper;

/// Abstract preview length in characters.
pub const ABSTRACT_PREVIEW_CHARS: usize = 500;

/// Render the digest subject and HTML body for a batch of papers.
pub fn render(papers: &[Paper]) -> (String, String) {
    let subject = format!("PaperWatch Daily Digest - {} Papers", papers.len());

    let mut html = String::from("<h1>Daily Research Papers</h1>");
    for paper in papers {
        html.push_str(&format!(
            concat!(
                "\n<div style=\"margin-bottom: 20px; border-bottom: 1px solid #ccc; ",
                "padding-bottom: 10px;\">\n",
                "  <h3><a href=\"{url}\">{title}</a></h3>\n",
                "  <p><strong>Authors:</strong> {authors}</p>\n",
                "  <p><strong>Category:</strong> {category}</p>\n",
                "  <p>{preview}</p>\n",
                "  <p><em>Published: {published}</em></p>\n",
                "</div>"
            ),
            url = paper.abs_url(),
            title = escape_html(&paper.title),
            authors = escape_html(&paper.authors.join(", ")),
            category = escape_html(&paper.primary_category),
            preview = escape_html(&truncate_chars(&paper.abstract_text, ABSTRACT_PREVIEW_CHARS)),
            published = paper.published.format("%Y-%m-%d"),
        ));
    }

    (subject, html)
}

/// Render the plain-text alternative body.
pub fn render_text(papers: &[Paper]) -> String {
    let mut text = String::from("Daily Research Papers\n");
    for paper in papers {
        text.push_str(&format!(
            "\n- {} ({})\n  {}\n",
            paper.title,
            paper.published.format("%Y-%m-%d"),
            paper.abs_url()
        ));
    }
    text
}

/// Truncate to a character count, appending an ellipsis when text was cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Escape text for embedding in HTML content and attribute values.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
