// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PÁGINAS HTML - formulário, resultado e erros
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use pulldown_cmark::{html, Event, Options, Parser};

const TITLE: &str = "Content Generation with AI Agents";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #222; }
form { display: flex; gap: .5rem; margin-bottom: 1.5rem; }
input[name=topic] { flex: 1; padding: .5rem; font-size: 1rem; }
button { padding: .5rem 1rem; font-size: 1rem; cursor: pointer; }
#busy { display: none; color: #555; margin-bottom: 1rem; }
#busy.active { display: block; }
.error { color: #b00020; background: #fdecea; padding: .75rem; border-radius: 4px; }
article { line-height: 1.6; }
"#;

/// Página inicial com o formulário vazio
pub fn index_page() -> String {
    layout("", "")
}

/// Página com o post gerado (markdown → HTML)
pub fn result_page(topic: &str, markdown: &str) -> String {
    let body = format!("<article>\n{}</article>", render_markdown(markdown));
    layout(topic, &body)
}

/// Página com a mensagem de erro
pub fn error_page(topic: &str, message: &str) -> String {
    let body = format!("<p class=\"error\">{}</p>", escape_html(message));
    layout(topic, &body)
}

fn layout(topic: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<h1>{title}</h1>
<form method="post" action="/generate" onsubmit="document.getElementById('busy').classList.add('active')">
<input type="text" name="topic" placeholder="Enter the topic" value="{topic}">
<button type="submit">Generate Content</button>
</form>
<div id="busy">Generating content...</div>
{body}
</body>
</html>
"#,
        title = TITLE,
        style = STYLE,
        topic = escape_html(topic),
        body = body,
    )
}

/// Converte markdown em HTML.
///
/// HTML cru vindo do modelo vira texto escapado.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Escapa caracteres especiais de HTML
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & \"b\""), "a &amp; &quot;b&quot;");
    }

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Title\n\nSome **bold** text.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_markdown_strips_raw_html() {
        let html = render_markdown("Hello <script>alert(1)</script>\n\n<div onclick=\"x\">hi</div>\n");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<div"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_pages_keep_topic_escaped() {
        let page = result_page("<b>Rust</b>", "body");
        assert!(page.contains("value=\"&lt;b&gt;Rust&lt;/b&gt;\""));
        assert!(page.contains("Generate Content"));

        let page = error_page("", "Please enter a topic.");
        assert!(page.contains("<p class=\"error\">Please enter a topic.</p>"));
    }

    #[test]
    fn test_index_has_form() {
        let page = index_page();
        assert!(page.contains("action=\"/generate\""));
        assert!(page.contains("name=\"topic\""));
        assert!(!page.contains("<article>"));
    }
}
