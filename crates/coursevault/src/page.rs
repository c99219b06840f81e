//! Minimal HTML shell around rendered pages.

use crate::service::RenderedPage;
use coursevault_core::TocItem;
use coursevault_render::markup::escape_html;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 60rem; margin: 0 auto; padding: 1rem 2rem; line-height: 1.5; }
.layout { display: flex; gap: 2rem; }
.page-toc { flex: 0 0 14rem; font-size: 0.9rem; }
.page-toc ul { list-style: none; padding-left: 0.8rem; }
article { flex: 1; min-width: 0; }
.callout { border-left: 4px solid #448aff; background: #f3f7ff; margin: 1rem 0; padding: 0.5rem 1rem; }
.callout-title { font-weight: 600; cursor: pointer; }
.callout[data-collapsed="true"] .callout-content { display: none; }
.reference-missing { color: #c00; font-style: italic; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('.callout-title').forEach(function (title) {
  title.addEventListener('click', function () {
    var callout = title.parentElement;
    callout.dataset.collapsed = callout.dataset.collapsed === 'true' ? 'false' : 'true';
  });
});
"#;

/// Full HTML document for a rendered page.
pub fn page_html(page: &RenderedPage) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | {course}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <header><a href=\"/{slug}\">{course}</a></header>\n\
         <div class=\"layout\">\n{toc}<article>\n<h1 class=\"page-title\">{title}</h1>\n{body}</article>\n</div>\n\
         <script>{script}</script>\n</body>\n</html>\n",
        title = escape_html(&page.title),
        course = escape_html(&page.course_title),
        slug = escape_html(&page.course_slug),
        style = STYLE,
        toc = toc_html(&page.toc),
        body = page.html,
        script = SCRIPT,
    )
}

/// Sidebar list of headings; empty when the page has none.
fn toc_html(toc: &[TocItem]) -> String {
    if toc.is_empty() {
        return String::new();
    }
    let mut html = String::from("<nav class=\"page-toc\"><ul>\n");
    for item in toc {
        html.push_str(&format!(
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
            item.level,
            escape_html(&item.id),
            escape_html(&item.title)
        ));
    }
    html.push_str("</ul></nav>\n");
    html
}

/// Body of a not-found response.
pub fn not_found_html(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Not found</title>\n</head>\n<body>\n<h1>Not found</h1>\n<p>{}</p>\n</body>\n</html>\n",
        escape_html(message)
    )
}
