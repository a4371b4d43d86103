use scraper::{ElementRef, Html, Node, Selector};

const HIDDEN_TAGS: [&str; 5] = ["head", "script", "style", "noscript", "template"];

const BLOCK_TAGS: [&str; 34] = [
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

pub struct Page {
    doc: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    /// `<link rel="canonical">`, falling back to `<meta property="og:url">`.
    pub fn canonical(&self) -> Option<String> {
        self.first_attr(r#"link[rel~="canonical"][href]"#, "href")
            .or_else(|| self.first_attr(r#"meta[property="og:url"][content]"#, "content"))
    }

    pub fn title(&self) -> Option<String> {
        let sel = Selector::parse("title").ok()?;
        let title = self.doc.select(&sel).next()?.text().collect::<String>();
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    /// Text a reader would see: everything outside head/script/style/noscript/template.
    /// Inline markup joins without a separator; block boundaries become spaces.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        collect_text(self.doc.root_element(), &mut out);
        out
    }

    fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        let sel = Selector::parse(selector).ok()?;
        self.doc
            .select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_TAGS.contains(&name) {
        return;
    }
    let block = BLOCK_TAGS.contains(&name);
    if block {
        out.push(' ');
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text(el, out);
                }
            }
            _ => {}
        }
    }
    if block {
        out.push(' ');
    }
}

/// Strip tags and decode entities from an HTML fragment such as a CMS `title.rendered`.
pub fn fragment_text(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
}

/// Address comparison ignoring case and one trailing `/`.
pub fn same_url(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let strip = |s: &str| {
        let s = s.trim();
        s.strip_suffix('/').unwrap_or(s).to_lowercase()
    };
    strip(a) == strip(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html><head>
  <title> Komunikat – RCKiK </title>
  <link rel="stylesheet" href="/s.css">
  <link rel="canonical" href=" https://example.org/aktualnosci/komunikat ">
  <meta property="og:url" content="https://example.org/og">
  <script>var hidden = "grupie AB +";</script>
  <style>.x { content: "secret" }</style>
</head><body>
  <h1>Komunikat dot.&nbsp;pobierania krwi</h1>
  <noscript>enable js</noscript>
  <p>w grupie <b>AB</b> +</p>
</body></html>"#;

    #[test]
    fn canonical_prefers_link_rel() {
        let page = Page::parse(PAGE);
        assert_eq!(
            page.canonical().as_deref(),
            Some("https://example.org/aktualnosci/komunikat")
        );
    }

    #[test]
    fn canonical_falls_back_to_og_url() {
        let page = Page::parse(
            r#"<html><head>
            <meta property="og:url" content="https://example.org/og/">
            </head></html>"#,
        );
        assert_eq!(page.canonical().as_deref(), Some("https://example.org/og/"));
    }

    #[test]
    fn empty_canonical_is_absent() {
        let page = Page::parse(r#"<html><head><link rel="canonical" href="  "></head></html>"#);
        assert_eq!(page.canonical(), None);
    }

    #[test]
    fn visible_text_skips_scripts_styles_and_head() {
        let text = Page::parse(PAGE).visible_text();
        assert!(text.contains("Komunikat dot.\u{00A0}pobierania krwi"));
        assert!(text.contains("AB"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("secret"));
        assert!(!text.contains("enable js"));
        assert!(!text.contains("RCKiK"));
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        let page = Page::parse(
            "<html><body><p>Komunikat dot. pobierania krwi w grupie <b>A</b>B +</p>\
             <p>Zapra<span>szamy</span></p></body></html>",
        );
        let text = page.visible_text();
        assert!(text.contains("w grupie AB +"), "{text:?}");
        assert!(text.contains("Zapraszamy"));
    }

    #[test]
    fn block_boundaries_separate_words() {
        let page = Page::parse(
            "<html><body><ul><li>AB</li><li>Rh</li></ul>\
             <div>koniec</div>linia<br>druga</body></html>",
        );
        let text = crate::services::text_match::normalize(&page.visible_text());
        assert_eq!(text, "ab rh koniec linia druga");
    }

    #[test]
    fn title_is_trimmed() {
        assert_eq!(
            Page::parse(PAGE).title().as_deref(),
            Some("Komunikat – RCKiK")
        );
    }

    #[test]
    fn fragment_text_decodes_entities() {
        assert_eq!(
            fragment_text("Grupa AB&nbsp;+ &#8211; <em>pilne</em>"),
            "Grupa AB\u{00A0}+ \u{2013} pilne"
        );
    }

    #[test]
    fn same_url_ignores_case_and_one_trailing_slash() {
        assert!(same_url("https://Example.org/a/", "https://example.org/a"));
        assert!(!same_url("https://example.org/a", "https://example.org/b"));
        assert!(!same_url("", "https://example.org/a"));
    }
}
