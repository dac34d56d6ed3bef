// ABOUTME: Renders a titled list of chapters into a downloadable plain-text or HTML book.
// ABOUTME: Text is escaped for HTML output and the file name is derived from the title.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n\s*\n").unwrap());

/// File name stem used when the title has no usable characters.
const FALLBACK_STEM: &str = "book";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    #[default]
    Txt,
    Html,
}

impl BookFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            BookFormat::Txt => "text/plain; charset=utf-8",
            BookFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            BookFormat::Txt => "txt",
            BookFormat::Html => "html",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    pub title: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRequest {
    pub title: String,
    pub author: Option<String>,
    pub chapters: Vec<Chapter>,
    pub format: BookFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBook {
    pub content_type: &'static str,
    pub file_name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("a book needs at least one chapter")]
    NoChapters,
}

pub fn render_book(request: &BookRequest) -> Result<RenderedBook, BookError> {
    if request.chapters.is_empty() {
        return Err(BookError::NoChapters);
    }

    let body = match request.format {
        BookFormat::Txt => render_txt(request),
        BookFormat::Html => render_html(request),
    };

    Ok(RenderedBook {
        content_type: request.format.content_type(),
        file_name: format!("{}.{}", file_stem(&request.title), request.format.extension()),
        body,
    })
}

fn author(request: &BookRequest) -> Option<&str> {
    request
        .author
        .as_deref()
        .map(str::trim)
        .filter(|author| !author.is_empty())
}

fn chapter_heading(number: usize, chapter: &Chapter) -> String {
    match chapter.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("Chapter {number}: {title}"),
        None => format!("Chapter {number}"),
    }
}

fn render_txt(request: &BookRequest) -> String {
    let mut out = String::new();
    out.push_str(request.title.trim());
    out.push('\n');
    if let Some(author) = author(request) {
        out.push_str(&format!("by {author}\n"));
    }

    for (i, chapter) in request.chapters.iter().enumerate() {
        out.push('\n');
        out.push_str(&chapter_heading(i + 1, chapter));
        out.push_str("\n\n");
        out.push_str(chapter.text.trim());
        out.push('\n');
    }
    out
}

fn render_html(request: &BookRequest) -> String {
    let title = escape_html(request.title.trim());
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n"));
    if let Some(author) = author(request) {
        out.push_str(&format!("<p class=\"author\">by {}</p>\n", escape_html(author)));
    }

    for (i, chapter) in request.chapters.iter().enumerate() {
        out.push_str("<section>\n");
        out.push_str(&format!("<h2>{}</h2>\n", escape_html(&chapter_heading(i + 1, chapter))));
        for paragraph in PARAGRAPH_BREAK_RE
            .split(&chapter.text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            out.push_str(&format!("<p>{}</p>\n", escape_html(paragraph)));
        }
        out.push_str("</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Lowercase ASCII slug of `title`; runs of other characters become one dash.
pub fn file_stem(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(format: BookFormat) -> BookRequest {
        BookRequest {
            title: "My <Great> Show".into(),
            author: Some("Jane & John".into()),
            chapters: vec![
                Chapter {
                    title: Some("Intro".into()),
                    text: "First paragraph.\n\nSecond paragraph.".into(),
                },
                Chapter {
                    title: None,
                    text: "  Closing words.  ".into(),
                },
            ],
            format,
        }
    }

    #[test]
    fn test_render_txt() {
        let book = render_book(&request(BookFormat::Txt)).unwrap();
        assert_eq!(book.content_type, "text/plain; charset=utf-8");
        assert_eq!(book.file_name, "my-great-show.txt");
        assert_eq!(
            book.body,
            "My <Great> Show\nby Jane & John\n\nChapter 1: Intro\n\nFirst paragraph.\n\nSecond paragraph.\n\nChapter 2\n\nClosing words.\n"
        );
    }

    #[test]
    fn test_render_html_escapes_and_splits_paragraphs() {
        let book = render_book(&request(BookFormat::Html)).unwrap();
        assert_eq!(book.content_type, "text/html; charset=utf-8");
        assert_eq!(book.file_name, "my-great-show.html");
        assert!(book.body.starts_with("<!DOCTYPE html>"));
        assert!(book.body.contains("<title>My &lt;Great&gt; Show</title>"));
        assert!(book.body.contains("<p class=\"author\">by Jane &amp; John</p>"));
        assert!(book.body.contains("<h2>Chapter 1: Intro</h2>\n<p>First paragraph.</p>\n<p>Second paragraph.</p>"));
        assert!(book.body.contains("<h2>Chapter 2</h2>\n<p>Closing words.</p>"));
        assert_eq!(book.body.matches("<section>").count(), 2);
        assert!(!book.body.contains("<Great>"));
    }

    #[test]
    fn test_no_chapters_rejected() {
        let req = BookRequest {
            title: "Empty".into(),
            ..Default::default()
        };
        assert_eq!(render_book(&req), Err(BookError::NoChapters));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Hello, World!"), "hello-world");
        assert_eq!(file_stem("  --Já vu--  "), "j-vu");
        assert_eq!(file_stem("???"), "book");
        assert_eq!(file_stem(""), "book");
    }

    #[test]
    fn test_request_defaults_from_json() {
        let req: BookRequest =
            serde_json::from_str(r#"{"title":"T","chapters":[{"text":"x"}]}"#).unwrap();
        assert_eq!(req.format, BookFormat::Txt);
        assert_eq!(req.chapters[0].title, None);
    }
}
