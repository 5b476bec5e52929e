//! Page shell
//!
//! The static chrome shared by every page. Rendered once from configuration
//! into the markup before and after the content slot.

use crate::config::{ChromeConfig, MenuEntry};

/// Pre-rendered page chrome
#[derive(Debug, Clone)]
pub struct PageShell {
    head: String,
    tail: String,
}

impl PageShell {
    pub fn new(chrome: &ChromeConfig) -> Self {
        Self {
            head: render_head(chrome),
            tail: render_tail(chrome),
        }
    }

    /// Full document with `fragment` embedded verbatim in the content slot
    pub fn render(&self, fragment: &str) -> String {
        let mut html = String::with_capacity(self.head.len() + fragment.len() + self.tail.len());
        html.push_str(&self.head);
        html.push_str(fragment);
        html.push_str(&self.tail);
        html
    }
}

fn render_head(chrome: &ChromeConfig) -> String {
    let stylesheets: String = chrome
        .stylesheets
        .iter()
        .map(|href| {
            format!(
                "    <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"/>\n",
                html_escape(href)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
  <head>
    <meta http-equiv="Content-Type" content="text/html;charset=UTF-8"/>
    <meta http-equiv="Content-Language" content="{language}"/>
    <title>{title}</title>
    <meta name="Author" content="{author}"/>
    <meta name="Keywords" content="{keywords}"/>
    <meta name="Description" content="{description}"/>
    <meta name="Robots" content="all"/>
    <meta name="revisit-after" content="30 days"/>
    <link rel="shortcut icon" href="{favicon}"/>
{stylesheets}  </head>
  <body>
    <div id="world">
      <div id="top">
        <div id="d3-logo"></div>
        <div id="top-content">
          <div style="font-family: Impact; font-size: 40px; line-height: 100%;"><span style="font-size:50px;">d</span>ynamic and<br/><span style="font-size:50px;">d</span>ecentralized<br/><span style="font-size:50px;">d</span>istribution</div>
        </div>
      </div>
      <div id="menubar">{menu}</div>
      <div id="content" style="clear: both;">
"#,
        language = html_escape(&chrome.language),
        title = html_escape(&chrome.title),
        author = html_escape(&chrome.author),
        keywords = html_escape(&chrome.keywords),
        description = html_escape(&chrome.description),
        favicon = html_escape(&chrome.favicon),
        menu = render_menu(&chrome.menu),
    )
}

fn render_tail(chrome: &ChromeConfig) -> String {
    format!(
        "\n      </div>\n      <div id=\"footer\">{}</div>\n    </div>\n  </body>\n</html>\n",
        html_escape(&chrome.footer)
    )
}

fn render_menu(menu: &[MenuEntry]) -> String {
    menu.iter()
        .map(|entry| match &entry.href {
            Some(href) => format!(
                r#"<a href="{}">{}</a>"#,
                html_escape(href),
                html_escape(&entry.label)
            ),
            None => html_escape(&entry.label),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
