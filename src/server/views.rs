//! HTML views for the kiosk pages and fragments.

use crate::page::{ErrorView, PageBody, PageViewModel};

/// Full page shell.
///
/// The script reads its settings from `data-*` attributes and polls
/// `/image` and `/clock`. Those requests carry this page's URL as their
/// referer, so overrides in the address bar apply to them too.
pub fn index(page: &PageViewModel, asset_version: u64) -> String {
    let config = &page.config;
    let show_clock = config.show_time || config.show_date;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Kiosk</title>
    <link rel="stylesheet" href="/assets/kiosk.css?v={version}">
</head>
<body>
    <main id="kiosk" data-refresh="{refresh}" data-clock="{show_clock}">
        <div id="image"></div>
        <div id="clock"></div>
    </main>
    <footer id="version">v{kiosk_version}</footer>
    <script src="/assets/kiosk.js?v={version}"></script>
</body>
</html>"#,
        version = asset_version,
        refresh = config.refresh,
        show_clock = show_clock,
        kiosk_version = escape(page.kiosk_version),
    )
}

/// Slideshow frame fragment.
pub fn image(page: &PageViewModel) -> String {
    let PageBody::Image(image) = &page.body else {
        return String::new();
    };

    let mut html = String::from(r#"<div class="frame">"#);
    if !image.image_blur_data.is_empty() {
        html.push_str(&format!(
            r#"<img class="frame-blur" src="{}" alt="">"#,
            escape(&image.image_blur_data)
        ));
    }
    html.push_str(&format!(
        r#"<img class="frame-image" src="{}" alt="">"#,
        escape(&image.image_data)
    ));
    if !image.image_date.is_empty() {
        html.push_str(&format!(
            r#"<div class="frame-date">{}</div>"#,
            escape(&image.image_date)
        ));
    }
    html.push_str("</div>");
    html
}

/// Clock fragment.
pub fn clock(page: &PageViewModel) -> String {
    let PageBody::Clock(clock) = &page.body else {
        return String::new();
    };

    let mut html = String::from(r#"<div class="clock">"#);
    if !clock.clock_date.is_empty() {
        html.push_str(&format!(
            r#"<div class="clock-date">{}</div>"#,
            escape(&clock.clock_date)
        ));
    }
    if !clock.clock_time.is_empty() {
        html.push_str(&format!(
            r#"<div class="clock-time">{}</div>"#,
            escape(&clock.clock_time)
        ));
    }
    html.push_str("</div>");
    html
}

/// Error fragment shown in place of an image.
pub fn error(view: &ErrorView) -> String {
    format!(
        r#"<div class="error"><h1>{}</h1><p>{}</p></div>"#,
        escape(&view.title),
        escape(&view.message)
    )
}

/// Escape text for HTML element content and double-quoted attributes.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockView;
    use crate::config::Config;
    use crate::pipeline::DisplayImage;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_image_fragment_omits_empty_parts() {
        let page = PageViewModel::image(
            Config::default(),
            DisplayImage {
                image_data: "data:image/png;base64,AAAA".into(),
                ..Default::default()
            },
        );
        let html = image(&page);
        assert!(html.contains(r#"class="frame-image" src="data:image/png;base64,AAAA""#));
        assert!(!html.contains("frame-blur"));
        assert!(!html.contains("frame-date"));
    }

    #[test]
    fn test_clock_fragment() {
        let page = PageViewModel::clock(
            Config::default(),
            ClockView {
                clock_time: "2:05PM".into(),
                clock_date: String::new(),
            },
        );
        let html = clock(&page);
        assert!(html.contains(r#"<div class="clock-time">2:05PM</div>"#));
        assert!(!html.contains("clock-date"));
    }

    #[test]
    fn test_index_carries_refresh() {
        let config = Config {
            refresh: 15,
            show_time: true,
            ..Default::default()
        };
        let html = index(&PageViewModel::shell(config), 42);
        assert!(html.contains(r#"data-refresh="15""#));
        assert!(html.contains(r#"data-clock="true""#));
        assert!(html.contains("kiosk.js?v=42"));
    }

    #[test]
    fn test_error_fragment_is_escaped() {
        let html = error(&ErrorView {
            title: "<b>".into(),
            message: "x & y".into(),
        });
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("x &amp; y"));
    }
}
