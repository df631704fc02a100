//! Helpers shared by the report and dashboard templates.

use crate::config::RenderConfig;

/// Styles common to both documents.
pub(crate) const BASE_STYLE: &str = r#"
        :root {
            --bg-primary: #ffffff;
            --bg-secondary: #f9fafb;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #e5e7eb;
            --accent-color: #3b82f6;
        }
        .dark {
            --bg-primary: #111827;
            --bg-secondary: #1f2937;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --border-color: #374151;
            --accent-color: #60a5fa;
        }
        @media (prefers-color-scheme: dark) {
            :root:not(.light) {
                --bg-primary: #111827;
                --bg-secondary: #1f2937;
                --text-primary: #f9fafb;
                --text-secondary: #9ca3af;
                --border-color: #374151;
                --accent-color: #60a5fa;
            }
        }
        body {
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            line-height: 1.5;
            margin: 2rem;
        }
        header img.logo {
            max-height: 80px;
            float: right;
        }
        h2 {
            border-bottom: 1px solid var(--border-color);
            padding-bottom: 0.25rem;
        }
        table.dataframe {
            border-collapse: collapse;
            font-size: 0.875rem;
        }
        table.dataframe th, table.dataframe td {
            border: 1px solid var(--border-color);
            padding: 0.25rem 0.5rem;
        }
        .meta {
            color: var(--text-secondary);
            font-size: 0.875rem;
        }
        footer {
            margin-top: 2rem;
            border-top: 1px solid var(--border-color);
            color: var(--text-secondary);
            font-size: 0.875rem;
        }
        @media print {
            .no-print { display: none !important; }
            body { font-size: 10pt; }
        }
"#;

/// Escape HTML special characters.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Apply output post-processing selected by the render config.
pub(crate) fn finish(html: String, config: &RenderConfig) -> String {
    if !config.minify {
        return html;
    }
    let cfg = minify_html::Cfg {
        minify_js: true,
        minify_css: true,
        ..Default::default()
    };
    String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
}

/// Generator version stamped into documents.
pub(crate) fn generator_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Date stamp for the document footer.
pub(crate) fn date_stamp() -> String {
    chrono::Local::now().format("%m/%d/%Y").to_string()
}
