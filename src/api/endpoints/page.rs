//! `GET /`: the analysis form (self-contained, no external resources).

use axum::extract::Query;
use axum::response::Html;
use serde::Deserialize;

use crate::i18n::{t, Language, TextKey};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub lang: Option<String>,
}

/// Unknown `lang` values fall back to English rather than erroring; the
/// page is navigation, not an API contract.
pub async fn index(Query(query): Query<PageQuery>) -> Html<String> {
    let language = query
        .lang
        .as_deref()
        .and_then(|code| code.parse::<Language>().ok())
        .unwrap_or_default();
    Html(render_page(language))
}

pub fn render_page(language: Language) -> String {
    let label = |key| escape_html(t(language, key));

    let options: String = Language::ALL
        .iter()
        .map(|lang| {
            let selected = if *lang == language { " selected" } else { "" };
            format!(
                r#"<option value="{code}"{selected}>{code}</option>"#,
                code = lang.code()
            )
        })
        .collect();

    PAGE_TEMPLATE
        .replace("%%LANG%%", language.code())
        .replace("%%DIR%%", if language.is_rtl() { "rtl" } else { "ltr" })
        .replace("%%LANG_OPTIONS%%", &options)
        .replace("%%TITLE%%", &label(TextKey::Title))
        .replace("%%DESC%%", &bold_markdown(&escape_html(t(language, TextKey::Description))))
        .replace("%%UPLOAD%%", &label(TextKey::Upload))
        .replace("%%NAME%%", &label(TextKey::Name))
        .replace("%%AGE%%", &label(TextKey::Age))
        .replace("%%EMAIL%%", &label(TextKey::Email))
        .replace("%%ANALYZE%%", &label(TextKey::Analyze))
        .replace("%%RESULT%%", &label(TextKey::Result))
        .replace("%%REPORT%%", &label(TextKey::Report))
        .replace("%%PREMIUM%%", &label(TextKey::Premium))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `**text**` → `<strong>text</strong>`.
fn bold_markdown(s: &str) -> String {
    s.split("**")
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                format!("<strong>{part}</strong>")
            } else {
                part.to_string()
            }
        })
        .collect()
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="%%LANG%%" dir="%%DIR%%">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>%%TITLE%%</title>
  <style>
    * { box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917; margin: 0; padding: 24px;
    }
    h1 { font-size: 26px; margin: 0 0 8px; }
    .row { display: flex; flex-wrap: wrap; gap: 24px; margin-top: 16px; }
    .col { flex: 1 1 320px; display: flex; flex-direction: column; gap: 10px; }
    label { font-size: 13px; color: #57534e; }
    input, select { padding: 10px; border: 1px solid #d6d3d1; border-radius: 8px; font-size: 15px; }
    .btn {
      padding: 14px; border-radius: 10px; border: none; font-size: 16px;
      background: #4a7c59; color: white; cursor: pointer;
    }
    .btn-secondary { background: white; color: #44403c; border: 1px solid #d6d3d1; }
    .out { min-height: 40px; padding: 10px; border: 1px solid #e7e5e4; border-radius: 8px; background: white; }
  </style>
</head>
<body>
  <h1>%%TITLE%%</h1>
  <p>%%DESC%%</p>

  <label for="lang">Language</label>
  <select id="lang" name="lang" onchange="location.search='?lang='+this.value">%%LANG_OPTIONS%%</select>

  <form id="analyze-form" class="row">
    <div class="col">
      <label for="image">%%UPLOAD%%</label>
      <input type="file" id="image" name="image" accept="image/*">
      <label for="name">%%NAME%%</label>
      <input type="text" id="name" name="name">
      <label for="age">%%AGE%%</label>
      <input type="text" id="age" name="age">
      <label for="email">%%EMAIL%%</label>
      <input type="text" id="email" name="email">
      <input type="hidden" name="lang" value="%%LANG%%">
      <button type="submit" class="btn">%%ANALYZE%%</button>
      <a href="https://www.who.int/health-topics/cancer" target="_blank" rel="noopener">🔗 Learn More About Brain Tumors</a>
    </div>
    <div class="col">
      <label>%%RESULT%%</label>
      <div class="out" id="result"></div>
      <label>Confidence</label>
      <div id="confidence"></div>
      <label>%%REPORT%%</label>
      <div class="out" id="report"></div>
      <label>%%PREMIUM%%</label>
      <div class="out" id="premium"></div>
      <label>Voice Output</label>
      <div class="out" id="voice"></div>
      <label>Email Status</label>
      <div class="out" id="email-status"></div>
    </div>
  </form>

  <h3>📢 Why Early Detection Matters?</h3>
  <p><strong>90% of brain tumors can be treated if detected early. This app helps rural areas get faster diagnoses.</strong></p>

  <button type="button" class="btn btn-secondary" id="appointment">📅 Book Appointment (Premium)</button>

  <script>
    var form = document.getElementById('analyze-form');
    function setText(id, text) { document.getElementById(id).textContent = text || ''; }

    form.addEventListener('submit', function(e) {
      e.preventDefault();
      setText('result', '…');
      fetch('/api/analyze', { method: 'POST', body: new FormData(form) })
        .then(function(r) { return r.json(); })
        .then(function(data) {
          if (data.error) { setText('result', data.error.message); return; }
          setText('result', data.result);
          document.getElementById('confidence').innerHTML = data.confidence_html;
          var report = document.getElementById('report');
          report.innerHTML = '';
          if (data.report_url) {
            var a = document.createElement('a');
            a.href = data.report_url; a.textContent = 'report.pdf'; a.download = 'report.pdf';
            report.appendChild(a);
          }
          setText('premium', data.premium);
          var voice = document.getElementById('voice');
          voice.innerHTML = '';
          if (data.audio_url) {
            var audio = document.createElement('audio');
            audio.controls = true; audio.src = data.audio_url;
            voice.appendChild(audio);
          }
          setText('email-status', data.email_status);
        })
        .catch(function(err) { setText('result', String(err)); });
    });

    document.getElementById('appointment').addEventListener('click', function() {
      fetch('/api/appointment', { method: 'POST' })
        .then(function(r) { return r.json(); })
        .then(function(data) { setText('premium', data.message); });
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_page_is_ltr_with_english_labels() {
        let html = render_page(Language::En);
        assert!(html.contains(r#"<html lang="en" dir="ltr">"#));
        assert!(html.contains("Patient Name"));
        assert!(html.contains("<strong>Early Detection Saves Lives!</strong>"));
        assert!(html.contains(r#"<option value="en" selected>"#));
        assert!(!html.contains("%%"));
    }

    #[test]
    fn urdu_page_is_rtl_with_urdu_labels() {
        let html = render_page(Language::Ur);
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("مریض کا نام"));
        assert!(html.contains(r#"<input type="hidden" name="lang" value="ur">"#));
        assert!(html.contains(r#"<option value="ur" selected>"#));
    }

    #[test]
    fn bold_markdown_wraps_pairs() {
        assert_eq!(bold_markdown("**a** b **c**"), "<strong>a</strong> b <strong>c</strong>");
        assert_eq!(bold_markdown("plain"), "plain");
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(escape_html("<b>&'\""), "&lt;b&gt;&amp;&#39;&quot;");
    }
}
