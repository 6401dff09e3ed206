use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Review Sentiment</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    table { border-collapse: collapse; margin-top: 1rem; }
    td, th { border: 1px solid #ddd; padding: 0.4rem 0.8rem; text-align: left; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Review Sentiment</h1>
  <p>Upload a CSV or XLSX file with a <code>review</code> column.</p>

  <div class="card">
    <form id="uploadForm">
      <input id="fileInput" name="file" type="file" accept=".csv,.xlsx" />
      <button type="submit">Analyze</button>
    </form>
    <div id="status"></div>
  </div>

  <div class="card">
    <h2>Results</h2>
    <table>
      <tr><th>Positive</th><td id="positive">-</td></tr>
      <tr><th>Negative</th><td id="negative">-</td></tr>
      <tr><th>Neutral</th><td id="neutral">-</td></tr>
    </table>
  </div>

  <script>
    const form = document.getElementById('uploadForm');
    const status = document.getElementById('status');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const fileInput = document.getElementById('fileInput');
      if (!fileInput.files.length) {
        status.textContent = 'Select a file first.';
        return;
      }
      const formData = new FormData();
      formData.append('file', fileInput.files[0]);
      status.className = '';
      status.textContent = 'Analyzing...';
      const res = await fetch('/analyze', { method: 'POST', body: formData });
      const json = await res.json();
      if (!res.ok) {
        status.className = 'error';
        status.textContent = json.error || 'Request failed';
        return;
      }
      status.textContent = 'Done.';
      for (const key of ['positive', 'negative', 'neutral']) {
        document.getElementById(key).textContent = json[key];
      }
    });
  </script>
</body>
</html>"#)
}
