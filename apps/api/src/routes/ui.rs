use axum::response::Html;

/// GET /
/// Single-page form: upload a resume, paste a job description, see the score.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Resume Match Analyzer</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; color: #2c3e50; }
  form { display: grid; gap: 1rem; }
  textarea { min-height: 180px; font: inherit; }
  #score { font-size: 4rem; font-weight: 800; text-align: center; border-radius: 16px; padding: 2rem; display: none; }
  #message, #hint { text-align: center; }
  #error { color: #dc3545; }
</style>
</head>
<body>
<h1>Resume Match Analyzer</h1>
<form id="analyze">
  <label>1. Resume (PDF) <input type="file" name="resume" accept="application/pdf" required></label>
  <label>2. Job description <textarea name="job_description" required
    placeholder="Paste the complete job description here"></textarea></label>
  <div id="hint"></div>
  <button type="submit">3. Analyze</button>
</form>
<p id="error"></p>
<div id="score"></div>
<p id="message"></p>
<ul id="breakdown"></ul>
<script>
const form = document.getElementById('analyze');
form.job_description.addEventListener('change', async () => {
  const res = await fetch('/api/v1/job-description/stats', {
    method: 'POST', headers: { 'content-type': 'application/json' },
    body: JSON.stringify({ job_description: form.job_description.value }),
  });
  if (res.ok) {
    const stats = await res.json();
    document.getElementById('hint').textContent = `${stats.word_count} words - ${stats.length_hint}`;
  }
});
form.addEventListener('submit', async (event) => {
  event.preventDefault();
  document.getElementById('error').textContent = '';
  const res = await fetch('/api/v1/analyze', { method: 'POST', body: new FormData(form) });
  const isJson = (res.headers.get('content-type') || '').includes('application/json');
  const body = isJson ? await res.json() : { error: { message: await res.text() } };
  if (!res.ok) {
    document.getElementById('error').textContent =
      (body.error && body.error.message) || `Request failed (${res.status})`;
    return;
  }
  const { score, feedback, breakdown } = body.report;
  const el = document.getElementById('score');
  el.style.display = 'block';
  el.style.color = feedback.color;
  el.style.border = `3px solid ${feedback.color}`;
  el.style.background = feedback.background_color;
  el.textContent = `${score}%`;
  document.getElementById('message').textContent = feedback.message;
  const list = document.getElementById('breakdown');
  list.replaceChildren(...breakdown.map((line) => {
    const li = document.createElement('li');
    li.textContent = line;
    return li;
  }));
});
</script>
</body>
</html>
"#;
