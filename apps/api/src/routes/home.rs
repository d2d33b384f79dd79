use axum::response::Html;

const PAGE_TITLE: &str = "TalentScan AI: Resume Analyzer for HR professionals";

/// GET /
/// Page shell. Starts a session on load and drives the session API from the browser.
pub async fn home_handler() -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PAGE_TITLE}</title>
<style>
  body {{ font-family: sans-serif; max-width: 860px; margin: 2rem auto; }}
  header {{ text-align: center; }}
  .controls {{ display: flex; gap: 1rem; flex-wrap: wrap; margin: 1rem 0; }}
  .views button {{ margin-right: .5rem; }}
  .output-text {{ padding: 1rem; border: 1px solid #ddd; border-radius: 6px; }}
</style>
</head>
<body>
<header>
  <h1>TalentScan AI</h1>
  <h3>Efficient Candidate Evaluation for Enterprise</h3>
</header>
<div class="controls">
  <label>OpenAI API Key <input id="api-key" type="password" autocomplete="off"></label>
  <label>Resume <input id="resume" type="file" accept="application/pdf"></label>
</div>
<div class="views">
  <button data-view="overview">Overview</button>
  <button data-view="strengths">Strengths</button>
  <button data-view="concerns">Concerns</button>
</div>
<div id="status"></div>
<div id="output"></div>
<script>
const base = "/api/v1/sessions";
let sessionId = null;

async function startSession() {{
  const res = await fetch(base, {{ method: "POST" }});
  sessionId = (await res.json()).session_id;
}}

document.getElementById("api-key").addEventListener("change", async (e) => {{
  await fetch(`${{base}}/${{sessionId}}/credential`, {{
    method: "PUT",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{ api_key: e.target.value }}),
  }});
}});

document.getElementById("resume").addEventListener("change", async (e) => {{
  const form = new FormData();
  form.append("resume", e.target.files[0]);
  const res = await fetch(`${{base}}/${{sessionId}}/document`, {{ method: "PUT", body: form }});
  if (!res.ok) {{
    document.getElementById("status").textContent = (await res.json()).error.message;
  }}
}});

document.querySelectorAll(".views button").forEach((button) => {{
  button.addEventListener("click", async () => {{
    const status = document.getElementById("status");
    status.textContent = "Working...";
    const res = await fetch(`${{base}}/${{sessionId}}/views/${{button.dataset.view}}`);
    document.getElementById("output").innerHTML = await res.text();
    status.textContent = "";
  }});
}});

window.addEventListener("beforeunload", () => {{
  if (sessionId) fetch(`${{base}}/${{sessionId}}`, {{ method: "DELETE", keepalive: true }});
}});

startSession();
</script>
</body>
</html>
"#
    ))
}
