/// Single-page dashboard. Local requests go through `/companion/local-action`
/// first; anything it does not handle is shown as routed to the chat gateway.
/// Guardrail blocks are listed from `/companion/guardrail-events`.
pub(super) const DASHBOARD_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>MIST Dashboard</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 2rem; background: #10131a; color: #dde3ee; }
  h1 { font-size: 1.4rem; }
  section { border: 1px solid #2c3444; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
  input, button { font: inherit; padding: .4rem .6rem; }
  input { width: 60%; }
  .verified { color: #7fd88f; font-weight: 600; }
  .blocked { color: #f08a7a; }
  pre { white-space: pre-wrap; }
  ul { padding-left: 1.2rem; }
</style>
</head>
<body>
<h1>MIST Companion</h1>

<section>
  <h2>Gateway Channel</h2>
  <form id="send">
    <input id="message" autocomplete="off" placeholder="create a markdown file on my desktop">
    <button type="submit">Send</button>
  </form>
  <div id="reply"></div>
</section>

<section>
  <h2>Guardrail Watch</h2>
  <button id="refresh">Refresh</button>
  <ul id="events"></ul>
</section>

<script>
const reply = document.getElementById("reply");
const events = document.getElementById("events");

function show(text, cls) {
  const pre = document.createElement("pre");
  pre.textContent = text;
  reply.replaceChildren();
  if (cls) {
    const badge = document.createElement("div");
    badge.className = cls;
    badge.textContent = cls === "verified" ? "LOCAL VERIFIED" : "";
    reply.appendChild(badge);
  }
  reply.appendChild(pre);
}

document.getElementById("send").addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const message = document.getElementById("message").value;
  const res = await fetch("/companion/local-action", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ message }),
  });
  const data = await res.json();
  if (data.handled) {
    const receipt = data.receipt ? `\n\nreceipt ${data.receipt.id} at ${data.receipt.at}` : "";
    show(data.response + receipt, data.verified_local ? "verified" : "");
  } else {
    show("Not a local action; routed to the chat gateway.", "");
  }
});

async function loadEvents() {
  const res = await fetch("/companion/guardrail-events?limit=20");
  const data = await res.json();
  events.replaceChildren();
  for (const ev of data.events) {
    const li = document.createElement("li");
    li.className = "blocked";
    li.textContent = `${ev.at} ${ev.violations.join(", ")}: ${ev.user_message}`;
    events.appendChild(li);
  }
}

document.getElementById("refresh").addEventListener("click", loadEvents);
loadEvents();
</script>
</body>
</html>
"#;
