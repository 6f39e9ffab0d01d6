use actix_web::http::header;
use actix_web::{web, HttpResponse};

/// GET /
/// Redirects to the dashboard
pub async fn index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/dashboard"))
        .finish()
}

/// GET /dashboard
/// Polling dashboard over the events API. Caching is disabled so the page
/// always reflects the current in-memory store.
pub async fn dashboard() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(DASHBOARD_HTML)
}

/// Configures the dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/dashboard", web::get().to(dashboard));
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>ENS Relay</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 2rem; background: #f6f7f9; color: #1c2733; }
  h1 { font-size: 1.3rem; }
  .meta { color: #5b6b7b; font-size: 0.85rem; margin-bottom: 1rem; }
  select { padding: 0.25rem; margin-bottom: 1rem; }
  table { width: 100%; border-collapse: collapse; background: #fff; }
  th, td { padding: 0.45rem 0.6rem; border-bottom: 1px solid #e3e7eb; text-align: left; font-size: 0.85rem; }
  th { background: #eef1f4; }
  tr.event-row { cursor: pointer; }
  tr.event-row:hover { background: #f0f4f8; }
  .status { padding: 0.1rem 0.45rem; border-radius: 0.6rem; font-size: 0.75rem; }
  .status.sent_to_external { background: #d8f3dc; color: #1b4332; }
  .status.logged_only { background: #e2e8f0; color: #334155; }
  .status.filtered { background: #fef3c7; color: #713f12; }
  .status.error, .status.failed { background: #fecdd3; color: #881337; }
  td.payload { background: #0f172a; color: #d1e4dd; }
  td.payload pre { margin: 0; white-space: pre-wrap; word-break: break-all; font-size: 0.75rem; }
</style>
</head>
<body>
<h1>ENS Relay Dashboard</h1>
<div class="meta">Total events: <span id="total">0</span> &middot; refreshes every 5s</div>
<select id="filter">
  <option value="all">All event types</option>
  <option value="EngagementEvents.OttMobileOriginated">Inbound messages</option>
  <option value="EngagementEvents.SmsSent">SMS sent</option>
  <option value="EngagementEvents.SmsDelivered">SMS delivered</option>
  <option value="EngagementEvents.SmsNotDelivered">SMS not delivered</option>
  <option value="Unknown">Unknown</option>
</select>
<table>
  <thead>
    <tr><th>Time</th><th>Type</th><th>Mobile</th><th>Contact key</th><th>Status</th></tr>
  </thead>
  <tbody id="rows"></tbody>
</table>
<script>
// Expand/collapse state keyed by event id, so it survives refreshes
const expanded = new Set();

function esc(s) {
  return String(s).replace(/[&<>"]/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;'}[c]));
}

async function refresh() {
  const type = document.getElementById('filter').value;
  const res = await fetch('/api/events?type=' + encodeURIComponent(type), {cache: 'no-store'});
  const data = await res.json();
  document.getElementById('total').textContent = data.total;

  const rows = document.getElementById('rows');
  rows.innerHTML = '';
  for (const e of data.events) {
    const tr = document.createElement('tr');
    tr.className = 'event-row';
    tr.innerHTML =
      '<td>' + esc(e.timestampIso) + '</td>' +
      '<td>' + esc(e.eventType) + '</td>' +
      '<td>' + esc(e.mobileNumber) + '</td>' +
      '<td>' + esc(e.contactKey) + '</td>' +
      '<td><span class="status ' + esc(e.status) + '">' + esc(e.status) + '</span></td>';
    tr.onclick = () => {
      expanded.has(e.id) ? expanded.delete(e.id) : expanded.add(e.id);
      refresh();
    };
    rows.appendChild(tr);

    if (expanded.has(e.id)) {
      const detail = document.createElement('tr');
      detail.innerHTML = '<td class="payload" colspan="5"><pre>' +
        esc(JSON.stringify(e.payload, null, 2)) + '</pre></td>';
      rows.appendChild(detail);
    }
  }
}

document.getElementById('filter').onchange = refresh;
refresh();
setInterval(refresh, 5000);
</script>
</body>
</html>
"#;
