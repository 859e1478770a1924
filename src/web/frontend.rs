//! Embedded HTML/CSS/JS frontend for the squill web shell.
//!
//! Three pages share one stylesheet. The dashboard page renders every
//! layout; the active [`Variant`](crate::dashboard::Variant) is a CSS class
//! on `<body>` and switching it refetches `/api/dashboard`.
//! No external assets, no build tools, no CDN dependencies.

/// Stylesheet served at `/static/squill.css`.
pub const STYLE_CSS: &str = r##":root {
  --sea: #20B2AA;
  --ink: #141414;
  --paper: #ffffff;
  --muted: #6b7280;
  --line: #e5e7eb;
  --green: #16A34A;
  --amber: #F59E0B;
  --red: #EF4444;
  --purple: #8A2BE2;
  --radius: 10px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: #f8f9fa;
  color: var(--ink);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}
a { color: inherit; }

/* Buttons and inputs */
.btn {
  display: inline-block;
  padding: 12px 24px;
  background: var(--sea);
  color: var(--paper);
  border: 3px solid var(--ink);
  font-family: var(--mono);
  font-weight: 700;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  cursor: pointer;
  text-decoration: none;
  box-shadow: 4px 4px 0 var(--ink);
}
.btn:hover { transform: translate(-2px, -2px); box-shadow: 6px 6px 0 var(--ink); }
.btn.secondary { background: var(--paper); color: var(--ink); }
.btn.black { background: var(--ink); }
.btn:disabled { opacity: 0.5; cursor: not-allowed; }
input, select {
  width: 100%;
  padding: 12px;
  border: 3px solid var(--ink);
  font-family: var(--mono);
  font-size: 14px;
}
label {
  display: block;
  margin-bottom: 6px;
  font-family: var(--mono);
  font-size: 12px;
  font-weight: 700;
  text-transform: uppercase;
}

/* Logo */
.logo {
  width: 48px; height: 48px;
  background: var(--ink);
  display: flex; align-items: center; justify-content: center;
}
.logo span {
  width: 40px; height: 40px;
  background: var(--sea);
  color: var(--ink);
  font-family: var(--mono); font-weight: 800; font-size: 24px;
  display: flex; align-items: center; justify-content: center;
}

/* Landing */
.landing { background: var(--ink); color: var(--paper); min-height: 100vh; }
.landing nav {
  display: flex; justify-content: space-between; align-items: center;
  padding: 24px 48px; border-bottom: 4px solid var(--sea);
}
.landing nav .brand { display: flex; gap: 16px; align-items: center; font-family: var(--mono); font-size: 24px; font-weight: 800; }
.hero { display: grid; grid-template-columns: 1fr 1fr; gap: 48px; padding: 80px 48px; max-width: 1200px; margin: 0 auto; }
.hero h1 { font-family: var(--mono); font-size: 72px; line-height: 1; margin: 24px 0; }
.hero h1 em { color: var(--sea); font-style: normal; }
.badge { display: inline-block; background: var(--sea); color: var(--ink); padding: 8px 16px; font-family: var(--mono); font-weight: 700; transform: rotate(-1deg); }
.stats { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; align-content: center; }
.stat { border: 3px solid var(--paper); padding: 32px; text-align: center; font-family: var(--mono); }
.stat:nth-child(odd) { background: var(--sea); color: var(--ink); transform: rotate(2deg); }
.stat:nth-child(even) { background: var(--paper); color: var(--ink); transform: rotate(-2deg); }
.stat b { display: block; font-size: 36px; }
.features { display: grid; grid-template-columns: repeat(3, 1fr); gap: 24px; padding: 48px; max-width: 1200px; margin: 0 auto; }
.feature { background: var(--paper); color: var(--ink); border: 3px solid var(--sea); padding: 32px; }
.feature h3 { font-family: var(--mono); margin-bottom: 12px; }
.quotes { display: grid; grid-template-columns: repeat(3, 1fr); gap: 24px; padding: 48px; max-width: 1200px; margin: 0 auto; }
.quote { border: 3px solid var(--paper); padding: 24px; font-family: var(--mono); }
.quote .stars { color: var(--sea); }
.cta { text-align: center; padding: 64px 48px; }
.cta h2 { font-family: var(--mono); font-size: 40px; margin-bottom: 16px; }
section h2.title { font-family: var(--mono); font-size: 40px; text-align: center; padding-top: 48px; }

/* Login */
.login-page { min-height: 100vh; display: flex; align-items: center; justify-content: center; background: var(--sea); }
.login-card { background: var(--paper); border: 3px solid var(--ink); box-shadow: 8px 8px 0 var(--ink); padding: 40px; width: 100%; max-width: 420px; }
.login-card h1 { font-family: var(--mono); text-align: center; margin: 16px 0 4px; }
.login-card .sub { text-align: center; font-family: var(--mono); font-size: 12px; color: var(--muted); margin-bottom: 24px; }
.login-card .field { margin-bottom: 20px; }
.login-card .logo { margin: 0 auto; }
.demo { margin-top: 24px; padding: 16px; border: 2px dashed var(--ink); font-family: var(--mono); font-size: 12px; }
.error { color: var(--red); font-family: var(--mono); font-size: 12px; min-height: 18px; margin-bottom: 12px; }

/* Dashboard frame */
.frame { display: grid; grid-template-columns: 240px 1fr; min-height: 100vh; }
.sidebar { background: var(--ink); color: var(--paper); padding: 24px; display: flex; flex-direction: column; gap: 24px; }
.sidebar .brand { display: flex; gap: 12px; align-items: center; font-family: var(--mono); font-weight: 800; font-size: 20px; }
.sidebar nav a { display: block; padding: 10px 12px; font-family: var(--mono); font-size: 13px; text-decoration: none; text-transform: uppercase; }
.sidebar nav a.active, .sidebar nav a:hover { background: var(--sea); color: var(--ink); }
.sidebar .bottom { margin-top: auto; display: flex; flex-direction: column; gap: 12px; }
.sidebar select { background: var(--paper); }
main { padding: 32px; overflow-x: auto; }
main header { display: flex; justify-content: space-between; align-items: baseline; margin-bottom: 24px; }
main header h1 { font-size: 28px; }
.updated { color: var(--muted); font-size: 12px; font-family: var(--mono); }
.notice { padding: 10px 14px; margin-bottom: 16px; border-left: 4px solid var(--amber); background: #fffbeb; font-size: 13px; }
.notice.hidden { display: none; }

.cards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; margin-bottom: 24px; }
.card { background: var(--paper); border: 1px solid var(--line); border-radius: var(--radius); padding: 20px; }
.card .label { color: var(--muted); font-size: 12px; text-transform: uppercase; letter-spacing: 0.05em; }
.card .value { font-size: 28px; font-weight: 700; }
.grid { display: grid; grid-template-columns: 2fr 1fr; gap: 16px; margin-bottom: 24px; }
.panel { background: var(--paper); border: 1px solid var(--line); border-radius: var(--radius); padding: 20px; margin-bottom: 16px; }
.panel h2 { font-size: 16px; margin-bottom: 12px; }
.panel.hidden { display: none; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 10px 8px; border-bottom: 1px solid var(--line); font-size: 13px; }
th { color: var(--muted); font-weight: 600; text-transform: uppercase; font-size: 11px; }
.pill { padding: 2px 8px; border-radius: 999px; font-size: 11px; font-weight: 600; text-transform: uppercase; background: var(--line); }
.pill.paid, .pill.active, .pill.online { background: #dcfce7; color: var(--green); }
.pill.pending, .pill.generated { background: #fef3c7; color: #92400e; }
.pill.overdue { background: #fee2e2; color: var(--red); }
.services li, .feed li { list-style: none; display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid var(--line); }
.bar { height: 6px; background: var(--line); margin-top: 4px; }
.bar span { display: block; height: 100%; background: var(--sea); }
svg text { font-size: 11px; fill: var(--muted); }

/* Variant themes */
body.minimal .cards .card { border: none; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
body.bento .cards { grid-template-columns: 2fr 1fr 1fr; }
body.bento .card:first-child { grid-row: span 2; background: var(--sea); color: var(--paper); }
body.bento .card:first-child .label { color: var(--paper); }
body.bento .card, body.bento .panel { border-radius: 20px; }
body.brutalist { background: var(--paper); font-family: var(--mono); }
body.brutalist .card, body.brutalist .panel { border: 3px solid var(--ink); border-radius: 0; box-shadow: 6px 6px 0 var(--ink); }
body.brutalist main header h1 { font-size: 36px; font-weight: 800; }
body.brutalist th { color: var(--ink); }
"##;

/// `GET /`: the marketing page.
pub const LANDING_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Squill — Serverless Billing Automation</title>
<link rel="stylesheet" href="/static/squill.css">
</head>
<body class="landing">
<nav>
  <div class="brand"><div class="logo"><span>S</span></div>SQUILL</div>
  <div>
    <a href="#features">FEATURES</a> &nbsp;
    <a href="#pricing">PRICING</a> &nbsp;
    <a class="btn" href="/login">LOGIN</a>
  </div>
</nav>

<section class="hero">
  <div>
    <span class="badge">SERVERLESS BILLING AUTOMATION</span>
    <h1>BILLING<br><em>AUTOMATION</em><br>THAT WORKS</h1>
    <p>ENTERPRISE-GRADE BILLING INFRASTRUCTURE FOR SAAS COMPANIES.
       BUILT ON AWS SERVERLESS ARCHITECTURE.</p>
    <p style="margin-top:32px">
      <a class="btn" href="/login">START NOW</a>
      <a class="btn secondary" href="/login">VIEW DEMO</a>
    </p>
  </div>
  <div class="stats">
    <div class="stat"><b>99.9%</b>UPTIME</div>
    <div class="stat"><b>&lt;200ms</b>RESPONSE TIME</div>
    <div class="stat"><b>10K+</b>TRANSACTIONS/SEC</div>
    <div class="stat"><b>24/7</b>SUPPORT</div>
  </div>
</section>

<section id="features">
  <h2 class="title">WHY CHOOSE SQUILL?</h2>
  <div class="features">
    <div class="feature"><h3>LIGHTNING FAST</h3><p>Process thousands of billing events per second with AWS serverless architecture</p></div>
    <div class="feature"><h3>BANK-GRADE SECURITY</h3><p>Enterprise-level encryption and compliance for financial data protection</p></div>
    <div class="feature"><h3>REAL-TIME ANALYTICS</h3><p>Live dashboard with revenue tracking and customer insights</p></div>
  </div>
</section>

<section id="pricing">
  <h2 class="title">PRICING</h2>
  <div class="features" id="tiers"></div>
</section>

<section>
  <h2 class="title">TRUSTED BY LEADERS</h2>
  <div class="quotes">
    <div class="quote"><div class="stars">★★★★★</div>"REDUCED BILLING OVERHEAD BY 90%"<br><b>TECHCORP</b></div>
    <div class="quote"><div class="stars">★★★★★</div>"SEAMLESS INTEGRATION IN 24 HOURS"<br><b>FINSTART</b></div>
    <div class="quote"><div class="stars">★★★★★</div>"BEST BILLING PLATFORM WE'VE USED"<br><b>CLOUDBASE</b></div>
  </div>
</section>

<section class="cta">
  <h2>READY TO AUTOMATE YOUR BILLING?</h2>
  <p>JOIN HUNDREDS OF COMPANIES ALREADY USING SQUILL FOR THEIR BILLING INFRASTRUCTURE</p>
  <p style="margin-top:24px"><a class="btn" href="/login">GET STARTED</a></p>
</section>

<script>
fetch('/api/pricing-tiers').then(r => r.json()).then(body => {
  const tiers = Array.isArray(body.tiers) ? body.tiers : [];
  document.getElementById('tiers').innerHTML = tiers.map(t =>
    `<div class="feature"><h3>${String(t.id || '').toUpperCase()}</h3>
       <p><b>$${Number(t.monthly_fee).toFixed(0)}</b> / MONTH</p>
       <p>${(t.allowances || []).map(a =>
          `${a.metric.replace('_', ' ')}: ${a.limit === null ? 'unlimited' : Number(a.limit).toLocaleString()}`
        ).join('<br>')}</p></div>`
  ).join('');
}).catch(() => {});
</script>
</body>
</html>"##;

/// `GET /login`: the sign-in form.
pub const LOGIN_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Squill — Sign in</title>
<link rel="stylesheet" href="/static/squill.css">
</head>
<body>
<div class="login-page">
  <form class="login-card" id="login">
    <div class="logo"><span>S</span></div>
    <h1>WELCOME BACK</h1>
    <p class="sub">SIGN IN TO YOUR SQUILL ACCOUNT</p>
    <div class="field">
      <label for="email">Email address</label>
      <input id="email" type="email" placeholder="ENTER YOUR EMAIL" required>
    </div>
    <div class="field">
      <label for="password">Password</label>
      <input id="password" type="password" placeholder="ENTER YOUR PASSWORD" required>
    </div>
    <div class="error" id="error"></div>
    <button class="btn" style="width:100%" id="submit" type="submit">SIGN IN</button>
    <div class="demo">
      DEMO CREDENTIALS<br>
      EMAIL: admin@squill.com<br>
      PASSWORD: demo123
    </div>
  </form>
</div>
<script>
document.getElementById('login').addEventListener('submit', async e => {
  e.preventDefault();
  const btn = document.getElementById('submit');
  const err = document.getElementById('error');
  btn.disabled = true;
  btn.textContent = 'SIGNING IN...';
  err.textContent = '';
  try {
    const res = await fetch('/api/auth/login', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({
        email: document.getElementById('email').value,
        password: document.getElementById('password').value,
      }),
    });
    if (res.ok) {
      window.location = '/dashboard';
      return;
    }
    const body = await res.json().catch(() => ({}));
    err.textContent = (body.error || 'login failed').toUpperCase();
  } catch (ex) {
    err.textContent = 'NETWORK ERROR';
  }
  btn.disabled = false;
  btn.textContent = 'SIGN IN';
});
</script>
</body>
</html>"##;

/// `GET /dashboard`: every layout, switched by body class.
pub const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Squill — Dashboard</title>
<link rel="stylesheet" href="/static/squill.css">
</head>
<body>
<div class="frame">
  <aside class="sidebar">
    <div class="brand"><div class="logo"><span>S</span></div>SQUILL</div>
    <nav>
      <a href="#overview" class="active">Overview</a>
      <a href="#customers">Customers</a>
      <a href="#invoices">Invoices</a>
      <a href="#services">AWS Services</a>
    </nav>
    <div class="bottom">
      <label for="variant">Layout</label>
      <select id="variant">
        <option value="minimal">Minimal</option>
        <option value="bento">Bento</option>
        <option value="brutalist">Brutalist</option>
      </select>
      <button class="btn black" id="logout">Logout</button>
    </div>
  </aside>

  <main>
    <header>
      <h1 id="title">Dashboard</h1>
      <span class="updated" id="updated"></span>
    </header>
    <div class="notice hidden" id="notice"></div>

    <section class="cards" id="overview">
      <div class="card"><div class="label">Total revenue</div><div class="value" id="m-revenue">—</div></div>
      <div class="card"><div class="label">Customers</div><div class="value" id="m-customers">—</div></div>
      <div class="card"><div class="label">Invoices</div><div class="value" id="m-invoices">—</div></div>
      <div class="card"><div class="label">AWS cost</div><div class="value" id="m-aws">—</div></div>
    </section>

    <section class="grid">
      <div class="panel"><h2>Monthly revenue</h2><div id="revenue-chart"></div></div>
      <div class="panel"><h2>Usage breakdown</h2><div id="usage-chart"></div></div>
    </section>

    <section class="panel" id="services"><h2>AWS services</h2><ul class="services" id="service-list"></ul></section>
    <section class="panel" id="customers"><h2>Customers</h2><table id="customer-table"></table></section>
    <section class="panel" id="invoices"><h2>Invoices</h2><table id="invoice-table"></table></section>
    <section class="panel" id="activity"><h2>Recent activity</h2><ul class="feed" id="feed"></ul></section>
  </main>
</div>

<script>
const TITLES = { minimal: 'Billing Overview', bento: 'Dashboard Overview', brutalist: 'SQUILL CONTROL CENTER' };
const PALETTE = ['#20B2AA', '#16A34A', '#F59E0B', '#EF4444', '#8A2BE2', '#6b7280'];
let variant = null;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------
function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

function money(n) {
  if (n === undefined || n === null) return '—';
  return '$' + Number(n).toLocaleString();
}

function pill(status) {
  if (!status) return '';
  return `<span class="pill ${esc(status.toLowerCase())}">${esc(status)}</span>`;
}

function show(id, visible) {
  document.getElementById(id).classList.toggle('hidden', !visible);
}

// Rows without an id are fetched by position
function pdfLink(inv, row, variant) {
  const q = 'variant=' + encodeURIComponent(variant);
  if (inv.invoice_id) return `/api/invoices/${encodeURIComponent(inv.invoice_id)}/pdf?${q}`;
  return `/api/invoices/latest/pdf?${q}&row=${row}`;
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------
function lineChart(points) {
  if (!points.length) return '<p class="updated">No data</p>';
  const w = 560, h = 200, pad = 30;
  const max = Math.max(...points.map(p => p.revenue)) || 1;
  const step = points.length > 1 ? (w - 2 * pad) / (points.length - 1) : 0;
  const xy = points.map((p, i) => [pad + i * step, h - pad - (p.revenue / max) * (h - 2 * pad)]);
  const path = xy.map((c, i) => (i ? 'L' : 'M') + c[0].toFixed(1) + ' ' + c[1].toFixed(1)).join(' ');
  const dots = xy.map(c => `<circle cx="${c[0]}" cy="${c[1]}" r="4" fill="#20B2AA"/>`).join('');
  const labels = points.map((p, i) => `<text x="${xy[i][0]}" y="${h - 8}" text-anchor="middle">${esc(p.month)}</text>`).join('');
  return `<svg viewBox="0 0 ${w} ${h}" width="100%"><path d="${path}" fill="none" stroke="#20B2AA" stroke-width="3"/>${dots}${labels}</svg>`;
}

function donutChart(slices) {
  if (!slices.length) return '<p class="updated">No data</p>';
  const total = slices.reduce((s, x) => s + x.value, 0) || 1;
  const r = 60, c = 2 * Math.PI * r;
  let offset = 0;
  const arcs = slices.map((s, i) => {
    const len = (s.value / total) * c;
    const color = s.color || PALETTE[i % PALETTE.length];
    const arc = `<circle r="${r}" cx="90" cy="90" fill="none" stroke="${esc(color)}" stroke-width="28"
      stroke-dasharray="${len} ${c - len}" stroke-dashoffset="${-offset}" transform="rotate(-90 90 90)"/>`;
    offset += len;
    return arc;
  }).join('');
  const legend = slices.map((s, i) =>
    `<li><span style="color:${esc(s.color || PALETTE[i % PALETTE.length])}">■</span> ${esc(s.name)}<b>${Math.round(s.value / total * 100)}%</b></li>`
  ).join('');
  return `<svg viewBox="0 0 180 180" width="180">${arcs}</svg><ul class="services">${legend}</ul>`;
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------
function render(d) {
  document.body.className = d.variant;
  document.getElementById('title').textContent = TITLES[d.variant] || 'Dashboard';
  document.getElementById('updated').textContent = 'Last updated ' + new Date(d.generated_at).toLocaleTimeString();

  const notice = document.getElementById('notice');
  if (d.origin === 'fallback') {
    notice.textContent = 'Showing demo data: the billing API is unavailable (' + (d.fallback_reason || 'unknown error') + ').';
  }
  show('notice', d.origin === 'fallback');

  const s = d.summary;
  document.getElementById('m-revenue').textContent = money(s.total_revenue);
  document.getElementById('m-customers').textContent = s.customers;
  document.getElementById('m-invoices').textContent = `${s.paid_invoices}/${s.invoices} paid`;
  document.getElementById('m-aws').textContent = s.total_aws_cost ? money(s.total_aws_cost) : '—';

  const a = d.analytics;
  document.getElementById('revenue-chart').innerHTML = lineChart(a.monthly_revenue || []);
  document.getElementById('usage-chart').innerHTML = donutChart(a.usage_breakdown || []);

  const services = a.aws_services || [];
  show('services', services.length > 0);
  document.getElementById('service-list').innerHTML = services.map(sv => `
    <li><div><b>${esc(sv.name)}</b> ${pill(sv.status)}<br><span class="updated">${esc(sv.usage)}</span>
      ${sv.utilization != null ? `<div class="bar"><span style="width:${sv.utilization}%"></span></div>` : ''}</div>
      <b>${money(sv.cost)}</b></li>`).join('');

  document.getElementById('customer-table').innerHTML =
    '<tr><th>Name</th><th>Tier</th><th>Status</th><th>Revenue</th><th>Growth</th></tr>' +
    d.customers.map(c => `<tr><td>${esc(c.name)}<br><span class="updated">${esc(c.email)}</span></td>
      <td>${esc(c.pricing_tier)}</td><td>${pill(c.status)}</td>
      <td>${c.revenue != null ? money(c.revenue) : ''}</td><td>${esc(c.growth)}</td></tr>`).join('');

  document.getElementById('invoice-table').innerHTML =
    '<tr><th>Invoice</th><th>Customer</th><th>Amount</th><th>Status</th><th>Due</th><th></th></tr>' +
    d.invoices.map((inv, i) => `<tr><td>${esc(inv.invoice_id)}</td><td>${esc(inv.customer_name)}</td>
      <td>${money(inv.total_amount)}</td><td>${pill(inv.status)}</td><td>${esc(inv.due_date)}</td>
      <td><a class="pill" href="${pdfLink(inv, i, d.variant)}">PDF</a></td></tr>`).join('');

  const feed = d.recent_activities || [];
  show('activity', feed.length > 0);
  document.getElementById('feed').innerHTML = feed.map(f => `
    <li><div>${pill(f.type)} ${esc(f.description)}<br><span class="updated">${esc(f.time)}</span></div>
      <b>${f.amount ? money(f.amount) : ''}</b></li>`).join('');
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------
async function load() {
  const res = await fetch('/api/dashboard?variant=' + encodeURIComponent(variant));
  if (res.status === 401) {
    window.location = '/login';
    return;
  }
  const body = await res.json();
  if (!res.ok) {
    const notice = document.getElementById('notice');
    notice.textContent = body.error || 'failed to load dashboard';
    show('notice', true);
    return;
  }
  render(body);
}

document.getElementById('variant').addEventListener('change', e => {
  variant = e.target.value;
  load();
});

document.getElementById('logout').addEventListener('click', async () => {
  await fetch('/api/auth/logout', { method: 'POST' });
  window.location = '/';
});

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
fetch('/api/session').then(r => r.json()).then(s => {
  if (!s.authenticated) {
    window.location = '/login';
    return;
  }
  variant = s.default_variant;
  document.getElementById('variant').value = variant;
  load();
});
</script>
</body>
</html>"##;
