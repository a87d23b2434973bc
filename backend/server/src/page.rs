//! # Page
//!
//! Server rendered survey page.
//!
//! ## State
//!
//! - Selected answer per question: unset, yes or no. Kept client side in the
//!   form as `data-answer` on each question row.
//! - Status message: shown after a submit, green on success, red on failure.
//!   A successful submit clears every selection.
//! - Results: rendered here from the current aggregate. After a successful
//!   submit the script shows "Loading..." and swaps in a fresh `/results`
//!   fragment, or "No data yet." when that fetch fails.
//!
//! ## Visualization
//!
//! Outline at a fixed 15% opacity, then one overlay per question whose opacity
//! tracks the share of yes answers (see [`Tally::opacity`]).
//!
//! ## Bar Chart
//!
//! Yes bar then no bar, widths in percent. Labels only inside bars wider than
//! 15%.
use std::fmt::Write;

use crate::survey::{Aggregate, QUESTIONS, Tally};

pub const TITLE: &str = "Public Opinion on Gene Editing";
pub const NO_DATA: &str = "No data yet.";
pub const LOADING: &str = "Loading...";
pub const THANK_YOU: &str = "Thank you for your submission!";
pub const SUBMIT_FAILED: &str = "There was an error submitting your answers.";

const LABEL_THRESHOLD: f64 = 15.0;
const OUTLINE_OPACITY: f64 = 0.15;

const INTRO: &str = r#"
<p>This project explores public opinion on the adoption of gene editing technologies.</p>
<p>Humans are in the midst of a biotechnology revolution. This offers us the chance, unprecedented in the entire 3.5 billion year course of evolution on this planet, to intentionally change the course of the future of our species. There are some genetic diseases which could be eliminated. There are clinics which allow patients to choose the sex of their child. The technology to choose a child&apos;s hair and eye color is available now. Can we change the next generation&apos;s predisposition to depression or alcoholism? Should we?</p>
<p>The disorders and physical features represented here are traits which could potentially be affected by human gene editing or embryo screening.</p>
<p>Do we want to live in a society in which people are choosing these things for their children? Vote below, then see what others have chosen.</p>
"#;

const RESULTS_BLURB: &str = "This child represents the society of decades to come by displaying respondents&apos; opinions. The brightness of each organ reflects the number of people who would choose it for their children. See below for a breakdown of the results.";

const STYLE: &str = r#"
body { background: #0a0a0a; color: #ededed; font-family: sans-serif; }
main { max-width: 900px; margin: 0 auto; }
header { display: flex; align-items: center; padding: 1rem 0 2rem 0; }
header img { height: 48px; width: auto; border-radius: 50%; }
.intro { margin-bottom: 2rem; font-size: 1.1rem; line-height: 1.6; max-width: 700px; }
form { display: flex; flex-direction: column; gap: 1.5rem; max-width: 600px; }
.question { display: flex; align-items: center; gap: 1rem; }
.question img, .breakdown img { width: 125px; height: auto; }
.question span, .breakdown span { flex: 1; }
.toggle { border-radius: 50%; width: 40px; height: 40px; background: #222; color: #fff; font-weight: 600; cursor: pointer; transition: background 0.2s; }
.toggle.yes { border: 2px solid #4caf50; }
.toggle.no { border: 2px solid #e53935; }
.question[data-answer="true"] .toggle.yes { background: #4caf50; }
.question[data-answer="false"] .toggle.no { background: #e53935; }
.submit { margin-top: 2rem; padding: 0.75rem 2rem; border-radius: 24px; background: #4caf50; color: #fff; border: none; font-weight: 600; font-size: 1.1rem; cursor: pointer; }
#status { margin-top: 1rem; font-weight: 600; }
#status.ok { color: #4caf50; }
#status.failed { color: #e53935; }
.blurb { margin-bottom: 1.5rem; line-height: 1.5; max-width: 700px; color: #ababab; }
.visual { background: #111; border-radius: 12px; padding: 24px; color: #888; position: relative; width: 600px; height: 600px; margin: 0 auto 2rem auto; }
.body { position: relative; width: 550px; height: 550px; }
.body img { position: absolute; top: 0; left: 0; width: 550px; height: 550px; pointer-events: none; transition: opacity 0.5s; }
.breakdown { font-size: 0.9rem; margin-bottom: 0.3rem; color: #ababab; display: flex; align-items: center; gap: 0.5rem; }
.bar { display: flex; height: 20px; width: 100%; border: 1px solid #444; border-radius: 4px; overflow: hidden; margin-bottom: 0.2rem; }
.bar .yes { background: #fff; color: #000; }
.bar .no { border: 1px solid #000; color: #ababab; }
.bar div { display: flex; align-items: center; justify-content: center; font-size: 0.7rem; font-weight: 600; }
.totals { font-size: 0.7rem; color: #666; margin-bottom: 1rem; }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById('survey');
const status = document.getElementById('status');
const results = document.getElementById('results');

form.addEventListener('click', (event) => {
  const button = event.target.closest('button[data-value]');
  if (!button) return;
  button.closest('.question').dataset.answer = button.dataset.value;
});

function answers() {
  return Array.from(form.querySelectorAll('.question')).map((row) => {
    if (row.dataset.answer === 'true') return true;
    if (row.dataset.answer === 'false') return false;
    return null;
  });
}

function showStatus(message, ok) {
  status.textContent = message;
  status.className = ok ? 'ok' : 'failed';
}

async function refreshResults() {
  results.innerHTML = '<span>__LOADING__</span>';
  try {
    const res = await fetch('/results');
    results.innerHTML = res.ok ? await res.text() : '<span>__NO_DATA__</span>';
  } catch {
    results.innerHTML = '<span>__NO_DATA__</span>';
  }
}

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  status.textContent = '';
  try {
    const res = await fetch('/api/submit', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ answers: answers() }),
    });
    if (res.ok) {
      showStatus('__THANK_YOU__', true);
      form.querySelectorAll('.question').forEach((row) => delete row.dataset.answer);
      refreshResults();
    } else {
      showStatus('__SUBMIT_FAILED__', false);
    }
  } catch {
    showStatus('__SUBMIT_FAILED__', false);
  }
});
"#;

/// Full document with the results for `aggregate` already in place.
pub fn render_page(aggregate: &Aggregate) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="Webpage for gene editing user input and visualization">
<title>{TITLE}</title>
<link rel="icon" href="/static/favicon.png">
<style>{STYLE}</style>
</head>
<body>
<header><a href="/" title="Back to main site"><img src="/static/rc.png" alt="Home"></a></header>
<main>
<h1>{TITLE}</h1>
<div class="intro">{INTRO}</div>
"#
    );

    render_form(&mut html);

    let _ = write!(
        html,
        r#"<div id="status"></div>
<h2>Results</h2>
<p class="blurb">{RESULTS_BLURB}</p>
<div id="results">{}</div>
</main>
<script>{}</script>
</body>
</html>
"#,
        render_results(aggregate),
        script(),
    );

    html
}

/// Results section alone, swapped into `#results` by the page script.
pub fn render_results(aggregate: &Aggregate) -> String {
    let mut html = String::new();
    render_visualization(&mut html, aggregate);
    render_breakdown(&mut html, aggregate);

    html
}

fn render_form(html: &mut String) {
    html.push_str(r#"<form id="survey">"#);

    for question in &QUESTIONS {
        let _ = write!(
            html,
            r#"<div class="question"><img src="/static/images/{name}.png" alt="{name}"><span>{prompt}</span><button type="button" class="toggle yes" data-value="true">Yes</button><button type="button" class="toggle no" data-value="false">No</button></div>"#,
            name = question.name,
            prompt = question.prompt,
        );
    }

    html.push_str(r#"<button type="submit" class="submit">Submit</button></form>"#);
}

fn render_visualization(html: &mut String, aggregate: &Aggregate) {
    let _ = write!(
        html,
        r#"<div class="visual"><div class="body"><img src="/static/BodySVGs/outline.svg" alt="outline" style="opacity: {OUTLINE_OPACITY}; z-index: 0">"#
    );

    for (question, tally) in QUESTIONS.iter().zip(&aggregate.counts) {
        let _ = write!(
            html,
            r#"<img src="/static/BodySVGs/{name}.svg" alt="{name}" style="opacity: {opacity:.4}; z-index: 1">"#,
            name = question.name,
            opacity = tally.opacity(),
        );
    }

    html.push_str("</div></div>");
}

fn render_breakdown(html: &mut String, aggregate: &Aggregate) {
    html.push_str("<h3>Response Breakdown</h3><div>");

    for (question, tally) in QUESTIONS.iter().zip(&aggregate.counts) {
        let yes_percent = tally.yes_percent();
        let no_percent = tally.no_percent();

        let _ = write!(
            html,
            r#"<div class="breakdown"><img src="/static/images/{name}.png" alt="{name}"><span>{prompt}</span></div><div class="bar"><div class="yes" style="width: {yes_percent}%">{yes_label}</div><div class="no" style="width: {no_percent}%{no_border}">{no_label}</div></div><div class="totals">{totals}</div>"#,
            name = question.name,
            prompt = question.prompt,
            yes_label = bar_label(yes_percent),
            no_label = bar_label(no_percent),
            no_border = if yes_percent > 0.0 { "; border-left: none" } else { "" },
            totals = totals_line(tally),
        );
    }

    html.push_str("</div>");
}

pub fn bar_label(percent: f64) -> String {
    if percent > LABEL_THRESHOLD {
        format!("{}%", percent.round())
    } else {
        String::new()
    }
}

pub fn totals_line(tally: &Tally) -> String {
    format!(
        "Yes: {} • No: {} • Total: {}",
        tally.yes,
        tally.no,
        tally.total()
    )
}

fn script() -> String {
    SCRIPT
        .replace("__LOADING__", LOADING)
        .replace("__NO_DATA__", NO_DATA)
        .replace("__THANK_YOU__", THANK_YOU)
        .replace("__SUBMIT_FAILED__", SUBMIT_FAILED)
}
