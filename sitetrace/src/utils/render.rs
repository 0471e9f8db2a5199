/// helper functions for rendering
use crate::analysis::TraceStats;
use crate::data::*;
use itertools::*;

pub fn rendervec(fs: &[String]) -> String {
    format!("[{}]", fs.join(", "))
}

pub fn renderfloats(fs: &[f64], high_prec: bool) -> String {
    rendervec(&fs.iter().map(|x| fmt_f64(high_prec)(*x)).collect_vec())
}

pub fn fmt_f64(high_precision: bool) -> impl Fn(f64) -> String {
    if high_precision {
        move |x: f64| format!("{}", x)
    } else {
        move |x: f64| format!("{:.2}", x)
    }
}

pub fn render_weights(ws: &[LW], high_precision: bool) -> String {
    ws.iter()
        .map(|w| format!("[{}]", fmt_f64(high_precision)(w.val())))
        .join(", ")
}

pub fn render_choice(c: &RandomChoice) -> String {
    format!(
        "{} {} {} = {} (log_prob {:.4}{})",
        if c.is_observed() { "observe" } else { "sample " },
        c.distribution().name(),
        c.address(),
        c.value(),
        c.log_prob(),
        c.name().map(|n| format!(", name {n}")).unwrap_or_default()
    )
}

pub fn render_trace<R: std::fmt::Debug>(t: &Trace<R>) -> String {
    let mut s = format!(
        "Trace(len={}, log_prob_sum={:.4}, {}, result={:?})\n",
        t.len(),
        t.log_prob_sum(),
        t.log_weight().log_render(),
        t.result()
    );
    for (i, c) in t.choices().iter().enumerate() {
        s.push_str(&format!("  {:>3}: {}\n", i, render_choice(c)));
    }
    s
}

pub fn render_stats(stats: &TraceStats) -> String {
    stats
        .as_map()
        .iter()
        .map(|(k, v)| format!("{:>22}: {}", k, fmt_f64(true)(*v)))
        .join("\n")
}

pub fn render_histogram(stats: &TraceStats) -> String {
    let widest = stats.length_counts.values().copied().max().unwrap_or(1);
    stats
        .length_counts
        .iter()
        .map(|(len, n)| {
            let bar = (n * 40).div_ceil(widest);
            format!("{:>4} | {} {}", len, "#".repeat(bar), n)
        })
        .join("\n")
}
