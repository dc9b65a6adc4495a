//! Redirect trace command.

use anyhow::{Context, Result, bail};
use owo_colors::{Stream, Style};
use rayon::prelude::*;

use crate::cli::TraceArgs;
use crate::config::Config;
use crate::logger::Paint;
use crate::redirect::{RedirectData, RedirectStep, Resolver, TraceResult};
use crate::utils::{plural_count, plural_s};
use crate::{debug, log};

/// Traces are printed to stdout.
const STDOUT: Stream = Stream::Stdout;

/// Trace one URL, or every static rule source with `--all`.
pub fn run_trace(args: &TraceArgs, config: &Config) -> Result<()> {
    let base_path = config.base_path();
    let paths = &config.redirects;

    let data = RedirectData::load(
        &paths.static_rules,
        &paths.dynamic_rules,
        &paths.directory,
        base_path,
    )
    .context("failed to load redirect data")?;

    debug!(
        "trace";
        "loaded {} ({} dynamic) and {}",
        plural_count(data.rules.len(), "rule"),
        data.rules.dynamic_rules().len(),
        plural_count(data.directory.len(), "directory url")
    );
    if data.rules.is_empty() {
        log!("warning"; "no redirect rules loaded");
    }
    if data.directory.is_empty() {
        log!("warning"; "site directory is empty, every internal destination will be missing");
    }
    for diag in data.rules.diagnostics() {
        log!(
            "warning";
            "dynamic rule #{} `{}` never matches: {}",
            diag.index + 1,
            diag.source,
            diag.reason
        );
    }

    let resolver = data.resolver(base_path);
    match args.url.as_deref() {
        Some(url) if !args.all => trace_one(&resolver, url, args.json),
        _ => trace_all(&resolver, &data, args.json),
    }
}

fn trace_one(resolver: &Resolver<'_>, url: &str, json: bool) -> Result<()> {
    let result = resolver.trace(url);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_trace(&result));
    }

    if result.is_loop {
        bail!(
            "redirect loop detected at step {}",
            result.loop_detected_at.unwrap_or(result.steps.len() + 1)
        );
    }
    if !result.destination_exists {
        bail!("destination `{}` does not exist", result.final_destination);
    }
    Ok(())
}

fn trace_all(resolver: &Resolver<'_>, data: &RedirectData, json: bool) -> Result<()> {
    let mut sources: Vec<&str> = data
        .rules
        .static_rules()
        .map(|rule| rule.source.as_str())
        .collect();
    sources.sort_unstable();

    let results: Vec<TraceResult> = sources.par_iter().map(|source| resolver.trace(source)).collect();

    let loops = results.iter().filter(|r| r.is_loop).count();
    let missing = results.iter().filter(|r| !r.is_loop && !r.destination_exists).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in results.iter().filter(|r| !r.is_clean()) {
            println!("{}", render_trace(result));
        }
    }

    log!("trace"; "traced {}", plural_count(results.len(), "static rule"));
    if loops + missing > 0 {
        bail!(
            "found {} loop{}, {} missing destination{}",
            loops,
            plural_s(loops),
            missing,
            plural_s(missing)
        );
    }
    log!("trace"; "{}", "all redirects resolve".paint(Style::new().green()));
    Ok(())
}

/// Human-readable trace: one line per hop, then the outcome.
fn render_trace(result: &TraceResult) -> String {
    let mut out = format!(
        "{} {}\n",
        "trace".paint_for(STDOUT, Style::new().bold()),
        result.input_url.paint_for(STDOUT, Style::new().cyan())
    );

    if result.steps.is_empty() && !result.is_loop {
        out.push_str(&format!(
            "  {}\n",
            "no redirect matches".paint_for(STDOUT, Style::new().dimmed())
        ));
    }
    for step in &result.steps {
        out.push_str(&render_step(step));
        out.push('\n');
    }

    let ok = "✓".paint_for(STDOUT, Style::new().green());
    let failed = Style::new().red();
    if let Some(at) = result.loop_detected_at {
        out.push_str(&format!(
            "{} {}\n",
            "✗".paint_for(STDOUT, failed),
            format!("redirect loop detected at step {at}").paint_for(STDOUT, failed)
        ));
    } else if result.is_external() {
        out.push_str(&format!(
            "{ok} {} {}\n",
            result.final_destination,
            "(external)".paint_for(STDOUT, Style::new().dimmed())
        ));
    } else if result.destination_exists {
        out.push_str(&format!("{ok} {}\n", result.final_destination));
    } else {
        out.push_str(&format!(
            "{} {} {}\n",
            "✗".paint_for(STDOUT, failed),
            result.final_destination,
            "does not exist".paint_for(STDOUT, failed)
        ));
    }
    out
}

fn render_step(step: &RedirectStep) -> String {
    let status = if step.permanent { "308" } else { "307" };
    let dim = Style::new().dimmed();
    format!(
        "  {}. {} {} {} {}  {}",
        step.step_index,
        status.paint_for(STDOUT, Style::new().yellow()),
        step.from,
        "→".paint_for(STDOUT, dim),
        step.to,
        format!("({})", step.matched_rule).paint_for(STDOUT, dim)
    )
}
