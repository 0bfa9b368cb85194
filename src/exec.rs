use crate::cli::Cli;
use crate::error::YearmapError;
use crate::git::{CommitHistory, GitCli};
use crate::grid::{needs_extra_week, YearHeatmap};
use crate::model::{ActivitySet, RunReport, YearReport, SCHEMA_VERSION};
use crate::output::{ensure_output_dir, resolve_root, write_image, OutputDir};
use crate::render::{Layout, Palette, Renderer};
use crate::stage::stage_files;
use anyhow::Context;
use chrono::{Local, Utc};
use console::style;
use tracing::{debug, warn};

pub fn exec(cli: &Cli) -> anyhow::Result<()> {
    let report = run(cli)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output_summary(&report);
    }
    Ok(())
}

pub fn run(cli: &Cli) -> anyhow::Result<RunReport> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let repo = cli.repo.clone().unwrap_or(cwd);
    let git = GitCli::new(&cli.git);

    let history = CommitHistory::new(&git);
    let stamps = history
        .fetch(&repo)
        .context("Failed to read commit history")?;

    let mut activity = ActivitySet::from_timestamps(stamps.iter());
    let today = (!cli.no_today).then(|| Local::now().date_naive());

    let mut skipped_years = Vec::new();
    let years = if cli.years.is_empty() {
        let mut with_today = activity.clone();
        with_today.extend(today);
        let (skipped, years): (Vec<i32>, Vec<i32>) =
            with_today.years().into_iter().partition(|y| needs_extra_week(*y));
        for &year in &skipped {
            warn!(
                year,
                active_days = with_today.count_in(year),
                "year needs 54 week columns, skipping"
            );
        }
        skipped_years = skipped;
        years
    } else {
        let mut years = cli.years.clone();
        years.sort_unstable();
        years.dedup();
        years
    };
    if let Some(today) = today {
        activity.insert(today);
    }
    debug!(active_days = activity.len(), ?years, "collected activity");

    let root = resolve_root(&git, &repo);
    let out = match ensure_output_dir(&git, Some(&root), &repo, &cli.out_dir) {
        Ok(out) => out,
        Err(e @ YearmapError::OutputDirUnavailable { .. }) => {
            warn!(error = %e, "continuing without output directory");
            OutputDir {
                path: root.join(&cli.out_dir),
                root: root.clone(),
                created: false,
            }
        }
        Err(e) => return Err(e).context("Failed to prepare output directory"),
    };

    let renderer = Renderer::new(Palette::default(), Layout::default(), cli.scale);
    let mut written = Vec::with_capacity(years.len());
    let mut reports = Vec::with_capacity(years.len());

    for &year in &years {
        let heatmap = YearHeatmap::build(year, &activity, today)
            .with_context(|| format!("Failed to build heatmap for {year}"))?;
        let png = renderer
            .render_png(&heatmap)
            .with_context(|| format!("Failed to render heatmap for {year}"))?;
        let path = write_image(&out.path, year, &png)
            .with_context(|| format!("Failed to write heatmap for {year}"))?;

        reports.push(YearReport {
            year,
            active_days: heatmap.active_days(),
            image_path: path.to_string_lossy().to_string(),
            staged: false,
        });
        written.push(path);
    }

    if !cli.no_stage {
        let outcomes = stage_files(&git, &out.root, &written);
        for (report, outcome) in reports.iter_mut().zip(outcomes) {
            report.staged = outcome.staged;
        }
    }

    Ok(RunReport {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: out.root.to_string_lossy().to_string(),
        output_dir: out.path.to_string_lossy().to_string(),
        output_dir_created: out.created,
        years: reports,
        skipped_years,
    })
}

fn output_summary(report: &RunReport) {
    for year in &report.skipped_years {
        println!(
            "{} skipped, needs 54 week columns",
            style(year).bold().yellow()
        );
    }

    if report.years.is_empty() {
        println!("No commit activity to render");
        return;
    }

    for year in &report.years {
        let staged = if year.staged {
            style("staged").green()
        } else {
            style("not staged").yellow()
        };
        println!(
            "{} {:>3} committed days  {} ({})",
            style(year.year).bold(),
            year.active_days,
            year.image_path,
            staged
        );
    }
}
