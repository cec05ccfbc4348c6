use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use navspy_core::{
    plan_scroll, ActiveTracker, EvaluationTrigger, PageConfig, RevealSet, ScrollBehavior,
    SectionBounds, SectionId, TrackerDecision, Viewport,
};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "navspy-cli", version, about = "Replay page layouts through the section tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active section for each scroll offset.
    Track {
        #[arg(long)]
        layout: PathBuf,
        #[arg(long, value_delimiter = ',', default_value = "0")]
        offsets: Vec<f64>,
        #[arg(long, default_value_t = 800.0)]
        viewport_height: f64,
        #[arg(long, default_value_t = 80.0)]
        header_height: f64,
        #[arg(long, env = "NAVSPY_CONFIG")]
        config: Option<PathBuf>,
        /// Evaluate every offset as if the window had just been resized.
        #[arg(long)]
        resize: bool,
    },
    /// Print the scroll offset a nav link click lands on.
    Target {
        #[arg(long)]
        top: f64,
        #[arg(long, default_value_t = 80.0)]
        header_height: f64,
        #[arg(long)]
        padding: Option<f64>,
        #[arg(long)]
        reduced_motion: bool,
    },
}

#[derive(Deserialize)]
struct LayoutFile {
    sections: Vec<LayoutSection>,
}

#[derive(Deserialize)]
struct LayoutSection {
    id: String,
    top: f64,
    height: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Track {
            layout,
            offsets,
            viewport_height,
            header_height,
            config,
            resize,
        } => {
            let config = load_config(config)?;
            let sections = parse_layout(&fs::read_to_string(&layout)?)?;
            if sections.is_empty() {
                eprintln!("layout {} has no sections", layout.display());
            }
            let trigger = if resize {
                EvaluationTrigger::Resize
            } else {
                EvaluationTrigger::Scroll
            };
            let mut tracker = ActiveTracker::new(config.tracker());
            let mut reveal = RevealSet::new(config.reveal_threshold);
            for offset in offsets {
                let viewport = Viewport::new(offset, viewport_height, header_height);
                let decision = tracker.evaluate(&sections, &viewport, trigger);
                let revealed = reveal.update(&sections, &viewport);
                println!(
                    "{}",
                    format_row(offset, &decision, tracker.active(), &revealed)
                );
            }
        }
        Commands::Target {
            top,
            header_height,
            padding,
            reduced_motion,
        } => {
            let padding = padding.unwrap_or(PageConfig::default().header_padding);
            let plan = plan_scroll(top, header_height, padding, reduced_motion);
            let behavior = match plan.behavior {
                ScrollBehavior::Instant => "instant",
                ScrollBehavior::Smooth => "smooth",
            };
            println!("{} ({behavior})", plan.top);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<PageConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(PageConfig::default());
    };
    let raw = fs::read_to_string(&path)?;
    Ok(PageConfig::from_json(&raw)?)
}

fn parse_layout(raw: &str) -> Result<Vec<SectionBounds>, Box<dyn std::error::Error>> {
    let file: LayoutFile = serde_json::from_str(raw)?;
    let mut sections = Vec::with_capacity(file.sections.len());
    for section in file.sections {
        let id = SectionId::parse(&section.id)?;
        sections.push(SectionBounds::new(id, section.top, section.height));
    }
    Ok(sections)
}

fn format_row(
    offset: f64,
    decision: &TrackerDecision,
    active: Option<&SectionId>,
    revealed: &[SectionId],
) -> String {
    let change = match decision {
        TrackerDecision::Activate(_) => "activate",
        TrackerDecision::Keep => "keep",
        TrackerDecision::Clear => "clear",
    };
    let active = active.map(SectionId::as_str).unwrap_or("-");
    let mut row = format!("{offset:>8.1}  {active:<16} {change}");
    if !revealed.is_empty() {
        let ids: Vec<&str> = revealed.iter().map(SectionId::as_str).collect();
        row.push_str(&format!("  reveal: {}", ids.join(", ")));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_layout_rejects_bad_ids() {
        let sections = parse_layout(
            r#"{"sections":[{"id":"about","top":0,"height":500},{"id":"contact","top":500,"height":400}]}"#,
        )
        .unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].bottom(), 900.0);

        assert!(parse_layout(r#"{"sections":[{"id":"","top":0,"height":10}]}"#).is_err());
        assert!(parse_layout(r#"{"sections":[{"id":"a"}]}"#).is_err());
    }

    #[test]
    fn row_lists_reveals() {
        let about = SectionId::parse("about").unwrap();
        let row = format_row(
            120.0,
            &TrackerDecision::Activate(about.clone()),
            Some(&about),
            &[about.clone()],
        );
        assert_eq!(row, "   120.0  about            activate  reveal: about");
        assert_eq!(
            format_row(0.0, &TrackerDecision::Keep, None, &[]),
            "     0.0  -                keep"
        );
    }

    #[test]
    fn cli_parses_offset_list() {
        let cli = Cli::try_parse_from([
            "navspy-cli",
            "track",
            "--layout",
            "page.json",
            "--offsets",
            "0,250.5,900",
        ])
        .unwrap();
        match cli.command {
            Commands::Track { offsets, resize, .. } => {
                assert_eq!(offsets, vec![0.0, 250.5, 900.0]);
                assert!(!resize);
            }
            Commands::Target { .. } => panic!("expected track"),
        }
    }
}
