//! Demo run against a scripted timeline: harvests the embedded items,
//! saves the CSV under ./output and prints the JSON serialization.

use std::path::PathBuf;

use harvest_logging::{initialize, LogDestination};
use timeline_core::HarvestOptions;
use timeline_driver::{run_harvest, ScriptStep, ScriptedTimeline};
use timeline_engine::{to_json, DomSource, FileSink};
use url::Url;

const FIRST_SCREEN: &str = include_str!("../demo/first_screen.html");
const SECOND_SCREEN: &str = include_str!("../demo/second_screen.html");

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    initialize(LogDestination::Terminal);

    let target_count = match std::env::args().nth(1) {
        Some(raw) => raw.parse()?,
        None => 3,
    };

    let source = DomSource::new(Url::parse("https://x.com")?);
    let mut host = ScriptedTimeline::new(source.clone());
    host.seed(FIRST_SCREEN);
    host.push_step(ScriptStep::AppendChunk(SECOND_SCREEN.to_string()));

    let sink = FileSink::new(PathBuf::from("output"));
    let options = HarvestOptions {
        target_count,
        // The scripted feed is finite; stop scrolling eventually.
        max_passes: Some(50),
        ..HarvestOptions::default()
    };

    let outcome = run_harvest(&source, &mut host, &sink, options).await;
    println!("{}", to_json(&outcome.records));
    Ok(())
}
