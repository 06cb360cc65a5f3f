//! Example: laying out a hand-written definition
//!
//! Builds a definition in code, hands it to a session as a preloaded
//! analysis, measures every node with a fixed-width estimate and prints the
//! positioned graph as JSON.

use etymon::{
    Session,
    config::AppConfig,
    definition::{Combination, Definition, MorphemePart},
    export::ExportFormat,
    geometry::Size,
    identifier::Id,
    node::GraphNode,
    store::MemoryStore,
    sync::SyncEvent,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let definition = Definition::new(
        "telephone splits into two Greek roots",
        vec![
            MorphemePart::new("tele", "tele", "τῆλε", "Greek", "far off"),
            MorphemePart::new("phone", "phone", "φωνή", "Greek", "voice, sound"),
        ],
        vec![vec![Combination::new(
            "telephone",
            "telephone",
            "a device for speaking over a distance",
            ["tele", "phone"],
        )]],
    );

    let mut session = Session::new(Box::new(MemoryStore::new()), &AppConfig::default());
    session.preload("telephone", definition);

    // Rough size estimate: one line of text per label line.
    let sizes: Vec<(Id, Size)> = session
        .nodes()
        .iter()
        .map(|node| (node.id(), estimate(node)))
        .collect();
    for (id, size) in sizes {
        session.record_size(id, size);
    }

    while let Some(event) = session.poll() {
        if let SyncEvent::FitView { bounds, .. } = event {
            println!(
                "Graph spans {:.0} x {:.0}",
                bounds.width(),
                bounds.height()
            );
        }
    }

    println!("{}", session.export(ExportFormat::Json)?);
    Ok(())
}

fn estimate(node: &GraphNode) -> Size {
    let lines = node.kind().label_lines();
    let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    Size::new(widest as f32 * 8.0 + 24.0, lines.len() as f32 * 20.0 + 16.0)
}
