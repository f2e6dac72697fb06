use fruitscan::app::views::state_view;
use fruitscan::config::Settings;
use fruitscan::coordinator::CoordinatorBuilder;
use fruitscan::error::AppError;
use fruitscan::pipeline::PipelineState;
use fruitscan::UiCommand;
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

// Runs one capture -> classify -> enrich pass against the configured
// services and prints the resulting snapshot.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let settings = Settings::load()?;
    let coordinator = CoordinatorBuilder::new(settings).build()?;

    let commands = coordinator.commands();
    let mut snapshots = coordinator.subscribe();
    for command in [UiCommand::Capture, UiCommand::Classify, UiCommand::Enrich] {
        commands
            .send(command)
            .await
            .map_err(|e| AppError::Shell(e.to_string()))?;
    }

    loop {
        snapshots
            .changed()
            .await
            .map_err(|e| AppError::Shell(e.to_string()))?;
        let snapshot = snapshots.borrow_and_update().clone();
        if matches!(
            snapshot,
            PipelineState::Enriched(_, _) | PipelineState::Failed { .. }
        ) {
            for line in state_view::render(&snapshot) {
                println!("{line}");
            }
            break;
        }
    }
    Ok(())
}
