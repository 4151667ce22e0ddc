//! View command handler: the interactive terminal tree

use super::resolve_view;
use cwetree::config::Config;
use cwetree::core::dataset::DirectorySource;
use cwetree::core::reference::SystemOpener;
use cwetree::tui::{self, App};
use cwetree::{error, info};

/// Run the view command
pub fn run(view: Option<&str>, config: &Config) {
    let view = match resolve_view(view, config) {
        Ok(view) => view,
        Err(e) => {
            error!("View command failed: {e}");
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let source = DirectorySource::new(&config.paths.data_dir);
    if source.available().is_empty() {
        eprintln!(
            "✗ No datasets found in {}. Run `cwetree import <FILE> --view <ID>` first.",
            source.dir().display()
        );
        std::process::exit(1);
    }

    info!("Opening view {view} from {}", source.dir().display());
    let app = App::new(config.view_settings(), view, Box::new(source), SystemOpener);
    if let Err(e) = tui::run(app) {
        error!("Terminal UI failed: {e}");
        eprintln!("✗ Terminal UI failed: {e}");
        std::process::exit(1);
    }
}
