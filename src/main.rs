use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use kavela_config::{DEFAULT_CONFIG_FILE, KavelaConfig};
use kavela_dom::html::render_html_with_style;
use kavela_dom::{Document, Element, NodeId, document_from_file};
use kavela_motion::{
    AnchorNavigator, NavigatorOptions, Page, PageOptions, RevealConfig, RevealController,
    RevealEvent,
};
use kavela_site::{KAVELA, build_document, stylesheet};
use tracing::{debug, info, warn};

/// Upper bound for letting one navigation or scroll step finish.
const SETTLE_LIMIT_MS: f64 = 5_000.0;

struct Args {
    config: PathBuf,
    input: Option<PathBuf>,
    emit_html: Option<PathBuf>,
    tour: bool,
}

impl Args {
    fn from_env() -> Self {
        let value = |prefix: &str| std::env::args().find_map(|a| a.strip_prefix(prefix).map(PathBuf::from));
        let emit_html = value("--emit-html=");
        Self {
            config: value("--config=").unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            input: value("--input="),
            tour: emit_html.is_none() || std::env::args().any(|a| a == "--tour"),
            emit_html,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::from_env();
    let mut config = KavelaConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    // Installed before the env merge so rejected overrides are logged.
    let filter = std::env::var("KAVELA_LOG").unwrap_or_else(|_| config.logging.filter.clone());
    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_millis()
        .init();
    config.merge_with_env();
    info!(path = %args.config.display(), "configuration loaded");

    let reveal = RevealConfig::from_settings(&config.reveal)?;
    let document = load_document(&args)?;

    if let Some(path) = &args.emit_html {
        let css = stylesheet(reveal.offset_px, reveal.duration_ms);
        let html = render_html_with_style(&document, KAVELA.title, &css);
        std::fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "page written");
    }
    if args.tour {
        run_tour(document, &config, reveal)?;
    }
    Ok(())
}

fn load_document(args: &Args) -> Result<Document> {
    match &args.input {
        Some(path) => {
            let document = document_from_file(path)
                .with_context(|| format!("importing {}", path.display()))?;
            info!(path = %path.display(), nodes = document.len(), "page imported");
            Ok(document)
        }
        None => Ok(build_document(&KAVELA, chrono::Local::now().year())?),
    }
}

/// Links to click during the tour: those in the first `nav`, or every
/// fragment link when the page has no navigation bar.
fn tour_links(document: &Document) -> Vec<(NodeId, String)> {
    let is_fragment_link =
        |el: &Element| el.is("a") && el.href().is_some_and(|href| href.len() > 1 && href.starts_with('#'));
    let scope = document
        .query_all(document.root(), |el| el.is("nav"))
        .into_iter()
        .next()
        .unwrap_or_else(|| document.root());
    document
        .query_all(scope, is_fragment_link)
        .into_iter()
        .filter_map(|id| Some((id, document.get(id)?.href()?.to_string())))
        .collect()
}

fn run_tour(document: Document, config: &KavelaConfig, reveal: RevealConfig) -> Result<()> {
    let mut page = Page::new(document, PageOptions::from_config(config)?)?;
    let navigator = AnchorNavigator::mount(
        &page,
        NavigatorOptions {
            scroll_offset: config.navigation.scroll_offset,
        },
    );
    let controller = RevealController::mount(&mut page, None, reveal);
    log_events(&controller);

    let step = page.viewport().height / 2.0;
    info!(document_height = page.document_height(), step, "scrolling through page");
    while page.scroll_y() < page.max_scroll() {
        page.scroll_by(step);
        page.advance(250.0);
        debug!(scroll_y = page.scroll_y(), now_ms = page.now_ms(), "scrolled");
        log_events(&controller);
    }
    page.settle(SETTLE_LIMIT_MS);
    log_events(&controller);

    page.scroll_to(0.0);
    for (link, href) in tour_links(page.document()) {
        let outcome = page.click(link);
        let spent_ms = page.settle(SETTLE_LIMIT_MS);
        info!(
            href = %href,
            smooth = outcome.default_prevented,
            scroll_y = page.scroll_y(),
            spent_ms,
            "navigated"
        );
        log_events(&controller);
    }

    let groups = controller.groups();
    let revealed = groups.iter().filter(|group| group.is_triggered()).count();
    info!(
        groups = groups.len(),
        revealed,
        scroll_requests = page.scroll_requests().len(),
        now_ms = page.now_ms(),
        "tour finished"
    );
    if revealed < groups.len() {
        warn!(pending = groups.len() - revealed, "some reveal groups never entered the viewport");
    }
    controller.unmount();
    navigator.unmount();
    Ok(())
}

fn log_events(controller: &RevealController) {
    for event in controller.drain_events() {
        match event {
            RevealEvent::GroupTriggered { group, at_ms, .. } => info!(group, at_ms, "group triggered"),
            RevealEvent::ItemScheduled { group, index, start_ms } => {
                debug!(group, index, start_ms, "item scheduled")
            }
            RevealEvent::ItemRevealed { group, index, at_ms, .. } => {
                debug!(group, index, at_ms, "item revealed")
            }
        }
    }
}
