use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use kizuna_core::{Item, ItemIndex};
use kizuna_etl::{Config, Dataset};
use kizuna_graph::SimilarityGraph;
use kizuna_search::Suggestion;
use ratatui::prelude::*;

use crate::commands::load_dataset;

pub mod item_detail;
pub mod search_list;

/// Which view the TUI is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Search,
    /// Record and neighbors of the given item.
    Detail(ItemIndex),
}

/// Application state for the catalog browser.
#[derive(Debug)]
pub struct App {
    pub dataset: Dataset,
    pub graph: SimilarityGraph,
    pub view: View,
    pub query: String,
    pub suggestions: Vec<Suggestion<ItemIndex>>,
    pub selected: usize,
    pub list_offset: usize, // First visible suggestion
    pub selected_neighbor: usize,
    /// Items visited before the current detail view, most recent last.
    pub history: Vec<ItemIndex>,
    pub limit: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(dataset: Dataset, graph: SimilarityGraph, limit: usize) -> Self {
        let mut app = Self {
            dataset,
            graph,
            view: View::Search,
            query: String::new(),
            suggestions: Vec::new(),
            selected: 0,
            list_offset: 0,
            selected_neighbor: 0,
            history: Vec::new(),
            limit,
            should_quit: false,
        };
        app.refresh_suggestions();
        app
    }

    pub fn item(&self, handle: ItemIndex) -> Option<&Item> {
        self.dataset.catalog.get(handle)
    }

    /// Graph neighbors of `handle` with their distances, closest first.
    pub fn neighbors(&self, handle: ItemIndex) -> Vec<(&Item, f64)> {
        let Some(item) = self.item(handle) else {
            return Vec::new();
        };
        let mut neighbors: Vec<(&Item, f64)> = self
            .graph
            .neighbors(item.name())
            .into_iter()
            .filter_map(|n| self.graph.weight(item.name(), n.name()).map(|w| (n, w)))
            .collect();
        neighbors.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        neighbors
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = self
            .dataset
            .names
            .get_suggestions_sorted(&self.query, self.limit);
        self.selected = 0;
        self.list_offset = 0;
    }

    fn handle_key(&mut self, key: KeyCode) {
        match self.view {
            View::Search => self.handle_search_key(key),
            View::Detail(handle) => self.handle_detail_key(key, handle),
        }
    }

    fn handle_search_key(&mut self, key: KeyCode) {
        // Assume reasonable viewport height (will be refined in render)
        const VIEWPORT_HEIGHT: usize = 20;

        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refresh_suggestions();
            }
            KeyCode::Backspace => {
                if self.query.pop().is_some() {
                    self.refresh_suggestions();
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < self.suggestions.len() {
                    self.selected += 1;
                    if self.selected >= self.list_offset + VIEWPORT_HEIGHT {
                        self.list_offset = self.selected - VIEWPORT_HEIGHT + 1;
                    }
                }
            }
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    if self.selected < self.list_offset {
                        self.list_offset = self.selected;
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(suggestion) = self.suggestions.get(self.selected) {
                    self.open(suggestion.value);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyCode, current: ItemIndex) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.back(),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_neighbor + 1 < self.neighbors(current).len() {
                    self.selected_neighbor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_neighbor = self.selected_neighbor.saturating_sub(1);
            }
            KeyCode::Enter => {
                let next = self
                    .neighbors(current)
                    .get(self.selected_neighbor)
                    .and_then(|(item, _)| self.dataset.catalog.index_of(item.name()));
                if let Some(next) = next {
                    self.history.push(current);
                    self.open(next);
                }
            }
            _ => {}
        }
    }

    fn open(&mut self, handle: ItemIndex) {
        self.selected_neighbor = 0;
        self.view = View::Detail(handle);
    }

    fn back(&mut self) {
        match self.history.pop() {
            Some(previous) => self.open(previous),
            None => self.view = View::Search,
        }
    }
}

/// Run the catalog browser.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(config: &Config) -> Result<()> {
    let dataset = load_dataset(config)?;
    if dataset.catalog.is_empty() {
        println!("The dataset has no usable rows: {}", config.dataset_path.display());
        return Ok(());
    }
    let graph = dataset.build_graph(config)?;
    let app = App::new(dataset, graph, config.suggestion_limit);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app);

    // Restore terminal regardless of success or failure
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| match app.view {
            View::Search => search_list::render(frame, &app),
            View::Detail(handle) => item_detail::render(frame, &app, handle),
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kizuna_core::Catalog;
    use kizuna_etl::LoadReport;
    use kizuna_graph::SimilarityWeights;

    fn app() -> App {
        let mut catalog = Catalog::new();
        for (id, name, episodes, rating) in [
            (1, "Haikyuu!!", 25, 8.6),
            (2, "Haikyuu!! Second Season", 25, 8.8),
            (3, "Hajime no Ippo", 76, 8.8),
            (4, "Ping Pong the Animation", 11, 8.6),
        ] {
            catalog.insert(
                Item::new(id, name)
                    .with_categories(["Sports", "Shounen"])
                    .with_kind("TV")
                    .with_episodes(episodes)
                    .with_rating(rating)
                    .with_popularity(300_000),
            );
        }
        let dataset = Dataset::from_catalog(catalog, LoadReport::default());
        let graph = SimilarityGraph::build(
            dataset.catalog.items().iter().cloned(),
            0.9,
            &SimilarityWeights::default(),
        )
        .unwrap();
        App::new(dataset, graph, 10)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_narrows_suggestions() {
        let mut app = app();
        assert_eq!(app.suggestions.len(), 4);
        type_text(&mut app, "hai");
        assert_eq!(app.suggestions.len(), 2);
        app.handle_key(KeyCode::Backspace);
        assert_eq!(app.query, "ha");
        assert_eq!(app.suggestions.len(), 3);
    }

    #[test]
    fn test_q_is_typed_in_search() {
        let mut app = app();
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert!(app.suggestions.is_empty());
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_opens_detail_and_back_returns() {
        let mut app = app();
        type_text(&mut app, "haikyuu");
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        let expected = app.dataset.catalog.index_of("Haikyuu!! Second Season").unwrap();
        assert_eq!(app.view, View::Detail(expected));

        app.handle_key(KeyCode::Char('b'));
        assert_eq!(app.view, View::Search);
        assert_eq!(app.query, "haikyuu");
    }

    #[test]
    fn test_follow_neighbor_keeps_history() {
        let mut app = app();
        type_text(&mut app, "haikyuu!! s");
        app.handle_key(KeyCode::Enter);
        let View::Detail(first) = app.view else {
            panic!("expected detail view");
        };
        let neighbors = app.neighbors(first);
        assert_eq!(neighbors[0].0.name(), "Haikyuu!!");

        app.handle_key(KeyCode::Enter);
        let second = app.dataset.catalog.index_of("Haikyuu!!").unwrap();
        assert_eq!(app.view, View::Detail(second));
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.view, View::Detail(first));
    }
}
