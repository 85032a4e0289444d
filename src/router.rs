//! Application stack.
//!
//! The router owns every running application and decides which one receives
//! input. While no application is current, messages drive its own three
//! panels: the launcher menu, the results list and the open list.

use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::apps::{App, Launcher};
use crate::components::{Menu, MenuItem};
use crate::constants::ROUTER_SPLIT;
use crate::keybindings::{Key, Message};
use crate::layout::{DEFAULT_RATIO, SplitArea, split_v};
use crate::shell::{ShellContext, ShellError, ShellResult};
use crate::window::{Metrics, Window};

/// Router panels, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Apps,
    Results,
    Open,
}

impl Panel {
    pub fn left(self) -> Self {
        match self {
            Panel::Apps | Panel::Results => Panel::Apps,
            Panel::Open => Panel::Results,
        }
    }

    pub fn right(self) -> Self {
        match self {
            Panel::Apps => Panel::Results,
            Panel::Results | Panel::Open => Panel::Open,
        }
    }
}

pub struct AppStack {
    apps: Menu<Launcher>,
    results: Menu<ShellResult>,
    open: Menu<App>,
    panel: Panel,
    current: Option<usize>,
    exiting: bool,
}

impl AppStack {
    /// Lay the panels out over `bounds`, seeding the results list in order.
    pub fn new(metrics: Metrics, bounds: Rect, seed: Vec<ShellResult>) -> Self {
        let mut apps_win = Window::new(metrics, Rect::default(), Some("Apps"));
        let mut container = Window::untitled(metrics, Rect::default());
        split_v(&mut apps_win, &mut container, ROUTER_SPLIT, SplitArea::Screen(bounds));
        let mut results_win = Window::new(metrics, Rect::default(), Some("Results"));
        let mut open_win = Window::new(metrics, Rect::default(), Some("Open"));
        split_v(
            &mut results_win,
            &mut open_win,
            DEFAULT_RATIO,
            SplitArea::Container(&container),
        );
        let launchers = Launcher::ALL
            .iter()
            .map(|l| MenuItem::new(l.label(), *l))
            .collect();
        let results = seed
            .into_iter()
            .map(|r| MenuItem::new(r.value.clone(), r))
            .collect();
        Self {
            apps: Menu::new(apps_win, launchers),
            results: Menu::new(results_win, results),
            open: Menu::new(open_win, Vec::new()),
            panel: Panel::Apps,
            current: None,
            exiting: false,
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Index into the open list of the application receiving input.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_app(&self) -> Option<&App> {
        self.current.and_then(|i| self.open.nth_payload(i))
    }

    pub fn apps(&self) -> &Menu<Launcher> {
        &self.apps
    }

    pub fn results(&self) -> &Menu<ShellResult> {
        &self.results
    }

    pub fn open(&self) -> &Menu<App> {
        &self.open
    }

    pub fn exiting(&self) -> bool {
        self.exiting
    }

    pub fn into_results(self) -> Vec<ShellResult> {
        self.results
            .opts()
            .iter()
            .filter_map(|item| item.payload.clone())
            .collect()
    }

    /// Prepend a result. It becomes the selected result.
    pub fn push_result(&mut self, result: ShellResult) {
        info!(value = %result.value, kind = %result.kind, "result pushed");
        self.results
            .push_opt(MenuItem::new(result.value.clone(), result));
    }

    pub fn show(&mut self, ctx: &mut ShellContext) {
        let canvas = ctx.canvas();
        self.apps.show(canvas, self.panel == Panel::Apps);
        self.results.show(canvas, self.panel == Panel::Results);
        self.open.show(canvas, self.panel == Panel::Open);
    }

    fn focus_router(&mut self, ctx: &mut ShellContext) {
        if self.current.take().is_some() {
            debug!("focus returned to router");
        }
        self.show(ctx);
    }

    fn switch_to(&mut self, index: usize, ctx: &mut ShellContext) {
        if let Some(app) = self.open.nth_payload_mut(index) {
            info!(title = %app.title(), "switch application");
            app.show(ctx);
            self.current = Some(index);
        }
    }

    fn launch(&mut self, ctx: &mut ShellContext) {
        let Some(launcher) = self.apps.selected_payload().copied() else {
            return;
        };
        let arg = self.results.selected_payload().cloned();
        let Some(app) = launcher.launch(arg.as_ref(), ctx) else {
            return;
        };
        self.open.push_opt(MenuItem::new(app.title(), app));
        self.switch_to(0, ctx);
    }

    /// Handle a message while the router itself has focus.
    pub fn handle(&mut self, msg: &Message, ctx: &mut ShellContext) {
        match msg {
            Message::Left => self.panel = self.panel.left(),
            Message::Right => self.panel = self.panel.right(),
            Message::Up | Message::Down => {
                match self.panel {
                    Panel::Apps => self.apps.handle(msg),
                    Panel::Results => self.results.handle(msg),
                    Panel::Open => self.open.handle(msg),
                };
            }
            Message::Enter => match self.panel {
                Panel::Apps => self.launch(ctx),
                Panel::Open => {
                    let selected = self.open.selected();
                    self.switch_to(selected, ctx);
                }
                Panel::Results => {}
            },
            Message::Del => {
                match self.panel {
                    Panel::Results => self.results.remove_selected().map(|_| ()),
                    Panel::Open => self.open.remove_selected().map(|_| ()),
                    Panel::Apps => None,
                };
            }
            _ => {}
        }
        if self.current.is_none() {
            self.show(ctx);
        }
    }

    /// Route one decoded key, then apply whatever the handler requested.
    pub fn dispatch_key(&mut self, key: Key, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match key {
            Key::Focus => self.focus_router(ctx),
            Key::Quit => ctx.request_exit(),
            key => {
                if let Some(msg) = Message::from_key(key) {
                    match self.current.and_then(|i| self.open.nth_payload_mut(i)) {
                        Some(app) => app.send(&msg, ctx)?,
                        None => self.handle(&msg, ctx),
                    }
                }
            }
        }
        self.apply_requests(ctx);
        Ok(())
    }

    fn apply_requests(&mut self, ctx: &mut ShellContext) {
        let requests = ctx.take_requests();
        for result in requests.results {
            self.push_result(result);
        }
        if requests.exit {
            info!("exit requested");
            self.exiting = true;
            return;
        }
        if requests.to_router {
            self.focus_router(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_move_without_wrapping() {
        assert_eq!(Panel::Apps.left(), Panel::Apps);
        assert_eq!(Panel::Apps.right(), Panel::Results);
        assert_eq!(Panel::Results.right(), Panel::Open);
        assert_eq!(Panel::Open.right(), Panel::Open);
        assert_eq!(Panel::Open.left(), Panel::Results);
    }

    #[test]
    fn panels_tile_the_screen() {
        let stack = AppStack::new(Metrics::DEVICE, Rect::new(0, 0, 320, 240), Vec::new());
        let apps = stack.apps().window().area();
        let results = stack.results().window().area();
        let open = stack.open().window().area();
        assert_eq!(apps, Rect::new(0, 0, 96, 240));
        // container interior starts inset from the container edge
        assert_eq!(results.x, 98);
        assert_eq!(results.y, 2);
        assert_eq!(open.x, results.x + results.width);
        assert_eq!(open.height, 236);
    }

    #[test]
    fn seed_results_keep_order() {
        let seed = vec![ShellResult::path("/a"), ShellResult::symbol("f")];
        let mut stack = AppStack::new(Metrics::TERMINAL, Rect::new(0, 0, 80, 24), seed.clone());
        assert_eq!(stack.results().selected_payload(), Some(&seed[0]));
        stack.push_result(ShellResult::text("t"));
        let results = stack.into_results();
        assert_eq!(results[0], ShellResult::text("t"));
        assert_eq!(&results[1..], &seed[..]);
    }
}
