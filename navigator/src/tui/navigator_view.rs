use std::cell::RefCell;

use anyhow::Result;
use indoc::indoc;
use tui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Table, TableState, Tabs, Wrap},
};
use toolbox::{
    catalog::{self, Application, Library},
    config::Paths,
    package::PackageInfo,
    spawn::QuietSpawner,
    Arch, Catalog,
};
use super::{
    dialog,
    input::{Edit, StringInput},
    jobs::Jobs,
    state::{self, KeyCode, KeyModifiers, State, Status},
    Frame, Terminal,
};

const KEY_BINDINGS: &str = indoc!("
    TAB / SHIFT + TAB  Switch page
    ↑/↓                Select row
    ←/→ or SPACE       Change architecture (Python)
    ENTER              Download or install the selection
    CTRL + (w)         Download the win32 installer (Applications)
    CTRL + (u)         Clear the filter (Libraries)
    ESC                Quit
");

pub fn navigator_view(term: &mut Terminal, catalog: Catalog, paths: Paths) -> Result<()> {
    let displayed = filter_libraries(catalog.libraries(), "");
    let library_state = TableState::default();
    let mut application_state = TableState::default();
    application_state.select(first_row(catalog.applications().len()));

    let mut view = NavigatorView {
        catalog,
        paths,
        info: PackageInfo::navigator(),
        page: Page::Python,
        arch: Arch::host(),
        filter: StringInput::default(),
        displayed,
        library_state: RefCell::new(library_state),
        application_state: RefCell::new(application_state),
        jobs: Jobs::new(QuietSpawner),
    };
    view.update_displayed();

    state::exec(term, view)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Python,
    Libraries,
    Applications,
    Help,
}

impl Page {
    const ALL: [Page; 4] = [Page::Python, Page::Libraries, Page::Applications, Page::Help];

    fn title(&self) -> &'static str {
        match self {
            Page::Python => "Python",
            Page::Libraries => "Libraries",
            Page::Applications => "Applications",
            Page::Help => "Help",
        }
    }

    fn index(&self) -> usize {
        Page::ALL.iter().position(|page| page == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Page {
        let len = Page::ALL.len() as isize;
        Page::ALL[(self.index() as isize + delta).rem_euclid(len) as usize]
    }
}

struct NavigatorView {
    catalog: Catalog,
    /// Decides where downloads are saved.
    paths: Paths,
    info: PackageInfo,
    page: Page,
    /// Architecture of the Python installer to download.
    arch: Arch,
    /// Text input containing a string to filter libraries by.
    filter: StringInput,
    /// Ordered indices of libraries to display according to filter.
    displayed: Vec<usize>,
    /// Maintains index of the selected library row. Kept in a cell since drawing scrolls it.
    library_state: RefCell<TableState>,
    /// Maintains index of the selected application row.
    application_state: RefCell<TableState>,
    jobs: Jobs,
}

impl NavigatorView {
    fn selected_library(&self) -> Option<&Library> {
        self.library_state.borrow()
            .selected()
            .and_then(|row| self.displayed.get(row))
            .map(|&i| &self.catalog.libraries()[i])
    }

    fn selected_application(&self) -> Option<&Application> {
        self.application_state.borrow()
            .selected()
            .and_then(|row| self.catalog.applications().get(row))
    }

    fn update_displayed(&mut self) {
        let filter = self.filter.value();
        self.displayed = filter_libraries(self.catalog.libraries(), &filter);
        let row = search_row(&self.catalog, &self.displayed, &filter);
        self.library_state.borrow_mut().select(row);
    }

    fn download_python(&mut self) {
        let label = format!("Python {} ({})", catalog::PYTHON_VERSION, self.arch);
        let url = catalog::python_installer(self.arch);
        self.jobs.download(label, url, self.paths.python_downloads());
    }

    fn download_application(&mut self, term: &mut Terminal, arch: Option<Arch>) -> Result<()> {
        let Some(app) = self.selected_application().cloned() else {
            return Ok(());
        };
        let arch = arch.or_else(|| app.preferred());

        match arch.and_then(|arch| app.url(arch).map(|url| (arch, url.to_owned()))) {
            Some((arch, url)) => {
                let label = format!("{} ({arch})", app.name);
                self.jobs.download(label, url, self.paths.application_downloads(&app.name));
            }
            None => {
                let msg = format!("{} offers no win32 installer.", app.name);
                dialog::info(term, Some(&*self), msg)?;
            }
        }
        Ok(())
    }

    fn install_library(&mut self, term: &mut Terminal) -> Result<()> {
        if let Some(library) = self.selected_library() {
            let name = library.name.clone();
            let msg = format!("This will run 'pip install {name}'. Continue?");

            if dialog::confirm(term, Some(&*self), msg)? {
                self.jobs.pip_install(name);
            }
        }
        Ok(())
    }

    fn update_page(&mut self, term: &mut Terminal, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match self.page {
            Page::Python => match key {
                KeyCode::Left => self.arch = self.arch.prev(),
                KeyCode::Right | KeyCode::Char(' ') => self.arch = self.arch.next(),
                KeyCode::Enter => self.download_python(),
                _ => (),
            },
            Page::Libraries => match key {
                KeyCode::Up => move_selected(&self.library_state, self.displayed.len(), -1),
                KeyCode::Down => move_selected(&self.library_state, self.displayed.len(), 1),
                KeyCode::Enter => self.install_library(term)?,
                _ => {
                    if self.filter.key_down(key, modifiers) == Edit::Changed {
                        self.update_displayed();
                    }
                }
            },
            Page::Applications => {
                let len = self.catalog.applications().len();
                match key {
                    KeyCode::Up => move_selected(&self.application_state, len, -1),
                    KeyCode::Down => move_selected(&self.application_state, len, 1),
                    KeyCode::Left => self.page = self.page.offset(-1),
                    KeyCode::Right => self.page = self.page.offset(1),
                    KeyCode::Enter => self.download_application(term, None)?,
                    KeyCode::Char('w') if ctrl => self.download_application(term, Some(Arch::Win32))?,
                    _ => (),
                }
            }
            Page::Help => match key {
                KeyCode::Left => self.page = self.page.offset(-1),
                KeyCode::Right => self.page = self.page.offset(1),
                _ => (),
            },
        }
        Ok(())
    }

    fn draw_python(&self, frame: &mut Frame, area: Rect) {
        let dir = self.paths.python_downloads();
        let lines = vec![
            Spans::from(Span::styled(
                format!("Python {}", catalog::PYTHON_VERSION),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::default(),
            Spans::from(vec![
                Span::raw("Architecture: "),
                Span::styled(
                    format!("< {} >", self.arch),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            Spans::from(format!("Installer:    {}", catalog::python_installer(self.arch))),
            Spans::from(format!("Saved to:     {}", dir.display())),
            Spans::default(),
            Spans::from(Span::styled(
                "Press (←/→) to change the architecture, (enter) to download...",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];
        let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(widget, area);
    }

    fn draw_libraries(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(area);

        if self.displayed.is_empty() && !self.filter.is_empty() {
            let msg = format!(
                "No library matches '{}'. Check the spelling or try another keyword.",
                self.filter.value()
            );
            let widget = Paragraph::new(msg)
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            frame.render_widget(widget, layout[0]);
        } else {
            let libraries = self.catalog.libraries();
            let table_widget = Table::new(self.displayed.iter()
                .map(|&i| {
                    let Library { name, description } = libraries[i].clone();
                    Row::new(vec![name, description])
                }))
                .header(
                    Row::new(vec!["NAME", "DESCRIPTION"])
                        .style(Style::default().add_modifier(Modifier::BOLD))
                        .bottom_margin(1)
                )
                .widths(&[
                    Constraint::Percentage(30),
                    Constraint::Percentage(70),
                ])
                .highlight_style(Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
                );
            frame.render_stateful_widget(table_widget, layout[0], &mut self.library_state.borrow_mut());
        }

        let widget = Paragraph::new(self.filter.format())
            .block(Block::default()
                .title(" FILTER ")
                .borders(Borders::ALL)
            );
        frame.render_widget(widget, layout[1]);
    }

    fn draw_applications(&self, frame: &mut Frame, area: Rect) {
        let table_widget = Table::new(self.catalog.applications().iter()
            .map(|app| {
                let architectures: Vec<&str> = app.architectures()
                    .iter()
                    .map(|arch| arch.as_str())
                    .collect();
                let folder = self.paths.application_downloads(&app.name);
                Row::new(vec![
                    app.name.clone(),
                    architectures.join(", "),
                    folder.display().to_string(),
                ])
            }))
            .header(
                Row::new(vec!["NAME", "INSTALLERS", "SAVED TO"])
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .bottom_margin(1)
            )
            .widths(&[
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(60),
            ])
            .highlight_style(Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
            );
        frame.render_stateful_widget(table_widget, area, &mut self.application_state.borrow_mut());
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let info = &self.info;
        let mut lines = vec![
            Spans::from(Span::styled(info.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Spans::default(),
            Spans::from(format!("Version: {}", info.version)),
            Spans::from(format!("Author:  {} ({})", info.author, info.email)),
            Spans::from(format!("License: {}", info.license)),
            Spans::default(),
            Spans::from(info.description.clone()),
            Spans::from("The source code is mirrored on GitCode, GitHub and Gitee."),
            Spans::default(),
        ];
        lines.extend(KEY_BINDINGS.lines().map(Spans::from));

        let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(widget, area);
    }

    fn draw_jobs(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(" JOBS ").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let running = self.jobs.running();
        if running.is_empty() {
            let widget = Paragraph::new("Nothing running. Press (tab) to switch page, (esc) to quit...")
                .style(Style::default().add_modifier(Modifier::ITALIC));
            frame.render_widget(widget, inner);
            return;
        }

        let rows = Layout::default()
            .constraints(vec![Constraint::Length(1); running.len().min(inner.height as usize)])
            .split(inner);

        for (job, row) in running.iter().zip(rows) {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(row);
            frame.render_widget(Paragraph::new(job.label()), columns[0]);

            let status = job.status();
            match job.ratio() {
                Some(ratio) => {
                    let gauge = Gauge::default()
                        .gauge_style(Style::default().fg(Color::Cyan))
                        .ratio(ratio)
                        .label(status);
                    frame.render_widget(gauge, columns[1]);
                }
                None => frame.render_widget(Paragraph::new(status), columns[1]),
            }
        }
    }
}

impl State for NavigatorView {
    fn update(&mut self, term: &mut Terminal, key: KeyCode, modifiers: KeyModifiers) -> Result<Status> {
        match key {
            KeyCode::Esc => {
                let running = self.jobs.running().len();
                if running == 0 {
                    return Ok(Status::Done);
                }
                let msg = format!("{running} job(s) are still running and will be abandoned. Quit anyway?");
                if dialog::confirm(term, Some(&*self), msg)? {
                    return Ok(Status::Done);
                }
            }
            KeyCode::Tab => self.page = self.page.offset(1),
            KeyCode::BackTab => self.page = self.page.offset(-1),
            _ => self.update_page(term, key, modifiers)?,
        }
        Ok(Status::Running)
    }

    fn tick(&mut self, term: &mut Terminal) -> Result<Status> {
        for finished in self.jobs.finished() {
            match finished.result {
                Ok(msg) => dialog::info(term, Some(&*self), format!("{} finished. {msg}", finished.label))?,
                Err(e) => dialog::error(term, Some(&*self), format!("{} failed: {e}", finished.label))?,
            }
        }
        Ok(Status::Running)
    }

    fn draw(&self, frame: &mut Frame) {
        let jobs_height = (self.jobs.running().len() as u16).clamp(1, 5) + 2;
        let layout = Layout::default()
            .horizontal_margin(3)
            .vertical_margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(jobs_height),
            ])
            .split(frame.size());

        // draw the page tabs
        {
            let titles = Page::ALL.iter()
                .map(|page| Spans::from(page.title()))
                .collect();
            let widget = Tabs::new(titles)
                .block(Block::default()
                    .title(" NAVIGATOR ")
                    .borders(Borders::ALL)
                )
                .select(self.page.index())
                .highlight_style(Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
                );
            frame.render_widget(widget, layout[0]);
        }

        let area = Layout::default()
            .vertical_margin(1)
            .constraints([Constraint::Min(1)])
            .split(layout[1])[0];
        match self.page {
            Page::Python => self.draw_python(frame, area),
            Page::Libraries => self.draw_libraries(frame, area),
            Page::Applications => self.draw_applications(frame, area),
            Page::Help => self.draw_help(frame, area),
        }

        self.draw_jobs(frame, layout[2]);
    }
}

fn first_row(len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(0)
    }
}

/// Returns the row holding the first catalog library found by a search for `filter`, falling
/// back to the first row.
fn search_row(catalog: &Catalog, displayed: &[usize], filter: &str) -> Option<usize> {
    catalog.find_library(filter)
        .and_then(|hit| displayed.iter().position(|&i| i == hit))
        .or_else(|| first_row(displayed.len()))
}

fn move_selected(state: &RefCell<TableState>, len: usize, delta: isize) {
    let mut state = state.borrow_mut();
    if let Some(prev) = state.selected() {
        let new = (prev as isize + delta).clamp(0, len.saturating_sub(1) as isize) as usize;
        state.select(Some(new));
    }
}

/// Returns the indices of the libraries matching `filter`, best match first.
///
/// Libraries whose name is the filter come first, then those containing it, then the remaining
/// fuzzy matches, each group ordered by match score. An empty filter keeps every library in
/// catalog order.
fn filter_libraries(libraries: &[Library], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..libraries.len()).collect();
    }

    let needle = filter.to_lowercase();
    // rank each library against the filter, removing libraries that don't match at all
    let mut ranks: Vec<(usize, (bool, bool, isize))> = libraries.iter()
        .enumerate()
        .filter_map(|(i, library)| {
            let name = library.name.to_lowercase();
            let exact = name == needle;
            let contains = name.contains(&needle);
            let score = sublime_fuzzy::best_match(filter, &library.name)
                .map(|m| m.score());

            match (contains, score) {
                (false, None) => None,
                (_, score) => Some((i, (exact, contains, score.unwrap_or(0)))),
            }
        })
        .collect();

    // sort such that the best rank is first, and return the indexes
    ranks.sort_by(|(_, a), (_, b)| b.cmp(a));
    ranks.into_iter()
        .map(|(i, _)| i)
        .collect()
}
