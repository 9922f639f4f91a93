use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use expense_recap::export::{GRAND_TOTAL_LABEL, HEADERS};
use expense_recap::{format_currency, grand_total, row_positions, ExportRow, Summary};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_STEP: usize = 20;

pub struct App {
    pub title: String,
    pub rows: Vec<ExportRow>,
    pub summary: Summary,
    pub state: TableState,
}

impl App {
    pub fn new(title: String, rows: Vec<ExportRow>) -> Self {
        let mut state = TableState::default();
        if !rows.is_empty() {
            state.select(Some(0));
        }

        Self {
            title,
            summary: Summary::from_rows(&rows),
            rows,
            state,
        }
    }

    pub fn next(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_STEP).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = self
            .state
            .selected()
            .map(|i| i.saturating_sub(PAGE_STEP))
            .unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.rows.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.rows.is_empty() {
            self.state.select(Some(self.rows.len() - 1));
        }
    }

    pub fn selected_row(&self) -> Option<&ExportRow> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and figures
            Constraint::Min(0),    // Grouped table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            app.title.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total Perjalanan: {}", app.summary.entries),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Jumlah Orang: {}", app.summary.people),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("{}: {}", GRAND_TOTAL_LABEL, format_currency(app.summary.grand_total)),
            Style::default().fg(Color::Green),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

/// Table rows: group columns only on the first row of each group, then the total
fn table_rows(rows: &[ExportRow]) -> Vec<Row<'static>> {
    let mut table_rows: Vec<Row> = row_positions(rows)
        .iter()
        .zip(rows)
        .map(|(pos, row)| {
            let cells = vec![
                pos.lead_cell(|| Cell::from(row.sequence.to_string()), Cell::from("")),
                pos.lead_cell(|| Cell::from(row.name.clone()), Cell::from("")),
                Cell::from(row.location_code.clone()),
                Cell::from(row.receipt_date.clone()),
                Cell::from(row.description.clone()),
                Cell::from(format_currency(row.amount)),
                pos.lead_cell(
                    || {
                        Cell::from(format_currency(row.subtotal))
                            .style(Style::default().fg(Color::Green))
                    },
                    Cell::from(""),
                ),
            ];
            Row::new(cells).height(1)
        })
        .collect();

    let bold = Style::default().add_modifier(Modifier::BOLD);
    table_rows.push(
        Row::new(vec![
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(GRAND_TOTAL_LABEL).style(bold),
            Cell::from(format_currency(grand_total(rows))).style(bold.fg(Color::Green)),
        ])
        .style(Style::default().bg(Color::DarkGray)),
    );

    table_rows
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = HEADERS.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let table = Table::new(
        table_rows(&app.rows),
        [
            Constraint::Length(5),
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(13),
            Constraint::Min(30),
            Constraint::Length(20),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Rekap "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.rows.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(row) = app.selected_row() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("{} #{}", row.name, row.sequence),
            Style::default().fg(Color::Green),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("↑/↓ j/k", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Fast | "));
    status_spans.push(Span::styled("Home/End", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Jump | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_recap::{group, project};

    fn app() -> App {
        let doc = group([
            "Laporan Perjalanan Dinas",
            "Andi",
            "Tiket pesawat 500.000",
            "Penginapan hotel 750000",
            "Budi",
            "Tiket 300.000",
        ]);
        App::new(doc.title.clone(), project(&doc))
    }

    #[test]
    fn test_new_selects_first_row() {
        let app = app();
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(app.summary.entries, 3);
        assert_eq!(app.summary.people, 2);
        assert_eq!(app.summary.grand_total, 1_550_000);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.last();
        assert_eq!(app.selected_row().map(|r| r.name.as_str()), Some("Budi"));
        app.first();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_paging_clamps() {
        let mut app = app();
        app.page_down();
        assert_eq!(app.state.selected(), Some(2));
        app.page_up();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_empty_app() {
        let mut app = App::new("Hasil".to_string(), Vec::new());
        app.next();
        app.page_down();
        app.last();
        assert_eq!(app.state.selected(), None);
        assert_eq!(table_rows(&app.rows).len(), 1);
    }

    #[test]
    fn test_table_rows_include_grand_total() {
        let app = app();
        assert_eq!(table_rows(&app.rows).len(), app.rows.len() + 1);
    }
}
