use feed::store::BoardSnapshot;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
};

use super::row::{SignalRow, rows_newest_first};

const BACKGROUND: Color = Color::Rgb(0x1a, 0x1a, 0x1a);
const TABLE_BG: Color = Color::Rgb(0x2a, 0x2a, 0x2a);
const HEADER_BG: Color = Color::Rgb(0x33, 0x33, 0x33);
const BORDER: Color = Color::Rgb(0x44, 0x44, 0x44);
const TIME_GRAY: Color = Color::Rgb(0x99, 0x99, 0x99);

const COLUMNS: [&str; 5] = ["Symbol", "Price", "Action", "Confidence", "Time"];

pub fn draw(f: &mut Frame, board: &BoardSnapshot) {
    let area = f.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    draw_header(f, chunks[0], board.total);
    draw_signals(f, chunks[1], board);
}

fn draw_header(f: &mut Frame, area: Rect, total: u64) {
    let title = Line::from(vec![
        Span::styled(
            "🐋 Whale Monitor - Total Signals: ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            total.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let header = Paragraph::new(title)
        .style(Style::default().bg(BACKGROUND).fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER)),
        );
    f.render_widget(header, area);
}

fn draw_signals(f: &mut Frame, area: Rect, board: &BoardSnapshot) {
    let header = Row::new(COLUMNS.iter().map(|name| Cell::from(*name)))
        .style(
            Style::default()
                .bg(HEADER_BG)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(0);

    let rows: Vec<Row> = rows_newest_first(board)
        .into_iter()
        .map(table_row)
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .style(Style::default().bg(TABLE_BG).fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER)),
        );
    f.render_widget(table, area);
}

fn table_row(row: SignalRow) -> Row<'static> {
    Row::new(vec![
        Cell::from(Span::styled(
            row.symbol,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Cell::from(row.price),
        Cell::from(Span::styled(
            row.action,
            Style::default()
                .fg(row.color)
                .add_modifier(Modifier::BOLD),
        )),
        Cell::from(row.confidence),
        Cell::from(Span::styled(row.time, Style::default().fg(TIME_GRAY))),
    ])
}
