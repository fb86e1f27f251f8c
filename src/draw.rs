use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::reel::Reel;
use crate::state::spinner::SpinKind;
use crate::ui::layout::LayoutAreas;
use frc_selector::Selection;

static TABS: &[&str; 2] = &["Selector", "History"];

const GAME_COLOR: Color = Color::Blue;
const TEAM_COLOR: Color = Color::Green;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Selector => draw_selector(f, layout.main, app),
            MenuItem::History => draw_history(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        draw_status(f, layout.status, app);
        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
    });
    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Selector => 0,
        MenuItem::History => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type)
                .title(" FRC Game and Team Selector "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let total = Paragraph::new(total_teams_line(app))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(total, tab_bar[1]);
}

fn total_teams_line(app: &App) -> Line<'static> {
    let editor = &app.state.team_count;
    if editor.editing {
        Line::from(vec![
            Span::raw("Total Teams: "),
            Span::styled(
                format!("[{}_]", editor.input),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            Span::raw(" "),
        ])
    } else {
        Line::from(format!("Total Teams: {}  ?=help ", app.engine.total_teams()))
    }
}

// ---------------------------------------------------------------------------
// Selector tab
// ---------------------------------------------------------------------------

fn draw_selector(f: &mut Frame, area: Rect, app: &App) {
    let [reels, recent] =
        Layout::vertical([Constraint::Min(12), Constraint::Percentage(35)]).areas(area);

    let [game_area, team_area] = if reels.width >= 80 {
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(reels)
    } else {
        Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)]).areas(reels)
    };

    draw_game_panel(f, game_area, app);
    draw_team_panel(f, team_area, app);

    let block = default_border(Color::DarkGray).title(" Recent Selections ");
    let inner = block.inner(recent);
    f.render_widget(block, recent);
    let rows = inner.height.saturating_sub(1) as usize;
    let selections = app.engine.selections();
    let start = selections.len().saturating_sub(rows);
    draw_selection_table(f, inner, &selections[start..], start);
}

fn draw_game_panel(f: &mut Frame, area: Rect, app: &App) {
    let spinning = app.state.is_spinning(SpinKind::Game);
    let block = default_border(if spinning { Color::Yellow } else { GAME_COLOR })
        .title(" Random Game Selector ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [reel_area, button_area, remaining_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let display = app.state.game_reel.display.as_ref();
    f.render_widget(
        Reel {
            value: display.map(|g| g.year.to_string()),
            caption: display.map(|g| g.name.as_str()).unwrap_or("Game Name"),
            color: GAME_COLOR,
            spinning,
        },
        reel_area,
    );

    let label = if spinning { "Selecting..." } else { "[g] Get Random Game" };
    f.render_widget(button(label, app.can_spin(SpinKind::Game), GAME_COLOR), button_area);
    f.render_widget(
        Paragraph::new(format!(
            "{} games remaining",
            app.engine.available_games().len()
        ))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center),
        remaining_area,
    );
}

fn draw_team_panel(f: &mut Frame, area: Rect, app: &App) {
    let spinning = app.state.is_spinning(SpinKind::Team);
    let block = default_border(if spinning { Color::Yellow } else { TEAM_COLOR })
        .title(" Random Team Selector ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [reel_area, button_area, remaining_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(
        Reel {
            value: app.state.team_reel.display.map(|t| t.to_string()),
            caption: app
                .engine
                .selected_game()
                .map(|g| g.name.as_str())
                .unwrap_or("Select a game first"),
            color: TEAM_COLOR,
            spinning,
        },
        reel_area,
    );

    let label = if spinning { "Selecting..." } else { "[t] Get Random Team" };
    f.render_widget(button(label, app.can_spin(SpinKind::Team), TEAM_COLOR), button_area);
    f.render_widget(
        Paragraph::new(format!(
            "{} of {} teams remaining",
            app.engine.available_teams().len(),
            app.engine.total_teams()
        ))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center),
        remaining_area,
    );
}

fn button(label: &str, enabled: bool, color: Color) -> Paragraph<'_> {
    let style = if enabled {
        Style::default().fg(Color::White).bg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Black).bg(Color::DarkGray)
    };
    Paragraph::new(format!(" {label} "))
        .style(style)
        .alignment(Alignment::Center)
}

// ---------------------------------------------------------------------------
// History tab
// ---------------------------------------------------------------------------

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Selected Games and Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [content, legend] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: j/k=scroll  Esc=back  ?=help  q=quit")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    let selections = app.engine.selections();
    let start = (app.state.history.scroll_offset as usize).min(selections.len());
    draw_selection_table(f, content, &selections[start..], start);
}

/// `first_index` is the log position of `selections[0]`, used for striping
/// and numbering.
fn draw_selection_table(f: &mut Frame, area: Rect, selections: &[Selection], first_index: usize) {
    if area.height == 0 {
        return;
    }
    if selections.is_empty() && first_index == 0 {
        f.render_widget(
            Paragraph::new("No selections yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let header = Row::new(["#", "Year", "Game Name", "Team Number"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = selections.iter().enumerate().map(|(i, s)| {
        let index = first_index + i;
        let style = if index % 2 == 0 {
            Style::default()
        } else {
            Style::default().fg(Color::Gray)
        };
        Row::new([
            Cell::from((index + 1).to_string()),
            Cell::from(s.game.year.to_string()),
            Cell::from(s.game.name.clone()),
            Cell::from(s.team.to_string()),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Fill(1),
            Constraint::Length(12),
        ],
    )
    .header(header);
    f.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Help, status, logs
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let lines = [
        "g        spin for a random game",
        "t        spin for a random team (needs a game)",
        "n        edit total teams (Enter applies, Esc cancels)",
        "+ / -    one more / one fewer team",
        "1 / 2    selector / history",
        "j / k    scroll history",
        "f        full screen",
        "\"        toggle log pane",
        "Esc      leave help",
        "q        quit",
    ];
    let text: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.state.status {
        Some(status) => Line::from(vec![
            Span::styled(format!(" {} ", status.at), Style::default().fg(Color::DarkGray)),
            Span::raw(status.text.clone()),
        ]),
        None => Line::from(Span::styled(
            " Press g to draw a game",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}
