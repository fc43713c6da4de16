use crate::app::{
    AddPlayerDialog, App, ConfirmPrompt, CreateField, CreateGameForm, CustomDeltaForm,
    DialogField, Overlay, Screen, Tone,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use score_core::{Pulse, capitalize_first};
use score_types::{AVATAR_COLORS, QUICK_DELTAS};

pub fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Home => render_home(frame, chunks[1], app),
        Screen::Game => render_game(frame, chunks[1], app),
    }

    let footer =
        Paragraph::new(footer_text(app)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    match &app.overlay {
        Some(Overlay::CreateGame(form)) => render_create_game_overlay(frame, form),
        Some(Overlay::AddPlayer(dialog)) => render_add_player_overlay(frame, dialog, app),
        Some(Overlay::CustomDelta(form)) => render_custom_delta_overlay(frame, form),
        Some(Overlay::Confirm(prompt)) => render_confirm_overlay(frame, prompt),
        None => {}
    }

    if app.overlay.is_none() {
        if let Some(celebration) = app.session.celebration() {
            render_celebration_overlay(frame, &celebration.winner_name, app);
        }
    }
}

fn header_text(app: &App) -> String {
    match app.screen {
        Screen::Home => {
            let count = app.session.games.games().len();
            let line1 = format!("  PLINK  |  {count} saved games");
            format!("{line1}\n  Tabletop scorekeeper")
        }
        Screen::Game => match app.session.current_game() {
            Some(game) => {
                let line1 = format!("  {}", capitalize_first(&game.name));
                let count = game.players.len();
                let noun = if count == 1 { "player" } else { "players" };
                let line2 = format!(
                    "  {count} {noun} · Points to win: {}",
                    game.target_points
                );
                format!("{line1}\n{line2}")
            }
            None => "  PLINK".to_string(),
        },
    }
}

fn footer_text(app: &App) -> String {
    match &app.overlay {
        Some(Overlay::CreateGame(_)) => {
            "Tab Switch field | Enter Create | Esc Cancel".to_string()
        }
        Some(Overlay::AddPlayer(_)) => {
            "Tab Next field | ←/→ Color | ↑/↓ Saved | Del Delete saved | Enter Add | Esc Cancel"
                .to_string()
        }
        Some(Overlay::CustomDelta(_)) => {
            "0-9 Amount | +/- Sign | Enter Apply | Esc Cancel".to_string()
        }
        Some(Overlay::Confirm(_)) => "Enter/y Confirm | Esc/n Cancel".to_string(),
        None => match app.screen {
            Screen::Home => {
                "j/k/↑/↓ Move | Enter Open | n New game | d Delete | q Quit".to_string()
            }
            Screen::Game => {
                let deltas = QUICK_DELTAS
                    .iter()
                    .enumerate()
                    .map(|(i, d)| format!("{} {d:+}", i + 1))
                    .collect::<Vec<_>>()
                    .join(" | ");
                format!(
                    "{deltas} | c Custom | a Add | x Remove | r Reset | j/k Move | b/Esc Back | q Quit"
                )
            }
        },
    }
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let games = app.session.games.games();
    if games.is_empty() {
        let empty = Paragraph::new("No games yet. Press n to create one.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    const ROW_HEIGHT: u16 = 2;
    if area.height < ROW_HEIGHT {
        return;
    }
    let visible = (area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(app.home_cursor, games.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT,
        };
        let selected = idx == app.home_cursor;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let game = &games[idx];
        let title = format!("  {}", capitalize_first(&game.name));
        let count = game.players.len();
        let noun = if count == 1 { "player" } else { "players" };
        let meta = format!(
            "    {count} {noun} · Points to win: {} · {}",
            game.target_points,
            created_date(&game.created_at)
        );
        let text = format!("{title}\n{meta}");
        frame.render_widget(Paragraph::new(text).style(row_style), row_area);
    }
}

fn render_game(frame: &mut Frame, area: Rect, app: &App) {
    let players = app.session.ordered_players();
    if players.is_empty() {
        let empty = Paragraph::new("No players yet. Press a to add one.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let ranks = app.session.ranks();
    let winner_id = app.session.winner_id();
    let show_ranks = app
        .session
        .current_game()
        .map(|g| g.any_score_nonzero())
        .unwrap_or(false);

    const ROW_HEIGHT: u16 = 2;
    if area.height < ROW_HEIGHT {
        return;
    }
    let visible = (area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(app.player_cursor, players.len(), visible);

    let widths = [
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(6),
        Constraint::Length(10),
    ];

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT,
        };
        let selected = idx == app.player_cursor;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let player = &players[idx];

        let rank = if show_ranks {
            ranks.get(&player.id).map(|r| format!(" #{r}")).unwrap_or_default()
        } else {
            String::new()
        };
        render_cell_text(frame, cols[0], &rank, row_style);

        let initial = player
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default();
        let avatar_style = row_style.fg(color_from_hex(&player.avatar_color));
        render_cell_text(frame, cols[1], &format!("({initial})"), avatar_style);

        let mut name = capitalize_first(&player.name);
        if winner_id == Some(player.id) {
            name.push_str("  WIN");
        }
        let name_style = if winner_id == Some(player.id) {
            row_style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            row_style
        };
        render_cell_text(frame, cols[2], &name, name_style);

        let (marker, marker_style) = match app.session.pulse(player.id) {
            Some(Pulse::Positive) => ("▲", row_style.fg(Color::Green)),
            Some(Pulse::Negative) => ("▼", row_style.fg(Color::Red)),
            None => ("", row_style),
        };
        render_cell_text(frame, cols[3], marker, marker_style);

        render_cell_text(frame, cols[4], &player.score.to_string(), row_style);
    }
}

fn render_create_game_overlay(frame: &mut Frame, form: &CreateGameForm) {
    let popup_area = centered_rect(50, 40, frame.size());
    frame.render_widget(Clear, popup_area);

    let name_marker = field_marker(form.field == CreateField::Name);
    let target_marker = field_marker(form.field == CreateField::Target);
    let text = [
        String::new(),
        format!("{name_marker}Name:   {}", form.name),
        format!("{target_marker}Target: {}", form.target),
        String::new(),
        "  Target must be a positive number of points.".to_string(),
    ]
    .join("\n");

    let dialog = Paragraph::new(text)
        .block(Block::default().title("New game").borders(Borders::ALL));
    frame.render_widget(dialog, popup_area);
}

fn render_add_player_overlay(frame: &mut Frame, dialog: &AddPlayerDialog, app: &App) {
    let popup_area = centered_rect(60, 70, frame.size());
    frame.render_widget(Clear, popup_area);

    let color = AVATAR_COLORS[dialog.color_index];
    let save_mark = if dialog.save_for_later { "[x]" } else { "[ ]" };

    let mut lines = vec![
        String::new(),
        format!(
            "{}Name:  {}",
            field_marker(dialog.field == DialogField::Name),
            dialog.name
        ),
        format!(
            "{}Color: {}",
            field_marker(dialog.field == DialogField::Color),
            color.label
        ),
        format!(
            "{}{save_mark} Save for later",
            field_marker(dialog.field == DialogField::Save)
        ),
    ];

    let profiles = app.session.profiles.profiles();
    if !profiles.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{}Saved players (type to search): {}",
            field_marker(dialog.field == DialogField::Saved),
            dialog.search
        ));
        let in_game = |id| {
            app.session
                .current_game()
                .map(|g| g.has_profile(id))
                .unwrap_or(false)
        };
        let visible = dialog.filtered_profiles(profiles);
        if visible.is_empty() {
            lines.push("    No matching players".to_string());
        }
        for (i, profile) in visible.iter().enumerate() {
            let cursor = if dialog.field == DialogField::Saved && i == dialog.profile_cursor {
                "> "
            } else {
                "  "
            };
            let status = if in_game(profile.id) { "  (added)" } else { "" };
            lines.push(format!(
                "  {cursor}{}{status}",
                capitalize_first(&profile.name)
            ));
        }
    }

    let text = lines.join("\n");
    let widget = Paragraph::new(text)
        .block(Block::default().title("Add player").borders(Borders::ALL));
    frame.render_widget(widget, popup_area);
}

fn render_custom_delta_overlay(frame: &mut Frame, form: &CustomDeltaForm) {
    let popup_area = centered_rect(40, 30, frame.size());
    frame.render_widget(Clear, popup_area);

    let sign = if form.negative { "-" } else { "+" };
    let text = [
        String::new(),
        format!("  Player: {}", capitalize_first(&form.player_name)),
        format!("  Amount: {sign}{}", form.raw),
    ]
    .join("\n");

    let widget = Paragraph::new(text)
        .block(Block::default().title("Custom points").borders(Borders::ALL));
    frame.render_widget(widget, popup_area);
}

fn render_confirm_overlay(frame: &mut Frame, prompt: &ConfirmPrompt) {
    let popup_area = centered_rect(50, 30, frame.size());
    frame.render_widget(Clear, popup_area);

    let accent = match prompt.tone {
        Tone::Danger => Color::Red,
        Tone::Neutral => Color::Yellow,
    };
    let text = [
        String::new(),
        format!("  {}", prompt.message),
        String::new(),
        format!("  Enter {}   Esc Cancel", prompt.confirm_label),
    ]
    .join("\n");

    let widget = Paragraph::new(text).block(
        Block::default()
            .title(prompt.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent)),
    );
    frame.render_widget(widget, popup_area);
}

fn render_celebration_overlay(frame: &mut Frame, winner_name: &str, app: &App) {
    let popup_area = centered_rect(50, 40, frame.size());
    frame.render_widget(Clear, popup_area);

    let target = app
        .session
        .current_game()
        .map(|g| g.target_points)
        .unwrap_or(0);
    let text = [
        String::new(),
        format!("  {winner_name} wins!"),
        format!("  First to {target} points."),
        String::new(),
        "  Press any key to continue".to_string(),
    ]
    .join("\n");

    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title("Winner")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(widget, popup_area);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn field_marker(active: bool) -> &'static str {
    if active { "  > " } else { "    " }
}

/// "2026-08-06T18:00:00+00:00" renders as "2026-08-06".
fn created_date(created_at: &str) -> &str {
    created_at.split('T').next().unwrap_or(created_at)
}

fn color_from_hex(hex: &str) -> Color {
    let raw = hex.strip_prefix('#').unwrap_or(hex);
    if raw.len() != 6 || !raw.is_ascii() {
        return Color::Gray;
    }
    let parse = |range| u8::from_str_radix(&raw[range], 16).ok();
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex_parses_rgb() {
        assert_eq!(color_from_hex("#3b82f6"), Color::Rgb(0x3b, 0x82, 0xf6));
        assert_eq!(color_from_hex("ef4444"), Color::Rgb(0xef, 0x44, 0x44));
    }

    #[test]
    fn test_color_from_hex_falls_back_on_garbage() {
        assert_eq!(color_from_hex("#xyzxyz"), Color::Gray);
        assert_eq!(color_from_hex("#fff"), Color::Gray);
        assert_eq!(color_from_hex(""), Color::Gray);
    }

    #[test]
    fn test_visible_range_centers_selection() {
        assert_eq!(visible_range(0, 3, 10), (0, 3));
        assert_eq!(visible_range(5, 20, 6), (2, 8));
        assert_eq!(visible_range(19, 20, 6), (14, 20));
    }

    #[test]
    fn test_created_date_takes_the_date_part() {
        assert_eq!(created_date("2026-08-06T18:00:00+00:00"), "2026-08-06");
        assert_eq!(created_date("garbage"), "garbage");
    }
}
