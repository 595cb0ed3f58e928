//! Play command implementation - interactive TUI.
//!
//! The human seat moves with the arrow keys; scripted seats act on their own
//! after the configured delay. The view follows the human agent, or the agent
//! to move once the human is out.

use super::{CliError, GameArgs};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gridwar::ai::TurnOutcome;
use gridwar::game::{Agent, AgentId, MoveOutcome, Resource};
use gridwar::session::Session;
use gridwar::{Coord, Direction, TileType};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

/// How long to wait for a key before checking the scripted schedule again.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the terminal fails.
pub(crate) fn execute(game: &GameArgs, delay: Option<u64>, spectate: bool) -> Result<(), CliError> {
    let mut config = game.resolve()?;
    if let Some(delay) = delay {
        config.scripted_delay_ms = delay;
    }
    if spectate {
        config.human_seat = false;
    }
    config.validate()?;

    let session = Session::new(config, Instant::now())?;
    run_tui(App::new(session))
}

/// App state for the TUI.
struct App {
    session: Session,
    /// Last thing that happened, shown in the footer.
    message: String,
}

impl App {
    fn new(session: Session) -> Self {
        Self {
            session,
            message: String::from("Your move."),
        }
    }

    /// Agent the viewport is centered on.
    fn focus(&self) -> Option<&Agent> {
        let state = self.session.state();
        self.session
            .human_agent()
            .and_then(|id| state.agent(id))
            .or_else(|| state.agents().get(state.turn_cursor()))
    }

    fn human_move(&mut self, direction: Direction) {
        if !self.session.awaiting_human() {
            return;
        }
        let Some(human) = self.session.human_agent() else {
            return;
        };
        self.message = match self.session.submit_human_move(human, direction, Instant::now()) {
            Ok(outcome) => describe_move(&outcome),
            Err(e) => e.to_string(),
        };
    }

    fn human_pass(&mut self) {
        if !self.session.awaiting_human() {
            return;
        }
        let Some(human) = self.session.human_agent() else {
            return;
        };
        self.message = match self.session.pass_human_turn(human, Instant::now()) {
            Ok(()) => String::from("You pass."),
            Err(e) => e.to_string(),
        };
    }

    fn tick(&mut self) {
        match self.session.poll(Instant::now()) {
            Some(Ok(TurnOutcome::Moved(outcome))) => self.message = describe_move(&outcome),
            Some(Ok(TurnOutcome::Passed { agent })) => {
                self.message = format!("Agent {agent} is boxed in and passes.");
            }
            Some(Err(e)) => {
                tracing::warn!(%e, "scripted turn failed");
                self.message = e.to_string();
            }
            None => {}
        }
    }

    fn restart(&mut self) -> Result<(), CliError> {
        self.session.restart(Instant::now())?;
        self.message = String::from("New game.");
        Ok(())
    }
}

fn describe_move(outcome: &MoveOutcome) -> String {
    let mut text = format!("Agent {} moved to {}", outcome.agent, outcome.to);
    if let Some(resource) = outcome.collected {
        text.push_str(&format!(", picked up {}", resource_name(resource)));
    }
    if let Some(combat) = outcome.combat {
        text.push_str(&format!(
            ", hit agent {} for {}",
            combat.defender, combat.damage
        ));
        if combat.eliminated {
            text.push_str(" and eliminated it");
        }
    }
    if let Some(winner) = outcome.winner {
        text.push_str(&format!(". Agent {winner} wins!"));
    } else {
        text.push('.');
    }
    text
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        app.tick();

        if event::poll(INPUT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') => app.restart()?,
                KeyCode::Char('p') => app.human_pass(),
                KeyCode::Left | KeyCode::Char('h') => app.human_move(Direction::Left),
                KeyCode::Right | KeyCode::Char('l') => app.human_move(Direction::Right),
                KeyCode::Up | KeyCode::Char('k') => app.human_move(Direction::Up),
                KeyCode::Down | KeyCode::Char('j') => app.human_move(Direction::Down),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let [header, main, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
    ])
    .areas(f.area());

    let [map_area, stats_area] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(30)]).areas(main);

    render_header(f, header, app);
    render_map(f, map_area, app);
    render_stats(f, stats_area, app);
    render_footer(f, footer, app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();

    let status = match state.winner() {
        Some(winner) if Some(winner) == app.session.human_agent() => String::from("YOU WIN"),
        Some(winner) => format!("AGENT {winner} WINS"),
        None if app.session.awaiting_human() => String::from("YOUR MOVE"),
        None => format!("AGENT {} THINKING", state.current_agent_id()),
    };

    let title = format!(
        " Gridwar | Turn {} | {} | Game {} ",
        state.turn_count(),
        status,
        app.session.generation() + 1
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

/// First visible map coordinate along one axis.
///
/// Centers `center` in a window of `view` cells, clamped so the window never
/// runs past either edge of a map `extent` cells long.
fn viewport_origin(center: u16, view: u16, extent: u16) -> u16 {
    if view >= extent {
        return 0;
    }
    center.saturating_sub(view / 2).min(extent - view)
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let map = state.map();

    let view_w = area.width.saturating_sub(2).min(map.width());
    let view_h = area.height.saturating_sub(2).min(map.height());
    let center = app.focus().map_or(Coord::new(0, 0), |a| a.position);
    let origin_x = viewport_origin(center.x, view_w, map.width());
    let origin_y = viewport_origin(center.y, view_h, map.height());

    let mut lines: Vec<Line> = Vec::with_capacity(usize::from(view_h));
    for y in origin_y..origin_y + view_h {
        let mut spans = Vec::with_capacity(usize::from(view_w));
        for x in origin_x..origin_x + view_w {
            let coord = Coord::new(x, y);
            let Some(tile) = map.get(coord) else {
                spans.push(Span::raw(" "));
                continue;
            };
            let bg = terrain_color(tile.tile_type);
            let occupant = state.agents().iter().find(|a| a.position == coord);
            let span = match (occupant, tile.resource) {
                (Some(agent), _) => Span::styled(
                    agent.id.to_string(),
                    Style::default()
                        .fg(agent_color(agent.id))
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ),
                (None, Some(resource)) => Span::styled(
                    resource_glyph(resource),
                    Style::default().fg(resource_color(resource)).bg(bg),
                ),
                (None, None) => Span::styled(terrain_glyph(tile.tile_type), Style::default().bg(bg)),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let title = format!(" Map {}x{} ", map.width(), map.height());
    let map_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(map_widget, area);
}

fn terrain_color(tile_type: TileType) -> Color {
    match tile_type {
        TileType::Grass => Color::Rgb(144, 238, 144),
        TileType::Forest => Color::Rgb(34, 139, 34),
        TileType::Mountain => Color::Rgb(160, 82, 45),
        TileType::Water => Color::Rgb(65, 105, 225),
    }
}

fn terrain_glyph(tile_type: TileType) -> &'static str {
    match tile_type {
        TileType::Grass | TileType::Water => " ",
        TileType::Forest => "^",
        TileType::Mountain => "M",
    }
}

fn resource_glyph(resource: Resource) -> &'static str {
    match resource {
        Resource::Gold => "$",
        Resource::Food => "%",
        Resource::Weapon => "/",
    }
}

fn resource_color(resource: Resource) -> Color {
    match resource {
        Resource::Gold => Color::Yellow,
        Resource::Food => Color::Red,
        Resource::Weapon => Color::Black,
    }
}

fn resource_name(resource: Resource) -> &'static str {
    match resource {
        Resource::Gold => "gold",
        Resource::Food => "food",
        Resource::Weapon => "a weapon",
    }
}

fn agent_color(id: AgentId) -> Color {
    match id {
        0 => Color::Magenta,
        1 => Color::Rgb(255, 165, 0),
        2 => Color::LightMagenta,
        3 => Color::Rgb(139, 69, 19),
        _ => Color::White,
    }
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let human = app.session.human_agent();
    let mut lines = vec![Line::from("")];

    for agent in state.agents() {
        let marker = if Some(agent.id) == human { " (you)" } else { "" };
        let turn = if !state.is_terminal() && agent.id == state.current_agent_id() {
            " <"
        } else {
            ""
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("Agent {}{marker}", agent.id),
                Style::default()
                    .fg(agent_color(agent.id))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(turn),
        ]));
        lines.push(Line::from(format!(
            "  Health: {}  Exp: {}",
            agent.health, agent.experience
        )));
        lines.push(Line::from(format!(
            "  Gold: {}  Food: {}  Weapons: {}",
            agent.resources.gold, agent.resources.food, agent.resources.weapon
        )));
        lines.push(Line::from(""));
    }

    if human.is_none() && state.winner().is_none() && app.session.config().human_seat {
        lines.push(Line::styled(
            "You were eliminated.",
            Style::default().fg(Color::Red),
        ));
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Agents "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let text = format!(" [arrows] Move  [p] Pass  [r] Restart  [q] Quit | {}", app.message);

    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwar::game::CombatReport;

    #[test]
    fn test_viewport_centers_on_focus() {
        assert_eq!(viewport_origin(50, 20, 100), 40);
    }

    #[test]
    fn test_viewport_clamps_to_edges() {
        assert_eq!(viewport_origin(3, 20, 100), 0);
        assert_eq!(viewport_origin(98, 20, 100), 80);
    }

    #[test]
    fn test_viewport_wider_than_map() {
        assert_eq!(viewport_origin(5, 40, 10), 0);
    }

    #[test]
    fn test_pass_key_hands_turn_on() {
        let config = gridwar::config::GameConfig {
            width: 12,
            height: 12,
            seed: Some(9),
            human_seat: true,
            ..gridwar::config::GameConfig::default()
        };
        let mut app = App::new(Session::new(config, Instant::now()).unwrap());
        assert!(app.session.awaiting_human());

        app.human_pass();
        assert_eq!(app.message, "You pass.");
        assert_eq!(app.session.state().turn_count(), 1);
        assert!(!app.session.awaiting_human());

        // Not our turn any more, so a second press does nothing.
        app.human_pass();
        assert_eq!(app.session.state().turn_count(), 1);
    }

    #[test]
    fn test_describe_winning_move() {
        let outcome = MoveOutcome {
            agent: 0,
            from: Coord::new(0, 0),
            to: Coord::new(1, 0),
            collected: Some(Resource::Gold),
            combat: Some(CombatReport {
                defender: 1,
                damage: 40,
                eliminated: true,
            }),
            winner: Some(0),
        };
        assert_eq!(
            describe_move(&outcome),
            "Agent 0 moved to (1, 0), picked up gold, hit agent 1 for 40 and eliminated it. Agent 0 wins!"
        );
    }
}
