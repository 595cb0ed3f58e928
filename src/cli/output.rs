//! Output formatting utilities for CLI.

use gridwar::game::SEATS;
use gridwar::tournament::{GameResult, TournamentStats};
use serde::Serialize;
use std::fmt::Write;

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    match result.winner {
        Some(winner) => {
            let _ = writeln!(output, "  Winner: Agent {winner}");
        }
        None => output.push_str("  Winner: Draw (turn limit)\n"),
    }
    let _ = writeln!(output, "  Turns: {}\n", result.turns_played);

    for agent in &result.agents {
        let _ = write!(
            output,
            "  Agent {}: health {:>3}  exp {:>3}  gold {}  food {}  weapon {}",
            agent.id,
            agent.health,
            agent.experience,
            agent.resources.gold,
            agent.resources.food,
            agent.resources.weapon
        );
        if let Some(turn) = agent.eliminated_turn {
            let _ = write!(output, " [eliminated turn {turn}]");
        }
        output.push('\n');
    }

    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-seat statistics.
    agents: Vec<JsonTournamentAgent>,
    /// Number of draws.
    draws: u64,
    /// Average game length in turns.
    avg_turns: f64,
}

/// JSON-serializable per-seat tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentAgent {
    /// Seat (agent id).
    agent: usize,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Games survived to the end.
    survivals: u64,
    /// Average final experience.
    avg_experience: f64,
    /// Experience standard deviation.
    experience_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &TournamentStats) -> Self {
        let agents = (0..SEATS)
            .map(|seat| JsonTournamentAgent {
                agent: seat,
                wins: stats.wins.get(seat).copied().unwrap_or(0),
                win_rate: stats.win_rate(seat),
                survivals: stats.survivals.get(seat).copied().unwrap_or(0),
                avg_experience: stats.avg_experience(seat),
                experience_std_dev: stats.experience_std_dev(seat),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            agents,
            draws: stats.draws,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for seat in 0..SEATS {
        let wins = stats.wins.get(seat).copied().unwrap_or(0);
        let _ = writeln!(
            output,
            "  Agent {seat}: {:.1}% ({wins} wins)",
            stats.win_rate(seat) * 100.0
        );
    }
    let _ = writeln!(
        output,
        "  Draws: {} ({:.1}%)\n",
        stats.draws,
        stats.draw_rate() * 100.0
    );

    output.push_str("Average Experience:\n");
    for seat in 0..SEATS {
        let _ = writeln!(
            output,
            "  Agent {seat}: {:.1} (+/- {:.1})",
            stats.avg_experience(seat),
            stats.experience_std_dev(seat)
        );
    }

    let _ = writeln!(output, "\nAverage Game Length: {:.0} turns", stats.avg_turns());

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats) -> String {
    let mut output = String::new();

    output.push_str("agent,wins,win_rate,survivals,avg_experience,experience_std_dev\n");

    for seat in 0..SEATS {
        let _ = writeln!(
            output,
            "{},{},{:.4},{},{:.2},{:.2}",
            seat,
            stats.wins.get(seat).copied().unwrap_or(0),
            stats.win_rate(seat),
            stats.survivals.get(seat).copied().unwrap_or(0),
            stats.avg_experience(seat),
            stats.experience_std_dev(seat)
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwar::game::Stockpile;
    use gridwar::tournament::AgentSummary;

    fn sample() -> GameResult {
        GameResult {
            seed: 9,
            winner: Some(1),
            turns_played: 42,
            agents: vec![
                AgentSummary {
                    id: 0,
                    health: 0,
                    experience: 3,
                    resources: Stockpile::STARTING,
                    eliminated_turn: Some(17),
                },
                AgentSummary {
                    id: 1,
                    health: 88,
                    experience: 20,
                    resources: Stockpile::STARTING,
                    eliminated_turn: None,
                },
            ],
            elimination_order: vec![0],
        }
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&sample());
        assert!(text.contains("seed: 9"));
        assert!(text.contains("Winner: Agent 1"));
        assert!(text.contains("[eliminated turn 17]"));
    }

    #[test]
    fn test_tournament_csv_has_row_per_seat() {
        let mut stats = TournamentStats::new(SEATS);
        stats.add_result(&sample());
        let csv = format_tournament_csv(&stats);
        assert_eq!(csv.lines().count(), SEATS + 1);
        assert!(csv.lines().nth(2).is_some_and(|row| row.starts_with("1,1,1.0000,1,")));
    }

    #[test]
    fn test_tournament_json() {
        let mut stats = TournamentStats::new(SEATS);
        stats.add_result(&sample());
        let json = serde_json::to_value(JsonTournamentResult::from_stats(&stats)).unwrap();
        assert_eq!(json["games_played"], 1);
        assert_eq!(json["agents"][1]["wins"], 1);
    }
}
