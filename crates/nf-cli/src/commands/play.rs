use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::ValueEnum;
use colored::Colorize;
use strsim::jaro_winkler;

use nf_core::{Action, Attributes, Background, Character, GameState, Gender, Race, VampireClass};
use nf_engine::config::OracleConfig;
use nf_engine::{
    ChatOracle, GameSession, NarrativeOracle, ScriptedOracle, SessionConfig, export_markdown,
    export_text, roll_attributes,
};

const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Which narrative oracle narrates the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OracleKind {
    /// Offline, seeded outcomes.
    Scripted,
    /// An OpenAI-compatible chat-completions server.
    Chat,
}

pub struct PlayArgs {
    pub name: String,
    pub gender: String,
    pub race: String,
    pub class: String,
    pub background: String,
    pub attributes: Option<String>,
    pub seed: u64,
    pub oracle: OracleKind,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub chronicle: Option<PathBuf>,
}

async fn build_character<O>(args: &PlayArgs, oracle: &O) -> Result<Character, String>
where
    O: NarrativeOracle + ?Sized,
{
    let gender = Gender::parse(&args.gender)
        .ok_or_else(|| format!("unknown gender \"{}\" (expected male or female)", args.gender))?;
    let race = Race::lookup(&args.race).map_err(|e| e.to_string())?;
    let class = VampireClass::lookup(&args.class).map_err(|e| e.to_string())?;
    let background = Background::lookup(&args.background).map_err(|e| e.to_string())?;
    let attributes = match &args.attributes {
        Some(list) => Attributes::parse_list(list).map_err(|e| e.to_string())?,
        None => roll_attributes(oracle, gender, race, class, background).await,
    };
    Character::new(&args.name, gender, race, class, background, attributes)
        .map_err(|e| e.to_string())
}

fn build_oracle(args: &PlayArgs, config: &SessionConfig) -> Box<dyn NarrativeOracle> {
    match args.oracle {
        OracleKind::Scripted => Box::new(ScriptedOracle::from_config(config)),
        OracleKind::Chat => {
            let mut oracle_config = OracleConfig::from_env();
            if let Some(url) = &args.base_url {
                oracle_config = oracle_config.with_base_url(url.as_str());
            }
            if let Some(model) = &args.model {
                oracle_config = oracle_config.with_model(model.as_str());
            }
            tracing::info!(
                base_url = %oracle_config.base_url,
                model = %oracle_config.model,
                "using chat oracle"
            );
            Box::new(ChatOracle::new(oracle_config))
        }
    }
}

pub async fn run(args: PlayArgs) -> Result<(), String> {
    let config = SessionConfig::default().with_seed(args.seed);
    let oracle = build_oracle(&args, &config);
    let character = build_character(&args, &*oracle).await?;
    let session = GameSession::new(character, oracle, config);

    let state = session.state();
    println!(
        "  {} {} the {}, {} of the {}th Generation",
        "Nightfall".bold(),
        state.character.name.bold(),
        state.character.race,
        state.character.class,
        state.generation
    );
    println!("  Type a number or an action, 'help' for commands, 'quit' to exit.\n");
    for line in &state.event_log {
        println!("  {line}");
    }
    print_turn(&state);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let current = session.state();
        match input.to_lowercase().as_str() {
            "quit" | "q" => break,
            "help" => {
                print_help();
                continue;
            }
            "status" => {
                print_status(&current);
                continue;
            }
            "log" => {
                for entry in &current.event_log {
                    println!("  {entry}");
                }
                println!();
                continue;
            }
            "memory" => {
                if current.memory.is_empty() {
                    println!("  Nothing of note has happened yet.\n");
                }
                for (i, m) in current.memory.iter().enumerate() {
                    println!("  {:>2}. {m}", i + 1);
                }
                continue;
            }
            "chronicle" => {
                println!("{}", export_text(&current));
                continue;
            }
            "undo" => {
                match session.undo() {
                    Ok(state) => {
                        println!("  {}\n", "The night rewinds.".italic());
                        print_turn(&state);
                    }
                    Err(e) => println!("{}\n", e.to_string().yellow()),
                }
                continue;
            }
            _ => {}
        }

        let action = match choose_action(&current, input) {
            Ok(action) => action,
            Err(msg) => {
                println!("{}\n", msg.yellow());
                continue;
            }
        };

        match session.perform(action).await {
            Ok(next) => {
                for entry in fresh_lines(&current, &next) {
                    println!("  {entry}");
                }
                println!();
                if next.is_game_over {
                    println!("  {}", next.current_event.red().bold());
                    println!("  {}\n", next.game_over_message.red());
                    break;
                }
                print_turn(&next);
            }
            Err(e) => println!("{}\n", e.to_string().yellow()),
        }
    }

    if let Some(path) = &args.chronicle {
        fs::write(path, export_markdown(&session.state()))
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        println!("  Chronicle written to {}", path.display());
    }

    Ok(())
}

/// Resolve player input to one of the available actions: a 1-based index,
/// or an action label.
fn choose_action(state: &GameState, input: &str) -> Result<Action, String> {
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| state.available_actions.get(i).copied())
            .ok_or_else(|| {
                format!(
                    "No action numbered {n}. Choose 1-{}.",
                    state.available_actions.len()
                )
            });
    }

    match Action::parse(input) {
        Ok(action) => Ok(action),
        Err(e) => match suggest(state, input) {
            Some(label) => Err(format!("{e}. Did you mean \"{label}\"?")),
            None => Err(e.to_string()),
        },
    }
}

/// The available action whose label is closest to `input`, if close enough.
fn suggest(state: &GameState, input: &str) -> Option<String> {
    let lower = input.to_lowercase();
    state
        .available_actions
        .iter()
        .map(|a| {
            let label = a.to_string();
            let score = jaro_winkler(&lower, &label.to_lowercase());
            (label, score)
        })
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, _)| label)
}

/// Lines appended to the event log by the last transition. The log drops
/// its oldest lines when full, so the count comes from the lifetime line
/// counter rather than from comparing the two logs.
fn fresh_lines<'a>(before: &GameState, after: &'a GameState) -> &'a [String] {
    let added = after.lines_logged.saturating_sub(before.lines_logged);
    let log = &after.event_log;
    let fresh = usize::try_from(added).map_or(log.len(), |n| n.min(log.len()));
    &log[log.len() - fresh..]
}

fn print_turn(state: &GameState) {
    println!(
        "  {} | {} | {}",
        format!("Day {}, {}", state.day, state.time).bold(),
        state.location,
        vitals(state)
    );
    println!("  {}\n", state.current_event);
    for (i, action) in state.available_actions.iter().enumerate() {
        println!("  {:>2}. {action}", i + 1);
    }
    println!();
}

fn vitals(state: &GameState) -> String {
    format!(
        "Blood {}/10  Humanity {}/7  Hunger {}/5  Influence {}",
        state.blood, state.humanity, state.hunger, state.influence
    )
}

fn print_status(state: &GameState) {
    let c = &state.character;
    println!("  {} ({} {} {})", c.name.bold(), c.gender, c.race, c.class);
    println!("  Background: {} ({})", c.background, c.background.bonus());
    println!("  Generation: {}", state.generation);
    for (label, value) in c.attributes.entries() {
        println!("  {label:<10} {value}");
    }
    println!("  {}", vitals(state));
    println!(
        "  Hunger tolerance: {:.1}  Herd: {}  Feedings: {}",
        state.hunger_tolerance, state.herd_size, state.feeds
    );
    let upgrades: Vec<_> = state.haven_upgrades.iter().map(|u| u.name()).collect();
    println!(
        "  Haven: {}",
        if upgrades.is_empty() {
            "no upgrades".to_string()
        } else {
            upgrades.join(", ")
        }
    );
    if state.has_enthralled_mortal {
        println!("  A mortal thrall awaits you at the Haven.");
    }
    println!();
}

fn print_help() {
    println!("  Commands:");
    println!("    <number>     Take the numbered action");
    println!("    <action>     Take an action by name (e.g. 'Hunt for Blood')");
    println!("    status       Show the character sheet and resources");
    println!("    log          Show the recent event log");
    println!("    memory       Show remembered events");
    println!("    chronicle    Show the journal of past nights");
    println!("    undo         Take back the last action");
    println!("    quit         Leave the game");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_engine::initialize_game_state;

    fn state() -> GameState {
        let c = Character::new(
            "Vesper",
            Gender::Female,
            Race::Sanguine,
            VampireClass::Siren,
            Background::ExiledNoble,
            Attributes::fallback(),
        )
        .unwrap();
        initialize_game_state(c)
    }

    #[test]
    fn numbers_pick_available_actions() {
        let s = state();
        assert_eq!(choose_action(&s, "1").unwrap(), Action::RestAndMeditate);
        assert!(choose_action(&s, "0").is_err());
        assert!(choose_action(&s, "99").unwrap_err().contains("Choose 1-5"));
    }

    #[test]
    fn typos_get_suggestions() {
        let s = state();
        let err = choose_action(&s, "Rest and Meditat").unwrap_err();
        assert!(err.contains("Did you mean \"Rest and Meditate\"?"));
        assert!(!choose_action(&s, "xyzzy").unwrap_err().contains("Did you mean"));
    }

    #[test]
    fn fresh_lines_counts_repeated_lines() {
        let before = state();
        let mut after = before.clone();
        let repeated = before.event_log.last().unwrap().clone();
        after.log(repeated.clone());
        after.log(repeated.clone());
        assert_eq!(fresh_lines(&before, &after), [repeated.clone(), repeated]);
        assert!(fresh_lines(&after, &after).is_empty());
    }

    #[test]
    fn fresh_lines_handles_eviction() {
        let before = state();
        let mut after = before.clone();
        for i in 0..40 {
            after.log(format!("line {i}"));
        }
        after.trim_event_log();
        let fresh = fresh_lines(&before, &after);
        assert_eq!(fresh.len(), after.event_log.len());
        assert_eq!(fresh.last().unwrap(), "line 39");
    }
}
