//! Line-oriented play loop that turns typed input into world commands.

use std::io::{BufRead, Write};

use anyhow::Result;
use conquest_core::{Command, Event, NodeId};
use conquest_world::{self as world, query, World};
use thiserror::Error;

use crate::render;

const HELP: &str = "\
commands:
  select <city> [amount]   pick a source, or send units from the picked source
  move <from> <to> <amount> send units along a road
  end                       finish the turn
  show                      print the board
  help                      print this text
  quit                      leave the game";

/// Action requested by a line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Command(Command),
    Show,
    Help,
    Quit,
}

/// Reasons a line of input could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("unknown command `{0}`; type `help`")]
    UnknownCommand(String),
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

fn number(token: &str) -> Result<u32, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::NotANumber(token.to_owned()))
}

/// Parses one line of input. Blank lines yield `None`.
pub(crate) fn parse_line(line: &str) -> Result<Option<Input>, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, arguments)) = tokens.split_first() else {
        return Ok(None);
    };

    let input = match (keyword, arguments) {
        ("select" | "s", [node]) => Input::Command(Command::SelectNode {
            node: NodeId::new(number(node)?),
            amount: None,
        }),
        ("select" | "s", [node, amount]) => Input::Command(Command::SelectNode {
            node: NodeId::new(number(node)?),
            amount: Some(number(amount)?),
        }),
        ("select" | "s", _) => return Err(ParseError::Usage("select <city> [amount]")),
        ("move" | "m", [from, to, amount]) => Input::Command(Command::AttemptMove {
            from: NodeId::new(number(from)?),
            to: NodeId::new(number(to)?),
            amount: number(amount)?,
        }),
        ("move" | "m", _) => return Err(ParseError::Usage("move <from> <to> <amount>")),
        ("end" | "e", []) => Input::Command(Command::EndTurn),
        ("show", []) => Input::Show,
        ("help" | "?", []) => Input::Help,
        ("quit" | "q", []) => Input::Quit,
        (other, _) => return Err(ParseError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(input))
}

/// Drives `world` from `input` until the input ends or the player quits.
pub(crate) fn run<R: BufRead, W: Write>(world: &mut World, input: R, output: &mut W) -> Result<()> {
    write!(output, "{}", render::board(&query::board_view(world)))?;
    writeln!(output, "type `help` for commands")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(Input::Command(command))) => command,
            Ok(Some(Input::Show)) => {
                write!(output, "{}", render::board(&query::board_view(world)))?;
                continue;
            }
            Ok(Some(Input::Help)) => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            Ok(Some(Input::Quit)) => break,
            Ok(None) => continue,
            Err(error) => {
                writeln!(output, "{error}")?;
                continue;
            }
        };

        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        for event in &events {
            writeln!(output, "{}", render::event(event))?;
        }

        if events.iter().any(|event| matches!(event, Event::TurnEnded { .. })) {
            write!(output, "{}", render::board(&query::board_view(world)))?;
        }
        if events.iter().any(|event| matches!(event, Event::NodeCaptured { .. })) {
            if let Some(player) = query::sole_owner(world) {
                writeln!(output, "player {} holds every city", player.get())?;
            }
        }
    }

    Ok(())
}
