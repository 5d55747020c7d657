//! Plain-text presentation of boards and events.

use std::fmt::Write as _;

use conquest_core::{BoardView, Event, NodeSnapshot, Owner, RejectionReason};

fn owner_label(owner: Owner) -> String {
    match owner {
        Owner::Neutral => "neutral".to_owned(),
        Owner::Player(player) => format!("player {}", player.get()),
    }
}

fn node_line(node: &NodeSnapshot) -> String {
    let mut line = format!(
        "  #{:<3} ({:>4.0}, {:>4.0})  {:<9}",
        node.id.get(),
        node.position.x(),
        node.position.y(),
        owner_label(node.owner)
    );
    let _ = match (node.garrison, node.movable) {
        (Some(garrison), Some(movable)) => write!(line, "  {garrison} units, {movable} movable"),
        _ => write!(line, "  ? units"),
    };
    if node.fallback {
        line.push_str("  (crowded)");
    }
    if node.selected {
        line.push_str("  [selected]");
    }
    line
}

/// Multi-line description of the board as seen by the current player.
pub(crate) fn board(view: &BoardView) -> String {
    let mut text = match view.current_player() {
        Some(player) => format!("turn {}, player {} to move\n", view.turn(), player.get()),
        None => format!("turn {}, nobody to move\n", view.turn()),
    };
    for node in view.nodes() {
        text.push_str(&node_line(node));
        text.push('\n');
    }

    let roads: Vec<String> = view
        .edges()
        .iter()
        .map(|edge| format!("{}-{}", edge.a().get(), edge.b().get()))
        .collect();
    let _ = writeln!(text, "roads: {}", roads.join(" "));
    text
}

fn reason(reason: RejectionReason) -> &'static str {
    match reason {
        RejectionReason::UnknownNode => "no such city",
        RejectionReason::NotOwned => "you do not hold that city",
        RejectionReason::NoMovableUnits => "no units there can move this turn",
        RejectionReason::NotAdjacent => "no road joins those cities",
        RejectionReason::SameNode => "source and target are the same city",
        RejectionReason::NonPositiveAmount => "move at least one unit",
        RejectionReason::NoCombatUnits => "spies cannot attack on their own",
    }
}

/// One-line description of an event.
pub(crate) fn event(event: &Event) -> String {
    match event {
        Event::NodeSelected { node } => format!("selected #{}", node.get()),
        Event::SelectionCleared => "selection cleared".to_owned(),
        Event::SelectionRejected { node, reason: why } => {
            format!("cannot select #{}: {}", node.get(), reason(*why))
        }
        Event::UnitsMoved { from, to, amount } => {
            format!("moved {amount} units from #{} to #{}", from.get(), to.get())
        }
        Event::NodeAttacked {
            from,
            to,
            attackers,
            defenders,
            attacker_losses,
            defender_losses,
        } => format!(
            "#{} attacked #{} with {attackers} against {defenders}: lost {attacker_losses}, killed {defender_losses}",
            from.get(),
            to.get()
        ),
        Event::NodeCaptured {
            node,
            previous_owner,
            new_owner,
            garrison,
        } => format!(
            "player {} took #{} from {} and holds it with {garrison}",
            new_owner.get(),
            node.get(),
            owner_label(*previous_owner)
        ),
        Event::MoveRejected {
            from,
            to,
            reason: why,
        } => format!(
            "cannot move from #{} to #{}: {}",
            from.get(),
            to.get(),
            reason(*why)
        ),
        Event::UnitsProduced { node, amount } => {
            format!("#{} raised {amount} units", node.get())
        }
        Event::TurnEnded {
            player,
            next_player,
            turn,
        } => format!(
            "player {} ends the turn; turn {turn} belongs to player {}",
            player.get(),
            next_player.get()
        ),
    }
}
