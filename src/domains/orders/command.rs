//! Strict cart-command parsing.
//!
//! The order tool expects the calling model to send structured commands,
//! not natural language. The grammar, case-insensitive on the verb:
//!
//! ```text
//! CLEAR | CANCEL ORDER                  clear the cart
//! PLACE ORDER | CONFIRM ORDER           place the current cart as an order
//! CONFIRM CANCEL                        confirm cancelling a placed order
//! ADD:<ref>[:<qty>][;<ref>[:<qty>]]     add items (qty defaults to 1)
//! REMOVE:<ref>[:<qty>][;...]            remove items (qty defaults to 1)
//! MODIFY:<ref>:<qty>[;...]              set a line to an absolute quantity
//! NOTE:<text>                           record a customization note
//! ```
//!
//! `<ref>` is a canonical menu id or a display name (case-insensitive).
//! Batches are `;`-separated after a single verb; each entry resolves and
//! applies independently.

use thiserror::Error;

use crate::domains::tenants::MenuItem;

/// What a command asks the cart engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Add,
    Remove,
    Modify,
    Clear,
    PlaceOrder,
    ConfirmCancel,
    Note,
    /// Produced by a classifier that extracted nothing actionable.
    None,
}

/// One item reference inside a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// Canonical id or display name, as sent.
    pub reference: String,
    pub qty: u32,
}

/// A parsed cart command, ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartCommand {
    pub action: CartAction,
    pub items: Vec<ItemRef>,
    pub note: Option<String>,
}

impl CartCommand {
    /// The neutral command: nothing to apply.
    pub fn none() -> Self {
        Self {
            action: CartAction::None,
            items: Vec::new(),
            note: None,
        }
    }

    fn bare(action: CartAction) -> Self {
        Self {
            action,
            items: Vec::new(),
            note: None,
        }
    }
}

/// Why a command string failed to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command verb '{0}'")]
    UnknownVerb(String),

    #[error("missing item reference after '{0}:'")]
    MissingItem(String),

    #[error("MODIFY requires an explicit quantity for '{0}'")]
    MissingQuantity(String),

    #[error("NOTE requires text")]
    EmptyNote,
}

/// Parse one command string against the strict grammar.
pub fn parse_command(input: &str) -> Result<CartCommand, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let upper = trimmed.to_uppercase();

    // Notes are checked first so free text after "NOTE:" never trips the
    // substring match for cancellation below.
    if let Some(rest) = strip_verb(trimmed, "NOTE") {
        let note = rest.trim();
        if note.is_empty() {
            return Err(CommandParseError::EmptyNote);
        }
        return Ok(CartCommand {
            action: CartAction::Note,
            items: Vec::new(),
            note: Some(note.to_string()),
        });
    }
    if upper == "CONFIRM CANCEL" {
        return Ok(CartCommand::bare(CartAction::ConfirmCancel));
    }
    if upper == "PLACE ORDER" || upper == "CONFIRM ORDER" {
        return Ok(CartCommand::bare(CartAction::PlaceOrder));
    }
    if upper.starts_with("CLEAR") || upper.contains("CANCEL ORDER") {
        return Ok(CartCommand::bare(CartAction::Clear));
    }

    let Some((verb_raw, rest)) = trimmed.split_once(':') else {
        return Err(CommandParseError::UnknownVerb(trimmed.to_string()));
    };

    let verb = verb_raw.trim().to_uppercase();
    let action = match verb.as_str() {
        "ADD" => CartAction::Add,
        "REMOVE" => CartAction::Remove,
        "MODIFY" => CartAction::Modify,
        _ => return Err(CommandParseError::UnknownVerb(verb_raw.trim().to_string())),
    };

    let items = parse_items(&verb, action, rest)?;
    Ok(CartCommand {
        action,
        items,
        note: None,
    })
}

fn strip_verb<'a>(input: &'a str, verb: &str) -> Option<&'a str> {
    let (head, rest) = input.split_once(':')?;
    head.trim().eq_ignore_ascii_case(verb).then_some(rest)
}

fn parse_items(
    verb: &str,
    action: CartAction,
    rest: &str,
) -> Result<Vec<ItemRef>, CommandParseError> {
    let mut items = Vec::new();

    for segment in rest.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (reference, qty_text) = match segment.rsplit_once(':') {
            Some((reference, qty)) => (reference.trim(), Some(qty.trim())),
            None => (segment, None),
        };
        if reference.is_empty() {
            return Err(CommandParseError::MissingItem(verb.to_string()));
        }

        let qty = match qty_text {
            Some(text) => match text.parse::<u32>() {
                Ok(qty) => qty,
                // Tolerated for ADD/REMOVE, which default to one; MODIFY is
                // an absolute set and an unparseable quantity must not be
                // silently rewritten.
                Err(_) if action == CartAction::Modify => {
                    return Err(CommandParseError::MissingQuantity(reference.to_string()));
                }
                Err(_) => 1,
            },
            None if action == CartAction::Modify => {
                return Err(CommandParseError::MissingQuantity(reference.to_string()));
            }
            None => 1,
        };

        items.push(ItemRef {
            reference: reference.to_string(),
            qty,
        });
    }

    if items.is_empty() {
        return Err(CommandParseError::MissingItem(verb.to_string()));
    }
    Ok(items)
}

/// Guided-retry text for a parse failure: the grammar reminder plus a
/// sample of valid item identifiers from the tenant's menu.
pub fn grammar_help(error: &CommandParseError, menu: &[MenuItem]) -> String {
    let samples = menu
        .iter()
        .take(5)
        .map(|m| format!("{}={}", m.name, m.menu_id))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "COMMAND_ERROR: {error}. Send commands as 'ADD:ItemID:Qty', 'REMOVE:ItemID:Qty', \
         'MODIFY:ItemID:Qty', 'NOTE:text', 'CLEAR', 'PLACE ORDER' or 'CONFIRM CANCEL'. \
         Batch items with ';' (e.g. 'ADD:101:2;102'). Available Item IDs: {samples}..."
    )
}
