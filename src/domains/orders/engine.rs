//! Cart engine: applies a parsed command to a session's cart and phase.
//!
//! All mutation of the cart mapping happens here. Per-item resolution
//! failures never abort a batch; every entry resolves and applies
//! independently. After every mutating call, lines with a zero quantity are
//! purged so the cart never stores a non-positive quantity.
//!
//! Phase rules: a successful add/remove/modify advances the session into
//! `Ordering`; `OrderPlaced` is sticky. Emptying the cart while an order is
//! already placed does not silently cancel it: the engine reports the
//! distinct [`OutcomeKind::CancellationPending`] so the caller asks for
//! confirmation before treating the placed order as cancelled.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use super::command::{CartAction, CartCommand, ItemRef};
use crate::domains::sessions::{Phase, SessionRecord};
use crate::domains::tenants::{format_price, resolve_item, MenuItem};

/// Outcome classification, one per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// At least the attempt to add/remove/modify ran; see the change lists.
    Updated,
    /// Ordinary clear, or a clear of an already-empty cart.
    Cleared,
    /// The cart emptied while an order was already placed; a human must
    /// confirm before the placed order counts as cancelled.
    CancellationPending,
    /// A placed order was cancelled after confirmation.
    OrderCancelled,
    /// The cart was placed as an order.
    OrderPlaced,
    /// An order was requested on an empty cart.
    EmptyCart,
    /// A customization note was recorded.
    NoteRecorded,
    /// The neutral command; nothing applied.
    Noop,
    /// The tenant menu was empty or unavailable at resolution time.
    ConfigurationError,
}

/// One applied cart change, reported by resolved display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub name: String,
    pub qty: u32,
}

/// Everything the caller needs to report one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartOutcome {
    pub kind: OutcomeKind,
    pub applied: Vec<AppliedChange>,
    /// References that matched nothing on the menu.
    pub not_found: Vec<String>,
    /// Menu items referenced for removal that were not in the cart.
    pub not_in_cart: Vec<String>,
    pub message: String,
}

impl CartOutcome {
    fn bare(kind: OutcomeKind, message: String) -> Self {
        Self {
            kind,
            applied: Vec::new(),
            not_found: Vec::new(),
            not_in_cart: Vec::new(),
            message,
        }
    }
}

/// Deterministic cart state machine.
pub struct CartEngine;

impl CartEngine {
    /// Apply one command against the session, returning the outcome report.
    pub fn apply_command(
        command: &CartCommand,
        menu: &[MenuItem],
        session: &mut SessionRecord,
    ) -> CartOutcome {
        match command.action {
            CartAction::Clear => Self::clear(menu, session),
            CartAction::ConfirmCancel => Self::confirm_cancel(menu, session),
            CartAction::PlaceOrder => Self::place_order(menu, session),
            CartAction::Note => Self::record_note(command.note.as_deref(), menu, session),
            CartAction::None => CartOutcome::bare(
                OutcomeKind::Noop,
                format!("Nothing to do. Current Cart: {}.", readable_cart(&session.cart, menu)),
            ),
            CartAction::Add | CartAction::Remove | CartAction::Modify => {
                Self::apply_items(command.action, &command.items, menu, session)
            }
        }
    }

    /// Clear bypasses per-item resolution entirely, so it works even when
    /// the menu is unavailable.
    fn clear(menu: &[MenuItem], session: &mut SessionRecord) -> CartOutcome {
        session.cart.clear();

        if session.phase == Phase::OrderPlaced {
            info!("clear requested on a placed order, awaiting confirmation");
            return CartOutcome::bare(
                OutcomeKind::CancellationPending,
                "This order was already placed. The cart is now empty; send CONFIRM CANCEL \
                 to cancel the placed order."
                    .to_string(),
            );
        }

        CartOutcome::bare(
            OutcomeKind::Cleared,
            format!("Order cleared. Current Cart: {}.", readable_cart(&session.cart, menu)),
        )
    }

    fn confirm_cancel(menu: &[MenuItem], session: &mut SessionRecord) -> CartOutcome {
        session.cart.clear();

        if session.phase == Phase::OrderPlaced {
            session.phase = Phase::Idle;
            session.placed_at = None;
            info!("placed order cancelled after confirmation");
            return CartOutcome::bare(
                OutcomeKind::OrderCancelled,
                "Order cancelled. Current Cart: Empty.".to_string(),
            );
        }

        // Nothing was placed; behaves as an ordinary clear.
        CartOutcome::bare(
            OutcomeKind::Cleared,
            format!("Order cleared. Current Cart: {}.", readable_cart(&session.cart, menu)),
        )
    }

    fn place_order(menu: &[MenuItem], session: &mut SessionRecord) -> CartOutcome {
        if session.cart.is_empty() {
            return CartOutcome::bare(
                OutcomeKind::EmptyCart,
                "Your cart is empty. Add items with ADD:<item>:<qty> before placing an order."
                    .to_string(),
            );
        }

        session.phase = Phase::OrderPlaced;
        session.placed_at = Some(Utc::now());

        let total: f64 = session
            .cart
            .iter()
            .filter_map(|(id, qty)| {
                menu.iter()
                    .find(|m| &m.menu_id == id)
                    .map(|m| m.price * f64::from(*qty))
            })
            .sum();

        CartOutcome::bare(
            OutcomeKind::OrderPlaced,
            format!(
                "Order placed: {} (total {}). Send CLEAR to request cancellation.",
                readable_cart(&session.cart, menu),
                format_price(total)
            ),
        )
    }

    fn record_note(
        note: Option<&str>,
        menu: &[MenuItem],
        session: &mut SessionRecord,
    ) -> CartOutcome {
        let note = note.unwrap_or_default();
        session.append_note(note);
        CartOutcome::bare(
            OutcomeKind::NoteRecorded,
            format!(
                "Noted: {}. Current Cart: {}.",
                note.trim(),
                readable_cart(&session.cart, menu)
            ),
        )
    }

    fn apply_items(
        action: CartAction,
        items: &[ItemRef],
        menu: &[MenuItem],
        session: &mut SessionRecord,
    ) -> CartOutcome {
        if menu.is_empty() {
            warn!("cart command received with no menu data loaded");
            return CartOutcome::bare(
                OutcomeKind::ConfigurationError,
                "Error: no menu data available for this restaurant.".to_string(),
            );
        }

        let mut applied: Vec<AppliedChange> = Vec::new();
        let mut not_found: Vec<String> = Vec::new();
        let mut not_in_cart: Vec<String> = Vec::new();

        for item in items {
            let Some(menu_item) = resolve_item(menu, &item.reference) else {
                not_found.push(item.reference.clone());
                continue;
            };
            let id = menu_item.menu_id.clone();

            match action {
                CartAction::Add => {
                    let qty = item.qty.max(1);
                    *session.cart.entry(id).or_insert(0) += qty;
                    applied.push(AppliedChange {
                        name: menu_item.name.clone(),
                        qty,
                    });
                }
                CartAction::Remove => match session.cart.get(&id).copied() {
                    None => not_in_cart.push(menu_item.name.clone()),
                    Some(current) => {
                        let removed = item.qty.max(1).min(current);
                        let remaining = current - removed;
                        if remaining == 0 {
                            session.cart.remove(&id);
                        } else {
                            session.cart.insert(id, remaining);
                        }
                        applied.push(AppliedChange {
                            name: menu_item.name.clone(),
                            qty: removed,
                        });
                    }
                },
                CartAction::Modify => {
                    if item.qty == 0 {
                        session.cart.remove(&id);
                    } else {
                        session.cart.insert(id, item.qty);
                    }
                    applied.push(AppliedChange {
                        name: menu_item.name.clone(),
                        qty: item.qty,
                    });
                }
                _ => unreachable!("apply_items only receives item actions"),
            }
        }

        session.purge_empty_lines();
        if !applied.is_empty() {
            session.advance_to_ordering();
        }

        let emptied_placed_order =
            session.phase == Phase::OrderPlaced && session.cart.is_empty() && !applied.is_empty();

        let message = if emptied_placed_order {
            "This order was already placed. The cart is now empty; send CONFIRM CANCEL \
             to cancel the placed order."
                .to_string()
        } else {
            render_update(action, &applied, &not_found, &not_in_cart, &session.cart, menu)
        };

        CartOutcome {
            kind: if emptied_placed_order {
                OutcomeKind::CancellationPending
            } else {
                OutcomeKind::Updated
            },
            applied,
            not_found,
            not_in_cart,
            message,
        }
    }
}

fn render_update(
    action: CartAction,
    applied: &[AppliedChange],
    not_found: &[String],
    not_in_cart: &[String],
    cart: &HashMap<String, u32>,
    menu: &[MenuItem],
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !applied.is_empty() {
        let changes = applied
            .iter()
            .map(|c| match action {
                CartAction::Modify if c.qty == 0 => format!("{} to 0x (removed)", c.name),
                CartAction::Modify => format!("{} to {}x", c.name, c.qty),
                _ => format!("{}x {}", c.qty, c.name),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let verb = match action {
            CartAction::Add => "Added",
            CartAction::Remove => "Removed",
            _ => "Set",
        };
        parts.push(format!("{verb} {changes}."));
    }
    if !not_found.is_empty() {
        parts.push(format!("Not on the menu: {}.", not_found.join(", ")));
    }
    if !not_in_cart.is_empty() {
        parts.push(format!("Not in cart: {}.", not_in_cart.join(", ")));
    }

    parts.push(format!("Current Cart: {}.", readable_cart(cart, menu)));
    parts.join(" ")
}

/// Readable cart summary, names resolved from the menu snapshot.
pub fn readable_cart(cart: &HashMap<String, u32>, menu: &[MenuItem]) -> String {
    if cart.is_empty() {
        return "Empty".to_string();
    }

    let mut lines: Vec<(String, u32)> = cart
        .iter()
        .map(|(id, qty)| {
            let name = menu
                .iter()
                .find(|m| &m.menu_id == id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| id.clone());
            (name, *qty)
        })
        .collect();
    lines.sort();

    lines
        .into_iter()
        .map(|(name, qty)| format!("{qty}x {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
