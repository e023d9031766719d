use crate::domain::models::booking::Booking;
use crate::domain::models::property::Property;
use crate::domain::models::user::User;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rejected,
}

impl BookingStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            "COMPLETED" => Some(Self::Completed),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// Who the caller is relative to the booking being changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Guest,
    Owner,
    Manager,
    Admin,
}

use Actor::*;
use BookingStatus::*;

/// The transition table. A (from, to) pair absent here is invalid from that
/// state regardless of who asks; a pair present but without the caller's
/// actor is an authorization failure. Hosts deliberately cannot cancel a
/// CONFIRMED booking; only the guest or an admin can.
const TRANSITIONS: &[(BookingStatus, BookingStatus, &[Actor])] = &[
    (Pending, Confirmed, &[Owner, Manager, Admin]),
    (Pending, Rejected, &[Owner, Manager, Admin]),
    (Pending, Cancelled, &[Guest, Owner, Manager, Admin]),
    (Confirmed, Cancelled, &[Guest, Admin]),
    (Confirmed, Completed, &[Owner, Manager, Admin]),
];

/// Admin wins over any relation to the booking; otherwise the caller must be
/// the booking's guest or on the property's host side.
pub fn resolve_actor(user: &User, booking: &Booking, property: &Property) -> Option<Actor> {
    if user.is_admin() {
        Some(Admin)
    } else if user.id == booking.guest_id {
        Some(Guest)
    } else if user.id == property.host_id {
        Some(Owner)
    } else if property.manager_id.as_deref() == Some(user.id.as_str()) {
        Some(Manager)
    } else {
        None
    }
}

pub fn authorize_transition(
    from: BookingStatus,
    to: BookingStatus,
    actor: Actor,
) -> Result<(), AppError> {
    let allowed = TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, actors)| *actors)
        .ok_or_else(|| {
            AppError::InvalidTransition(format!("{} -> {}", from.as_str(), to.as_str()))
        })?;

    if !allowed.contains(&actor) {
        return Err(AppError::Forbidden(format!(
            "Not allowed to move this booking to {}",
            to.as_str()
        )));
    }
    Ok(())
}

/// Payment status that must change in lockstep with the booking, if any.
/// Confirmation captures the pending charge; cancellation and rejection
/// release it back to the guest.
pub fn payment_status_for(to: BookingStatus) -> Option<&'static str> {
    match to {
        Confirmed => Some("COMPLETED"),
        Cancelled | Rejected => Some("REFUNDED"),
        _ => None,
    }
}
