mod review;
mod ticket;

pub use review::{NewReview, Review};
pub use ticket::{NewTicket, Ticket, TicketType, TicketUpdate};
