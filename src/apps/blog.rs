//! Blog app: tickets, reviews, the feed and the pages that manage them.

pub mod errors;
pub mod feed;
pub mod forms;
pub mod images;
pub mod models;
pub mod permissions;
pub mod urls;
pub mod views;


pub use errors::ContentError;
pub use feed::{FeedItem, Page};
pub use models::{Review, Ticket, TicketType};
