pub mod suit;
pub mod rank;
pub mod strain;
pub mod card;
pub mod hand;
pub mod seat;
pub mod call;
pub mod error;
pub mod io;

pub use suit::Suit;
pub use rank::Rank;
pub use strain::Strain;
pub use card::Card;
pub use hand::{AceTopology, Hand};
pub use seat::Seat;
pub use call::{parse_calls, Call};
pub use error::ParseError;
